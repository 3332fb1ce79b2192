pub mod forms;
pub mod layout;
pub mod results;

use maud::{html, Markup};

use crate::{composer::Settings, models::Mode, render};

pub use layout::page;

/// 模式页面
///
/// 尚未保存 API Key 时只显示阻断提示，不渲染生成表单；
/// 在侧栏保存设置后页面重新加载，表单随之出现
///
/// # 参数
/// - `default_model`: 未保存模型时侧栏预选的模型（即服务端实际使用的默认模型）
pub fn mode_page(mode: Mode, settings: &Settings, default_model: &str) -> Markup {
    let has_credential = settings.has_credential();
    let notice = (!has_credential).then(|| {
        results::blocking_notice("Please enter your Google API Key in the sidebar to continue.")
    });

    page(
        mode,
        settings,
        default_model,
        html! {
            h2 { (mode.title()) }
            @if has_credential {
                (forms::form_for(mode))
            }
            (forms::results_area(notice))
        },
    )
}

/// 生成完成后换入结果区的片段
pub fn questions_fragment(results: &crate::models::ResultSet) -> Markup {
    results::result_set(&render::render_result_set(Some(results)))
}

pub fn solution_fragment(solution: &crate::models::Solution) -> Markup {
    results::solution(&render::render_solution(solution))
}
