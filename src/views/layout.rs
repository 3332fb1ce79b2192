use maud::{html, Markup, DOCTYPE};

use crate::{
    composer::Settings,
    models::{catalog, Mode},
    names,
    utils::logging::mask_secret,
};

/// 让 htmx 把 4xx/5xx 的错误片段也换入结果区
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":".*","swap":true}]}"#;

const STYLE: &str = r#"
.layout { display: grid; grid-template-columns: 18rem 1fr; gap: 2rem; }
.notice { padding: 1rem; border-radius: .5rem; margin-bottom: 1rem; }
.notice.blocking { border: 1px solid #d9a400; background: #fff8e1; color: #5c4400; }
.notice.error { border: 1px solid #c62828; background: #fdecea; color: #7f1d1d; }
.htmx-indicator { display: none; }
.htmx-request .htmx-indicator, .htmx-request.htmx-indicator { display: block; }
.question-block ol { list-style: upper-alpha; }
"#;

fn head(title: &str) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";
            meta name="htmx-config" content=(HTMX_CONFIG);
            link rel="stylesheet" href=(names::PICO_CSS_URL);
            style { (maud::PreEscaped(STYLE)) }
            script src=(names::HTMX_SCRIPT_URL) {}
            title { (format!("{title} - Question Studio")) }
        }
    }
}

fn tabs(active: Mode) -> Markup {
    html! {
        nav {
            ul {
                li { strong { "📚 Question Studio" } }
            }
            ul {
                @for mode in Mode::ALL {
                    li {
                        @if mode == active {
                            a href=(names::page_url(mode)) aria-current="page" { (mode.title()) }
                        } @else {
                            a."secondary" href=(names::page_url(mode)) { (mode.title()) }
                        }
                    }
                }
            }
        }
    }
}

/// 设置侧栏
///
/// 这里的输入框会经 `hx-include` 随每个生成表单一起提交，未保存的 Key 也能直接使用
pub fn sidebar(active: Mode, settings: &Settings, default_model: &str) -> Markup {
    let selected_model = settings.model.as_deref().unwrap_or(default_model);
    let key_placeholder = settings
        .api_key
        .as_deref()
        .map(|key| format!("Saved ({})", mask_secret(key)))
        .unwrap_or_else(|| "Enter your API key".to_string());

    html! {
        aside {
            h4 { "⚙️ Configuration" }
            form id="settings" hx-post=(names::SETTINGS_URL) hx-swap="none" {
                label {
                    "Google API Key"
                    input type="password" name="api_key" autocomplete="off"
                        placeholder=(key_placeholder);
                }
                label {
                    "Select Model"
                    select name="model" {
                        @for (id, label) in catalog::MODELS.entries() {
                            option value=(id) selected[*id == selected_model] { (label) }
                        }
                    }
                }
                input type="hidden" name="return_to" value=(names::page_url(active));
                button type="submit" class="secondary" { "Save settings" }
            }
        }
    }
}

pub fn page(active: Mode, settings: &Settings, default_model: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head(active.title()))
            body."container" {
                header { (tabs(active)) }
                div.layout {
                    (sidebar(active, settings, default_model))
                    main { (body) }
                }
            }
        }
    }
}
