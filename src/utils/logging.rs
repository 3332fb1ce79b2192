/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::Mode;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 监听地址: http://{}", config.address);
    info!("🤖 模型接口: {}", config.llm_api_base_url);
    info!("📦 默认模型: {}", config.default_model);
    info!("⏱️ 调用超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 记录一次生成操作开始
///
/// # 参数
/// - `mode`: 生成模式
/// - `model`: 模型名称
/// - `summary`: 请求摘要（会被截断）
pub fn log_action_start(mode: Mode, model: &str, summary: &str) {
    info!(
        "▶️ [{}] 开始生成 (模型: {}) {}",
        mode,
        model,
        truncate_text(summary, 60)
    );
}

/// 记录一次生成操作结束
///
/// # 参数
/// - `mode`: 生成模式
/// - `elapsed`: 耗时
/// - `outcome`: 成功时为结果数量，失败时为错误信息
pub fn log_action_end(mode: Mode, elapsed: Duration, outcome: Result<usize, &str>) {
    match outcome {
        Ok(count) => info!(
            "✅ [{}] 完成: {} 条结果，耗时 {:.1}s",
            mode,
            count,
            elapsed.as_secs_f64()
        ),
        Err(message) => warn!(
            "❌ [{}] 失败: {}，耗时 {:.1}s",
            mode,
            message,
            elapsed.as_secs_f64()
        ),
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 遮蔽密钥，只保留末尾 4 位
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
