//! 日志初始化

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "question_studio=info";
const VERBOSE_FILTER: &str = "question_studio=debug";

/// 初始化日志（RUST_LOG 优先）
pub fn init() {
    init_with(false);
}

/// 初始化日志
///
/// # 参数
/// - `verbose`: 未设置 RUST_LOG 时是否输出 debug 日志
pub fn init_with(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // 测试中可能被重复调用
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
