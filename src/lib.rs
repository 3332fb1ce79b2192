//! # Question Studio
//!
//! 基于大模型的出题工具：主题、图片、文档、视频四种模式
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `ScopedTempFile` - 上传文件只在一次调用期间落盘
//! - `ClientCache` - 按 (API Key, 模型) 缓存客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `GenerationEngine` - 生成题目、图片答疑（一次调用，不重试）
//! - `LlmService` - 基于 OpenAI 兼容接口的实现
//! - `SourceFetcher` - 拉取 URL 来源
//!
//! ### ③ 流程层（Workflow）
//! - `composer/` - 校验表单，组装一次性请求
//! - `workflow/` - 定义"一次操作"的完整流程（引擎 → 临时文件 → 调用 → 清理）
//! - `render/` - 把结果映射为与格式无关的块，再输出为 Markdown / HTML
//!
//! ### ④ 接入层（Web）
//! - `handlers/` - axum 路由
//! - `views/` - maud 页面与 htmx 片段
//! - `app` - 启动与优雅关闭
//!
//! ## 模块结构

pub mod app;
pub mod composer;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod names;
pub mod rejections;
pub mod render;
pub mod services;
pub mod utils;
pub mod views;
pub mod workflow;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, Router};

// 重新导出常用类型
pub use app::App;
pub use composer::Composer;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{EngineFactory, EngineRegistry, GenerationEngine};
pub use workflow::GenerationFlow;

/// multipart 中除文件以外的字段预留的空间
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// 进程级共享状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub composer: Composer,
    pub flow: Arc<GenerationFlow>,
}

impl AppState {
    pub fn new(config: Config, factory: Arc<dyn EngineFactory>) -> Self {
        let registry = Arc::new(EngineRegistry::new(factory, config.client_cache_capacity));
        Self {
            composer: Composer::new(config.max_upload_bytes, config.default_model.clone()),
            flow: Arc::new(GenerationFlow::new(registry, &config)),
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        self.flow.registry()
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .merge(handlers::pages::routes())
        .merge(handlers::generate::routes())
        .merge(handlers::settings::routes())
        .layer(middleware::from_fn(handlers::csrf_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
