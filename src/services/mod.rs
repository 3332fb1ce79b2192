//! 业务能力层
//!
//! 描述"我能做什么"：调用模型、拉取来源、解析响应

pub mod engine;
pub mod llm_service;
pub mod prompts;
pub mod response_parser;
pub mod source_fetcher;

pub use engine::{EngineFactory, EngineRegistry, GenerationEngine, LlmEngineFactory};
pub use llm_service::LlmService;
pub use source_fetcher::SourceFetcher;
