//! 生成引擎接口
//!
//! 引擎本身是外部能力：慢、可能失败、每次操作只调用一次。
//! 这里只定义调用契约，以及按 (API Key, 模型) 缓存引擎实例的注册表

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::EngineError;
use crate::infrastructure::{ClientCache, ClientKey};
use crate::models::{DoubtRequest, GenerationRequest, ResultSet, Solution};
use crate::services::llm_service::LlmService;
use crate::services::source_fetcher::SourceFetcher;

/// URL 来源正文最多保留的字符数
const MAX_SOURCE_CHARS: usize = 60_000;

/// 生成引擎
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// 生成题目（请求被消费）
    async fn generate(&self, request: GenerationRequest) -> Result<ResultSet, EngineError>;

    /// 图片答疑
    async fn solve_doubt(&self, request: DoubtRequest) -> Result<Solution, EngineError>;
}

/// 引擎工厂：根据 API Key + 模型构造引擎
pub trait EngineFactory: Send + Sync {
    fn build(&self, key: &ClientKey) -> Result<Arc<dyn GenerationEngine>, EngineError>;
}

/// 生产环境工厂，构造 [`LlmService`]
pub struct LlmEngineFactory {
    api_base_url: String,
    timeout: Duration,
    fetcher: SourceFetcher,
}

impl LlmEngineFactory {
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        Ok(Self {
            api_base_url: config.llm_api_base_url.clone(),
            timeout,
            fetcher: SourceFetcher::new(timeout, MAX_SOURCE_CHARS)?,
        })
    }
}

impl EngineFactory for LlmEngineFactory {
    fn build(&self, key: &ClientKey) -> Result<Arc<dyn GenerationEngine>, EngineError> {
        if key.credential().trim().is_empty() {
            return Err(EngineError::ClientInit {
                model: key.model().to_string(),
                reason: "API key is empty".to_string(),
            });
        }
        Ok(Arc::new(LlmService::new(
            key,
            &self.api_base_url,
            self.timeout,
            self.fetcher.clone(),
        )))
    }
}

/// 引擎注册表
///
/// 进程级共享状态：启动时创建，关闭时 `shutdown()` 清空
pub struct EngineRegistry {
    factory: Arc<dyn EngineFactory>,
    cache: ClientCache<Arc<dyn GenerationEngine>>,
}

impl EngineRegistry {
    pub fn new(factory: Arc<dyn EngineFactory>, capacity: usize) -> Self {
        Self {
            factory,
            cache: ClientCache::new(capacity),
        }
    }

    /// 获取（或构造）对应的引擎
    pub fn engine(&self, key: &ClientKey) -> Result<Arc<dyn GenerationEngine>, EngineError> {
        self.cache
            .get_or_try_insert(key, |key| self.factory.build(key))
    }

    /// 会话改用 `next` 时淘汰旧引擎
    ///
    /// 已保存设置对应的 `previous` 与 `next` 不同则淘汰，
    /// 同一 API Key 下其他模型的引擎也一并淘汰
    ///
    /// # 返回
    /// 返回是否淘汰了条目
    pub fn activate(&self, previous: Option<&ClientKey>, next: &ClientKey) -> bool {
        let switched = self.cache.switch(previous, next);
        let dropped = self.cache.retain_current(next);
        switched || dropped > 0
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn shutdown(&self) {
        self.cache.clear();
    }
}
