//! 生成流程 - 流程层
//!
//! 核心职责：定义"一次用户操作"的完整处理流程
//!
//! 流程顺序：
//! 1. 取得（或构造）缓存的引擎
//! 2. 有上传文件时写入临时文件
//! 3. 调用引擎一次（不重试）
//! 4. 删除临时文件，返回结果

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::composer::{ComposedDoubt, ComposedRequest};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{with_staged_upload, ClientKey};
use crate::models::{DoubtRequest, GenerationRequest, Mode, ResultSet, Solution, Source};
use crate::render::markdown::{blocks_to_markdown, solution_to_markdown};
use crate::render::{render_result_set, render_solution};
use crate::services::EngineRegistry;
use crate::utils::logging::{log_action_end, log_action_start};
use crate::workflow::action_ctx::ActionCtx;

/// 生成流程
///
/// - 编排一次操作：引擎、临时文件、日志
/// - 不持有请求，每次调用消费一个请求
/// - 只依赖业务能力（services）和基础设施
pub struct GenerationFlow {
    registry: Arc<EngineRegistry>,
    temp_dir: Option<PathBuf>,
    verbose_logging: bool,
}

impl GenerationFlow {
    pub fn new(registry: Arc<EngineRegistry>, config: &Config) -> Self {
        Self {
            registry,
            temp_dir: config.temp_dir.clone(),
            verbose_logging: config.verbose_logging,
        }
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        &self.registry
    }

    /// 生成题目（主题、文档、视频模式）
    pub async fn run(&self, key: &ClientKey, composed: ComposedRequest) -> AppResult<ResultSet> {
        let ctx = ActionCtx::new(composed.request.mode, key);
        log_action_start(ctx.mode, &ctx.model, &summarize(&composed));
        debug!("{} 请求: {:?}", ctx, composed.request);

        let engine = self.registry.engine(key)?;
        let started = Instant::now();

        let mut composed = composed;
        let result = match composed.upload.take() {
            Some(upload) => {
                with_staged_upload(self.temp_dir.as_deref(), &upload, move |handle| async move {
                    engine
                        .generate(composed.into_request(Some(handle)))
                        .await
                        .map_err(AppError::from)
                })
                .await
            }
            None => engine
                .generate(composed.into_request(None))
                .await
                .map_err(AppError::from),
        };

        self.log_outcome(&ctx, started, result.as_ref().map(ResultSet::len));
        if let (true, Ok(results)) = (self.verbose_logging, &result) {
            debug!(
                "{} 结果:\n{}",
                ctx,
                blocks_to_markdown(&render_result_set(Some(results)))
            );
        }
        result
    }

    /// 图片答疑
    pub async fn solve(&self, key: &ClientKey, composed: ComposedDoubt) -> AppResult<Solution> {
        let ctx = ActionCtx::new(Mode::Image, key);
        log_action_start(ctx.mode, &ctx.model, &composed.prompt);

        let engine = self.registry.engine(key)?;
        let started = Instant::now();

        let ComposedDoubt {
            prompt,
            detail_level,
            upload,
        } = composed;
        let result = with_staged_upload(self.temp_dir.as_deref(), &upload, move |image| async move {
            engine
                .solve_doubt(DoubtRequest {
                    image,
                    prompt,
                    detail_level,
                })
                .await
                .map_err(AppError::from)
        })
        .await;

        self.log_outcome(&ctx, started, result.as_ref().map(|s| s.steps.len()));
        if let (true, Ok(solution)) = (self.verbose_logging, &result) {
            debug!("{} 结果:\n{}", ctx, solution_to_markdown(&render_solution(solution)));
        }
        result
    }

    fn log_outcome(&self, ctx: &ActionCtx, started: Instant, outcome: Result<usize, &AppError>) {
        let message;
        let outcome = match outcome {
            Ok(count) => Ok(count),
            Err(e) => {
                message = e.to_string();
                Err(message.as_str())
            }
        };
        log_action_end(ctx.mode, started.elapsed(), outcome);

        if self.verbose_logging {
            info!("{} 处理结束", ctx);
        }
    }
}

/// 请求摘要（只用于日志）
fn summarize(composed: &ComposedRequest) -> String {
    let request: &GenerationRequest = &composed.request;
    let subject = match (&request.topic, &request.source, &composed.upload) {
        (Some(topic), _, _) => topic.clone(),
        (None, Some(Source::Url(url)), _) => url.to_string(),
        (None, Some(Source::Text(text)), _) => format!("文本 {} 字", text.chars().count()),
        (None, _, Some(upload)) => format!("文件 {}", upload.file_name),
        _ => String::new(),
    };
    format!("{} x{} ({})", subject, request.count, request.format.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{OpenQuestion, QuestionFormat, QuestionResult, Upload};
    use crate::services::{EngineFactory, GenerationEngine};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录调用次数以及调用期间文件是否存在
    #[derive(Default)]
    struct RecordingEngine {
        calls: AtomicUsize,
        seen_paths: Mutex<Vec<(PathBuf, bool)>>,
        fail: bool,
    }

    #[async_trait]
    impl GenerationEngine for RecordingEngine {
        async fn generate(&self, request: GenerationRequest) -> Result<ResultSet, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(Source::File(handle)) = &request.source {
                self.seen_paths
                    .lock()
                    .push((handle.path.clone(), handle.path.exists()));
            }
            if self.fail {
                return Err(EngineError::EmptyResult);
            }
            Ok(ResultSet::new(vec![QuestionResult::Open(OpenQuestion {
                question: "q".to_string(),
                explanation: None,
            })]))
        }

        async fn solve_doubt(&self, request: DoubtRequest) -> Result<Solution, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_paths
                .lock()
                .push((request.image.path.clone(), request.image.path.exists()));
            Ok(Solution {
                explanation: "done".to_string(),
                ..Default::default()
            })
        }
    }

    struct SharedFactory(Arc<RecordingEngine>);

    impl EngineFactory for SharedFactory {
        fn build(&self, _key: &ClientKey) -> Result<Arc<dyn GenerationEngine>, EngineError> {
            Ok(self.0.clone())
        }
    }

    fn flow(engine: Arc<RecordingEngine>) -> GenerationFlow {
        let registry = Arc::new(EngineRegistry::new(Arc::new(SharedFactory(engine)), 4));
        GenerationFlow::new(registry, &Config::default())
    }

    fn pdf_request() -> ComposedRequest {
        ComposedRequest {
            request: GenerationRequest {
                mode: Mode::Document,
                topic: None,
                count: 2,
                format: QuestionFormat::MultipleChoice,
                instructions: None,
                learning_objective: None,
                difficulty: None,
                source: None,
            },
            upload: Some(Upload::new("notes.pdf", b"%PDF-1.4".to_vec())),
        }
    }

    #[tokio::test]
    async fn test_upload_exists_during_call_and_is_removed_after() {
        let engine = Arc::new(RecordingEngine::default());
        let key = ClientKey::new("key", "gemini-2.0-flash");

        let results = flow(engine.clone()).run(&key, pdf_request()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);

        let seen = engine.seen_paths.lock().clone();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].1, "file should exist during the call");
        assert!(!seen[0].0.exists(), "file should be removed afterwards");
    }

    #[tokio::test]
    async fn test_upload_is_removed_after_failure() {
        let engine = Arc::new(RecordingEngine {
            fail: true,
            ..Default::default()
        });
        let key = ClientKey::new("key", "gemini-2.0-flash");

        let err = flow(engine.clone()).run(&key, pdf_request()).await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::EmptyResult)));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert!(!engine.seen_paths.lock()[0].0.exists());
    }

    #[tokio::test]
    async fn test_solve_stages_image() {
        let engine = Arc::new(RecordingEngine::default());
        let key = ClientKey::new("key", "gemini-2.0-flash");
        let doubt = ComposedDoubt {
            prompt: "Explain".to_string(),
            detail_level: Default::default(),
            upload: Upload::new("diagram.png", vec![1, 2, 3]),
        };

        let solution = flow(engine.clone()).solve(&key, doubt).await.unwrap();
        assert_eq!(solution.explanation, "done");
        let seen = engine.seen_paths.lock().clone();
        assert!(seen[0].1);
        assert!(!seen[0].0.exists());
    }
}
