#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use question_studio::{
    error::EngineError,
    infrastructure::ClientKey,
    models::{
        ChoiceQuestion, DoubtRequest, GenerationRequest, QuestionResult, ResultSet, Solution,
        Source,
    },
    router, AppState, Config, EngineFactory, GenerationEngine,
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "question-studio-test-boundary";

/// 假引擎的应答方式
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    SolarSystem,
    Empty,
    Timeout,
}

pub struct FakeEngine {
    behavior: Behavior,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<GenerationRequest>>,
    /// 暂存文件路径，以及引擎运行时它是否存在
    pub seen_files: Mutex<Vec<(PathBuf, bool)>>,
}

impl FakeEngine {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            seen_files: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_file(&self, path: &Path) {
        self.seen_files.lock().push((path.to_path_buf(), path.exists()));
    }

    fn fail(&self) -> Option<EngineError> {
        match self.behavior {
            Behavior::SolarSystem => None,
            Behavior::Empty => Some(EngineError::EmptyResult),
            Behavior::Timeout => Some(EngineError::Timeout { seconds: 120 }),
        }
    }
}

fn planet_question(n: usize) -> QuestionResult {
    QuestionResult::Choice(ChoiceQuestion {
        question: format!("Solar System question {}", n),
        options: vec![
            "Mercury".to_string(),
            "Venus".to_string(),
            "Earth".to_string(),
            "Mars".to_string(),
        ],
        correct_answer_index: Some(n % 4),
        answer: None,
        explanation: (n != 2).then(|| format!("Explanation {}", n)),
    })
}

#[async_trait]
impl GenerationEngine for FakeEngine {
    async fn generate(&self, request: GenerationRequest) -> Result<ResultSet, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(Source::File(handle)) = &request.source {
            self.record_file(&handle.path);
        }
        let count = request.count as usize;
        self.requests.lock().push(request);

        if let Some(err) = self.fail() {
            return Err(err);
        }
        Ok(ResultSet::new((1..=count).map(planet_question).collect()))
    }

    async fn solve_doubt(&self, request: DoubtRequest) -> Result<Solution, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.record_file(&request.image.path);

        if let Some(err) = self.fail() {
            return Err(err);
        }
        Ok(Solution {
            explanation: "The diagram shows a lever.".to_string(),
            steps: vec!["Find the fulcrum".to_string(), "Compare the arms".to_string()],
            additional_notes: Some("Archimedes".to_string()),
        })
    }
}

pub struct FakeFactory {
    pub engine: Arc<FakeEngine>,
    pub built: Mutex<Vec<ClientKey>>,
}

impl EngineFactory for FakeFactory {
    fn build(&self, key: &ClientKey) -> Result<Arc<dyn GenerationEngine>, EngineError> {
        self.built.lock().push(key.clone());
        Ok(self.engine.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub factory: Arc<FakeFactory>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn new(behavior: Behavior) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = Config {
            temp_dir: Some(temp_dir.path().to_path_buf()),
            max_upload_bytes: 64 * 1024,
            ..Config::default()
        };
        let factory = Arc::new(FakeFactory {
            engine: Arc::new(FakeEngine::new(behavior)),
            built: Mutex::new(Vec::new()),
        });
        let state = AppState::new(config, factory.clone());

        Self {
            router: router(state.clone()),
            state,
            factory,
            temp_dir,
        }
    }

    pub fn engine(&self) -> &FakeEngine {
        &self.factory.engine
    }

    pub fn temp_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.temp_dir.path())
            .expect("read temp dir")
            .next()
            .is_none()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond")
    }
}

pub fn cookie(api_key: &str) -> String {
    format!("api_key={}; model=gemini-2.0-flash", api_key)
}

/// htmx 表单提交
pub fn form_post(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("HX-Request", "true")
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request build should succeed")
}

/// htmx multipart 提交：文本字段 + 可选的 `file` 文件字段
pub fn multipart_post(
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("HX-Request", "true")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder
        .body(Body::from(body))
        .expect("request build should succeed")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
