use thiserror::Error;

/// 应用程序错误类型
///
/// 所有错误都只影响触发它的那一次用户操作
#[derive(Debug, Error)]
pub enum AppError {
    /// 表单校验错误
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// 生成引擎错误
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// 文件操作错误
    #[error(transparent)]
    File(#[from] FileError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 表单校验错误（提交被拦截，不会调用引擎）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// 未填写 API Key
    #[error("Please enter your Google API Key to continue.")]
    MissingCredential,
    /// 必填项为空
    #[error("{field} is required.")]
    MissingInput { field: &'static str },
    /// 题目数量越界
    #[error("Number of questions must be between {min} and {max} (got {value}).")]
    CountOutOfRange { value: u32, min: u32, max: u32 },
    /// 不支持的模型
    #[error("Unsupported model: {model}")]
    UnsupportedModel { model: String },
    /// 不支持的取值（题型、来源类型等）
    #[error("Invalid value for {field}: {value}")]
    InvalidChoice { field: &'static str, value: String },
    /// URL 不合法
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
    /// 上传文件类型不支持
    #[error("Unsupported file type for {file_name}; expected one of: {expected}")]
    UnsupportedFileType {
        file_name: String,
        expected: &'static str,
    },
    /// 上传文件过大
    #[error("Uploaded file is too large ({size} bytes, limit {limit} bytes)")]
    UploadTooLarge { size: usize, limit: usize },
    /// 表单无法解析
    #[error("Could not read the submitted form: {reason}")]
    MalformedForm { reason: String },
}

/// 生成引擎错误（单次调用，不重试）
#[derive(Debug, Error)]
pub enum EngineError {
    /// 调用超时
    #[error("The model did not respond within {seconds} seconds.")]
    Timeout { seconds: u64 },
    /// API Key 无效
    #[error("The API key was rejected by the model provider.")]
    InvalidKey,
    /// 来源无法处理（URL 拉取失败、文件无法读取等）
    #[error("Could not process the source: {reason}")]
    MalformedSource { reason: String },
    /// 返回结果为空
    #[error("The model returned no questions.")]
    EmptyResult,
    /// 返回内容无法解析
    #[error("The model returned an unreadable response: {reason}")]
    MalformedResponse { reason: String },
    /// API 调用失败
    #[error("Model API call failed (model: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 客户端初始化失败
    #[error("Failed to initialize the client for model {model}: {reason}")]
    ClientInit { model: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入临时文件失败
    #[error("Failed to stage upload {file_name}: {source}")]
    StageFailed {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("Failed to parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("Environment variable {var_name} has invalid value '{value}', expected {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建必填项缺失错误
    pub fn missing_input(field: &'static str) -> Self {
        AppError::Compose(ComposeError::MissingInput { field })
    }

    /// 是否属于用户输入问题（而非服务端故障）
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Compose(_) | AppError::Engine(EngineError::InvalidKey)
        )
    }
}

impl EngineError {
    /// 创建来源处理错误
    pub fn malformed_source(reason: impl Into<String>) -> Self {
        EngineError::MalformedSource {
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
