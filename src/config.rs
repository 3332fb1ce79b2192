use crate::error::{AppResult, ConfigError};
use crate::models::catalog;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 程序配置
///
/// 优先级：环境变量 > 配置文件 > 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub address: String,
    // --- LLM 配置 ---
    /// OpenAI 兼容接口地址
    pub llm_api_base_url: String,
    /// 默认模型（用户未选择时使用）
    pub default_model: String,
    /// 单次调用超时（秒）
    pub request_timeout_secs: u64,
    /// 客户端缓存容量（按 API Key + 模型）
    pub client_cache_capacity: usize,
    // --- 上传配置 ---
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 临时文件目录，为空时使用系统临时目录
    pub temp_dir: Option<PathBuf>,
    // --- 其他 ---
    /// Cookie 是否只在 HTTPS 下发送
    pub secure_cookies: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8501".to_string(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            default_model: catalog::DEFAULT_MODEL.to_string(),
            request_timeout_secs: 120,
            client_cache_capacity: 32,
            max_upload_bytes: 20 * 1024 * 1024,
            temp_dir: None,
            secure_cookies: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量读取（未设置的项使用默认值）
    pub fn from_env() -> AppResult<Self> {
        Self::default().apply_env()
    }

    /// 读取配置文件（可选），再叠加环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.apply_env()
    }

    /// 从 TOML 文件读取
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }

    fn apply_env(self) -> AppResult<Self> {
        Ok(Self {
            address: std::env::var("BIND_ADDRESS").unwrap_or(self.address),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            default_model: std::env::var("LLM_MODEL_NAME").unwrap_or(self.default_model),
            request_timeout_secs: parse_env("LLM_TIMEOUT_SECS", "integer")?
                .unwrap_or(self.request_timeout_secs),
            client_cache_capacity: parse_env("CLIENT_CACHE_CAPACITY", "integer")?
                .unwrap_or(self.client_cache_capacity),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", "integer")?
                .unwrap_or(self.max_upload_bytes),
            temp_dir: std::env::var("TEMP_DIR").ok().map(PathBuf::from).or(self.temp_dir),
            secure_cookies: parse_env("SECURE_COOKIES", "boolean")?.unwrap_or(self.secure_cookies),
            verbose_logging: parse_env("VERBOSE_LOGGING", "boolean")?
                .unwrap_or(self.verbose_logging),
        })
    }
}

/// 解析环境变量；未设置返回 None，格式错误返回错误
fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &'static str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type,
            }
            .into()),
        },
        Err(_) => Ok(None),
    }
}
