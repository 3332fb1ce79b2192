//! 请求组装
//!
//! 校验各模式的表单并组装成一次性的生成请求。
//! 校验失败时提交被拦截，不会触发任何引擎调用

pub mod forms;

use url::Url;

use crate::error::ComposeError;
use crate::infrastructure::ClientKey;
use crate::models::request::media_type_for;
use crate::models::{
    catalog, DetailLevel, DifficultyLevel, FileHandle, GenerationRequest, Mode,
    QuestionFormat, Source, SourceKind, Upload, SOURCE_COUNT_BOUNDS, TOPIC_COUNT_BOUNDS,
};

pub use forms::{DocumentForm, ImageForm, MultipartForm, SettingsForm, TopicForm, VideoForm};

const DEFAULT_COUNT: u32 = 3;
const IMAGE_EXTENSIONS: (&[&str], &str) = (&["png", "jpg", "jpeg"], "png, jpg, jpeg");
const DOCUMENT_EXTENSIONS: (&[&str], &str) = (&["pdf"], "pdf");

/// 已保存的会话设置（来自 Cookie）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl Settings {
    /// 当前设置对应的缓存键（未填 Key 时为 None）
    pub fn client_key(&self, default_model: &str) -> Option<ClientKey> {
        let api_key = non_blank(self.api_key.as_deref())?;
        let model = non_blank(self.model.as_deref()).unwrap_or_else(|| default_model.to_string());
        Some(ClientKey::new(api_key, model))
    }

    pub fn has_credential(&self) -> bool {
        non_blank(self.api_key.as_deref()).is_some()
    }
}

/// 组装好的生成请求
///
/// 上传文件尚未落盘：`request.source` 在调用前由 workflow 填入临时文件句柄
#[derive(Debug, Clone)]
pub struct ComposedRequest {
    pub request: GenerationRequest,
    pub upload: Option<Upload>,
}

impl ComposedRequest {
    /// 填入临时文件句柄，得到最终请求
    pub fn into_request(self, staged: Option<FileHandle>) -> GenerationRequest {
        let mut request = self.request;
        if let Some(handle) = staged {
            request.source = Some(Source::File(handle));
        }
        request
    }
}

/// 组装好的图片答疑请求
#[derive(Debug, Clone)]
pub struct ComposedDoubt {
    pub prompt: String,
    pub detail_level: DetailLevel,
    pub upload: Upload,
}

/// 请求组装器
#[derive(Debug, Clone)]
pub struct Composer {
    max_upload_bytes: usize,
    default_model: String,
}

impl Composer {
    pub fn new(max_upload_bytes: usize, default_model: impl Into<String>) -> Self {
        Self {
            max_upload_bytes,
            default_model: default_model.into(),
        }
    }

    /// 解析 API Key 和模型：表单优先，其次 Cookie，模型最后回落到默认值
    ///
    /// # 返回
    /// 未提供 API Key 时返回 `MissingCredential`
    pub fn resolve_key(
        &self,
        form_api_key: Option<&str>,
        form_model: Option<&str>,
        settings: &Settings,
    ) -> Result<ClientKey, ComposeError> {
        let api_key = non_blank(form_api_key)
            .or_else(|| non_blank(settings.api_key.as_deref()))
            .ok_or(ComposeError::MissingCredential)?;

        let model = non_blank(form_model)
            .or_else(|| non_blank(settings.model.as_deref()))
            .unwrap_or_else(|| self.default_model.clone());
        validate_model(&model)?;

        Ok(ClientKey::new(api_key, model))
    }

    /// 主题模式：主题必填，数量 1-10
    pub fn topic(&self, form: TopicForm) -> Result<ComposedRequest, ComposeError> {
        let topic = non_blank(form.topic.as_deref()).ok_or(ComposeError::MissingInput {
            field: "Topic",
        })?;
        let format = parse_format(form.question_type.as_deref())?;
        let count = parse_count(form.count.as_deref(), TOPIC_COUNT_BOUNDS)?;

        Ok(ComposedRequest {
            request: GenerationRequest {
                mode: Mode::Topic,
                topic: Some(topic),
                count,
                format,
                instructions: non_blank(form.instructions.as_deref()),
                learning_objective: None,
                difficulty: None,
                source: None,
            },
            upload: None,
        })
    }

    /// 文档模式：按来源类型要求 PDF、URL 或文本，数量 1-5
    pub fn document(&self, form: DocumentForm) -> Result<ComposedRequest, ComposeError> {
        let kind = match non_blank(form.source_type.as_deref()) {
            Some(raw) => SourceKind::parse(&raw).ok_or(ComposeError::InvalidChoice {
                field: "source type",
                value: raw,
            })?,
            None => SourceKind::default(),
        };

        let (source, upload) = match kind {
            SourceKind::Pdf => {
                let upload = self.validate_upload(form.file, "PDF file", DOCUMENT_EXTENSIONS)?;
                (None, Some(upload))
            }
            SourceKind::Url => {
                let raw = non_blank(form.url.as_deref())
                    .ok_or(ComposeError::MissingInput { field: "URL" })?;
                (Some(Source::Url(parse_url(&raw)?)), None)
            }
            SourceKind::Text => {
                let text = non_blank(form.text.as_deref())
                    .ok_or(ComposeError::MissingInput { field: "Text content" })?;
                (Some(Source::Text(text)), None)
            }
        };

        let difficulty = match non_blank(form.difficulty.as_deref()) {
            Some(raw) => Some(DifficultyLevel::parse(&raw).ok_or(
                ComposeError::InvalidChoice {
                    field: "difficulty level",
                    value: raw,
                },
            )?),
            None => None,
        };

        Ok(ComposedRequest {
            request: GenerationRequest {
                mode: Mode::Document,
                topic: None,
                count: parse_count(form.count.as_deref(), SOURCE_COUNT_BOUNDS)?,
                format: parse_format(form.question_type.as_deref())?,
                instructions: None,
                learning_objective: non_blank(form.learning_objective.as_deref()),
                difficulty,
                source,
            },
            upload,
        })
    }

    /// 视频模式：URL 必填，数量 1-5
    pub fn video(&self, form: VideoForm) -> Result<ComposedRequest, ComposeError> {
        let raw = non_blank(form.url.as_deref()).ok_or(ComposeError::MissingInput {
            field: "YouTube video URL",
        })?;
        let url = parse_url(&raw)?;

        Ok(ComposedRequest {
            request: GenerationRequest {
                mode: Mode::Video,
                topic: None,
                count: parse_count(form.count.as_deref(), SOURCE_COUNT_BOUNDS)?,
                format: parse_format(form.question_type.as_deref())?,
                instructions: non_blank(form.instructions.as_deref()),
                learning_objective: None,
                difficulty: None,
                source: Some(Source::Url(url)),
            },
            upload: None,
        })
    }

    /// 图片模式：图片和问题描述必填
    pub fn image(&self, form: ImageForm) -> Result<ComposedDoubt, ComposeError> {
        let upload = self.validate_upload(form.file, "Image", IMAGE_EXTENSIONS)?;
        let prompt = non_blank(form.prompt.as_deref()).ok_or(ComposeError::MissingInput {
            field: "Description of what you want the AI to do",
        })?;
        let detail_level = match non_blank(form.detail_level.as_deref()) {
            Some(raw) => DetailLevel::parse(&raw).ok_or(ComposeError::InvalidChoice {
                field: "detail level",
                value: raw,
            })?,
            None => DetailLevel::default(),
        };

        Ok(ComposedDoubt {
            prompt,
            detail_level,
            upload,
        })
    }

    fn validate_upload(
        &self,
        file: Option<Upload>,
        field: &'static str,
        (allowed, expected): (&'static [&'static str], &'static str),
    ) -> Result<Upload, ComposeError> {
        let upload = file
            .filter(|u| !u.file_name.trim().is_empty() && !u.bytes.is_empty())
            .ok_or(ComposeError::MissingInput { field })?;

        let extension = upload.extension().unwrap_or_default();
        if !allowed.contains(&extension.as_str()) || media_type_for(&extension).is_none() {
            return Err(ComposeError::UnsupportedFileType {
                file_name: upload.file_name,
                expected,
            });
        }

        if upload.bytes.len() > self.max_upload_bytes {
            return Err(ComposeError::UploadTooLarge {
                size: upload.bytes.len(),
                limit: self.max_upload_bytes,
            });
        }

        Ok(upload)
    }
}

/// 去掉首尾空白，空串视为未填写
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate_model(model: &str) -> Result<(), ComposeError> {
    if catalog::is_supported(model) {
        Ok(())
    } else {
        Err(ComposeError::UnsupportedModel {
            model: model.to_string(),
        })
    }
}

fn parse_format(raw: Option<&str>) -> Result<QuestionFormat, ComposeError> {
    match non_blank(raw) {
        Some(raw) => QuestionFormat::parse(&raw).ok_or(ComposeError::InvalidChoice {
            field: "question type",
            value: raw,
        }),
        None => Ok(QuestionFormat::default()),
    }
}

fn parse_count(raw: Option<&str>, (min, max): (u32, u32)) -> Result<u32, ComposeError> {
    let count = match non_blank(raw) {
        Some(raw) => raw.parse::<u32>().map_err(|_| ComposeError::InvalidChoice {
            field: "number of questions",
            value: raw.clone(),
        })?,
        None => DEFAULT_COUNT.clamp(min, max),
    };

    if count < min || count > max {
        return Err(ComposeError::CountOutOfRange {
            value: count,
            min,
            max,
        });
    }
    Ok(count)
}

fn parse_url(raw: &str) -> Result<Url, ComposeError> {
    let invalid = || ComposeError::InvalidUrl {
        url: raw.to_string(),
    };
    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(invalid()),
    }
}
