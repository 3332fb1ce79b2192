//! LLM 服务 - 业务能力层
//!
//! 生成引擎的生产实现：调用 OpenAI 兼容接口（默认指向 Gemini）
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 图片以 base64 data URL 的 image 部件附加，PDF 以 file 部件附加
//! - 要求模型以 JSON 对象回复（`response_format: json_object`）
//! - 每次用户操作只调用一次，不重试

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartFile,
        ChatCompletionRequestMessageContentPartImage, ChatCompletionRequestMessageContentPartText,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, FileObject, ImageDetail,
        ImageUrl, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use base64::Engine as _;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::infrastructure::ClientKey;
use crate::models::{
    DetailLevel, DoubtRequest, FileHandle, GenerationRequest, Mode, ResultSet, Solution, Source,
};
use crate::services::engine::GenerationEngine;
use crate::services::prompts;
use crate::services::response_parser::{parse_result_set, parse_solution};
use crate::services::source_fetcher::SourceFetcher;

const PDF_MEDIA_TYPE: &str = "application/pdf";

/// 消息附件
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// 图片：data URL + 识别精度
    Image { url: String, detail: ImageDetail },
    /// 文档（PDF）：data URL + 文件名
    Document { data_url: String, file_name: String },
}

impl Attachment {
    fn into_part(self) -> Result<ChatCompletionRequestUserMessageContentPart, EngineError> {
        match self {
            Attachment::Image { url, detail } => Ok(
                ChatCompletionRequestUserMessageContentPart::ImageUrl(
                    ChatCompletionRequestMessageContentPartImage {
                        image_url: ImageUrl {
                            url,
                            detail: Some(detail),
                        },
                    },
                ),
            ),
            Attachment::Document {
                data_url,
                file_name,
            } => {
                // FileObject 的字段不公开，只能经由 serde 构造
                let file: FileObject = serde_json::from_value(serde_json::json!({
                    "file_data": data_url,
                    "filename": file_name,
                }))
                .map_err(|e| EngineError::malformed_source(format!("invalid file part: {}", e)))?;
                Ok(ChatCompletionRequestUserMessageContentPart::File(
                    ChatCompletionRequestMessageContentPartFile { file },
                ))
            }
        }
    }
}

/// LLM 服务
///
/// 职责：
/// - 把请求翻译成提示词并调用模型
/// - 解析模型返回的 JSON
/// - 把传输错误归类为引擎错误
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout: Duration,
    fetcher: SourceFetcher,
}

impl LlmService {
    /// 创建新的 LLM 服务
    ///
    /// # 参数
    /// - `key`: API Key + 模型
    /// - `api_base_url`: OpenAI 兼容接口地址
    /// - `timeout`: 单次调用超时
    /// - `fetcher`: URL 来源拉取服务
    pub fn new(
        key: &ClientKey,
        api_base_url: &str,
        timeout: Duration,
        fetcher: SourceFetcher,
    ) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(key.credential())
            .with_api_base(api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: key.model().to_string(),
            timeout,
            fetcher,
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `attachments`: 附件列表，会追加到用户消息中
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        attachments: Vec<Attachment>,
    ) -> Result<String, EngineError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let request =
            build_chat_request(&self.model_name, user_message, system_message, attachments)?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                warn!("LLM API 调用超时 ({} 秒)", self.timeout.as_secs());
                EngineError::Timeout {
                    seconds: self.timeout.as_secs(),
                }
            })?
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                classify_api_error(&self.model_name, e)
            })?;

        debug!("LLM API 调用成功");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(EngineError::EmptyResult)
    }
}

/// 组装聊天请求
///
/// 有附件时用户消息为多部件数组（文本在前），否则为纯文本
pub fn build_chat_request(
    model: &str,
    user_message: &str,
    system_message: Option<&str>,
    attachments: Vec<Attachment>,
) -> Result<CreateChatCompletionRequest, EngineError> {
    let build_failed = |e| classify_api_error(model, e);

    let mut messages = Vec::new();

    if let Some(sys_msg) = system_message {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(sys_msg)
            .build()
            .map_err(build_failed)?;
        messages.push(ChatCompletionRequestMessage::System(system_msg));
    }

    let user_msg = if attachments.is_empty() {
        ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(build_failed)?
    } else {
        debug!("包含 {} 个附件", attachments.len());

        let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> =
            Vec::with_capacity(attachments.len() + 1);
        content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartText {
                text: user_message.to_string(),
            },
        ));
        for attachment in attachments {
            content_parts.push(attachment.into_part()?);
        }

        ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()
            .map_err(build_failed)?
    };

    messages.push(ChatCompletionRequestMessage::User(user_msg));

    CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .temperature(0.7)
        .max_tokens(4096u32)
        .response_format(ResponseFormat::JsonObject)
        .build()
        .map_err(build_failed)
}

#[async_trait]
impl GenerationEngine for LlmService {
    async fn generate(&self, request: GenerationRequest) -> Result<ResultSet, EngineError> {
        let mut attachments = Vec::new();
        let mut source_text = None;
        let mut page_context = None;

        match (&request.mode, &request.source) {
            (Mode::Document, Some(Source::Url(url))) => {
                source_text = Some(self.fetcher.fetch_text(url).await?);
            }
            (Mode::Video, Some(Source::Url(url))) => {
                // 拉不到简介时仍然只凭 URL 生成
                match self.fetcher.fetch_metadata(url).await {
                    Ok(metadata) => page_context = metadata.to_context(),
                    Err(e) => warn!("无法获取视频页面信息 {}: {}", url, e),
                }
            }
            (_, Some(Source::File(handle))) => {
                attachments.push(file_attachment(handle, ImageDetail::Auto).await?);
            }
            _ => {}
        }

        let prompt =
            prompts::generation_prompt(&request, source_text.as_deref(), page_context.as_deref());
        let response = self
            .send_to_llm(&prompt, Some(prompts::GENERATION_SYSTEM), attachments)
            .await?;

        parse_result_set(&response)
    }

    async fn solve_doubt(&self, request: DoubtRequest) -> Result<Solution, EngineError> {
        let attachment = file_attachment(&request.image, image_detail(request.detail_level)).await?;

        let prompt = prompts::doubt_prompt(&request.prompt, request.detail_level);
        let response = self
            .send_to_llm(&prompt, Some(prompts::DOUBT_SYSTEM), vec![attachment])
            .await?;

        parse_solution(&response)
    }
}

fn image_detail(level: DetailLevel) -> ImageDetail {
    match level {
        DetailLevel::Low => ImageDetail::Low,
        DetailLevel::Medium => ImageDetail::Auto,
        DetailLevel::High => ImageDetail::High,
    }
}

/// PDF 作为文件部件，其余作为图片部件
async fn file_attachment(handle: &FileHandle, detail: ImageDetail) -> Result<Attachment, EngineError> {
    let data_url = encode_data_url(handle).await?;
    if handle.media_type == PDF_MEDIA_TYPE {
        let file_name = handle
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document.pdf")
            .to_string();
        Ok(Attachment::Document {
            data_url,
            file_name,
        })
    } else {
        Ok(Attachment::Image {
            url: data_url,
            detail,
        })
    }
}

/// 读取临时文件并编码为 data URL
async fn encode_data_url(handle: &FileHandle) -> Result<String, EngineError> {
    let bytes = tokio::fs::read(&handle.path).await.map_err(|e| {
        EngineError::malformed_source(format!("could not read uploaded file: {}", e))
    })?;
    if bytes.is_empty() {
        return Err(EngineError::malformed_source("uploaded file is empty"));
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", handle.media_type, encoded))
}

/// 把接口错误归类：认证问题 → InvalidKey，其余 → ApiCallFailed
pub fn classify_api_error<E>(model: &str, err: E) -> EngineError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let message = err.to_string().to_lowercase();
    let is_auth = ["api key", "api_key", "unauthenticated", "permission_denied", "401", "403"]
        .iter()
        .any(|needle| message.contains(needle));

    if is_auth {
        EngineError::InvalidKey
    } else {
        EngineError::ApiCallFailed {
            model: model.to_string(),
            source: Box::new(err),
        }
    }
}
