//! 各模式提交的原始表单
//!
//! 所有字段都按字符串接收，由 composer 统一校验和转换

use serde::Deserialize;

use crate::models::Upload;

/// 主题模式
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicForm {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub question_type: Option<String>,
    pub topic: Option<String>,
    pub count: Option<String>,
    pub instructions: Option<String>,
}

/// 视频模式
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoForm {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub url: Option<String>,
    pub question_type: Option<String>,
    pub count: Option<String>,
    pub instructions: Option<String>,
}

/// 文档模式（multipart）
#[derive(Debug, Clone, Default)]
pub struct DocumentForm {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub source_type: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub file: Option<Upload>,
    pub question_type: Option<String>,
    pub count: Option<String>,
    pub learning_objective: Option<String>,
    pub difficulty: Option<String>,
}

/// 图片模式（multipart）
#[derive(Debug, Clone, Default)]
pub struct ImageForm {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub detail_level: Option<String>,
    pub file: Option<Upload>,
}

/// 设置表单（侧边栏）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsForm {
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// 保存后跳回的页面
    pub return_to: Option<String>,
}

/// multipart 表单的逐字段填充
pub trait MultipartForm: Default {
    fn set_text(&mut self, name: &str, value: String);
    fn set_file(&mut self, name: &str, upload: Upload);
}

impl MultipartForm for DocumentForm {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "api_key" => self.api_key = Some(value),
            "model" => self.model = Some(value),
            "source_type" => self.source_type = Some(value),
            "url" => self.url = Some(value),
            "text" => self.text = Some(value),
            "question_type" => self.question_type = Some(value),
            "count" => self.count = Some(value),
            "learning_objective" => self.learning_objective = Some(value),
            "difficulty" => self.difficulty = Some(value),
            _ => {}
        }
    }

    fn set_file(&mut self, name: &str, upload: Upload) {
        if name == "file" {
            self.file = Some(upload);
        }
    }
}

impl MultipartForm for ImageForm {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "api_key" => self.api_key = Some(value),
            "model" => self.model = Some(value),
            "prompt" => self.prompt = Some(value),
            "detail_level" => self.detail_level = Some(value),
            _ => {}
        }
    }

    fn set_file(&mut self, name: &str, upload: Upload) {
        if name == "file" {
            self.file = Some(upload);
        }
    }
}
