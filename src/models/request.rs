//! 生成请求数据结构
//!
//! 由 composer 构造，交给引擎后即被消费（按值传递，不可复用）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionFormat {
    /// 选择题
    #[default]
    MultipleChoice,
    /// 简答题
    ShortAnswer,
    /// 判断题
    TrueFalse,
    /// 填空题
    FillBlank,
}

impl QuestionFormat {
    pub const ALL: [QuestionFormat; 4] = [
        QuestionFormat::MultipleChoice,
        QuestionFormat::ShortAnswer,
        QuestionFormat::TrueFalse,
        QuestionFormat::FillBlank,
    ];

    /// 表单中使用的取值
    pub fn value(self) -> &'static str {
        match self {
            QuestionFormat::MultipleChoice => "multiple_choice",
            QuestionFormat::ShortAnswer => "short_answer",
            QuestionFormat::TrueFalse => "true_false",
            QuestionFormat::FillBlank => "fill_blank",
        }
    }

    /// 展示名称（同时用于提示词）
    pub fn label(self) -> &'static str {
        match self {
            QuestionFormat::MultipleChoice => "Multiple Choice",
            QuestionFormat::ShortAnswer => "Short Answer",
            QuestionFormat::TrueFalse => "True/False",
            QuestionFormat::FillBlank => "Fill in the Blank",
        }
    }

    /// 从表单取值或展示名称解析
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.value() == raw || f.label().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for QuestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 文档模式的来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Pdf,
    Url,
    Text,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Pdf, SourceKind::Url, SourceKind::Text];

    pub fn value(self) -> &'static str {
        match self {
            SourceKind::Pdf => "pdf",
            SourceKind::Url => "url",
            SourceKind::Text => "text",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.value() == raw.trim())
    }
}

/// 难度（文档模式，可选）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    Intermediate,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Hard,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Hard => "Hard",
        }
    }

    /// 空字符串表示未选择
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(raw.trim()))
    }
}

/// 图片解析的详细程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetailLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 3] = [DetailLevel::Low, DetailLevel::Medium, DetailLevel::High];

    pub fn label(self) -> &'static str {
        match self {
            DetailLevel::Low => "Low",
            DetailLevel::Medium => "Medium",
            DetailLevel::High => "High",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(raw.trim()))
    }
}

/// 主题模式的题目数量范围
pub const TOPIC_COUNT_BOUNDS: (u32, u32) = (1, 10);
/// 文档、视频模式的题目数量范围
pub const SOURCE_COUNT_BOUNDS: (u32, u32) = (1, 5);

/// 生成模式，对应页面上的四个标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Topic,
    Image,
    Document,
    Video,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Topic, Mode::Image, Mode::Document, Mode::Video];

    /// 每种模式允许的题目数量范围
    pub fn title(self) -> &'static str {
        match self {
            Mode::Topic => "Q&A Engine",
            Mode::Image => "Multimodal Q&A",
            Mode::Document => "Document Q&A",
            Mode::Video => "YouTube Q&A",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// 用户上传的文件（尚未落盘）
#[derive(Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// 小写扩展名（不含点）
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// 已落盘的临时文件句柄，仅在一次引擎调用期间有效
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub media_type: &'static str,
}

/// 根据扩展名推断媒体类型
pub fn media_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// 题目来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Text(String),
    Url(Url),
    File(FileHandle),
}

/// 生成请求
///
/// 一次用户操作对应一个请求，交给引擎后被消费
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub mode: Mode,
    /// 主题（仅主题模式必填）
    pub topic: Option<String>,
    pub count: u32,
    pub format: QuestionFormat,
    pub instructions: Option<String>,
    /// 学习目标（文档模式）
    pub learning_objective: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
    pub source: Option<Source>,
}

/// 图片答疑请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubtRequest {
    pub image: FileHandle,
    pub prompt: String,
    pub detail_level: DetailLevel,
}
