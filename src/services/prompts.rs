//! 提示词构建
//!
//! 只负责把请求翻译成发给模型的文本，不做任何 IO

use crate::models::{DetailLevel, GenerationRequest, Mode, QuestionFormat, Source};

pub const GENERATION_SYSTEM: &str = "You are an experienced teacher who writes clear, accurate \
assessment questions. You always answer with a single JSON object and nothing else.";

pub const DOUBT_SYSTEM: &str = "You are a patient tutor who explains images, diagrams and \
problems step by step. You always answer with a single JSON object and nothing else.";

/// 每种题型期望的 JSON 结构
fn format_schema(format: QuestionFormat) -> &'static str {
    match format {
        QuestionFormat::MultipleChoice => {
            r#"{"questions": [{"question": "...", "options": ["...", "...", "...", "..."], "answer": "<exact text of the correct option>", "explanation": "..."}]}"#
        }
        QuestionFormat::ShortAnswer => {
            r#"{"questions": [{"question": "...", "answer": "...", "keywords": ["...", "..."]}]}"#
        }
        QuestionFormat::TrueFalse => {
            r#"{"questions": [{"question": "<a statement>", "answer": "True or False", "explanation": "..."}]}"#
        }
        QuestionFormat::FillBlank => {
            r#"{"questions": [{"question": "<sentence with _____ for the blank>", "answer": "...", "explanation": "..."}]}"#
        }
    }
}

/// 构建题目生成提示词
///
/// # 参数
/// - `request`: 生成请求
/// - `source_text`: 已拉取的来源文本（URL 来源）
/// - `page_context`: 视频页面的标题/简介（可选）
///
/// # 返回
/// 返回用户消息
pub fn generation_prompt(
    request: &GenerationRequest,
    source_text: Option<&str>,
    page_context: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Generate exactly {} {} question(s).\n",
        request.count,
        request.format.label()
    );

    match request.mode {
        Mode::Topic => {
            if let Some(topic) = &request.topic {
                prompt.push_str(&format!("Topic: {}\n", topic));
            }
        }
        Mode::Document => match &request.source {
            Some(Source::Text(text)) => {
                prompt.push_str("Base every question strictly on the following content:\n");
                prompt.push_str("<content>\n");
                prompt.push_str(text);
                prompt.push_str("\n</content>\n");
            }
            Some(Source::Url(url)) => {
                prompt.push_str(&format!(
                    "Base every question strictly on the content of the web page {}:\n",
                    url
                ));
                prompt.push_str("<content>\n");
                prompt.push_str(source_text.unwrap_or_default());
                prompt.push_str("\n</content>\n");
            }
            Some(Source::File(_)) => {
                prompt.push_str("Base every question strictly on the attached document.\n");
            }
            None => {}
        },
        Mode::Video => {
            if let Some(Source::Url(url)) = &request.source {
                prompt.push_str(&format!(
                    "Base every question on the YouTube video at {}.\n",
                    url
                ));
            }
            if let Some(context) = page_context {
                prompt.push_str("Video details:\n");
                prompt.push_str(context);
                prompt.push('\n');
            }
        }
        Mode::Image => {}
    }

    if let Some(objective) = &request.learning_objective {
        prompt.push_str(&format!("Learning objective: {}\n", objective));
    }
    if let Some(difficulty) = request.difficulty {
        prompt.push_str(&format!("Difficulty level: {}\n", difficulty.label()));
    }
    if let Some(instructions) = &request.instructions {
        prompt.push_str(&format!("Additional instructions: {}\n", instructions));
    }

    prompt.push_str("\nRespond with JSON in exactly this shape:\n");
    prompt.push_str(format_schema(request.format));
    prompt.push('\n');
    prompt
}

/// 构建图片答疑提示词
pub fn doubt_prompt(prompt: &str, detail_level: DetailLevel) -> String {
    let depth = match detail_level {
        DetailLevel::Low => "Keep the explanation brief, with at most three steps.",
        DetailLevel::Medium => "Give a clear explanation with the key steps.",
        DetailLevel::High => "Give a thorough explanation with every step spelled out.",
    };

    format!(
        "{}\n\n{}\n\nRespond with JSON in exactly this shape:\n{}\n",
        prompt,
        depth,
        r#"{"explanation": "...", "steps": ["...", "..."], "additional_notes": "..."}"#
    )
}
