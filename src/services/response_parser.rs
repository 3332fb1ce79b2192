//! 模型响应解析
//!
//! 模型经常把 JSON 包在代码块里，或在前后夹带说明文字

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::EngineError;
use crate::models::{RawQuestion, ResultSet, Solution};
use crate::utils::logging::truncate_text;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("fenced block regex is valid")
});

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionEnvelope {
    Wrapped { questions: Vec<RawQuestion> },
    Bare(Vec<RawQuestion>),
}

/// 提取响应中的 JSON 片段
fn extract_json(response: &str) -> &str {
    if let Some(inner) = FENCED_BLOCK
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    {
        return inner;
    }

    let start = response.find(['{', '[']);
    let end = response.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => response.trim(),
    }
}

/// 解析题目列表
///
/// # 参数
/// - `response`: 模型返回的原始文本
///
/// # 返回
/// 返回题目集合；为空时返回 `EngineError::EmptyResult`
pub fn parse_result_set(response: &str) -> Result<ResultSet, EngineError> {
    let json = extract_json(response);
    let envelope: QuestionEnvelope =
        serde_json::from_str(json).map_err(|e| EngineError::MalformedResponse {
            reason: format!("{} (response: {})", e, truncate_text(response, 120)),
        })?;

    let raw = match envelope {
        QuestionEnvelope::Wrapped { questions } | QuestionEnvelope::Bare(questions) => questions,
    };
    let raw: Vec<RawQuestion> = raw
        .into_iter()
        .filter(|q| !q.question.trim().is_empty())
        .collect();

    if raw.is_empty() {
        return Err(EngineError::EmptyResult);
    }

    debug!("解析到 {} 道题目", raw.len());
    Ok(ResultSet::from(raw))
}

/// 解析图片答疑结果
pub fn parse_solution(response: &str) -> Result<Solution, EngineError> {
    let json = extract_json(response);
    let solution: Solution =
        serde_json::from_str(json).map_err(|e| EngineError::MalformedResponse {
            reason: format!("{} (response: {})", e, truncate_text(response, 120)),
        })?;

    if solution.is_empty() {
        return Err(EngineError::EmptyResult);
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionResult;

    #[test]
    fn test_parse_fenced_wrapped_questions() {
        let response = r#"Here you go:
```json
{"questions": [
  {"question": "Which planet is largest?", "options": ["Mars", "Jupiter", "Venus", "Earth"], "answer": "Jupiter", "explanation": "It is a gas giant."},
  {"question": "Define orbit.", "answer": "A curved path", "keywords": ["path", "gravity"]},
  {"question": "The Moon is a planet.", "answer": false},
  {"question": "Discuss Pluto."}
]}
```
"#;
        let set = parse_result_set(response).unwrap();
        let kinds: Vec<&str> = set
            .iter()
            .map(|q| match q {
                QuestionResult::Choice(_) => "choice",
                QuestionResult::ShortAnswer(_) => "short",
                QuestionResult::Answer(_) => "answer",
                QuestionResult::Open(_) => "open",
            })
            .collect();
        assert_eq!(kinds, vec!["choice", "short", "answer", "open"]);
    }

    #[test]
    fn test_parse_bare_array_with_surrounding_text() {
        let response = r#"Sure! [{"question": "2 + 2 = ?", "answer": 4}] Hope this helps."#;
        let set = parse_result_set(response).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(matches!(
            parse_result_set(r#"{"questions": []}"#),
            Err(EngineError::EmptyResult)
        ));
        assert!(matches!(
            parse_result_set("I cannot help with that."),
            Err(EngineError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_parse_solution() {
        let response = r#"```
{"explanation": "The diagram shows a lever.", "steps": ["Find the fulcrum", "Measure arms"], "additional_notes": null}
```"#;
        let solution = parse_solution(response).unwrap();
        assert_eq!(solution.steps.len(), 2);
        assert_eq!(solution.additional_notes, None);

        assert!(matches!(
            parse_solution(r#"{"explanation": " ", "steps": []}"#),
            Err(EngineError::EmptyResult)
        ));
    }
}
