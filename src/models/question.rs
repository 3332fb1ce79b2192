use serde::{Deserialize, Serialize};

/// 引擎返回的原始题目结构
///
/// 各字段是否出现决定题目形态，见 [`QuestionResult::from`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(
        default,
        alias = "correct_answer",
        deserialize_with = "deserialize_answer",
        skip_serializing_if = "Option::is_none"
    )]
    pub answer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// 判断题的答案可能是布尔值，数字题可能是整数，统一转成字符串
fn deserialize_answer<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct AnswerVisitor;

    impl<'de> Visitor<'de> for AnswerVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, boolean or integer answer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(if value { "True" } else { "False" }.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(AnswerVisitor)
}

/// 选择题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// 能解析出选项位置时为 Some
    pub correct_answer_index: Option<usize>,
    /// 引擎给出的原始答案文本
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

/// 简答题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortAnswerQuestion {
    pub question: String,
    pub answer: String,
    /// 去重后保持原顺序
    pub keywords: Vec<String>,
}

/// 判断题 / 普通问答题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerQuestion {
    pub question: String,
    pub answer: String,
    pub explanation: Option<String>,
}

/// 开放题（只有题干和解析）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenQuestion {
    pub question: String,
    pub explanation: Option<String>,
}

/// 题目结果，每道题恰好属于一种形态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionResult {
    Choice(ChoiceQuestion),
    ShortAnswer(ShortAnswerQuestion),
    Answer(AnswerQuestion),
    Open(OpenQuestion),
}

impl QuestionResult {
    pub fn question(&self) -> &str {
        match self {
            QuestionResult::Choice(q) => &q.question,
            QuestionResult::ShortAnswer(q) => &q.question,
            QuestionResult::Answer(q) => &q.question,
            QuestionResult::Open(q) => &q.question,
        }
    }
}

/// 按固定优先级判定形态：options → keywords → answer → 兜底
///
/// 同时带有 answer 与 keywords 的题目一定归为简答题
impl From<RawQuestion> for QuestionResult {
    fn from(raw: RawQuestion) -> Self {
        let explanation = raw.explanation.filter(|e| !e.trim().is_empty());

        if let Some(options) = raw.options {
            let correct_answer_index = raw
                .correct_answer_index
                .filter(|&i| i < options.len())
                .or_else(|| {
                    raw.answer
                        .as_deref()
                        .and_then(|a| resolve_answer_index(a, &options))
                });
            return QuestionResult::Choice(ChoiceQuestion {
                question: raw.question,
                options,
                correct_answer_index,
                answer: raw.answer,
                explanation,
            });
        }

        if let Some(keywords) = raw.keywords {
            let mut unique: Vec<String> = Vec::with_capacity(keywords.len());
            for keyword in keywords {
                let keyword = keyword.trim().to_string();
                if !keyword.is_empty() && !unique.contains(&keyword) {
                    unique.push(keyword);
                }
            }
            return QuestionResult::ShortAnswer(ShortAnswerQuestion {
                question: raw.question,
                answer: raw.answer.unwrap_or_default(),
                keywords: unique,
            });
        }

        if let Some(answer) = raw.answer {
            return QuestionResult::Answer(AnswerQuestion {
                question: raw.question,
                answer,
                explanation,
            });
        }

        QuestionResult::Open(OpenQuestion {
            question: raw.question,
            explanation,
        })
    }
}

/// 把答案文本解析为选项下标
///
/// 支持：与选项全文一致、单个字母 `B`、带前缀的 `B.` / `B)` / `B:`
pub fn resolve_answer_index(answer: &str, options: &[String]) -> Option<usize> {
    let normalized = normalize(answer);
    if normalized.is_empty() {
        return None;
    }

    if let Some(index) = options.iter().position(|o| normalize(o) == normalized) {
        return Some(index);
    }

    let trimmed = answer.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let rest = chars.as_str();
    let is_letter_answer = rest.is_empty()
        || rest.starts_with('.')
        || rest.starts_with(')')
        || rest.starts_with(':');
    if !is_letter_answer {
        return None;
    }

    let index = usize::from(first.to_ascii_uppercase() as u8 - b'A');
    (index < options.len()).then_some(index)
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 一次生成的全部题目，顺序即生成顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    items: Vec<QuestionResult>,
}

impl ResultSet {
    pub fn new(items: Vec<QuestionResult>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionResult> {
        self.items.iter()
    }
}

impl From<Vec<RawQuestion>> for ResultSet {
    fn from(raw: Vec<RawQuestion>) -> Self {
        Self::new(raw.into_iter().map(QuestionResult::from).collect())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a QuestionResult;
    type IntoIter = std::slice::Iter<'a, QuestionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["Mercury", "Venus", "Earth", "Mars"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_options_take_precedence_over_everything() {
        let raw = RawQuestion {
            question: "Which planet is red?".to_string(),
            options: Some(options()),
            answer: Some("Mars".to_string()),
            keywords: Some(vec!["red".to_string()]),
            ..Default::default()
        };

        match QuestionResult::from(raw) {
            QuestionResult::Choice(q) => assert_eq!(q.correct_answer_index, Some(3)),
            other => panic!("expected choice, got {:?}", other),
        }
    }

    #[test]
    fn test_answer_with_keywords_is_short_answer() {
        let raw = RawQuestion {
            question: "What is photosynthesis?".to_string(),
            answer: Some("Light to sugar".to_string()),
            keywords: Some(vec!["light".into(), "chlorophyll".into(), "light".into()]),
            explanation: Some("ignored here".to_string()),
            ..Default::default()
        };

        match QuestionResult::from(raw) {
            QuestionResult::ShortAnswer(q) => {
                assert_eq!(q.answer, "Light to sugar");
                assert_eq!(q.keywords, vec!["light", "chlorophyll"]);
            }
            other => panic!("expected short answer, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_answer_and_open_fallback() {
        let answer = RawQuestion {
            question: "The sun is a star.".to_string(),
            answer: Some("True".to_string()),
            explanation: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            QuestionResult::from(answer),
            QuestionResult::Answer(AnswerQuestion {
                question: "The sun is a star.".to_string(),
                answer: "True".to_string(),
                explanation: None,
            })
        );

        let open = RawQuestion {
            question: "Discuss tides.".to_string(),
            explanation: Some("Gravity of the moon".to_string()),
            ..Default::default()
        };
        assert!(matches!(QuestionResult::from(open), QuestionResult::Open(_)));
    }

    #[test]
    fn test_resolve_answer_index_forms() {
        let opts = options();
        assert_eq!(resolve_answer_index("venus", &opts), Some(1));
        assert_eq!(resolve_answer_index("C", &opts), Some(2));
        assert_eq!(resolve_answer_index("d) Mars", &opts), Some(3));
        assert_eq!(resolve_answer_index("B. Venus", &opts), Some(1));
        assert_eq!(resolve_answer_index("E", &opts), None);
        assert_eq!(resolve_answer_index("Pluto", &opts), None);
        assert_eq!(resolve_answer_index("", &opts), None);
    }

    #[test]
    fn test_explicit_index_wins_when_in_range() {
        let raw = RawQuestion {
            question: "q".to_string(),
            options: Some(options()),
            answer: Some("Mars".to_string()),
            correct_answer_index: Some(0),
            ..Default::default()
        };
        match QuestionResult::from(raw) {
            QuestionResult::Choice(q) => assert_eq!(q.correct_answer_index, Some(0)),
            other => panic!("expected choice, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_boolean_and_numeric_answers() {
        let tf: RawQuestion =
            serde_json::from_str(r#"{"question":"q","answer":false}"#).unwrap();
        assert_eq!(tf.answer.as_deref(), Some("False"));

        let num: RawQuestion =
            serde_json::from_str(r#"{"question":"q","correct_answer":42}"#).unwrap();
        assert_eq!(num.answer.as_deref(), Some("42"));

        let null: RawQuestion =
            serde_json::from_str(r#"{"question":"q","answer":null}"#).unwrap();
        assert_eq!(null.answer, None);
    }
}
