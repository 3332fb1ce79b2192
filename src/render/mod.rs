//! 结果渲染
//!
//! 把题目集合映射成与输出格式无关的块结构，再由 `markdown` 和
//! `views::results` 分别输出为文本和 HTML。
//!
//! 每道题按固定顺序判定展示方式：
//! 1. 选择题：题干、选项（A、B、C…）、正确答案、解析
//! 2. 简答题：题干、答案、关键词
//! 3. 普通问答：题干、答案、解析
//! 4. 开放题：题干、解析
//!
//! 形态在解析时就已确定（见 `QuestionResult::from`），这里只按枚举分支输出

pub mod markdown;

use crate::models::{QuestionResult, ResultSet, Solution};

/// 块中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Question(String),
    OptionsHeading,
    Option { label: String, text: String },
    CorrectAnswer(String),
    Answer(String),
    Keywords(String),
    Explanation(String),
}

/// 一道题对应的块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// 从 1 开始
    pub number: usize,
    pub lines: Vec<Line>,
}

impl Block {
    pub fn heading(&self) -> String {
        format!("Question {}:", self.number)
    }
}

/// 渲染整个结果集；None 或空集合返回空列表
pub fn render_result_set(results: Option<&ResultSet>) -> Vec<Block> {
    results
        .map(|set| {
            set.iter()
                .enumerate()
                .map(|(i, question)| render_question(i + 1, question))
                .collect()
        })
        .unwrap_or_default()
}

/// 渲染单道题
pub fn render_question(number: usize, question: &QuestionResult) -> Block {
    let mut lines = vec![Line::Question(question.question().to_string())];

    match question {
        QuestionResult::Choice(q) => {
            lines.push(Line::OptionsHeading);
            lines.extend(q.options.iter().enumerate().map(|(i, text)| Line::Option {
                label: option_label(i),
                text: text.clone(),
            }));

            let correct = q
                .correct_answer_index
                .and_then(|i| {
                    q.options
                        .get(i)
                        .map(|text| format!("{}. {}", option_label(i), text))
                })
                .or_else(|| q.answer.clone().filter(|a| !a.trim().is_empty()));
            if let Some(correct) = correct {
                lines.push(Line::CorrectAnswer(correct));
            }
            push_explanation(&mut lines, q.explanation.as_deref());
        }
        QuestionResult::ShortAnswer(q) => {
            // 只有关键词时不输出空的答案行
            if !q.answer.trim().is_empty() {
                lines.push(Line::Answer(q.answer.clone()));
            }
            if !q.keywords.is_empty() {
                lines.push(Line::Keywords(q.keywords.join(", ")));
            }
        }
        QuestionResult::Answer(q) => {
            lines.push(Line::Answer(q.answer.clone()));
            push_explanation(&mut lines, q.explanation.as_deref());
        }
        QuestionResult::Open(q) => {
            push_explanation(&mut lines, q.explanation.as_deref());
        }
    }

    Block { number, lines }
}

fn push_explanation(lines: &mut Vec<Line>, explanation: Option<&str>) {
    if let Some(explanation) = explanation.filter(|e| !e.trim().is_empty()) {
        lines.push(Line::Explanation(explanation.to_string()));
    }
}

/// 选项字母：A..Z，之后 AA、AB…
pub fn option_label(index: usize) -> String {
    let mut n = index + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// 图片答疑结果中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionLine {
    Explanation(String),
    StepsHeading,
    Step { number: usize, text: String },
    Notes(String),
}

/// 渲染答疑结果：解析、编号步骤、备注
pub fn render_solution(solution: &Solution) -> Vec<SolutionLine> {
    let mut lines = vec![SolutionLine::Explanation(solution.explanation.clone())];

    let steps: Vec<&String> = solution
        .steps
        .iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if !steps.is_empty() {
        lines.push(SolutionLine::StepsHeading);
        lines.extend(steps.into_iter().enumerate().map(|(i, text)| SolutionLine::Step {
            number: i + 1,
            text: text.clone(),
        }));
    }

    if let Some(notes) = solution
        .additional_notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
    {
        lines.push(SolutionLine::Notes(notes.to_string()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnswerQuestion, ChoiceQuestion, OpenQuestion, RawQuestion, ShortAnswerQuestion,
    };

    fn choice(options: &[&str], correct: Option<usize>) -> QuestionResult {
        QuestionResult::Choice(ChoiceQuestion {
            question: "Pick one".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_index: correct,
            answer: None,
            explanation: Some("Because.".to_string()),
        })
    }

    #[test]
    fn test_option_labels_are_sequential_and_unique() {
        let labels: Vec<String> = (0..30).map(option_label).collect();
        assert_eq!(&labels[..4], ["A", "B", "C", "D"]);
        assert_eq!(labels[25], "Z");
        assert_eq!(labels[26], "AA");
        assert_eq!(labels[29], "AD");

        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn test_every_option_is_listed_in_order() {
        let options: Vec<String> = (0..7).map(|i| format!("option {}", i)).collect();
        let refs: Vec<&str> = options.iter().map(String::as_str).collect();
        let block = render_question(1, &choice(&refs, Some(2)));

        let listed: Vec<(String, String)> = block
            .lines
            .iter()
            .filter_map(|l| match l {
                Line::Option { label, text } => Some((label.clone(), text.clone())),
                _ => None,
            })
            .collect();

        assert_eq!(listed.len(), 7);
        for (i, (label, text)) in listed.iter().enumerate() {
            assert_eq!(label, &option_label(i));
            assert_eq!(text, &options[i]);
        }
        assert!(block
            .lines
            .contains(&Line::CorrectAnswer("C. option 2".to_string())));
    }

    #[test]
    fn test_choice_line_order() {
        let block = render_question(2, &choice(&["Mars", "Venus"], Some(0)));
        assert_eq!(block.heading(), "Question 2:");
        assert_eq!(
            block.lines,
            vec![
                Line::Question("Pick one".to_string()),
                Line::OptionsHeading,
                Line::Option { label: "A".to_string(), text: "Mars".to_string() },
                Line::Option { label: "B".to_string(), text: "Venus".to_string() },
                Line::CorrectAnswer("A. Mars".to_string()),
                Line::Explanation("Because.".to_string()),
            ]
        );
    }

    #[test]
    fn test_unresolved_choice_answer_shows_raw_text() {
        let question = QuestionResult::Choice(ChoiceQuestion {
            question: "q".to_string(),
            options: vec!["x".to_string()],
            correct_answer_index: None,
            answer: Some("both".to_string()),
            explanation: None,
        });
        let block = render_question(1, &question);
        assert_eq!(block.lines.last(), Some(&Line::CorrectAnswer("both".to_string())));
    }

    #[test]
    fn test_answer_and_keywords_render_keyword_branch() {
        let raw = RawQuestion {
            question: "What is inertia?".to_string(),
            answer: Some("Resistance to change in motion".to_string()),
            keywords: Some(vec!["mass".to_string(), "motion".to_string()]),
            explanation: Some("Newton's first law".to_string()),
            ..Default::default()
        };
        let block = render_question(1, &QuestionResult::from(raw));

        assert!(block.lines.contains(&Line::Keywords("mass, motion".to_string())));
        // 简答分支不输出解析
        assert!(!block.lines.iter().any(|l| matches!(l, Line::Explanation(_))));
    }

    #[test]
    fn test_short_answer_without_keywords_omits_keyword_line() {
        let question = QuestionResult::ShortAnswer(ShortAnswerQuestion {
            question: "q".to_string(),
            answer: "a".to_string(),
            keywords: vec![],
        });
        let block = render_question(1, &question);
        assert_eq!(
            block.lines,
            vec![Line::Question("q".to_string()), Line::Answer("a".to_string())]
        );
    }

    #[test]
    fn test_keywords_without_answer_omit_answer_line() {
        let raw = RawQuestion {
            question: "Name the first law".to_string(),
            keywords: Some(vec!["force".to_string(), "inertia".to_string()]),
            ..Default::default()
        };
        let block = render_question(1, &QuestionResult::from(raw));
        assert_eq!(
            block.lines,
            vec![
                Line::Question("Name the first law".to_string()),
                Line::Keywords("force, inertia".to_string()),
            ]
        );
    }

    #[test]
    fn test_answer_and_open_variants() {
        let answer = QuestionResult::Answer(AnswerQuestion {
            question: "The sun is a star.".to_string(),
            answer: "True".to_string(),
            explanation: None,
        });
        assert_eq!(render_question(1, &answer).lines.len(), 2);

        let open = QuestionResult::Open(OpenQuestion {
            question: "Why is the sky blue?".to_string(),
            explanation: Some("Rayleigh scattering".to_string()),
        });
        assert_eq!(
            render_question(1, &open).lines,
            vec![
                Line::Question("Why is the sky blue?".to_string()),
                Line::Explanation("Rayleigh scattering".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_or_missing_result_set_renders_nothing() {
        assert!(render_result_set(None).is_empty());
        assert!(render_result_set(Some(&ResultSet::default())).is_empty());
    }

    #[test]
    fn test_blocks_are_numbered_in_generation_order() {
        let set = ResultSet::new(vec![
            choice(&["a"], Some(0)),
            QuestionResult::Open(OpenQuestion {
                question: "second".to_string(),
                explanation: None,
            }),
        ]);
        let blocks = render_result_set(Some(&set));
        assert_eq!(blocks.iter().map(|b| b.number).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(blocks[1].lines, vec![Line::Question("second".to_string())]);
    }

    #[test]
    fn test_render_solution_numbers_steps() {
        let solution = Solution {
            explanation: "A lever".to_string(),
            steps: vec!["Find fulcrum".to_string(), " ".to_string(), "Balance".to_string()],
            additional_notes: Some("Archimedes".to_string()),
        };
        assert_eq!(
            render_solution(&solution),
            vec![
                SolutionLine::Explanation("A lever".to_string()),
                SolutionLine::StepsHeading,
                SolutionLine::Step { number: 1, text: "Find fulcrum".to_string() },
                SolutionLine::Step { number: 2, text: "Balance".to_string() },
                SolutionLine::Notes("Archimedes".to_string()),
            ]
        );
    }
}
