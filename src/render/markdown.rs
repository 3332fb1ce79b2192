//! Markdown 输出

use super::{Block, Line, SolutionLine};

/// 把题目块输出为 Markdown；空列表输出空字符串
pub fn blocks_to_markdown(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&format!("### {}\n\n", block.heading()));
        for line in &block.lines {
            match line {
                Line::Question(text) => out.push_str(&format!("**Question:** {}\n\n", text)),
                Line::OptionsHeading => out.push_str("Options:\n\n"),
                Line::Option { label, text } => out.push_str(&format!("   {}. {}\n", label, text)),
                Line::CorrectAnswer(text) => {
                    out.push_str(&format!("\n**Correct Answer:** {}\n\n", text))
                }
                Line::Answer(text) => out.push_str(&format!("**Answer:** {}\n\n", text)),
                Line::Keywords(text) => out.push_str(&format!("**Keywords:** {}\n\n", text)),
                Line::Explanation(text) => {
                    out.push_str(&format!("**Explanation:** {}\n\n", text))
                }
            }
        }
        out.push_str("---\n\n");
    }
    out
}

/// 把答疑结果输出为 Markdown
pub fn solution_to_markdown(lines: &[SolutionLine]) -> String {
    let mut out = String::from("### Solution\n\n");
    for line in lines {
        match line {
            SolutionLine::Explanation(text) => {
                out.push_str(&format!("**Explanation:** {}\n\n", text))
            }
            SolutionLine::StepsHeading => out.push_str("**Steps:**\n\n"),
            SolutionLine::Step { number, text } => {
                out.push_str(&format!("{}. {}\n", number, text))
            }
            SolutionLine::Notes(text) => {
                out.push_str(&format!("\n**Additional Notes:** {}\n", text))
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChoiceQuestion, QuestionResult, ResultSet};
    use crate::render::render_result_set;

    fn planet_question(n: usize) -> QuestionResult {
        QuestionResult::Choice(ChoiceQuestion {
            question: format!("Planet question {}", n),
            options: vec![
                "Mercury".to_string(),
                "Venus".to_string(),
                "Earth".to_string(),
                "Mars".to_string(),
            ],
            correct_answer_index: Some(n % 4),
            answer: None,
            explanation: (n != 2).then(|| format!("Explanation {}", n)),
        })
    }

    #[test]
    fn test_solar_system_scenario() {
        let set = ResultSet::new((1..=3).map(planet_question).collect());
        let markdown = blocks_to_markdown(&render_result_set(Some(&set)));

        for n in 1..=3 {
            assert!(markdown.contains(&format!("### Question {}:", n)));
            assert!(markdown.contains(&format!("**Question:** Planet question {}", n)));
        }
        assert_eq!(markdown.matches("   A. Mercury").count(), 3);
        assert_eq!(markdown.matches("   D. Mars").count(), 3);
        assert_eq!(markdown.matches("**Correct Answer:**").count(), 3);
        assert!(markdown.contains("**Correct Answer:** B. Venus"));
        assert_eq!(markdown.matches("**Explanation:**").count(), 2);
        assert_eq!(markdown.matches("---").count(), 3);
    }

    #[test]
    fn test_empty_blocks_produce_no_output() {
        assert_eq!(blocks_to_markdown(&[]), "");
    }

    #[test]
    fn test_solution_markdown() {
        let lines = vec![
            SolutionLine::Explanation("A lever".to_string()),
            SolutionLine::StepsHeading,
            SolutionLine::Step { number: 1, text: "Find fulcrum".to_string() },
        ];
        let markdown = solution_to_markdown(&lines);
        assert!(markdown.starts_with("### Solution"));
        assert!(markdown.contains("1. Find fulcrum\n"));
    }
}
