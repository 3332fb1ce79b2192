use maud::{html, Markup};

use crate::render::{Block, Line, SolutionLine};

/// 渲染题目块，空切片不输出任何内容
pub fn result_set(blocks: &[Block]) -> Markup {
    html! {
        @for block in blocks {
            article.question-block {
                h3 { (block.heading()) }
                (lines(&block.lines))
            }
            hr;
        }
    }
}

fn lines(lines: &[Line]) -> Markup {
    let options: Vec<(&str, &str)> = lines
        .iter()
        .filter_map(|line| match line {
            Line::Option { label, text } => Some((label.as_str(), text.as_str())),
            _ => None,
        })
        .collect();

    html! {
        @for line in lines {
            @match line {
                Line::Question(text) => { p { strong { "Question:" } " " (text) } },
                Line::OptionsHeading => {
                    p { "Options:" }
                    ul.options {
                        @for (label, text) in &options {
                            li { (label) ". " (text) }
                        }
                    }
                },
                Line::Option { .. } => {},
                Line::CorrectAnswer(text) => { p { strong { "Correct Answer:" } " " (text) } },
                Line::Answer(text) => { p { strong { "Answer:" } " " (text) } },
                Line::Keywords(text) => { p { strong { "Keywords:" } " " (text) } },
                Line::Explanation(text) => { p { strong { "Explanation:" } " " (text) } },
            }
        }
    }
}

pub fn solution(lines: &[SolutionLine]) -> Markup {
    let steps: Vec<(usize, &str)> = lines
        .iter()
        .filter_map(|line| match line {
            SolutionLine::Step { number, text } => Some((*number, text.as_str())),
            _ => None,
        })
        .collect();

    html! {
        article.solution {
            h3 { "Solution" }
            @for line in lines {
                @match line {
                    SolutionLine::Explanation(text) => { p { strong { "Explanation:" } " " (text) } },
                    SolutionLine::StepsHeading => {
                        p { strong { "Steps:" } }
                        ol {
                            @for (number, text) in &steps {
                                li value=(number) { (text) }
                            }
                        }
                    },
                    SolutionLine::Step { .. } => {},
                    SolutionLine::Notes(text) => { p { strong { "Additional Notes:" } " " (text) } },
                }
            }
        }
    }
}

/// 操作无法执行时的阻断提示（例如尚未填写 API Key）
pub fn blocking_notice(message: &str) -> Markup {
    html! {
        div.notice.blocking role="alert" {
            strong { "⚠️ " } (message)
        }
    }
}

pub fn error_notice(message: &str) -> Markup {
    html! {
        div.notice.error role="alert" {
            strong { "❌ " } (message)
        }
    }
}
