use maud::{html, Markup};

use crate::{
    models::{
        DetailLevel, DifficultyLevel, Mode, QuestionFormat, SourceKind, SOURCE_COUNT_BOUNDS,
        TOPIC_COUNT_BOUNDS,
    },
    names,
};

/// 所有生成表单共用的 htmx 配置
///
/// 提交到对应模式的接口并替换结果区；调用进行中显示忙碌提示，禁用提交按钮
fn generation_form(mode: Mode, multipart: bool, fields: Markup, submit_label: &str) -> Markup {
    html! {
        form
            hx-post=(names::submit_url(mode))
            hx-target=(names::RESULTS_TARGET)
            hx-swap="innerHTML"
            hx-include="#settings [name='api_key'], #settings [name='model']"
            hx-indicator=(names::BUSY_INDICATOR)
            hx-disabled-elt="find button[type='submit']"
            hx-encoding=[multipart.then_some("multipart/form-data")]
            enctype=[multipart.then_some("multipart/form-data")] {
            (fields)
            button type="submit" { (submit_label) }
        }
    }
}

fn format_select(name: &str) -> Markup {
    html! {
        label {
            "Select Question Type"
            select name=(name) {
                @for format in QuestionFormat::ALL {
                    option value=(format.value()) selected[format == QuestionFormat::default()] {
                        (format.label())
                    }
                }
            }
        }
    }
}

fn count_input((min, max): (u32, u32)) -> Markup {
    html! {
        label {
            "Number of Questions"
            input type="number" name="count" min=(min) max=(max) value="3" required;
        }
    }
}

fn instructions_input(placeholder: &str) -> Markup {
    html! {
        label {
            "Custom Instructions (optional)"
            textarea name="instructions" placeholder=(placeholder) {}
        }
    }
}

/// 结果区与忙碌提示
pub fn results_area(notice: Option<Markup>) -> Markup {
    html! {
        div id=(names::BUSY_ID) class="htmx-indicator" aria-busy="true" { "Generating..." }
        section id=(names::RESULTS_ID) {
            @if let Some(notice) = notice { (notice) }
        }
    }
}

pub fn topic_form() -> Markup {
    generation_form(
        Mode::Topic,
        false,
        html! {
            (format_select("question_type"))
            label {
                "Enter Topic"
                input type="text" name="topic" value="Solar System" required;
            }
            (count_input(TOPIC_COUNT_BOUNDS))
            (instructions_input("e.g. 'Focus on planets'"))
        },
        "Generate Questions",
    )
}

pub fn image_form() -> Markup {
    generation_form(
        Mode::Image,
        true,
        html! {
            label {
                "Upload an image"
                input type="file" name="file" accept=".png,.jpg,.jpeg,image/png,image/jpeg" required;
            }
            label {
                "Describe what you want the AI to do"
                textarea name="prompt" placeholder="e.g. 'Explain the diagram in detail'" required {}
            }
            label {
                "Select Detail Level"
                select name="detail_level" {
                    @for level in DetailLevel::ALL {
                        option value=(level.label()) selected[level == DetailLevel::default()] {
                            (level.label())
                        }
                    }
                }
            }
        },
        "Solve Doubt",
    )
}

pub fn document_form() -> Markup {
    generation_form(
        Mode::Document,
        true,
        html! {
            label {
                "Select Source Type"
                select name="source_type" {
                    @for kind in SourceKind::ALL {
                        option value=(kind.value()) { (kind.value()) }
                    }
                }
            }
            label {
                "Upload your PDF file (for pdf)"
                input type="file" name="file" accept=".pdf,application/pdf";
            }
            label {
                "Enter URL (for url)"
                input type="url" name="url" placeholder="https://";
            }
            label {
                "Enter Text Content (for text)"
                textarea name="text" {}
            }
            (format_select("question_type"))
            (count_input(SOURCE_COUNT_BOUNDS))
            label {
                "Learning Objective (optional)"
                input type="text" name="learning_objective" placeholder="e.g. 'Key events'";
            }
            label {
                "Select Difficulty Level (optional)"
                select name="difficulty" {
                    option value="" { "" }
                    @for level in DifficultyLevel::ALL {
                        option value=(level.label()) { (level.label()) }
                    }
                }
            }
        },
        "Generate Questions from Document",
    )
}

pub fn video_form() -> Markup {
    generation_form(
        Mode::Video,
        false,
        html! {
            label {
                "Enter YouTube Video URL"
                input type="url" name="url" placeholder="https://www.youtube.com/watch?v=..." required;
            }
            (count_input(SOURCE_COUNT_BOUNDS))
            (format_select("question_type"))
            (instructions_input("e.g. 'Focus on key concepts'"))
        },
        "Generate Questions from YouTube",
    )
}

pub fn form_for(mode: Mode) -> Markup {
    match mode {
        Mode::Topic => topic_form(),
        Mode::Image => image_form(),
        Mode::Document => document_form(),
        Mode::Video => video_form(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_is_disabled_while_busy() {
        for mode in Mode::ALL {
            let html = form_for(mode).into_string();
            assert!(html.contains(&format!(r#"hx-post="{}""#, names::submit_url(mode))));
            assert!(html.contains("hx-disabled-elt"));
            assert!(html.contains(r##"hx-indicator="#busy""##));
        }
    }

    #[test]
    fn test_upload_forms_use_multipart() {
        assert!(image_form().into_string().contains("multipart/form-data"));
        assert!(document_form().into_string().contains("multipart/form-data"));
        assert!(!topic_form().into_string().contains("multipart/form-data"));
    }

    #[test]
    fn test_count_bounds_follow_mode() {
        assert!(topic_form().into_string().contains(r#"max="10""#));
        assert!(video_form().into_string().contains(r#"max="5""#));
    }
}
