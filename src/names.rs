use crate::models::Mode;

pub const TOPIC_URL: &str = "/";
pub const IMAGE_URL: &str = "/image";
pub const DOCUMENT_URL: &str = "/document";
pub const VIDEO_URL: &str = "/video";

pub const SETTINGS_URL: &str = "/settings";
pub const GENERATE_TOPIC_URL: &str = "/generate/topic";
pub const GENERATE_DOCUMENT_URL: &str = "/generate/document";
pub const GENERATE_VIDEO_URL: &str = "/generate/video";
pub const SOLVE_IMAGE_URL: &str = "/solve/image";
pub const HEALTH_URL: &str = "/health";

pub const API_KEY_COOKIE_NAME: &str = "api_key";
pub const MODEL_COOKIE_NAME: &str = "model";

// htmx 目标
pub const RESULTS_ID: &str = "results";
pub const RESULTS_TARGET: &str = "#results";
pub const BUSY_ID: &str = "busy";
pub const BUSY_INDICATOR: &str = "#busy";

pub const HTMX_SCRIPT_URL: &str = "https://unpkg.com/htmx.org@2.0.4";
pub const PICO_CSS_URL: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

pub fn page_url(mode: Mode) -> &'static str {
    match mode {
        Mode::Topic => TOPIC_URL,
        Mode::Image => IMAGE_URL,
        Mode::Document => DOCUMENT_URL,
        Mode::Video => VIDEO_URL,
    }
}

pub fn submit_url(mode: Mode) -> &'static str {
    match mode {
        Mode::Topic => GENERATE_TOPIC_URL,
        Mode::Image => SOLVE_IMAGE_URL,
        Mode::Document => GENERATE_DOCUMENT_URL,
        Mode::Video => GENERATE_VIDEO_URL,
    }
}

/// 只允许跳回站内页面
pub fn safe_return_url(raw: Option<&str>) -> &'static str {
    Mode::ALL
        .into_iter()
        .map(page_url)
        .find(|url| Some(*url) == raw)
        .unwrap_or(TOPIC_URL)
}
