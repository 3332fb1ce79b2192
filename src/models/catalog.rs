//! 可选模型列表

use phf::phf_ordered_map;

/// 模型 ID → 展示名称，顺序即下拉框顺序
pub static MODELS: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "gemini-2.0-flash" => "Gemini 2.0 Flash",
    "gemini-2.0-flash-lite-preview-02-05" => "Gemini 2.0 Flash Lite (preview 02-05)",
    "gemini-2.0-pro-exp-02-05" => "Gemini 2.0 Pro (experimental 02-05)",
};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub fn is_supported(model: &str) -> bool {
    MODELS.contains_key(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_first_and_supported() {
        assert!(is_supported(DEFAULT_MODEL));
        assert_eq!(MODELS.keys().next().copied(), Some(DEFAULT_MODEL));
        assert!(!is_supported("gpt-4o"));
    }
}
