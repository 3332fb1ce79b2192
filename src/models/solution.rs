use serde::{Deserialize, Serialize};

/// 图片答疑结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub explanation: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl Solution {
    /// 解析、步骤、备注全部为空时视为无效结果
    pub fn is_empty(&self) -> bool {
        self.explanation.trim().is_empty()
            && self.steps.iter().all(|s| s.trim().is_empty())
            && self
                .additional_notes
                .as_deref()
                .map_or(true, |n| n.trim().is_empty())
    }
}
