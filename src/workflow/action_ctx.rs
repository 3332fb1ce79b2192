//! 操作上下文
//!
//! 封装"这是第几次、哪个模式、用哪个模型"这一信息，只用于日志

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::infrastructure::ClientKey;
use crate::models::Mode;
use crate::utils::logging::mask_secret;

static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

/// 单次用户操作的上下文
#[derive(Debug, Clone)]
pub struct ActionCtx {
    /// 进程内递增编号
    pub action_id: u64,

    pub mode: Mode,

    pub model: String,

    /// 已遮蔽的 API Key
    pub masked_key: String,
}

impl ActionCtx {
    pub fn new(mode: Mode, key: &ClientKey) -> Self {
        Self {
            action_id: NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed),
            mode,
            model: key.model().to_string(),
            masked_key: mask_secret(key.credential()),
        }
    }
}

impl Display for ActionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[操作 #{} 模式#{} 模型#{} Key#{}]",
            self.action_id, self.mode, self.model, self.masked_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctx_never_shows_full_key() {
        let ctx = ActionCtx::new(Mode::Topic, &ClientKey::new("AIzaSecret1234", "gemini-2.0-flash"));
        let shown = ctx.to_string();
        assert!(shown.contains("****1234"));
        assert!(!shown.contains("AIzaSecret"));
    }

    #[test]
    fn test_action_ids_increase() {
        let key = ClientKey::new("k", "m");
        let a = ActionCtx::new(Mode::Video, &key);
        let b = ActionCtx::new(Mode::Video, &key);
        assert!(b.action_id > a.action_id);
    }
}
