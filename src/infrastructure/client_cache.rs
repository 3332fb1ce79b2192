//! 客户端缓存 - 基础设施层
//!
//! 按 (API Key, 模型) 缓存已构造的引擎客户端，只为省去重复构造的开销。
//! 任一部分变化都视为新键；会话切换键时显式淘汰旧键

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use crate::utils::logging::mask_secret;

/// 缓存键：API Key + 模型
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    credential: String,
    model: String,
}

impl ClientKey {
    pub fn new(credential: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            model: model.into(),
        }
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientKey")
            .field("credential", &mask_secret(&self.credential))
            .field("model", &self.model)
            .finish()
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", mask_secret(&self.credential), self.model)
    }
}

/// 客户端缓存
///
/// 容量满时淘汰最久未使用的条目
pub struct ClientCache<T> {
    entries: Mutex<LruCache<ClientKey, T>>,
}

impl<T: Clone> ClientCache<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// 命中时直接返回，否则构造并写入
    ///
    /// # 参数
    /// - `key`: 缓存键
    /// - `build`: 构造函数，失败时不写入缓存
    pub fn get_or_try_insert<E>(
        &self,
        key: &ClientKey,
        build: impl FnOnce(&ClientKey) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut entries = self.entries.lock();
        if let Some(client) = entries.get(key) {
            debug!("♻️ 复用客户端: {}", key);
            return Ok(client.clone());
        }

        let client = build(key)?;
        debug!("🆕 创建客户端: {}", key);
        entries.put(key.clone(), client.clone());
        Ok(client)
    }

    /// 会话从 `previous` 切换到 `next` 时淘汰旧键
    ///
    /// # 返回
    /// 返回是否真的淘汰了条目
    pub fn switch(&self, previous: Option<&ClientKey>, next: &ClientKey) -> bool {
        match previous {
            Some(previous) if previous != next => self.invalidate(previous),
            _ => false,
        }
    }

    /// 同一 API Key 只保留 `current` 对应模型的客户端
    ///
    /// # 返回
    /// 返回淘汰的条目数
    pub fn retain_current(&self, current: &ClientKey) -> usize {
        let mut entries = self.entries.lock();
        let stale: Vec<ClientKey> = entries
            .iter()
            .map(|(key, _)| key)
            .filter(|key| key.credential == current.credential && key.model != current.model)
            .cloned()
            .collect();
        for key in &stale {
            entries.pop(key);
            debug!("🗑️ 已淘汰客户端: {}", key);
        }
        stale.len()
    }

    /// 淘汰指定键
    pub fn invalidate(&self, key: &ClientKey) -> bool {
        let removed = self.entries.lock().pop(key).is_some();
        if removed {
            debug!("🗑️ 已淘汰客户端: {}", key);
        }
        removed
    }

    /// 清空全部缓存（关闭时调用）
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
