//! 会话注册表
//!
//! 进程级的 文档 → 会话 映射，保证同一文档同时最多只有一个捕获会话。
//! 会话开始时插入（已存在则拒绝），任何终止状态时移除。

use crate::error::StartError;
use crate::host::DocumentId;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

static GLOBAL: Lazy<Arc<SessionRegistry>> = Lazy::new(|| Arc::new(SessionRegistry::new()));

/// 会话标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// 分配新的会话标识（进程内唯一）
    pub fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// 会话注册表
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active: Mutex<HashMap<DocumentId, SessionId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享实例
    pub fn global() -> Arc<SessionRegistry> {
        GLOBAL.clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DocumentId, SessionId>> {
        // 持锁期间不会 panic，中毒状态下的数据仍然一致
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 不存在时插入；已有活动会话时拒绝且不改动原会话
    pub fn try_register(&self, document: DocumentId, session: SessionId) -> Result<(), StartError> {
        let mut active = self.lock();
        if let Some(&existing) = active.get(&document) {
            return Err(StartError::SessionAlreadyActive {
                document,
                active: existing,
            });
        }
        active.insert(document, session);
        Ok(())
    }

    /// 移除文档的会话条目；只有登记的正是该会话时才移除
    pub fn release(&self, document: DocumentId, session: SessionId) -> bool {
        let mut active = self.lock();
        match active.get(&document) {
            Some(&registered) if registered == session => {
                active.remove(&document);
                true
            }
            _ => false,
        }
    }

    pub fn active_session(&self, document: DocumentId) -> Option<SessionId> {
        self.lock().get(&document).copied()
    }

    pub fn is_active(&self, document: DocumentId) -> bool {
        self.lock().contains_key(&document)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
