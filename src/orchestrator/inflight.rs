//! 提交中标记
//!
//! 同一个邮箱对同一个页面同时只允许一个提交，重复请求直接被拒绝。
//! 空邮箱由调用方跳过，不进入集合

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::models::Screen;

type Key = (String, Screen);

/// 进行中的提交集合
#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<Key>>>,
}

/// 持有期间对应的 (邮箱, 页面) 处于提交中；丢弃时自动释放
#[derive(Debug)]
pub struct InFlightTicket {
    key: Key,
    active: Arc<Mutex<HashSet<Key>>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已有同样的提交在进行时返回 None
    pub fn try_acquire(&self, email: &str, screen: Screen) -> Option<InFlightTicket> {
        let key = (email.to_string(), screen);
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(key.clone()) {
            debug!("重复提交被拒绝: {} / {}", email, screen);
            return None;
        }
        Some(InFlightTicket {
            key,
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_active(&self, email: &str, screen: Screen) -> bool {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.contains(&(email.to_string(), screen))
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.key);
    }
}
