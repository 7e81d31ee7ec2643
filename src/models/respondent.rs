//! 答卷人上下文
//!
//! 在页面之间传递少量已回答的字段（email / age / gender），
//! 取代浏览器本地存储；读取时缺失的键使用固定默认值

use serde::{Deserialize, Serialize};
use std::fmt;

/// age 缺失时的默认值
pub const DEFAULT_AGE: &str = "under18";
/// gender 缺失时的默认值
pub const DEFAULT_GENDER: &str = "male";

/// 上下文中允许写入的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKey {
    Email,
    Age,
    Gender,
}

impl CacheKey {
    pub const ALL: [CacheKey; 3] = [CacheKey::Email, CacheKey::Age, CacheKey::Gender];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::Email => "email",
            CacheKey::Age => "age",
            CacheKey::Gender => "gender",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 答卷人上下文
///
/// 单用户、单设备的辅助状态，不与服务端同步；同一个键后写覆盖先写
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
}

impl RespondentContext {
    /// 新会话从空上下文开始
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: CacheKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    pub fn get(&self, key: CacheKey) -> Option<&str> {
        match key {
            CacheKey::Email => self.email.as_deref(),
            CacheKey::Age => self.age.as_deref(),
            CacheKey::Gender => self.gender.as_deref(),
        }
    }

    pub fn get_or<'a>(&'a self, key: CacheKey, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn email_or_default(&self) -> &str {
        self.get_or(CacheKey::Email, "")
    }

    pub fn age_or_default(&self) -> &str {
        self.get_or(CacheKey::Age, DEFAULT_AGE)
    }

    pub fn gender_or_default(&self) -> &str {
        self.get_or(CacheKey::Gender, DEFAULT_GENDER)
    }

    fn slot_mut(&mut self, key: CacheKey) -> &mut Option<String> {
        match key {
            CacheKey::Email => &mut self.email,
            CacheKey::Age => &mut self.age,
            CacheKey::Gender => &mut self.gender,
        }
    }
}
