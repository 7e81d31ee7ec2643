use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个字段的答案
///
/// JSON 形式与前端表单一致：单值为字符串，排序题与多选题为字符串数组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// 单值（单选、下拉、文本）
    Text(String),
    /// 有序列表（排序题）或集合（多选题），语义由题目类型决定
    List(Vec<String>),
}

impl AnswerValue {
    /// 是否为空答案：空白字符串、空列表或全部为空白的列表
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            AnswerValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnswerValue::List(items) => Some(items),
            AnswerValue::Text(_) => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}

impl From<&[&str]> for AnswerValue {
    fn from(value: &[&str]) -> Self {
        AnswerValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// 一个页面收集到的全部答案：字段 id → 答案
///
/// 每个页面加载时新建，离开页面即丢弃
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerBundle(BTreeMap<String, AnswerValue>);

impl AnswerBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置字段答案，返回 self 以便链式构建
    pub fn with(mut self, field: &str, value: impl Into<AnswerValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<AnswerValue>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.0.get(field)
    }

    /// 单值字段的文本
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(AnswerValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    /// 序列化为可传输的字符串（写入表格的 Data 列）
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerBundle {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
