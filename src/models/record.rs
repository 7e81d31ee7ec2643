use serde::{Deserialize, Serialize};

use crate::models::answer::AnswerBundle;

/// 表头顺序，与 `SectionRecord::to_row` 一致
pub const RECORD_COLUMNS: [&str; 4] = ["Email", "Section", "Timestamp", "Data"];

/// 一条分区记录：每完成一个页面追加一行，只增不改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SectionRecord {
    pub email: String,
    pub section: String,
    /// RFC 3339 UTC 时间，毫秒精度
    pub timestamp: String,
    /// 序列化后的 AnswerBundle
    pub data: String,
}

impl SectionRecord {
    /// 转为表格行
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.section.clone(),
            self.timestamp.clone(),
            self.data.clone(),
        ]
    }

    /// 从表格行还原；列数不足返回 None
    pub fn from_row(row: &[String]) -> Option<Self> {
        match row {
            [email, section, timestamp, data, ..] => Some(Self {
                email: email.clone(),
                section: section.clone(),
                timestamp: timestamp.clone(),
                data: data.clone(),
            }),
            _ => None,
        }
    }

    /// 反序列化 Data 列
    pub fn answers(&self) -> serde_json::Result<AnswerBundle> {
        AnswerBundle::from_json_str(&self.data)
    }
}
