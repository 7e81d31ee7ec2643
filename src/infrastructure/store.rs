//! 外部存储接口 - 基础设施层
//!
//! 远程表格只作为外部协作者出现：追加一条记录，以及辅助接口用到的区域读取

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SectionRecord;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 目标工作表不存在（需要运维介入）
    #[error("目标工作表不存在: {target}")]
    TargetNotFound { target: String },

    /// 凭证或授权失败
    #[error("授权失败: {reason}")]
    Auth { reason: String },

    /// 网络传输失败
    #[error("网络请求失败 ({endpoint}): {reason}")]
    Transport { endpoint: String, reason: String },

    /// 服务端返回非成功状态
    #[error("存储服务返回错误响应 ({status}): {body}")]
    BadResponse { status: u16, body: String },

    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::Decode(err.to_string());
        }
        StoreError::Transport {
            endpoint: err
                .url()
                .map(|u| u.path().to_string())
                .unwrap_or_default(),
            reason: err.to_string(),
        }
    }
}

/// 读取到的单元格区域
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// 答卷记录存储
///
/// 追加是原子的：要么整行写入，要么什么都不写
#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn append_record(&self, record: &SectionRecord) -> Result<(), StoreError>;

    /// 目标名称，仅用于日志与错误信息
    fn target(&self) -> &str;
}

/// 单元格区域读取能力（辅助展示接口使用，与问卷流程无关）
#[async_trait]
pub trait RangeReader: Send + Sync {
    async fn read_range(&self, range: &str) -> Result<ValueRange, StoreError>;
}

/// A1 表示法的区域，例如 `Sheet1!A1:E10`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    pub start_col: usize,
    pub start_row: usize,
    pub end_col: Option<usize>,
    pub end_row: Option<usize>,
}

impl A1Range {
    /// 解析 `Sheet!A1:E10`、`'My Sheet'!A:D` 或单独的表名
    pub fn parse(raw: &str) -> Option<Self> {
        let (sheet, cells) = match raw.rsplit_once('!') {
            Some((sheet, cells)) => (sheet, Some(cells)),
            None => (raw, None),
        };
        let sheet = sheet.trim_matches('\'').to_string();
        if sheet.is_empty() {
            return None;
        }

        let Some(cells) = cells else {
            return Some(Self {
                sheet,
                start_col: 0,
                start_row: 0,
                end_col: None,
                end_row: None,
            });
        };

        let (start, end) = cells.split_once(':').unwrap_or((cells, cells));
        let (start_col, start_row) = parse_cell(start)?;
        let (end_col, end_row) = parse_cell(end)?;

        Some(Self {
            sheet,
            start_col: start_col.unwrap_or(0),
            start_row: start_row.unwrap_or(0),
            end_col,
            end_row,
        })
    }

    /// 按区域截取行数据（0 基、含端点）
    pub fn slice(&self, rows: &[Vec<String>]) -> Vec<Vec<String>> {
        let row_end = self.end_row.map(|r| r + 1).unwrap_or(rows.len()).min(rows.len());
        rows.iter()
            .take(row_end)
            .skip(self.start_row)
            .map(|row| {
                let col_end = self.end_col.map(|c| c + 1).unwrap_or(row.len()).min(row.len());
                row.iter()
                    .take(col_end)
                    .skip(self.start_col)
                    .cloned()
                    .collect()
            })
            .collect()
    }
}

/// 解析单元格引用：列字母与行号都可省略
fn parse_cell(cell: &str) -> Option<(Option<usize>, Option<usize>)> {
    let letters: String = cell.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits = &cell[letters.len()..];
    if letters.is_empty() && digits.is_empty() {
        return None;
    }

    let col = if letters.is_empty() {
        None
    } else {
        let n = letters
            .to_ascii_uppercase()
            .bytes()
            .try_fold(0usize, |acc, b| {
                acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize)
            })?;
        Some(n - 1)
    };
    let row = if digits.is_empty() {
        None
    } else {
        let n: usize = digits.parse().ok()?;
        if n == 0 {
            return None;
        }
        Some(n - 1)
    };
    Some((col, row))
}
