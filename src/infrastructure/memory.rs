//! 进程内存储
//!
//! 按名称保存若干工作表的行数据，语义与远程表格一致：
//! 向不存在的工作表追加会失败，且不写入任何内容

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tracing::debug;

use crate::infrastructure::store::{A1Range, RangeReader, ResponseStore, StoreError, ValueRange};
use crate::models::{SectionRecord, RECORD_COLUMNS};

#[derive(Debug, Default)]
struct Inner {
    tabs: HashMap<String, Vec<Vec<String>>>,
    pending_failures: VecDeque<StoreError>,
}

/// 进程内存储
#[derive(Debug)]
pub struct InMemoryStore {
    target: String,
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    /// 创建存储，并建好带表头的目标工作表
    pub fn new(target: impl Into<String>) -> Self {
        let store = Self::without_target(target);
        store.add_tab(
            &store.target,
            vec![RECORD_COLUMNS.iter().map(|c| c.to_string()).collect()],
        );
        store
    }

    /// 创建存储，但不建目标工作表
    pub fn without_target(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// 新增（或替换）一个工作表
    pub fn add_tab(&self, name: &str, rows: Vec<Vec<String>>) {
        self.lock().tabs.insert(name.to_string(), rows);
    }

    /// 让接下来的一次追加失败
    pub fn fail_next_append(&self, err: StoreError) {
        self.lock().pending_failures.push_back(err);
    }

    /// 目标工作表中的全部记录（跳过表头）
    pub fn records(&self) -> Vec<SectionRecord> {
        let inner = self.lock();
        inner
            .tabs
            .get(&self.target)
            .map(|rows| {
                rows.iter()
                    .skip(1)
                    .filter_map(|row| SectionRecord::from_row(row))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // 持锁期间不会 panic，中毒后数据仍然一致
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ResponseStore for InMemoryStore {
    async fn append_record(&self, record: &SectionRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(err) = inner.pending_failures.pop_front() {
            return Err(err);
        }
        let rows = inner
            .tabs
            .get_mut(&self.target)
            .ok_or_else(|| StoreError::TargetNotFound {
                target: self.target.clone(),
            })?;
        rows.push(record.to_row());
        debug!("内存存储追加一行，当前共 {} 行", rows.len());
        Ok(())
    }

    fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl RangeReader for InMemoryStore {
    async fn read_range(&self, range: &str) -> Result<ValueRange, StoreError> {
        let parsed = A1Range::parse(range)
            .ok_or_else(|| StoreError::Decode(format!("无法解析区域: {}", range)))?;
        let inner = self.lock();
        let rows = inner
            .tabs
            .get(&parsed.sheet)
            .ok_or_else(|| StoreError::TargetNotFound {
                target: parsed.sheet.clone(),
            })?;
        Ok(ValueRange {
            range: range.to_string(),
            major_dimension: Some("ROWS".to_string()),
            values: parsed.slice(rows),
        })
    }
}
