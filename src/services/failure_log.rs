//! 失败记录服务 - 业务能力层
//!
//! 只负责把没能写入远程表格的分区追加到本地文件，便于人工补录

use anyhow::Result;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::SectionRecord;

/// 失败记录文件写入器
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 追加一行：时间 | 邮箱 | 分区 | 原因 | 数据
    pub async fn write(&self, record: &SectionRecord, reason: &str) -> Result<()> {
        debug!(
            "写入失败记录: {} | {} | 数据长度: {}",
            record.email,
            record.section,
            record.data.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let line = format!(
            "{} | {} | {} | {} | {}\n",
            record.timestamp,
            record.email,
            record.section,
            reason.replace('\n', " "),
            record.data
        );
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
