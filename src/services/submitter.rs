//! 分区提交服务 - 业务能力层
//!
//! 把一个页面的答案序列化、打上时间戳，作为一行追加到外部存储

use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::infrastructure::{ResponseStore, StoreError};
use crate::models::{AnswerBundle, SectionRecord};
use crate::services::failure_log::FailureLog;

/// 写入失败时展示给用户的通用文字
pub const RETRY_MESSAGE: &str = "There was an error saving your data. Please try again.";
/// 目标工作表缺失时展示给用户的文字
pub const UNAVAILABLE_MESSAGE: &str =
    "The survey is not accepting responses right now. Please contact the survey organizer.";

/// 提交错误
#[derive(Debug, Error)]
pub enum SubmitError {
    /// 目标不存在，需要运维介入，不可重试
    #[error("目标工作表不存在: {target}")]
    TargetNotFound { target: String },

    /// 网络或授权失败，记录没有写入，用户可以重试
    #[error("暂时无法写入: {reason}")]
    Transient { reason: String },

    /// 答案无法序列化
    #[error("答案序列化失败: {0}")]
    Encoding(String),
}

impl SubmitError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Transient { .. })
    }

    /// 唯一一条可读的失败原因
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::TargetNotFound { .. } => UNAVAILABLE_MESSAGE,
            SubmitError::Transient { .. } | SubmitError::Encoding(_) => RETRY_MESSAGE,
        }
    }
}

impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TargetNotFound { target } => SubmitError::TargetNotFound { target },
            other => SubmitError::Transient {
                reason: other.to_string(),
            },
        }
    }
}

/// 分区提交服务
///
/// 不做幂等：同样的参数成功提交两次会产生两条记录
#[derive(Clone)]
pub struct SectionSubmitter {
    store: Arc<dyn ResponseStore>,
    failure_log: Option<FailureLog>,
}

impl SectionSubmitter {
    pub fn new(store: Arc<dyn ResponseStore>) -> Self {
        Self {
            store,
            failure_log: None,
        }
    }

    /// 失败的提交同时写入本地文件
    pub fn with_failure_log(mut self, failure_log: FailureLog) -> Self {
        self.failure_log = Some(failure_log);
        self
    }

    /// 提交一个分区
    ///
    /// 空邮箱不会被拒绝，必填检查由上游负责
    pub async fn submit_section(
        &self,
        email: &str,
        section_label: &str,
        answers: &AnswerBundle,
    ) -> Result<SectionRecord, SubmitError> {
        info!("📤 正在保存 {} 的分区 {}", display_email(email), section_label);

        let data = answers
            .to_json_string()
            .map_err(|e| SubmitError::Encoding(e.to_string()))?;

        let record = SectionRecord {
            email: email.to_string(),
            section: section_label.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            data,
        };

        match self.store.append_record(&record).await {
            Ok(()) => {
                info!("✓ 已保存 {} 的分区 {}", display_email(email), section_label);
                Ok(record)
            }
            Err(e) => {
                let err = SubmitError::from(e);
                error!(
                    "❌ 保存分区 {} 失败 (目标: {}): {}",
                    section_label,
                    self.store.target(),
                    err
                );
                self.record_failure(&record, &err).await;
                Err(err)
            }
        }
    }

    async fn record_failure(&self, record: &SectionRecord, err: &SubmitError) {
        if let Some(log) = &self.failure_log {
            if let Err(e) = log.write(record, &err.to_string()).await {
                warn!("⚠️ 写入失败记录文件出错: {}", e);
            }
        }
    }
}

fn display_email(email: &str) -> &str {
    if email.is_empty() {
        "<未知邮箱>"
    } else {
        email
    }
}
