//! 电子表格客户端 - 基础设施层
//!
//! 只封装问卷需要的三个调用：读取工作表标题、追加一行、读取区域

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::infrastructure::store::{RangeReader, ResponseStore, StoreError, ValueRange};
use crate::infrastructure::token::ServiceAccountAuth;
use crate::models::SectionRecord;

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// 远程电子表格
pub struct SheetsStore {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    target: String,
    auth: ServiceAccountAuth,
    tab_titles: OnceCell<Vec<String>>,
}

impl SheetsStore {
    /// `target` 为追加记录的工作表名；只读场景可以传空字符串
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        target: impl Into<String>,
        auth: ServiceAccountAuth,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            target: target.into(),
            auth,
            tab_titles: OnceCell::new(),
        }
    }

    /// 构建 `{base}/v4/spreadsheets/{id}/...` 形式的地址，各段自动转义
    fn endpoint(&self, tail: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| StoreError::Transport {
            endpoint: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport {
                endpoint: self.base_url.clone(),
                reason: "基础地址不能作为路径前缀".to_string(),
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(tail);
        Ok(url)
    }

    /// 工作表标题只在第一次成功读取后缓存
    async fn tab_titles(&self) -> Result<&Vec<String>, StoreError> {
        self.tab_titles
            .get_or_try_init(|| async {
                let mut url = self.endpoint(&[])?;
                url.query_pairs_mut()
                    .append_pair("fields", "sheets.properties.title");
                let meta: SpreadsheetMeta = self.get_json(url).await?;
                let titles: Vec<String> =
                    meta.sheets.into_iter().map(|s| s.properties.title).collect();
                info!("✓ 表格加载成功，共 {} 个工作表", titles.len());
                Ok::<_, StoreError>(titles)
            })
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, StoreError> {
        let token = self.auth.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = self.check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.auth.invalidate().await;
                Err(StoreError::Auth {
                    reason: format!("{}: {}", status.as_u16(), body),
                })
            }
            _ => Err(StoreError::BadResponse {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

/// 工作表名加引号，内部单引号按 A1 规则转义
pub fn quoted_range(sheet: &str, cells: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), cells)
}

#[async_trait]
impl ResponseStore for SheetsStore {
    async fn append_record(&self, record: &SectionRecord) -> Result<(), StoreError> {
        let titles = self.tab_titles().await?;
        if !titles.iter().any(|t| t == &self.target) {
            warn!("⚠️ 工作表 {} 不存在", self.target);
            return Err(StoreError::TargetNotFound {
                target: self.target.clone(),
            });
        }

        let range = quoted_range(&self.target, "A:D");
        let mut url = self.endpoint(&["values", &format!("{}:append", range)])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.auth.access_token().await?;
        debug!("追加记录: {} / {}", record.email, record.section);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [record.to_row()] }))
            .send()
            .await?;
        self.check_status(response).await?;
        Ok(())
    }

    fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl RangeReader for SheetsStore {
    async fn read_range(&self, range: &str) -> Result<ValueRange, StoreError> {
        let url = self.endpoint(&["values", range])?;
        self.get_json(url).await
    }
}

impl std::fmt::Debug for SheetsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsStore")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
