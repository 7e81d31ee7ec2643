//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **资源创建**：HTTP 客户端、存储后端、辅助读取客户端
//! 2. **目录加载**：题目目录（含可选的游戏列表文件）
//! 3. **服务组装**：分区提交服务 + 失败记录文件
//! 4. **对外服务**：绑定监听地址，运行 HTTP 路由
//!
//! 只有本模块持有外部资源，下层只拿到 trait 对象

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::infrastructure::{
    token::{SCOPE_SPREADSHEETS, SCOPE_SPREADSHEETS_READONLY},
    InMemoryStore, RangeReader, ResponseStore, ServiceAccountAuth, SheetsStore,
};
use crate::models::load_catalog;
use crate::orchestrator::inflight::InFlightGuard;
use crate::orchestrator::routes::{self, AppState};
use crate::services::{FailureLog, SectionSubmitter};
use crate::utils::logging::log_startup;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// 应用主结构
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("创建 HTTP 客户端失败")?;

        let store = build_store(&config, &http)?;
        let aux_reader = build_aux_reader(&config, &http)?;
        let catalog = load_catalog(config.games_catalog_path.as_deref()).await;
        info!("🎮 游戏列表: {} 项", catalog.games().len());

        let submitter = SectionSubmitter::new(store)
            .with_failure_log(FailureLog::new(&config.failure_log_file));

        let state = AppState {
            catalog,
            submitter,
            inflight: InFlightGuard::new(),
            aux_reader,
            aux_range: config.aux_range.clone(),
        };

        Ok(Self {
            router: routes::router(state),
            config,
        })
    }

    /// 带日志中间件的路由
    pub fn router(&self) -> Router {
        self.router.clone().layer(TraceLayer::new_for_http())
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("无法监听 {}", self.config.bind_addr))?;
        info!("🌐 正在监听 http://{}", self.config.bind_addr);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

fn service_account(
    config: &Config,
    http: &reqwest::Client,
    scope: &str,
) -> Result<ServiceAccountAuth, AppError> {
    let client_email = config
        .client_email
        .as_deref()
        .ok_or_else(|| AppError::missing_var("GOOGLE_SHEETS_CLIENT_EMAIL"))?;
    let private_key = config
        .private_key
        .as_deref()
        .ok_or_else(|| AppError::missing_var("GOOGLE_SHEETS_PRIVATE_KEY"))?;

    Ok(ServiceAccountAuth::new(
        http.clone(),
        client_email,
        private_key,
        config.oauth_token_url.clone(),
        scope,
    )?)
}

/// 按配置创建存储后端
fn build_store(config: &Config, http: &reqwest::Client) -> Result<Arc<dyn ResponseStore>, AppError> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("⚠️ 使用进程内存储，重启后数据丢失");
            Ok(Arc::new(InMemoryStore::new(
                config.responses_sheet_title.clone(),
            )))
        }
        StoreBackend::Sheets => {
            let sheets_id = config
                .sheets_id
                .as_deref()
                .ok_or_else(|| AppError::missing_var("GOOGLE_SHEETS_ID"))?;
            let auth = service_account(config, http, SCOPE_SPREADSHEETS)?;
            info!(
                "📄 答卷写入表格 {} 的工作表 {}",
                sheets_id, config.responses_sheet_title
            );
            Ok(Arc::new(SheetsStore::new(
                http.clone(),
                config.sheets_api_base_url.clone(),
                sheets_id,
                config.responses_sheet_title.clone(),
                auth,
            )))
        }
    }
}

/// 辅助读取接口只在配置了 AUX_SHEET_ID 且凭证齐全时启用
fn build_aux_reader(
    config: &Config,
    http: &reqwest::Client,
) -> Result<Option<Arc<dyn RangeReader>>, AppError> {
    let Some(aux_sheet_id) = config.aux_sheet_id.as_deref() else {
        info!("辅助读取接口未启用");
        return Ok(None);
    };
    if config.client_email.is_none() || config.private_key.is_none() {
        warn!("⚠️ 已配置 AUX_SHEET_ID 但缺少服务账号凭证，辅助读取接口未启用");
        return Ok(None);
    }

    let auth = service_account(config, http, SCOPE_SPREADSHEETS_READONLY)?;
    let reader: Arc<dyn RangeReader> = Arc::new(SheetsStore::new(
        http.clone(),
        config.sheets_api_base_url.clone(),
        aux_sheet_id,
        String::new(),
        auth,
    ));
    Ok(Some(reader))
}
