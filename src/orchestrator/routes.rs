//! HTTP 路由
//!
//! 每个请求自带答卷人上下文，服务端不保存会话。
//! 持久化错误在这里转换为状态码和一条展示文字

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::infrastructure::{RangeReader, ValueRange};
use crate::models::{AnswerBundle, CacheKey, Catalog, RespondentContext, Screen, ScreenForm};
use crate::orchestrator::inflight::{InFlightGuard, InFlightTicket};
use crate::services::{FieldIssue, SectionSubmitter};
use crate::utils::logging::truncate_text;
use crate::workflow::{form_for, FlowError, ScreenController, SubmitOutcome};

pub const SURVEY_TITLE: &str = "Kreo Ultimate Gamer Survey";
pub const SURVEY_TAGLINE: &str = "Are You Ready to Respawn?";
pub const SURVEY_INTRO: &str = "Hey there, legend! Before we drop into this survey, a quick heads-up: \
this isn't some boring questionnaire. It's a fun, interactive deep dive into your gaming soul. \
Answer honestly, and we promise no lag, just pure insights. Let's roll!";

/// 处理器共享的状态
pub struct AppState {
    pub catalog: Catalog,
    pub submitter: SectionSubmitter,
    pub inflight: InFlightGuard,
    /// 辅助读取接口；未配置时为 None
    pub aux_reader: Option<Arc<dyn RangeReader>>,
    pub aux_range: String,
}

type AppStateArc = Arc<AppState>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/api/screens/:screen", get(get_screen).post(post_screen))
        .route("/api/google-sheets", get(read_aux_range))
        .with_state(Arc::new(state))
}

/// 接口错误
#[derive(Debug)]
pub enum ApiError {
    UnknownScreen(String),
    Invalid(Vec<FieldIssue>),
    Conflict(Screen),
    SubmitFailed { message: String, retryable: bool },
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownScreen(_) => StatusCode::NOT_FOUND,
            ApiError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::SubmitFailed {
                retryable: true, ..
            } => StatusCode::BAD_GATEWAY,
            ApiError::SubmitFailed {
                retryable: false, ..
            } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Invalid { issues, .. } => ApiError::Invalid(issues),
            FlowError::AlreadySubmitting(screen) | FlowError::AlreadyAdvanced(screen) => {
                ApiError::Conflict(screen)
            }
            FlowError::NotSubmittable(screen) => ApiError::UnknownScreen(screen.slug().to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::UnknownScreen(slug) => json!({ "error": format!("Unknown screen: {}", slug) }),
            ApiError::Invalid(issues) => json!({ "error": "Please fill out all required fields.", "issues": issues }),
            ApiError::Conflict(_) => json!({ "error": "This section is already being submitted." }),
            ApiError::SubmitFailed { message, retryable } => {
                json!({ "error": message, "retryable": retryable })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct Welcome {
    pub title: &'static str,
    pub tagline: &'static str,
    pub intro: &'static str,
    pub first_screen: Screen,
}

async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        title: SURVEY_TITLE,
        tagline: SURVEY_TAGLINE,
        intro: SURVEY_INTRO,
        first_screen: Screen::first(),
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// 追问页使用的上下文字段
#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuery {
    pub age: Option<String>,
    pub gender: Option<String>,
}

impl ScreenQuery {
    fn into_context(self) -> RespondentContext {
        let mut context = RespondentContext::new();
        if let Some(age) = self.age {
            context.set(CacheKey::Age, age);
        }
        if let Some(gender) = self.gender {
            context.set(CacheKey::Gender, gender);
        }
        context
    }
}

fn parse_screen(slug: &str) -> Result<Screen, ApiError> {
    Screen::from_slug(slug).ok_or_else(|| ApiError::UnknownScreen(slug.to_string()))
}

async fn get_screen(
    State(state): State<AppStateArc>,
    Path(slug): Path<String>,
    Query(query): Query<ScreenQuery>,
) -> Result<Json<ScreenForm>, ApiError> {
    let screen = parse_screen(&slug)?;
    let context = query.into_context();
    Ok(Json(form_for(&state.catalog, screen, &context)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub context: RespondentContext,
    #[serde(default)]
    pub answers: AnswerBundle,
}

#[derive(Debug, Serialize)]
pub struct SubmittedRecord {
    pub section: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub next: Screen,
    pub context: RespondentContext,
    pub record: SubmittedRecord,
}

/// 同一邮箱同一页面同时只允许一个提交
///
/// 空邮箱无法区分答卷人，不做限制
fn acquire_ticket(
    inflight: &InFlightGuard,
    email: &str,
    screen: Screen,
) -> Result<Option<InFlightTicket>, ApiError> {
    if email.is_empty() {
        debug!("匿名提交 {}，跳过并发检查", screen);
        return Ok(None);
    }
    match inflight.try_acquire(email, screen) {
        Some(ticket) => Ok(Some(ticket)),
        None => {
            warn!("⚠️ {} 的 {} 正在提交中，拒绝重复请求", email, screen);
            Err(ApiError::Conflict(screen))
        }
    }
}

async fn post_screen(
    State(state): State<AppStateArc>,
    Path(slug): Path<String>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let screen = parse_screen(&slug)?;
    if screen.is_terminal() {
        return Err(ApiError::UnknownScreen(slug));
    }

    let SubmitRequest {
        mut context,
        answers,
    } = request;
    let mut controller = ScreenController::mount(&state.catalog, screen, &context);
    controller.replace_answers(answers);

    let email = controller.submission_email(&context);
    let _ticket = acquire_ticket(&state.inflight, &email, screen)?;

    info!(
        "📥 收到 {} 的提交: {}",
        screen,
        truncate_text(&controller.answers().to_json_string().unwrap_or_default(), 120)
    );

    match controller.submit(&state.submitter, &mut context).await? {
        SubmitOutcome::Advanced { next, timestamp } => Ok(Json(SubmitResponse {
            next,
            context,
            record: SubmittedRecord {
                section: screen.section_label().unwrap_or_default().to_string(),
                timestamp,
            },
        })),
        SubmitOutcome::Failed { message, retryable } => {
            Err(ApiError::SubmitFailed { message, retryable })
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuxRangeResponse {
    pub data: ValueRange,
}

async fn read_aux_range(State(state): State<AppStateArc>) -> Response {
    let Some(reader) = &state.aux_reader else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "AUX_SHEET_ID is not configured" })),
        )
            .into_response();
    };

    match reader.read_range(&state.aux_range).await {
        Ok(data) => Json(AuxRangeResponse { data }).into_response(),
        Err(e) => {
            error!("❌ 读取辅助区域 {} 失败: {}", state.aux_range, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
