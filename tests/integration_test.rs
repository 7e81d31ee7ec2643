use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use gamer_survey::infrastructure::{InMemoryStore, RangeReader, ResponseStore, StoreError};
use gamer_survey::models::{AnswerBundle, Catalog, SectionRecord};
use gamer_survey::orchestrator::{router, AppState, InFlightGuard};
use gamer_survey::services::submitter::{RETRY_MESSAGE, UNAVAILABLE_MESSAGE};
use gamer_survey::services::SectionSubmitter;
use gamer_survey::utils::logging;
use gamer_survey::{Config, StoreBackend};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Barrier, Notify};
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;

fn app_with(store: Arc<dyn ResponseStore>, aux_reader: Option<Arc<dyn RangeReader>>) -> Router {
    logging::init(false);
    router(AppState {
        catalog: Catalog::default(),
        submitter: SectionSubmitter::new(store),
        inflight: InFlightGuard::new(),
        aux_reader,
        aux_range: "Sheet1!A1:E10".to_string(),
    })
}

fn app(store: Arc<InMemoryStore>) -> Router {
    app_with(store, None)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn question_ids(form: &Value) -> Vec<String> {
    form["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_str().unwrap().to_string())
        .collect()
}

fn demographics_answers(age: &str) -> Value {
    json!({
        "ign": "Foo",
        "email": "a@b.com",
        "age": age,
        "gender": "female",
        "city": "Pune"
    })
}

#[tokio::test]
async fn welcome_points_at_first_screen() {
    let app = app(Arc::new(InMemoryStore::new("Survey Responses")));
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Kreo Ultimate Gamer Survey");
    assert_eq!(body["tagline"], "Are You Ready to Respawn?");
    assert_eq!(body["first_screen"], "demographics");

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn follow_up_screen_uses_query_context() {
    let app = app(Arc::new(InMemoryStore::new("Survey Responses")));

    // 没有上下文时按 under18 处理
    let (status, form) = send(&app, Method::GET, "/api/screens/demographics-l2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(question_ids(&form), ["grade", "parentControl"]);
    assert_eq!(form["title"], "Demographics L2");
    assert_eq!(form["questions"][0]["type"], "dropdown");
    assert_eq!(form["questions"][1]["type"], "radio");

    let (_, form) = send(
        &app,
        Method::GET,
        "/api/screens/demographics-l2?age=18-24&gender=male",
        None,
    )
    .await;
    assert_eq!(question_ids(&form), ["occupation"]);

    let (_, form) = send(
        &app,
        Method::GET,
        "/api/screens/demographics-l2?age=35%2B&gender=other",
        None,
    )
    .await;
    assert_eq!(question_ids(&form), ["occupation", "maritalStatus"]);

    let (_, form) = send(&app, Method::GET, "/api/screens/demographics-l2?age=senior", None).await;
    assert_eq!(question_ids(&form), ["occupation"]);
}

#[tokio::test]
async fn unknown_and_terminal_screens() {
    let app = app(Arc::new(InMemoryStore::new("Survey Responses")));
    let (status, _) = send(&app, Method::GET, "/api/screens/boss-level", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, form) = send(&app, Method::GET, "/api/screens/complete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["title"], "Thank You!");
    assert_eq!(form["step"], 7);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/screens/complete",
        Some(json!({ "answers": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_walk_appends_one_record_per_section() {
    let store = Arc::new(InMemoryStore::new("Survey Responses"));
    let app = app(store.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/screens/demographics",
        Some(json!({ "answers": demographics_answers("25-34") })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next"], "demographics-l2");
    assert_eq!(body["record"]["section"], "Demographics");
    assert_eq!(
        body["context"],
        json!({ "email": "a@b.com", "age": "25-34", "gender": "female" })
    );
    let mut context = body["context"].clone();

    let (_, form) = send(
        &app,
        Method::GET,
        "/api/screens/demographics-l2?age=25-34&gender=female",
        None,
    )
    .await;
    assert_eq!(question_ids(&form), ["occupation", "maritalStatus"]);

    let steps = [
        ("demographics-l2", json!({ "occupation": "Engineer", "maritalStatus": "Single" })),
        (
            "gaming-preferences",
            json!({
                "platforms": ["PC", "Console"],
                "favoriteGames": ["Minecraft", "Minecraft", "Valorant"],
                "gearFeatures": ["Price", "Performance", "Brand", "Durability", "Aesthetics"],
                "spendMoney": "51-100"
            }),
        ),
        ("gaming-level-2", json!({ "playFrequency": "daily" })),
        ("gaming-lifestyle", json!({})),
        ("gaming-family", json!({ "anything": "goes" })),
    ];
    let mut next = String::new();
    for (slug, answers) in steps {
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/screens/{}", slug),
            Some(json!({ "context": context, "answers": answers })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{} 提交失败: {}", slug, body);
        context = body["context"].clone();
        next = body["next"].as_str().unwrap().to_string();
    }
    assert_eq!(next, "complete");

    let records = store.records();
    let sections: Vec<_> = records.iter().map(|r| r.section.as_str()).collect();
    assert_eq!(
        sections,
        [
            "Demographics",
            "Demographics L2",
            "Gaming Preferences",
            "Gaming Level 2",
            "Gaming Lifestyle",
            "Gaming Family"
        ]
    );
    assert!(records.iter().all(|r| r.email == "a@b.com"));

    let prefs = records[2].answers().unwrap();
    let games = prefs.get("favoriteGames").unwrap().as_list().unwrap();
    assert_eq!(games, ["Minecraft", "Minecraft", "Valorant"]);
}

#[tokio::test]
async fn missing_required_fields_never_reach_the_store() {
    let store = Arc::new(InMemoryStore::new("Survey Responses"));
    let app = app(store.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/screens/demographics",
        Some(json!({ "answers": { "ign": "Foo" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "age", "gender", "city"]);
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn invalid_ranking_never_reaches_the_store() {
    let store = Arc::new(InMemoryStore::new("Survey Responses"));
    let app = app(store.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/screens/gaming-preferences",
        Some(json!({
            "context": { "email": "a@b.com" },
            "answers": {
                "platforms": ["PC"],
                "favoriteGames": ["Minecraft"],
                "gearFeatures": ["Price", "Price", "Price", "Price", "Price", "Price", "Nonsense"],
                "spendMoney": "51-100"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"gearFeatures"), "{}", body);
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn missing_target_reports_unavailable_and_writes_nothing() {
    let store = Arc::new(InMemoryStore::without_target("Survey Responses"));
    let app = app(store.clone());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/screens/demographics",
        Some(json!({ "answers": demographics_answers("18-24") })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], UNAVAILABLE_MESSAGE);
    assert_eq!(body["retryable"], false);
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn transient_failure_can_be_retried() {
    let store = Arc::new(InMemoryStore::new("Survey Responses"));
    store.fail_next_append(StoreError::Auth {
        reason: "token expired".into(),
    });
    let app = app(store.clone());
    let request = json!({ "answers": demographics_answers("under18") });

    let (status, body) = send(&app, Method::POST, "/api/screens/demographics", Some(request.clone())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], RETRY_MESSAGE);
    assert_eq!(body["retryable"], true);
    assert!(store.records().is_empty());

    let (status, body) = send(&app, Method::POST, "/api/screens/demographics", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["age"], "under18");
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn later_sections_without_context_use_empty_email() {
    let store = Arc::new(InMemoryStore::new("Survey Responses"));
    let app = app(store.clone());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/screens/gaming-level-2",
        Some(json!({ "answers": { "playFrequency": "weekly" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.records()[0].email, "");
}

/// 追加时停住，直到测试放行
struct GatedStore {
    inner: InMemoryStore,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl ResponseStore for GatedStore {
    async fn append_record(&self, record: &SectionRecord) -> Result<(), StoreError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.append_record(record).await
    }

    fn target(&self) -> &str {
        self.inner.target()
    }
}

#[tokio::test]
async fn duplicate_submission_in_flight_is_rejected() {
    let store = Arc::new(GatedStore {
        inner: InMemoryStore::new("Survey Responses"),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let app = app_with(store.clone(), None);
    let request = json!({ "answers": demographics_answers("35+") });

    let first = tokio::spawn({
        let app = app.clone();
        let request = request.clone();
        async move { send(&app, Method::POST, "/api/screens/demographics", Some(request)).await }
    });
    store.entered.notified().await;

    let (status, _) = send(&app, Method::POST, "/api/screens/demographics", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    store.release.notify_one();
    let (status, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.inner.records().len(), 1);
}

/// 两个写入都到达后才一起放行
struct RendezvousStore {
    inner: InMemoryStore,
    barrier: Barrier,
}

#[async_trait]
impl ResponseStore for RendezvousStore {
    async fn append_record(&self, record: &SectionRecord) -> Result<(), StoreError> {
        self.barrier.wait().await;
        self.inner.append_record(record).await
    }

    fn target(&self) -> &str {
        self.inner.target()
    }
}

#[tokio::test]
async fn anonymous_respondents_are_not_serialized() {
    let store = Arc::new(RendezvousStore {
        inner: InMemoryStore::new("Survey Responses"),
        barrier: Barrier::new(2),
    });
    let app = app_with(store.clone(), None);

    let requests = ["daily", "weekly"].map(|frequency| {
        let app = app.clone();
        async move {
            send(
                &app,
                Method::POST,
                "/api/screens/gaming-level-2",
                Some(json!({ "answers": { "playFrequency": frequency } })),
            )
            .await
        }
    });
    let results = tokio::time::timeout(Duration::from_secs(5), futures::future::join_all(requests))
        .await
        .expect("两个匿名提交应同时进入存储");

    for (status, body) in &results {
        assert_eq!(*status, StatusCode::OK, "{}", body);
    }
    let records = store.inner.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.email.is_empty()));
}

#[tokio::test]
async fn different_respondents_submit_concurrently() {
    let store = Arc::new(InMemoryStore::new("Survey Responses"));
    let app = app(store.clone());

    let requests = ["p1@x.com", "p2@x.com", "p3@x.com"].map(|email| {
        let mut answers = demographics_answers("18-24");
        answers["email"] = json!(email);
        let app = app.clone();
        async move {
            send(
                &app,
                Method::POST,
                "/api/screens/demographics",
                Some(json!({ "answers": answers })),
            )
            .await
        }
    });
    let results = futures::future::join_all(requests).await;
    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));
    assert_eq!(store.records().len(), 3);
}

#[tokio::test]
async fn aux_range_reads_from_configured_reader() {
    let aux = Arc::new(InMemoryStore::without_target("Survey Responses"));
    let rows: Vec<Vec<String>> = (1..=12)
        .map(|r| (1..=6).map(|c| format!("r{}c{}", r, c)).collect())
        .collect();
    aux.add_tab("Sheet1", rows);
    let reader: Arc<dyn RangeReader> = aux;

    let app = app_with(Arc::new(InMemoryStore::new("Survey Responses")), Some(reader));
    let (status, body) = send(&app, Method::GET, "/api/google-sheets", None).await;
    assert_eq!(status, StatusCode::OK);
    let values = body["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), 10);
    assert_eq!(values[0].as_array().unwrap().len(), 5);
    assert_eq!(values[9][4], "r10c5");
}

#[tokio::test]
async fn aux_range_without_reader_is_an_error() {
    let app = app(Arc::new(InMemoryStore::new("Survey Responses")));
    let (status, body) = send(&app, Method::GET, "/api/google-sheets", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[test]
fn missing_secret_is_fatal_for_sheets_backend() {
    let config = assert_ok!(Config::from_lookup(|name| match name {
        "GOOGLE_SHEETS_ID" => Some("sheet-id".to_string()),
        "GOOGLE_SHEETS_CLIENT_EMAIL" => Some("svc@example.iam".to_string()),
        _ => None,
    }));
    assert_eq!(config.store_backend, StoreBackend::Sheets);
    assert_err!(config.validate());

    let memory = assert_ok!(Config::from_lookup(|name| match name {
        "STORE_BACKEND" => Some("memory".to_string()),
        _ => None,
    }));
    assert_ok!(memory.validate());
}

#[test]
fn stored_data_column_round_trips() {
    let bundle = AnswerBundle::new()
        .with("platforms", vec!["PC".to_string(), "Mobile".to_string()])
        .with("city", "Pune");
    let record = SectionRecord {
        email: "a@b.com".into(),
        section: "Gaming Preferences".into(),
        timestamp: "2024-01-01T00:00:00.000Z".into(),
        data: bundle.to_json_string().unwrap(),
    };
    let row = record.to_row();
    let parsed = SectionRecord::from_row(&row).unwrap();
    assert_eq!(parsed.answers().unwrap(), bundle);
}

#[tokio::test]
#[ignore] // 默认忽略，需要真实凭证：cargo test -- --ignored
async fn submit_to_real_spreadsheet() {
    logging::init(true);

    let config = Config::from_env().expect("读取配置失败");
    config.validate().expect("缺少表格凭证");

    let app = gamer_survey::App::initialize(config)
        .await
        .expect("初始化失败");
    let (status, body) = send(
        &app.router(),
        Method::POST,
        "/api/screens/demographics",
        Some(json!({ "answers": demographics_answers("18-24") })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "提交失败: {}", body);
}
