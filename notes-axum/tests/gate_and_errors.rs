use std::sync::Arc;

use axum::body::Body;
use axum::extract::FromRef;
use axum::http::header::{COOKIE, LOCATION};
use axum::http::{HeaderValue, Request};
use axum::routing::{get, post};
use axum::{middleware, Router};
use http_body_util::BodyExt;
use notes_auth::{SessionManager, SessionOptions, SessionUser};
use notes_axum::middlewares::{route_gate, RouteGate, RoutePolicy};
use notes_axum::{ApiJson, AxumApp, CurrentUser, NotesAxumError, ValidJson};
use notes_core::{NotesError, Plan, Role, TenantId};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use validator::Validate;

#[derive(Clone)]
struct TestState {
    sessions: Arc<SessionManager>,
}

impl FromRef<TestState> for Arc<SessionManager> {
    fn from_ref(state: &TestState) -> Self {
        Arc::clone(&state.sessions)
    }
}

#[derive(Deserialize, Validate)]
struct Payload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    title: String,
}

async fn me(user: CurrentUser) -> ApiJson<SessionUser> {
    ApiJson::ok(user.0)
}

async fn echo(ValidJson(p): ValidJson<Payload>) -> ApiJson<String> {
    ApiJson::created(p.title)
}

async fn boom() -> Result<ApiJson<()>, NotesAxumError> {
    Err(anyhow::anyhow!("database is on fire").into())
}

async fn quota() -> Result<ApiJson<()>, NotesAxumError> {
    Err(NotesError::forbidden("Free plan limit reached").into())
}

fn sessions() -> Arc<SessionManager> {
    Arc::new(
        SessionManager::new(SessionOptions::default().with_secret("gate-test-secret-gate-test-secret")).unwrap(),
    )
}

fn app(sessions: Arc<SessionManager>) -> AxumApp {
    let gate = RouteGate::new(Arc::clone(&sessions), RoutePolicy::default());
    let router = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/login", post(echo))
        .route("/api/notes", post(echo))
        .route("/api/notes/boom", get(boom))
        .route("/api/notes/quota", get(quota))
        .route("/notes", get(|| async { "notes page" }))
        .route("/auth/signin", get(|| async { "sign in page" }))
        .route("/health", get(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(gate, route_gate))
        .with_state(TestState { sessions });
    AxumApp::new(router)
}

fn user() -> SessionUser {
    SessionUser {
        id: 3,
        email: "user@acme.test".to_string(),
        role: Role::Member,
        tenant_id: TenantId(1),
        tenant_slug: "acme".to_string(),
        plan: Plan::Free,
    }
}

fn cookie_for(sessions: &SessionManager) -> HeaderValue {
    let set = sessions.session_cookie(&user()).unwrap();
    let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
    HeaderValue::from_str(&pair).unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn protected_api_without_session_is_401_envelope() {
    let res = app(sessions()).router.oneshot(get_req("/api/auth/me")).await.unwrap();

    assert_eq!(res.status().as_u16(), 401);
    assert!(res.headers().get("x-request-id").is_some());
    assert_eq!(json_body(res).await, json!({"success": false, "error": "Unauthorized"}));
}

#[tokio::test]
async fn protected_page_without_session_redirects_to_signin() {
    let res = app(sessions()).router.oneshot(get_req("/notes")).await.unwrap();

    assert_eq!(res.status().as_u16(), 307);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/auth/signin");
}

#[tokio::test]
async fn session_reaches_handlers() {
    let s = sessions();
    let mut req = get_req("/api/auth/me");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["email"], "user@acme.test");
    assert_eq!(body["data"]["tenantSlug"], "acme");
}

#[tokio::test]
async fn signed_in_users_cannot_log_in_again() {
    let s = sessions();
    let mut req = post_json("/api/auth/login", "{\"title\":\"x\"}");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 403);
    assert_eq!(json_body(res).await["error"], "Already authenticated");
}

#[tokio::test]
async fn signed_in_users_are_sent_away_from_signin_page() {
    let s = sessions();
    let mut req = get_req("/auth/signin");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 307);
    assert_eq!(res.headers().get(LOCATION).unwrap(), "/notes");
}

#[tokio::test]
async fn tampered_cookie_counts_as_no_session() {
    let mut req = get_req("/api/auth/me");
    req.headers_mut()
        .insert(COOKIE, HeaderValue::from_static("multinotes-session=eyJhbGciOiJIUzI1NiJ9.e30.AAAA"));

    let res = app(sessions()).router.oneshot(req).await.unwrap();
    assert_eq!(res.status().as_u16(), 401);
}

#[tokio::test]
async fn malformed_json_is_400_with_form_message() {
    let s = sessions();
    let mut req = post_json("/api/notes", "{\"title\":");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["form"]["form"].is_string());
}

#[tokio::test]
async fn rule_violations_are_400_with_field_messages() {
    let s = sessions();
    let mut req = post_json("/api/notes", "{}");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["form"]["fields"]["title"], "Title is required");
}

#[tokio::test]
async fn valid_payload_is_201_envelope() {
    let s = sessions();
    let mut req = post_json("/api/notes", "{\"title\":\"hello\"}");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 201);
    assert_eq!(json_body(res).await, json!({"success": true, "data": "hello"}));
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let s = sessions();
    let mut req = get_req("/api/notes/boom");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body = json_body(res).await;
    assert_eq!(body["error"], "Internal Server Error");
    assert!(!body.to_string().contains("fire"));
}

#[tokio::test]
async fn domain_errors_keep_status_and_message() {
    let s = sessions();
    let mut req = get_req("/api/notes/quota");
    req.headers_mut().insert(COOKIE, cookie_for(&s));

    let res = app(s).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 403);
    assert_eq!(json_body(res).await, json!({"success": false, "error": "Free plan limit reached"}));
}

#[tokio::test]
async fn request_id_is_preserved_when_provided() {
    let mut req = get_req("/health");
    req.headers_mut().insert("x-request-id", HeaderValue::from_static("req-test-123"));

    let res = app(sessions()).router.oneshot(req).await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.headers().get("x-request-id").unwrap(), "req-test-123");
}
