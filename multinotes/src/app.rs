use std::sync::Arc;

use anyhow::Result;
use axum::extract::FromRef;
use axum::http::Uri;
use axum::routing::{get, post};
use axum::{middleware, Router};
use notes_auth::SessionManager;
use notes_axum::middlewares::{route_gate, RouteGate, RoutePolicy};
use notes_axum::{AxumApp, NotesAxumError};
use notes_core::NotesError;
use sqlx::SqlitePool;

use crate::config::Settings;
use crate::pages;
use crate::services::auth::{auth_http, AuthService};
use crate::services::notes::{notes_http, NotesService};
use crate::services::tenants::{tenants_http, TenantsService};
use crate::services::{self, NotesServices};

/// Shared handler state; each field is extractable on its own via `State<T>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub auth: Arc<AuthService>,
    pub notes: Arc<NotesService>,
    pub tenants: Arc<TenantsService>,
}

pub fn state(pool: SqlitePool, settings: &Settings) -> Result<AppState> {
    let sessions = Arc::new(SessionManager::new(settings.session.clone())?);
    let NotesServices {
        auth,
        notes,
        tenants,
    } = services::configure(&pool, settings);

    Ok(AppState {
        sessions,
        auth,
        notes,
        tenants,
    })
}

pub fn routes(state: AppState) -> Router<()> {
    let gate = RouteGate::new(Arc::clone(&state.sessions), RoutePolicy::default());

    let api = Router::new()
        .route("/auth/signup", post(auth_http::signup))
        .route("/auth/login", post(auth_http::login))
        .route("/auth/logout", post(auth_http::logout))
        .route("/auth/me", get(auth_http::me))
        .route("/notes", get(notes_http::find).post(notes_http::create))
        .route(
            "/notes/{id}",
            get(notes_http::get)
                .put(notes_http::update)
                .delete(notes_http::remove),
        )
        .route("/tenants/invite", post(tenants_http::invite))
        .route("/tenants/{slug}/upgrade", post(tenants_http::upgrade));

    Router::new()
        .route("/", get(pages::index))
        .route("/auth/signin", get(pages::signin))
        .route("/auth/signup", get(pages::signup))
        .route("/notes", get(pages::notes))
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(gate, route_gate))
        .with_state(state)
}

async fn not_found(uri: Uri) -> NotesAxumError {
    tracing::debug!(path = %uri.path(), "no route");
    NotesError::not_found("Not Found").into()
}

async fn method_not_allowed() -> NotesAxumError {
    NotesError::method_not_allowed("Method Not Allowed").into()
}

/// Wire state, routes, and the standard HTTP layers.
pub fn notes_app(pool: SqlitePool, settings: &Settings) -> Result<AxumApp> {
    let state = state(pool, settings)?;
    Ok(AxumApp::new(routes(state)))
}
