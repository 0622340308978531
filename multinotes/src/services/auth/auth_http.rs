use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use notes_auth::{SessionManager, SessionUser};
use notes_axum::{ApiJson, CurrentUser, NotesAxumError, ValidJson};
use notes_core::Capability;

use super::auth_shared::{LoginData, SignupData};
use super::AuthService;

pub async fn signup(
    State(auth): State<Arc<AuthService>>,
    State(sessions): State<Arc<SessionManager>>,
    ValidJson(data): ValidJson<SignupData>,
) -> Result<impl IntoResponse, NotesAxumError> {
    let user = auth.signup(data).await?;
    let cookie = sessions.session_cookie(&user)?;
    Ok(([(SET_COOKIE, cookie)], ApiJson::created("Signup successful")))
}

pub async fn login(
    State(auth): State<Arc<AuthService>>,
    State(sessions): State<Arc<SessionManager>>,
    ValidJson(data): ValidJson<LoginData>,
) -> Result<impl IntoResponse, NotesAxumError> {
    let user = auth.login(data).await?;
    let cookie = sessions.session_cookie(&user)?;
    Ok(([(SET_COOKIE, cookie)], ApiJson::ok("Logged in")))
}

/// Always succeeds, with or without a session.
pub async fn logout(
    State(sessions): State<Arc<SessionManager>>,
) -> Result<impl IntoResponse, NotesAxumError> {
    let cookie = sessions.clear_cookie()?;
    Ok(([(SET_COOKIE, cookie)], ApiJson::ok("Logged out")))
}

pub async fn me(user: CurrentUser) -> Result<ApiJson<SessionUser>, NotesAxumError> {
    Capability::ViewSelf.authorize(&user.tenant())?;
    Ok(ApiJson::ok(user.0))
}
