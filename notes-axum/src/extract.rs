use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRef, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use notes_auth::{SessionManager, SessionUser};
use notes_core::{FormError, NotesError, TenantContext};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::NotesAxumError;

fn map_json_rejection(rejection: JsonRejection) -> NotesAxumError {
    NotesError::bad_request("Failed to parse the request body as JSON")
        .with_form(FormError::form(rejection.body_text()))
        .into()
}

fn session_from_parts<S>(parts: &Parts, state: &S) -> Option<SessionUser>
where
    Arc<SessionManager>: FromRef<S>,
{
    if let Some(user) = parts.extensions.get::<SessionUser>() {
        return Some(user.clone());
    }
    let sessions = Arc::<SessionManager>::from_ref(state);
    sessions.from_headers(&parts.headers)
}

/// The signed-in user; rejects with 401 when there is no valid session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

impl CurrentUser {
    pub fn tenant(&self) -> TenantContext {
        self.0.tenant_context()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<SessionManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = NotesAxumError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .map(CurrentUser)
            .ok_or_else(|| NotesError::not_authenticated("Unauthorized").into())
    }
}

/// The signed-in user, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for MaybeUser
where
    Arc<SessionManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_from_parts(parts, state)))
    }
}

/// JSON body that must also pass `validator` rules.
///
/// Unparsable bodies are a 400 with `form.form`; rule violations a 400 with `form.fields`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = NotesAxumError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_json_rejection)?;

        value
            .validate()
            .map_err(|errors| NotesError::validation(FormError::from_validation(&errors)))?;

        Ok(ValidJson(value))
    }
}
