use std::sync::Arc;

use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use notes_auth::SessionManager;
use notes_axum::{ApiJson, CurrentUser, NotesAxumError, ValidJson};

use super::tenants_shared::{InviteUser, INVITE};
use super::TenantsService;

/// The role check runs before the body is read, so members get a 403 even
/// for payloads that would not parse.
pub async fn invite(
    State(tenants): State<Arc<TenantsService>>,
    user: CurrentUser,
    req: Request,
) -> Result<ApiJson<&'static str>, NotesAxumError> {
    let ctx = user.tenant();
    tenants.authorize(&ctx, INVITE).await?;
    let ValidJson(data) = ValidJson::<InviteUser>::from_request(req, &()).await?;

    tenants.invite(&ctx, data).await?;
    Ok(ApiJson::created("User invited successfully"))
}

/// Re-issues the session so the cookie reflects the new plan.
pub async fn upgrade(
    State(tenants): State<Arc<TenantsService>>,
    State(sessions): State<Arc<SessionManager>>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, NotesAxumError> {
    let plan = tenants.upgrade(&user.tenant(), &slug).await?;
    let cookie = sessions.session_cookie(&user.0.with_plan(plan))?;
    Ok(([(SET_COOKIE, cookie)], ApiJson::ok("Upgraded to Pro")))
}
