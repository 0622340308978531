use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notes_core::ApiResponse;
use serde::Serialize;

/// `{ "success": true, "data": T }` with a status code.
#[derive(Debug)]
pub struct ApiJson<T>(pub StatusCode, pub T);

impl<T> ApiJson<T> {
    pub fn ok(data: T) -> Self {
        Self(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self(StatusCode::CREATED, data)
    }
}

impl<T> IntoResponse for ApiJson<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (self.0, Json(ApiResponse::ok(self.1))).into_response()
    }
}
