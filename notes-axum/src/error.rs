use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notes_core::errors::NotesError;

/// Handler error: any `anyhow::Error`, rendered as the failure envelope.
#[derive(Debug)]
pub struct NotesAxumError(pub anyhow::Error);

impl From<anyhow::Error> for NotesAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<NotesError> for NotesAxumError {
    fn from(e: NotesError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for NotesAxumError {
    fn into_response(self) -> Response {
        let notes = NotesError::normalize(self.0);

        if notes.code() >= 500 {
            let cause = notes
                .source
                .as_ref()
                .map(|s| format!("{s:#}"))
                .unwrap_or_else(|| notes.message.clone());
            tracing::error!(
                kind = notes.class_name(),
                message = %notes.message,
                %cause,
                "request failed"
            );
        } else {
            tracing::debug!(kind = notes.class_name(), message = %notes.message, "request rejected");
        }

        let safe = notes.sanitize_for_client();
        let status = StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_envelope())).into_response()
    }
}
