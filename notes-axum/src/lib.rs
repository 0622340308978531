//! notes-axum: Axum adapter for MultiNotes.
//!
//! Renders `NotesError`s as the failure envelope, provides session and
//! validated-JSON extractors, the route gate middleware, and an app wrapper
//! adding request-id and tracing layers.

pub mod app;
pub mod extract;
pub mod middlewares;
pub mod response;
mod error;

pub use app::{AxumApp, REQUEST_ID_HEADER};
pub use error::NotesAxumError;
pub use extract::{CurrentUser, MaybeUser, ValidJson};
pub use response::ApiJson;

pub use axum;
