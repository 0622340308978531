//! # Errors
//!
//! MultiNotes carries one structured error type through every layer.
//! Core goals:
//! - consistent status codes + class names
//! - can be carried through anyhow::Error (services and hooks return anyhow)
//! - transport-agnostic (the HTTP crate decides how to render it)
//!
//! The client-facing shape is the uniform envelope
//! `{ "success": false, "error": "...", "form": { ... } }`, see [`NotesError::to_envelope`].

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::{json, Value};

use crate::envelope::FormError;

/// A convenience result type for MultiNotes core APIs.
pub type NotesResult<T> = std::result::Result<T, AnyError>;

/// Message returned to clients in place of internal failure details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error classes + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,       // 400
    NotAuthenticated, // 401
    Forbidden,        // 403
    NotFound,         // 404
    MethodNotAllowed, // 405
    Conflict,         // 409
    GeneralError,     // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotAuthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::Conflict => 409,
            ErrorKind::GeneralError => 500,
        }
    }

    /// Error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::MethodNotAllowed => "MethodNotAllowed",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    /// Kebab-cased class name, used in logs.
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::MethodNotAllowed => "method-not-allowed",
            ErrorKind::Conflict => "conflict",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

/// A structured MultiNotes error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct NotesError {
    pub kind: ErrorKind,
    pub message: String,
    pub form: Option<FormError>,
    pub source: Option<AnyError>,
}

impl NotesError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            form: None,
            source: None,
        }
    }

    pub fn with_form(mut self, form: FormError) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error` so it flows through services and hooks.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Find a `NotesError` anywhere in an `anyhow::Error` chain.
    pub fn from_anyhow(err: &AnyError) -> Option<&NotesError> {
        err.chain().find_map(|e| e.downcast_ref::<NotesError>())
    }

    /// Turn any error into a NotesError:
    /// - if it's already a NotesError, keep it (lossless)
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> NotesError {
        match err.downcast::<NotesError>() {
            Ok(notes) => notes,
            Err(other) => {
                let found = NotesError::from_anyhow(&other)
                    .map(|inner| (inner.kind, inner.message.clone(), inner.form.clone()));

                match found {
                    Some((kind, message, form)) => NotesError {
                        kind,
                        message,
                        form,
                        source: Some(other),
                    },
                    None => NotesError::new(ErrorKind::GeneralError, other.to_string())
                        .with_source(other),
                }
            }
        }
    }

    /// A version suitable for returning to clients: no source, and no
    /// internal message for 500s.
    pub fn sanitize_for_client(&self) -> NotesError {
        let message = if self.kind == ErrorKind::GeneralError {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.message.clone()
        };

        NotesError {
            kind: self.kind,
            message,
            form: self.form.clone(),
            source: None,
        }
    }

    /// `{ success: false, error, form? }`
    pub fn to_envelope(&self) -> Value {
        let mut base = json!({
            "success": false,
            "error": self.message,
        });

        if let Some(form) = &self.form {
            base["form"] = json!(form);
        }
        base
    }

    // ---- Constructors ----

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MethodNotAllowed, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }

    /// 400 carrying field-level detail.
    pub fn validation(form: FormError) -> Self {
        Self::bad_request("Validation failed").with_form(form)
    }
}

impl fmt::Display for NotesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for NotesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Bail out of an anyhow-returning fn with a NotesError.
#[macro_export]
macro_rules! bail_notes {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::NotesError::$ctor($msg).into_anyhow());
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::NotesError::$ctor(format!($fmt, $($arg)*)).into_anyhow());
    };
}
