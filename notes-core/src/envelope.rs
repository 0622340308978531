//! Uniform response envelope shared by every API route.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// Successful half of the envelope: `{ "success": true, "data": T }`.
///
/// The failure half is rendered from [`crate::NotesError::to_envelope`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Form-level and per-field validation messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl FormError {
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            form: Some(message.into()),
            fields: None,
        }
    }

    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(name.into(), message.into());
        Self {
            form: None,
            fields: Some(fields),
        }
    }

    /// Flatten validator output: one entry per field, messages joined with ", ".
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let fields: BTreeMap<String, String> = errors
            .field_errors()
            .into_iter()
            .filter(|(_, errs)| !errs.is_empty())
            .map(|(field, errs)| {
                let joined = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None => default_message(&e.code),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                (field.to_string(), joined)
            })
            .collect();

        Self {
            form: None,
            fields: if fields.is_empty() { None } else { Some(fields) },
        }
    }
}

fn default_message(code: &str) -> String {
    match code {
        "email" => "Invalid email address".to_string(),
        "length" => "Invalid length".to_string(),
        "required" => "Required".to_string(),
        other => format!("Invalid value ({other})"),
    }
}
