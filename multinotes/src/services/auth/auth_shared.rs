use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

const MIN_TENANT_NAME: usize = 3;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupData {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default, rename = "tenantName")]
    #[validate(custom(function = "tenant_name_length"))]
    pub tenant_name: String,
}

/// Tenant names are stored trimmed, so the length rule applies to the trimmed text.
fn tenant_name_length(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() >= MIN_TENANT_NAME {
        return Ok(());
    }
    Err(ValidationError::new("length")
        .with_message(Cow::Borrowed("Tenant name must be at least 3 characters")))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginData {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 3, max = 100, message = "Password must be between 3 and 100 characters"))]
    pub password: String,
}
