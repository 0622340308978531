// Session options and configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted length of the session signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime.
pub const MAX_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);

pub const DEFAULT_COOKIE_NAME: &str = "multinotes-session";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("session secret is not configured")]
    MissingSecret,
    #[error("session secret must be at least {MIN_SECRET_LEN} characters")]
    WeakSecret,
    #[error("cookie name must not be empty")]
    EmptyCookieName,
    #[error("session lifetime must be greater than zero")]
    ZeroTtl,
    #[error("session lifetime must not exceed 366 days")]
    TtlTooLong,
}

/// How the session cookie is signed and shaped.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionOptions {
    /// Cookie carrying the signed session
    pub cookie_name: String,
    /// HMAC secret used to sign the session token
    pub secret: Option<String>,
    /// Add the `Secure` attribute (HTTPS only)
    pub secure: bool,
    /// Session lifetime; also used as the cookie `Max-Age`
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// `iss` claim
    pub issuer: String,
    /// `aud` claim
    pub audience: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            secret: None,
            secure: false,
            ttl: Duration::from_secs(7 * 24 * 60 * 60),
            issuer: "multinotes".to_string(),
            audience: "multinotes-web".to_string(),
        }
    }
}

impl SessionOptions {
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn validate(&self) -> Result<(), AuthConfigError> {
        let secret = self
            .secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(AuthConfigError::MissingSecret)?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthConfigError::WeakSecret);
        }
        if self.cookie_name.trim().is_empty() {
            return Err(AuthConfigError::EmptyCookieName);
        }
        if self.ttl.is_zero() {
            return Err(AuthConfigError::ZeroTtl);
        }
        if self.ttl > MAX_TTL {
            return Err(AuthConfigError::TtlTooLong);
        }
        Ok(())
    }
}

/// Parse durations like `7d` or `12h 30m`.
pub fn parse_ttl(raw: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(raw.trim()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_required_and_long_enough() {
        assert_eq!(SessionOptions::default().validate(), Err(AuthConfigError::MissingSecret));
        assert_eq!(
            SessionOptions::default().with_secret("short").validate(),
            Err(AuthConfigError::WeakSecret)
        );
        assert!(SessionOptions::default()
            .with_secret("0123456789abcdef0123456789abcdef")
            .validate()
            .is_ok());
    }

    #[test]
    fn ttl_is_bounded() {
        let base = SessionOptions::default().with_secret("0123456789abcdef0123456789abcdef");

        let forever = SessionOptions {
            ttl: Duration::MAX,
            ..base.clone()
        };
        assert_eq!(forever.validate(), Err(AuthConfigError::TtlTooLong));

        let year = SessionOptions {
            ttl: parse_ttl("365d").unwrap(),
            ..base
        };
        assert!(year.validate().is_ok());
    }

    #[test]
    fn ttl_parsing() {
        assert_eq!(parse_ttl("7d").unwrap(), Duration::from_secs(604_800));
        assert_eq!(parse_ttl(" 90s ").unwrap(), Duration::from_secs(90));
        assert!(parse_ttl("soon").is_err());
    }
}
