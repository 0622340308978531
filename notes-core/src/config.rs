//! # Configuration
//!
//! A minimal string key/value store in the `app.set()` / `app.get()` style.
//! The application layers defaults, `.env` and process environment on top
//! of each other; services only ever see an immutable [`ConfigSnapshot`].
//!
//! ```rust
//! use notes_core::NotesConfig;
//! let mut cfg = NotesConfig::new();
//!
//! cfg.set("http.port", "3000");
//! assert_eq!(cfg.get("http.port"), Some("3000"));
//! ```
//!
//! Environment variables map onto dotted keys by lowercasing and turning
//! `_` into `.`, so `HTTP_PORT` overrides `http.port`.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration value `{0}`")]
    Missing(String),
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Default)]
pub struct NotesConfig {
    values: HashMap<String, String>,
}

impl NotesConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set only when the key is not present yet.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overlay values for every known key that has a matching variable in `vars`.
    pub fn overlay_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let key = env_key(&name);
            if self.values.contains_key(&key) {
                self.values.insert(key, value);
            }
        }
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            map: self.values.clone(),
        }
    }
}

/// `AUTH_COOKIE_SECURE` → `auth.cookie.secure`
pub fn env_key(name: &str) -> String {
    name.to_lowercase().replace('_', ".")
}

#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    map: HashMap<String, String>,
}

impl ConfigSnapshot {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// Parse a value, failing loudly on garbage instead of silently using a default.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
