use anyhow::{Context, Result};
use notes_auth::{parse_ttl, SessionOptions};
use notes_core::{ConfigError, ConfigSnapshot, NotesConfig};

/// Register defaults for every key the application reads.
///
/// Only keys registered here can be overridden from the environment.
pub fn config(cfg: &mut NotesConfig) {
    configure_http(cfg);
    configure_database(cfg);
    configure_auth(cfg);
    configure_business_rules(cfg);
}

fn configure_http(cfg: &mut NotesConfig) {
    cfg.set_default("http.host", "127.0.0.1");
    cfg.set_default("http.port", "3000");
}

fn configure_database(cfg: &mut NotesConfig) {
    cfg.set_default("database.url", "sqlite://multinotes.db?mode=rwc");
}

fn configure_auth(cfg: &mut NotesConfig) {
    // No usable default: startup fails until AUTH_SECRET is set.
    cfg.set_default("auth.secret", "");
    cfg.set_default("auth.cookie.secure", "false");
    cfg.set_default("auth.session.ttl", "7d");
    cfg.set_default("auth.hash.cost", "10");
}

fn configure_business_rules(cfg: &mut NotesConfig) {
    cfg.set_default("notes.free.plan.limit", "3");
    cfg.set_default("notes.invite.password", "password");
}

/// Defaults overlaid with the process environment (`.env` is loaded by `main`).
pub fn from_env() -> NotesConfig {
    let mut cfg = NotesConfig::new();
    config(&mut cfg);
    cfg.overlay_env(std::env::vars());
    cfg
}

/// Typed view over the configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session: SessionOptions,
    pub hash_cost: u32,
    pub free_plan_limit: i64,
    pub invite_password: String,
}

impl Settings {
    pub fn from_snapshot(snapshot: ConfigSnapshot) -> Result<Self> {
        let host = snapshot.require("http.host")?.to_string();
        let port = snapshot
            .parse::<u16>("http.port")?
            .ok_or_else(|| ConfigError::Missing("http.port".to_string()))?;
        let database_url = snapshot.require("database.url")?.to_string();

        let ttl_raw = snapshot.require("auth.session.ttl")?;
        let ttl = parse_ttl(ttl_raw).map_err(|reason| ConfigError::Invalid {
            key: "auth.session.ttl".to_string(),
            reason,
        })?;

        let session = SessionOptions {
            secure: snapshot.parse::<bool>("auth.cookie.secure")?.unwrap_or(false),
            ttl,
            ..SessionOptions::default()
        }
        .with_secret(snapshot.require("auth.secret")?);
        session.validate().context("invalid session settings")?;

        let hash_cost = snapshot.parse::<u32>("auth.hash.cost")?.unwrap_or(10);
        let free_plan_limit = snapshot.parse::<i64>("notes.free.plan.limit")?.unwrap_or(3);
        if free_plan_limit < 0 {
            return Err(ConfigError::Invalid {
                key: "notes.free.plan.limit".to_string(),
                reason: "must not be negative".to_string(),
            }
            .into());
        }
        let invite_password = snapshot.require("notes.invite.password")?.to_string();

        Ok(Self {
            host,
            port,
            database_url,
            session,
            hash_cost,
            free_plan_limit,
            invite_password,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> NotesConfig {
        let mut cfg = NotesConfig::new();
        config(&mut cfg);
        cfg
    }

    #[test]
    fn missing_secret_is_rejected() {
        let err = Settings::from_snapshot(defaults().snapshot()).unwrap_err();
        assert!(err.to_string().contains("auth.secret"));
    }

    #[test]
    fn env_overrides_defaults() {
        let mut cfg = defaults();
        cfg.overlay_env(vec![
            ("AUTH_SECRET".to_string(), "0123456789abcdef0123456789abcdef".to_string()),
            ("HTTP_PORT".to_string(), "8088".to_string()),
            ("AUTH_SESSION_TTL".to_string(), "2h".to_string()),
            ("NOTES_FREE_PLAN_LIMIT".to_string(), "5".to_string()),
        ]);

        let settings = Settings::from_snapshot(cfg.snapshot()).unwrap();
        assert_eq!(settings.addr(), "127.0.0.1:8088");
        assert_eq!(settings.session.ttl.as_secs(), 2 * 60 * 60);
        assert_eq!(settings.free_plan_limit, 5);
        assert_eq!(settings.hash_cost, 10);
        assert!(!settings.session.secure);
    }

    #[test]
    fn negative_note_limit_is_rejected() {
        let mut cfg = defaults();
        cfg.set("auth.secret", "0123456789abcdef0123456789abcdef");
        cfg.set("notes.free.plan.limit", "-1");

        let err = Settings::from_snapshot(cfg.snapshot()).unwrap_err();
        assert!(err.to_string().contains("notes.free.plan.limit"));
    }

    #[test]
    fn garbage_port_fails_loudly() {
        let mut cfg = defaults();
        cfg.set("auth.secret", "0123456789abcdef0123456789abcdef");
        cfg.set("http.port", "eighty");
        assert!(Settings::from_snapshot(cfg.snapshot()).is_err());
    }
}
