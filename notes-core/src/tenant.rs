//! Core multi-tenant types for MultiNotes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::NotesError;

/// Numeric tenant identifier (primary key of the tenants table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub i64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscription tier of a tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }

    /// Maximum number of notes, `None` for unlimited.
    pub fn note_limit(&self, free_limit: i64) -> Option<i64> {
        match self {
            Plan::Free => Some(free_limit),
            Plan::Pro => None,
        }
    }

    /// Reject a new note when the tenant already holds `current` notes.
    pub fn ensure_note_quota(&self, current: i64, free_limit: i64) -> Result<(), NotesError> {
        match self.note_limit(free_limit) {
            Some(limit) if current >= limit => Err(NotesError::forbidden("Free plan limit reached")),
            _ => Ok(()),
        }
    }
}

impl FromStr for Plan {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            other => Err(NotesError::general_error(format!("Unknown plan: {other}"))),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user inside its tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

impl FromStr for Role {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(NotesError::general_error(format!("Unknown role: {other}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context carried with every authenticated operation.
///
/// Built once per request from the session and passed explicitly into
/// services and hooks, so all data access is tenant-aware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub tenant_slug: String,
    pub plan: Plan,
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

/// Derive a tenant slug from its display name.
///
/// Lowercase, whitespace runs become `-`, anything outside `[a-z0-9-]` is dropped.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_display_name() {
        assert_eq!(slugify("Acme Co"), "acme-co");
        assert_eq!(slugify("  Big   Corp! "), "-big-corp-");
        assert_eq!(slugify("Ünïcode & Sons"), "ncode--sons");
    }

    #[test]
    fn free_plan_caps_notes() {
        assert!(Plan::Free.ensure_note_quota(2, 3).is_ok());

        let err = Plan::Free.ensure_note_quota(3, 3).unwrap_err();
        assert_eq!(err.code(), 403);
        assert_eq!(err.message, "Free plan limit reached");
    }

    #[test]
    fn pro_plan_is_unlimited() {
        assert_eq!(Plan::Pro.note_limit(3), None);
        assert!(Plan::Pro.ensure_note_quota(10_000, 3).is_ok());
    }

    #[test]
    fn plan_and_role_round_trip_through_strings() {
        assert_eq!("pro".parse::<Plan>().unwrap(), Plan::Pro);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("owner".parse::<Role>().is_err());
    }
}
