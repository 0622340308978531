//! Route gate: decides, per request path, whether the caller must (or must
//! not) be signed in before any handler runs.
//!
//! The policy is a static, ordered rule table; the first matching rule wins
//! and unmatched paths are public. API paths (`/api/...`) are answered with
//! JSON envelopes, page paths with redirects.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use notes_auth::SessionManager;
use notes_core::NotesError;

use crate::NotesAxumError;

/// Who may reach a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Only callers without a session (sign-in pages, login/signup APIs).
    GuestOnly,
    /// Only callers with a session.
    Protected,
}

/// Whether a path serves JSON or HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Api,
    Page,
}

impl Surface {
    pub fn of(path: &str) -> Self {
        if path == "/api" || path.starts_with("/api/") {
            Surface::Api
        } else {
            Surface::Page
        }
    }
}

#[derive(Debug, Clone)]
enum PathMatch {
    Exact(&'static str),
    /// The path itself or anything below it (`/notes`, `/notes/7`, not `/notesx`).
    Prefix(&'static str),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(p) => path == *p,
            PathMatch::Prefix(p) => {
                path == *p || (path.starts_with(p) && path[p.len()..].starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct RouteRule {
    matcher: PathMatch,
    access: Access,
}

/// Ordered rule table plus redirect targets.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    pub signin_path: &'static str,
    pub home_path: &'static str,
}

impl RoutePolicy {
    pub fn new(signin_path: &'static str, home_path: &'static str) -> Self {
        Self {
            rules: Vec::new(),
            signin_path,
            home_path,
        }
    }

    pub fn exact(mut self, path: &'static str, access: Access) -> Self {
        self.rules.push(RouteRule {
            matcher: PathMatch::Exact(path),
            access,
        });
        self
    }

    pub fn prefix(mut self, path: &'static str, access: Access) -> Self {
        self.rules.push(RouteRule {
            matcher: PathMatch::Prefix(path),
            access,
        });
        self
    }

    pub fn classify(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|r| r.matcher.matches(path))
            .map(|r| r.access)
            .unwrap_or(Access::Public)
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new("/auth/signin", "/notes")
            .exact("/api/auth/logout", Access::Public)
            .exact("/api/auth/login", Access::GuestOnly)
            .exact("/api/auth/signup", Access::GuestOnly)
            .prefix("/api/auth", Access::Protected)
            .prefix("/api/notes", Access::Protected)
            .prefix("/api/tenants", Access::Protected)
            .prefix("/auth", Access::GuestOnly)
            .prefix("/notes", Access::Protected)
    }
}

/// State for [`route_gate`].
#[derive(Clone)]
pub struct RouteGate {
    pub sessions: Arc<SessionManager>,
    pub policy: Arc<RoutePolicy>,
}

impl RouteGate {
    pub fn new(sessions: Arc<SessionManager>, policy: RoutePolicy) -> Self {
        Self {
            sessions,
            policy: Arc::new(policy),
        }
    }
}

/// Middleware: `axum::middleware::from_fn_with_state(gate, route_gate)`.
///
/// A valid session is stored in the request extensions so extractors do not
/// verify the cookie a second time.
pub async fn route_gate(State(gate): State<RouteGate>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let access = gate.policy.classify(&path);
    let surface = Surface::of(&path);
    let user = gate.sessions.from_headers(req.headers());

    match (access, surface, user.is_some()) {
        (Access::Protected, Surface::Api, false) => {
            NotesAxumError::from(NotesError::not_authenticated("Unauthorized")).into_response()
        }
        (Access::Protected, Surface::Page, false) => {
            Redirect::temporary(gate.policy.signin_path).into_response()
        }
        (Access::GuestOnly, Surface::Api, true) => {
            NotesAxumError::from(NotesError::forbidden("Already authenticated")).into_response()
        }
        (Access::GuestOnly, Surface::Page, true) => {
            Redirect::temporary(gate.policy.home_path).into_response()
        }
        _ => {
            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
    }
}
