// Signed session cookies.
//
// The session is never stored server-side: the cookie carries an HS256 token
// whose claims are the user snapshot plus the usual iss/aud/iat/exp/jti.

use anyhow::Result;
use chrono::Utc;
use http::{HeaderMap, HeaderValue};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use notes_core::errors::NotesError;
use notes_core::{Plan, Role, TenantContext, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cookie::{extract_cookie, set_cookie_value, CookieSpec};
use crate::options::{AuthConfigError, SessionOptions};

/// Snapshot of the signed-in user, as carried in the cookie and returned by `/api/auth/me`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub tenant_id: TenantId,
    pub tenant_slug: String,
    pub plan: Plan,
}

impl SessionUser {
    pub fn tenant_context(&self) -> TenantContext {
        TenantContext {
            tenant_id: self.tenant_id,
            tenant_slug: self.tenant_slug.clone(),
            plan: self.plan,
            user_id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    user: SessionUser,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Issues and verifies session cookies.
#[derive(Clone)]
pub struct SessionManager {
    options: SessionOptions,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie_name", &self.options.cookie_name)
            .field("secure", &self.options.secure)
            .field("ttl", &self.options.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(options: SessionOptions) -> Result<Self, AuthConfigError> {
        options.validate()?;
        let secret = options.secret.clone().ok_or(AuthConfigError::MissingSecret)?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            options,
        })
    }

    /// Sign a session token for `user`.
    pub fn issue(&self, user: &SessionUser) -> Result<String> {
        self.issue_at(user, Utc::now().timestamp())
    }

    fn issue_at(&self, user: &SessionUser, now: i64) -> Result<String> {
        let claims = SessionClaims {
            user: user.clone(),
            iss: self.options.issuer.clone(),
            aud: self.options.audience.clone(),
            iat: now,
            exp: i64::try_from(self.options.ttl.as_secs())
                .ok()
                .and_then(|ttl| now.checked_add(ttl))
                .ok_or_else(|| NotesError::general_error("Session lifetime out of range").into_anyhow())?,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| NotesError::general_error("Could not sign session").with_source(e.into()).into_anyhow())
    }

    /// Verify a token; any failure (bad signature, expired, wrong audience) is NotAuthenticated.
    pub fn verify(&self, token: &str) -> Result<SessionUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.options.issuer.as_str()]);
        validation.set_audience(&[self.options.audience.as_str()]);

        let data = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| NotesError::not_authenticated("Unauthorized").with_source(e.into()).into_anyhow())?;

        Ok(data.claims.user)
    }

    /// Read the session from request headers. Invalid cookies count as "no session".
    pub fn from_headers(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = extract_cookie(headers, &self.options.cookie_name)?;
        match self.verify(&token) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring invalid session cookie");
                None
            }
        }
    }

    /// `Set-Cookie` value establishing a session for `user`.
    pub fn session_cookie(&self, user: &SessionUser) -> Result<HeaderValue> {
        let token = self.issue(user)?;
        set_cookie_value(&CookieSpec {
            name: &self.options.cookie_name,
            value: &token,
            max_age_secs: self.options.ttl.as_secs(),
            secure: self.options.secure,
        })
    }

    /// `Set-Cookie` value removing the session.
    pub fn clear_cookie(&self) -> Result<HeaderValue> {
        set_cookie_value(&CookieSpec {
            name: &self.options.cookie_name,
            value: "",
            max_age_secs: 0,
            secure: self.options.secure,
        })
    }
}

#[cfg(test)]
mod tests {
    use http::header::COOKIE;

    use super::*;

    const SECRET: &str = "test-secret-test-secret-test-secret!";

    fn manager() -> SessionManager {
        SessionManager::new(SessionOptions::default().with_secret(SECRET)).unwrap()
    }

    fn user() -> SessionUser {
        SessionUser {
            id: 1,
            email: "a@x.com".to_string(),
            role: Role::Admin,
            tenant_id: TenantId(10),
            tenant_slug: "acme-co".to_string(),
            plan: Plan::Free,
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let m = manager();
        let token = m.issue(&user()).unwrap();
        assert_eq!(m.verify(&token).unwrap(), user());
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let other = SessionManager::new(
            SessionOptions::default().with_secret("another-secret-another-secret-1234"),
        )
        .unwrap();
        let token = other.issue(&user()).unwrap();

        let err = manager().verify(&token).unwrap_err();
        assert_eq!(NotesError::from_anyhow(&err).map(|e| e.code()), Some(401));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let m = manager();
        let long_ago = Utc::now().timestamp() - 30 * 24 * 60 * 60;
        let token = m.issue_at(&user(), long_ago).unwrap();
        assert!(m.verify(&token).is_err());
    }

    #[test]
    fn unbounded_lifetimes_are_refused() {
        let options = SessionOptions {
            ttl: std::time::Duration::MAX,
            ..SessionOptions::default().with_secret(SECRET)
        };
        assert_eq!(SessionManager::new(options).unwrap_err(), AuthConfigError::TtlTooLong);
    }

    #[test]
    fn expiry_overflow_is_an_error_not_a_wrap() {
        let m = manager();
        assert!(m.issue_at(&user(), i64::MAX - 10).is_err());
    }

    #[test]
    fn cookie_round_trip_through_headers() {
        let m = manager();
        let set_cookie = m.session_cookie(&user()).unwrap();
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&pair).unwrap());
        assert_eq!(m.from_headers(&headers), Some(user()));

        headers.insert(COOKIE, HeaderValue::from_static("multinotes-session=garbage"));
        assert_eq!(m.from_headers(&headers), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let v = manager().clear_cookie().unwrap();
        assert!(v.to_str().unwrap().starts_with("multinotes-session=;"));
        assert!(v.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn session_serializes_camel_case() {
        let v = serde_json::to_value(user()).unwrap();
        assert_eq!(v["tenantSlug"], "acme-co");
        assert_eq!(v["tenantId"], 10);
        assert_eq!(v["plan"], "free");
        assert_eq!(v["role"], "admin");
    }
}
