// Local (email/password) authentication strategy.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use notes_core::errors::NotesError;

use crate::password::PasswordHasher;
use crate::session::SessionUser;

/// A stored account: the session snapshot plus its password hash.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub user: SessionUser,
    pub password_hash: String,
}

/// Looks accounts up by email. Implemented by the application's data layer.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self, email: &str) -> Result<Option<Credentials>>;
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct LocalStrategy {
    resolver: Arc<dyn CredentialResolver>,
    hasher: PasswordHasher,
}

impl LocalStrategy {
    pub fn new(resolver: Arc<dyn CredentialResolver>, hasher: PasswordHasher) -> Self {
        Self { resolver, hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Unknown email and wrong password fail identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<SessionUser> {
        let invalid = || NotesError::not_authenticated(INVALID_CREDENTIALS).into_anyhow();

        let Some(found) = self.resolver.resolve(email).await? else {
            return Err(invalid());
        };

        if !self.hasher.verify(password, &found.password_hash) {
            return Err(invalid());
        }

        Ok(found.user)
    }
}

#[cfg(test)]
mod tests {
    use notes_core::{Plan, Role, TenantId};

    use super::*;

    struct OneUser(Credentials);

    #[async_trait]
    impl CredentialResolver for OneUser {
        async fn resolve(&self, email: &str) -> Result<Option<Credentials>> {
            Ok((self.0.user.email == email).then(|| self.0.clone()))
        }
    }

    fn strategy() -> LocalStrategy {
        let hasher = PasswordHasher::new(crate::password::MIN_COST);
        let creds = Credentials {
            user: SessionUser {
                id: 1,
                email: "admin@acme.test".to_string(),
                role: Role::Admin,
                tenant_id: TenantId(1),
                tenant_slug: "acme".to_string(),
                plan: Plan::Free,
            },
            password_hash: hasher.hash("password").unwrap(),
        };
        LocalStrategy::new(Arc::new(OneUser(creds)), hasher)
    }

    #[tokio::test]
    async fn valid_credentials_yield_the_session_user() {
        let user = strategy().authenticate("admin@acme.test", "password").await.unwrap();
        assert_eq!(user.tenant_slug, "acme");
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let s = strategy();
        for (email, pw) in [("nobody@acme.test", "password"), ("admin@acme.test", "nope")] {
            let err = s.authenticate(email, pw).await.unwrap_err();
            let notes = NotesError::from_anyhow(&err).unwrap();
            assert_eq!(notes.code(), 401);
            assert_eq!(notes.message, "Invalid credentials");
        }
    }
}
