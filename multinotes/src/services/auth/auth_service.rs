use std::sync::Arc;

use anyhow::Result;
use notes_auth::{LocalStrategy, PasswordHasher, SessionUser};
use notes_core::{bail_notes, slugify, FormError, NotesError, Plan, Role};
use sqlx::SqlitePool;

use crate::db::{self, AccountResolver};

use super::auth_shared::{LoginData, SignupData};

/// Signup and credential login. Sessions are minted by the HTTP layer.
pub struct AuthService {
    pool: SqlitePool,
    strategy: LocalStrategy,
}

impl AuthService {
    pub fn new(pool: SqlitePool, hasher: PasswordHasher) -> Self {
        let resolver = Arc::new(AccountResolver::new(pool.clone()));
        Self {
            pool,
            strategy: LocalStrategy::new(resolver, hasher),
        }
    }

    /// Create a tenant and its first admin in one transaction.
    ///
    /// A duplicate email or tenant slug aborts the transaction, so a failed
    /// signup leaves no rows behind.
    pub async fn signup(&self, data: SignupData) -> Result<SessionUser> {
        let tenant_name = data.tenant_name.trim();
        let slug = slugify(tenant_name);
        if slug.is_empty() {
            return Err(NotesError::validation(FormError::field(
                "tenantName",
                "Tenant name must contain letters or digits",
            ))
            .into_anyhow());
        }

        let password_hash = self.strategy.hasher().hash(&data.password)?;

        let mut tx = self.pool.begin().await?;

        if db::users::email_exists(&mut *tx, &data.email).await? {
            bail_notes!(conflict, "User with this email already exists");
        }
        if db::tenants::find_by_slug(&mut *tx, &slug).await?.is_some() {
            bail_notes!(conflict, "A tenant with this name already exists");
        }

        let tenant = db::tenants::insert(&mut *tx, tenant_name, &slug, Plan::Free).await?;
        let user_id =
            db::users::insert(&mut *tx, &data.email, &password_hash, Role::Admin, tenant.id).await?;

        tx.commit().await?;

        tracing::info!(tenant = %tenant.slug, user_id, "tenant signed up");

        Ok(SessionUser {
            id: user_id,
            email: data.email,
            role: Role::Admin,
            tenant_id: tenant.id,
            tenant_slug: tenant.slug,
            plan: tenant.plan,
        })
    }

    pub async fn login(&self, data: LoginData) -> Result<SessionUser> {
        let user = self.strategy.authenticate(&data.email, &data.password).await?;
        tracing::debug!(user_id = user.id, tenant = %user.tenant_slug, "logged in");
        Ok(user)
    }
}
