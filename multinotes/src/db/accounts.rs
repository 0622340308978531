use anyhow::Result;
use async_trait::async_trait;
use notes_auth::{CredentialResolver, Credentials, SessionUser};
use notes_core::TenantId;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password: String,
    role: String,
    tenant_id: i64,
    tenant_slug: String,
    plan: String,
}

/// Resolves login credentials with the tenant slug and plan joined in, so a
/// fresh session always carries the full snapshot.
#[derive(Clone)]
pub struct AccountResolver {
    pool: SqlitePool,
}

impl AccountResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialResolver for AccountResolver {
    async fn resolve(&self, email: &str) -> Result<Option<Credentials>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT u.id, u.email, u.password, u.role, u.tenant_id, t.slug AS tenant_slug, t.plan
               FROM users u
               JOIN tenants t ON t.id = u.tenant_id
              WHERE u.email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Credentials {
            user: SessionUser {
                id: row.id,
                email: row.email,
                role: row.role.parse()?,
                tenant_id: TenantId(row.tenant_id),
                tenant_slug: row.tenant_slug,
                plan: row.plan.parse()?,
            },
            password_hash: row.password,
        }))
    }
}
