use anyhow::Result;
use chrono::Utc;
use notes_core::{Role, TenantId};
use sqlx::{Executor, Sqlite};

/// Insert a user; a taken email is a 409.
pub async fn insert<'e, E>(
    exec: E,
    email: &str,
    password_hash: &str,
    role: Role,
    tenant_id: TenantId,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, password, role, tenant_id, created_at) VALUES (?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(tenant_id.0)
    .bind(Utc::now())
    .fetch_one(exec)
    .await
    .map_err(|e| super::conflict_on_unique(e, "User with this email already exists"))?;

    Ok(id)
}

pub async fn email_exists<'e, E>(exec: E, email: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(exec)
        .await?;

    Ok(found.is_some())
}
