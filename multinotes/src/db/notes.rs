//! Note queries. Every statement filters on `tenant_id`; a note outside the
//! caller's tenant is indistinguishable from a missing one.

use anyhow::Result;
use chrono::{DateTime, Utc};
use notes_core::TenantId;
use serde::Serialize;
use sqlx::{Executor, FromRow, Sqlite};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub tenant_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, title, content, tenant_id, author_id, created_at, updated_at";

/// Newest first.
pub async fn list<'e, E>(exec: E, tenant_id: TenantId) -> Result<Vec<Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {COLUMNS} FROM notes WHERE tenant_id = ? ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, Note>(&sql)
        .bind(tenant_id.0)
        .fetch_all(exec)
        .await?;
    Ok(rows)
}

pub async fn get<'e, E>(exec: E, tenant_id: TenantId, id: i64) -> Result<Option<Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {COLUMNS} FROM notes WHERE id = ? AND tenant_id = ?");
    let row = sqlx::query_as::<_, Note>(&sql)
        .bind(id)
        .bind(tenant_id.0)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn count<'e, E>(exec: E, tenant_id: TenantId) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE tenant_id = ?")
        .bind(tenant_id.0)
        .fetch_one(exec)
        .await?;
    Ok(n)
}

pub async fn insert<'e, E>(
    exec: E,
    tenant_id: TenantId,
    author_id: i64,
    title: &str,
    content: Option<&str>,
) -> Result<Note>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();
    let sql = format!(
        "INSERT INTO notes (title, content, tenant_id, author_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let note = sqlx::query_as::<_, Note>(&sql)
        .bind(title)
        .bind(content)
        .bind(tenant_id.0)
        .bind(author_id)
        .bind(now)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(note)
}

/// Fields left `None` keep their stored value; `updated_at` always moves.
/// `None` leaves a column as is; `content: Some(None)` sets it to NULL.
pub async fn update<'e, E>(
    exec: E,
    tenant_id: TenantId,
    id: i64,
    title: Option<&str>,
    content: Option<Option<&str>>,
) -> Result<Option<Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "UPDATE notes
            SET title = COALESCE(?, title),
                content = CASE WHEN ? THEN ? ELSE content END,
                updated_at = ?
          WHERE id = ? AND tenant_id = ?
         RETURNING {COLUMNS}"
    );
    let note = sqlx::query_as::<_, Note>(&sql)
        .bind(title)
        .bind(content.is_some())
        .bind(content.flatten())
        .bind(Utc::now())
        .bind(id)
        .bind(tenant_id.0)
        .fetch_optional(exec)
        .await?;
    Ok(note)
}

/// Returns `false` when nothing matched.
pub async fn delete<'e, E>(exec: E, tenant_id: TenantId, id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let done = sqlx::query("DELETE FROM notes WHERE id = ? AND tenant_id = ?")
        .bind(id)
        .bind(tenant_id.0)
        .execute(exec)
        .await?;
    Ok(done.rows_affected() > 0)
}
