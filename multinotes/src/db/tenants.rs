use anyhow::Result;
use chrono::{DateTime, Utc};
use notes_core::{Plan, TenantId};
use serde::Serialize;
use sqlx::{Executor, FromRow, Sqlite};

#[derive(Debug, Clone, FromRow)]
struct TenantRow {
    id: i64,
    name: String,
    slug: String,
    plan: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub slug: String,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = anyhow::Error;

    fn try_from(row: TenantRow) -> Result<Self> {
        Ok(Self {
            id: TenantId(row.id),
            name: row.name,
            slug: row.slug,
            plan: row.plan.parse()?,
            created_at: row.created_at,
        })
    }
}

pub async fn insert<'e, E>(exec: E, name: &str, slug: &str, plan: Plan) -> Result<Tenant>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, TenantRow>(
        "INSERT INTO tenants (name, slug, plan, created_at) VALUES (?, ?, ?, ?)
         RETURNING id, name, slug, plan, created_at",
    )
    .bind(name)
    .bind(slug)
    .bind(plan.as_str())
    .bind(Utc::now())
    .fetch_one(exec)
    .await
    .map_err(|e| super::conflict_on_unique(e, "A tenant with this name already exists"))?;

    row.try_into()
}

pub async fn find_by_slug<'e, E>(exec: E, slug: &str) -> Result<Option<Tenant>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, TenantRow>(
        "SELECT id, name, slug, plan, created_at FROM tenants WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(exec)
    .await?;

    row.map(Tenant::try_from).transpose()
}

/// Current plan straight from the table, never from the session.
pub async fn plan_of<'e, E>(exec: E, id: TenantId) -> Result<Option<Plan>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let plan: Option<String> = sqlx::query_scalar("SELECT plan FROM tenants WHERE id = ?")
        .bind(id.0)
        .fetch_optional(exec)
        .await?;

    Ok(plan.map(|p| p.parse()).transpose()?)
}

/// Returns `false` when no tenant matched.
pub async fn set_plan<'e, E>(exec: E, id: TenantId, slug: &str, plan: Plan) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let done = sqlx::query("UPDATE tenants SET plan = ? WHERE id = ? AND slug = ?")
        .bind(plan.as_str())
        .bind(id.0)
        .bind(slug)
        .execute(exec)
        .await?;

    Ok(done.rows_affected() > 0)
}
