use anyhow::Result;
use async_trait::async_trait;
use notes_core::{BeforeHook, HookContext, NotesError};
use sqlx::SqlitePool;

use crate::db;

/// Refuses a new note once a free tenant holds its limit.
///
/// The plan is read from the database, so a tenant upgraded after the
/// session was issued is not held to the free cap. Check and insert are
/// separate statements; concurrent creates may overshoot by a note.
pub struct EnforceNoteQuota {
    pool: SqlitePool,
    free_limit: i64,
}

impl EnforceNoteQuota {
    pub fn new(pool: SqlitePool, free_limit: i64) -> Self {
        Self { pool, free_limit }
    }
}

#[async_trait]
impl BeforeHook for EnforceNoteQuota {
    async fn run(&self, ctx: &mut HookContext) -> Result<()> {
        let tenant_id = ctx.tenant.tenant_id;
        let free_limit = self.free_limit;

        let plan = db::tenants::plan_of(&self.pool, tenant_id)
            .await?
            .ok_or_else(|| NotesError::not_found("Tenant not found").into_anyhow())?;
        let current = db::notes::count(&self.pool, tenant_id).await?;

        if let Err(err) = plan.ensure_note_quota(current, free_limit) {
            tracing::debug!(%tenant_id, current, free_limit, "note quota reached");
            return Err(err.into_anyhow());
        }

        ctx.tenant.plan = plan;
        Ok(())
    }
}
