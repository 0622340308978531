use anyhow::Result;
use notes_core::{
    bail_notes, HookContext, NotesError, ServiceHooks, ServiceMethodKind, TenantContext,
};
use sqlx::SqlitePool;

use crate::db::{self, notes::Note};

use super::notes_shared::{self, CreateNote, UpdateNote, SERVICE};

/// Tenant-scoped note CRUD. The tenant always comes from the caller's
/// context, never from the payload.
pub struct NotesService {
    pool: SqlitePool,
    hooks: ServiceHooks,
}

impl NotesService {
    pub fn new(pool: SqlitePool, free_plan_limit: i64) -> Self {
        let mut hooks = ServiceHooks::new();
        notes_shared::register_hooks(&mut hooks, &pool, free_plan_limit);
        Self { pool, hooks }
    }

    async fn before(&self, ctx: &TenantContext, method: ServiceMethodKind) -> Result<()> {
        let mut hook_ctx = HookContext::new(ctx.clone(), SERVICE, method);
        self.hooks.run_before(&mut hook_ctx).await
    }

    pub async fn find(&self, ctx: &TenantContext) -> Result<Vec<Note>> {
        self.before(ctx, ServiceMethodKind::Find).await?;
        db::notes::list(&self.pool, ctx.tenant_id).await
    }

    pub async fn get(&self, ctx: &TenantContext, id: i64) -> Result<Note> {
        self.before(ctx, ServiceMethodKind::Get).await?;
        db::notes::get(&self.pool, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| NotesError::not_found("Not Found").into_anyhow())
    }

    pub async fn create(&self, ctx: &TenantContext, data: CreateNote) -> Result<Note> {
        self.before(ctx, ServiceMethodKind::Create).await?;
        let note = db::notes::insert(
            &self.pool,
            ctx.tenant_id,
            ctx.user_id,
            &data.title,
            data.content.as_deref(),
        )
        .await?;
        tracing::debug!(note_id = note.id, tenant = %ctx.tenant_slug, "note created");
        Ok(note)
    }

    pub async fn update(&self, ctx: &TenantContext, id: i64, data: UpdateNote) -> Result<Note> {
        self.before(ctx, ServiceMethodKind::Update).await?;
        let updated = db::notes::update(
            &self.pool,
            ctx.tenant_id,
            id,
            data.title.as_deref(),
            data.content_change(),
        )
        .await?;
        updated.ok_or_else(|| NotesError::not_found("Not Found").into_anyhow())
    }

    pub async fn remove(&self, ctx: &TenantContext, id: i64) -> Result<()> {
        self.before(ctx, ServiceMethodKind::Remove).await?;
        if !db::notes::delete(&self.pool, ctx.tenant_id, id).await? {
            bail_notes!(not_found, "Not Found");
        }
        Ok(())
    }
}
