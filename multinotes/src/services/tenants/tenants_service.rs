use anyhow::Result;
use notes_auth::PasswordHasher;
use notes_core::{
    bail_notes, HookContext, Plan, Role, ServiceHooks, ServiceMethodKind, TenantContext,
};
use sqlx::SqlitePool;

use crate::db;

use super::tenants_shared::{self, InviteUser, INVITE, SERVICE, UPGRADE};

pub struct TenantsService {
    pool: SqlitePool,
    hasher: PasswordHasher,
    hooks: ServiceHooks,
    invite_password: String,
}

impl TenantsService {
    pub fn new(pool: SqlitePool, hasher: PasswordHasher, invite_password: String) -> Self {
        let mut hooks = ServiceHooks::new();
        tenants_shared::register_hooks(&mut hooks);
        Self {
            pool,
            hasher,
            hooks,
            invite_password,
        }
    }

    /// Run the before hooks of `method` without doing any work.
    ///
    /// Handlers call this ahead of reading the request body so that callers
    /// lacking the capability get a 403 whatever they sent.
    pub async fn authorize(&self, ctx: &TenantContext, method: ServiceMethodKind) -> Result<()> {
        let mut hook_ctx = HookContext::new(ctx.clone(), SERVICE, method);
        self.hooks.run_before(&mut hook_ctx).await
    }

    /// Add a member to the caller's tenant with the configured starter password.
    pub async fn invite(&self, ctx: &TenantContext, data: InviteUser) -> Result<i64> {
        self.authorize(ctx, INVITE).await?;

        if db::users::email_exists(&self.pool, &data.email).await? {
            bail_notes!(conflict, "User with this email already exists");
        }

        let hash = self.hasher.hash(&self.invite_password)?;
        let user_id =
            db::users::insert(&self.pool, &data.email, &hash, Role::Member, ctx.tenant_id).await?;

        tracing::info!(tenant = %ctx.tenant_slug, user_id, invited_by = ctx.user_id, "member invited");
        Ok(user_id)
    }

    /// Move the caller's own tenant to the paid plan. Any other slug is a 404.
    pub async fn upgrade(&self, ctx: &TenantContext, slug: &str) -> Result<Plan> {
        self.authorize(ctx, UPGRADE).await?;

        if slug != ctx.tenant_slug {
            bail_notes!(not_found, "Tenant not found");
        }
        if !db::tenants::set_plan(&self.pool, ctx.tenant_id, slug, Plan::Pro).await? {
            bail_notes!(not_found, "Tenant not found");
        }

        tracing::info!(tenant = %slug, "upgraded to pro");
        Ok(Plan::Pro)
    }
}
