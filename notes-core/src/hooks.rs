use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::capabilities::Capability;
use crate::tenant::TenantContext;

/// Service methods hooks can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceMethodKind {
    Find,
    Get,
    Create,
    Update,
    Remove,
    Custom(&'static str),
}

/// Context passed to hooks.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub tenant: TenantContext,
    pub service: &'static str,
    pub method: ServiceMethodKind,
}

impl HookContext {
    pub fn new(tenant: TenantContext, service: &'static str, method: ServiceMethodKind) -> Self {
        Self {
            tenant,
            service,
            method,
        }
    }
}

/// Runs before the service method; returning an error aborts the call.
#[async_trait]
pub trait BeforeHook: Send + Sync {
    async fn run(&self, ctx: &mut HookContext) -> Result<()>;
}

/// Before-hooks registered for one service.
///
/// `before_all` hooks run first, then method-specific ones, each group in
/// registration order.
#[derive(Default, Clone)]
pub struct ServiceHooks {
    before_all: Vec<Arc<dyn BeforeHook>>,
    before_by_method: HashMap<ServiceMethodKind, Vec<Arc<dyn BeforeHook>>>,
}

impl ServiceHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_all(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before_all.push(hook);
        self
    }

    pub fn before(&mut self, method: ServiceMethodKind, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn before_find(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before(ServiceMethodKind::Find, hook)
    }

    pub fn before_get(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before(ServiceMethodKind::Get, hook)
    }

    pub fn before_create(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before(ServiceMethodKind::Create, hook)
    }

    pub fn before_update(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before(ServiceMethodKind::Update, hook)
    }

    pub fn before_remove(&mut self, hook: Arc<dyn BeforeHook>) -> &mut Self {
        self.before(ServiceMethodKind::Remove, hook)
    }

    pub async fn run_before(&self, ctx: &mut HookContext) -> Result<()> {
        for h in &self.before_all {
            h.run(ctx).await?;
        }

        if let Some(hooks) = self.before_by_method.get(&ctx.method) {
            for h in hooks {
                h.run(ctx).await?;
            }
        }

        Ok(())
    }
}

/// Rejects the call with 403 unless the caller's role grants the capability.
pub struct RequireCapability(pub Capability);

#[async_trait]
impl BeforeHook for RequireCapability {
    async fn run(&self, ctx: &mut HookContext) -> Result<()> {
        self.0.authorize(&ctx.tenant).map_err(|e| e.into_anyhow())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::errors::NotesError;
    use crate::tenant::{Plan, Role, TenantId};

    struct Record(&'static str, Arc<Mutex<Vec<&'static str>>>);

    #[async_trait]
    impl BeforeHook for Record {
        async fn run(&self, _ctx: &mut HookContext) -> Result<()> {
            self.1.lock().unwrap().push(self.0);
            Ok(())
        }
    }

    fn ctx(role: Role, method: ServiceMethodKind) -> HookContext {
        let tenant = TenantContext {
            tenant_id: TenantId(1),
            tenant_slug: "acme".to_string(),
            plan: Plan::Free,
            user_id: 1,
            email: "admin@acme.test".to_string(),
            role,
        };
        HookContext::new(tenant, "notes", method)
    }

    #[tokio::test]
    async fn global_hooks_run_before_method_hooks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = ServiceHooks::new();
        hooks
            .before_create(Arc::new(Record("create", Arc::clone(&seen))))
            .before_all(Arc::new(Record("all", Arc::clone(&seen))))
            .before_find(Arc::new(Record("find", Arc::clone(&seen))));

        hooks
            .run_before(&mut ctx(Role::Member, ServiceMethodKind::Create))
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["all", "create"]);
    }

    #[tokio::test]
    async fn capability_hook_short_circuits() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = ServiceHooks::new();
        hooks
            .before(
                ServiceMethodKind::Custom("invite"),
                Arc::new(RequireCapability(Capability::InviteMembers)),
            )
            .before(
                ServiceMethodKind::Custom("invite"),
                Arc::new(Record("after-check", Arc::clone(&seen))),
            );

        let err = hooks
            .run_before(&mut ctx(Role::Member, ServiceMethodKind::Custom("invite")))
            .await
            .unwrap_err();

        assert_eq!(NotesError::from_anyhow(&err).map(|e| e.code()), Some(403));
        assert!(seen.lock().unwrap().is_empty());
    }
}
