use std::sync::Arc;

use notes_core::{Capability, RequireCapability, ServiceHooks, ServiceMethodKind};
use serde::Deserialize;
use validator::Validate;

pub const SERVICE: &str = "tenants";
pub const INVITE: ServiceMethodKind = ServiceMethodKind::Custom("invite");
pub const UPGRADE: ServiceMethodKind = ServiceMethodKind::Custom("upgrade");

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteUser {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Both tenant actions are admin-only.
pub fn register_hooks(hooks: &mut ServiceHooks) {
    hooks
        .before(INVITE, Arc::new(RequireCapability(Capability::InviteMembers)))
        .before(UPGRADE, Arc::new(RequireCapability(Capability::UpgradePlan)));
}
