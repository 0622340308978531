use crate::errors::NotesError;
use crate::tenant::{Role, TenantContext};

/// Actions a signed-in user may attempt.
///
/// Every role-restricted handler goes through [`Capability::authorize`]
/// instead of branching on the role itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ReadNotes,
    WriteNotes,
    ViewSelf,
    InviteMembers,
    UpgradePlan,
}

/// capability → minimum role
const CAPABILITY_TABLE: &[(Capability, Role)] = &[
    (Capability::ReadNotes, Role::Member),
    (Capability::WriteNotes, Role::Member),
    (Capability::ViewSelf, Role::Member),
    (Capability::InviteMembers, Role::Admin),
    (Capability::UpgradePlan, Role::Admin),
];

impl Capability {
    pub fn required_role(&self) -> Role {
        CAPABILITY_TABLE
            .iter()
            .find(|(cap, _)| cap == self)
            .map(|(_, role)| *role)
            .unwrap_or(Role::Admin)
    }

    pub fn allows(&self, role: Role) -> bool {
        match self.required_role() {
            Role::Member => true,
            Role::Admin => role == Role::Admin,
        }
    }

    pub fn authorize(&self, ctx: &TenantContext) -> Result<(), NotesError> {
        if self.allows(ctx.role) {
            Ok(())
        } else {
            Err(NotesError::forbidden("Forbidden"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::{Plan, TenantId};

    fn ctx(role: Role) -> TenantContext {
        TenantContext {
            tenant_id: TenantId(1),
            tenant_slug: "acme".to_string(),
            plan: Plan::Free,
            user_id: 7,
            email: "user@acme.test".to_string(),
            role,
        }
    }

    #[test]
    fn members_cannot_administer() {
        let member = ctx(Role::Member);
        for cap in [Capability::InviteMembers, Capability::UpgradePlan] {
            let err = cap.authorize(&member).unwrap_err();
            assert_eq!(err.code(), 403);
        }
    }

    #[test]
    fn admins_can_do_everything() {
        let admin = ctx(Role::Admin);
        for (cap, _) in CAPABILITY_TABLE {
            assert!(cap.authorize(&admin).is_ok());
        }
    }

    #[test]
    fn members_work_with_notes() {
        let member = ctx(Role::Member);
        assert!(Capability::ReadNotes.authorize(&member).is_ok());
        assert!(Capability::WriteNotes.authorize(&member).is_ok());
    }
}
