use anyhow::Result;
use notes_auth::PasswordHasher;
use notes_core::{Plan, Role};
use sqlx::SqlitePool;

use crate::db;

const DEMO_PASSWORD: &str = "password";

struct SeedTenant {
    name: &'static str,
    slug: &'static str,
    users: &'static [(&'static str, Role)],
}

const TENANTS: &[SeedTenant] = &[
    SeedTenant {
        name: "Acme",
        slug: "acme",
        users: &[("admin@acme.test", Role::Admin), ("user@acme.test", Role::Member)],
    },
    SeedTenant {
        name: "Globex",
        slug: "globex",
        users: &[("admin@globex.test", Role::Admin), ("user@globex.test", Role::Member)],
    },
];

/// Insert the demo tenants. Tenants whose slug already exists are skipped.
///
/// Returns the number of tenants created.
pub async fn seed(pool: &SqlitePool, hasher: &PasswordHasher) -> Result<usize> {
    let hash = hasher.hash(DEMO_PASSWORD)?;
    let mut created = 0;

    for entry in TENANTS {
        if db::tenants::find_by_slug(pool, entry.slug).await?.is_some() {
            tracing::info!(tenant = entry.slug, "already seeded, skipping");
            continue;
        }

        let mut tx = pool.begin().await?;
        let tenant = db::tenants::insert(&mut *tx, entry.name, entry.slug, Plan::Free).await?;
        for (email, role) in entry.users {
            db::users::insert(&mut *tx, email, &hash, *role, tenant.id).await?;
        }
        tx.commit().await?;

        tracing::info!(tenant = entry.slug, users = entry.users.len(), "seeded tenant");
        created += 1;
    }

    Ok(created)
}
