use std::sync::Arc;

use notes_auth::PasswordHasher;
use sqlx::SqlitePool;

use crate::config::Settings;

pub mod auth;
pub mod notes;
pub mod tenants;

pub struct NotesServices {
    pub auth: Arc<auth::AuthService>,
    pub notes: Arc<notes::NotesService>,
    pub tenants: Arc<tenants::TenantsService>,
}

pub fn configure(pool: &SqlitePool, settings: &Settings) -> NotesServices {
    let hasher = PasswordHasher::new(settings.hash_cost);

    NotesServices {
        auth: Arc::new(auth::AuthService::new(pool.clone(), hasher)),
        notes: Arc::new(notes::NotesService::new(pool.clone(), settings.free_plan_limit)),
        tenants: Arc::new(tenants::TenantsService::new(
            pool.clone(),
            hasher,
            settings.invite_password.clone(),
        )),
    }
}
