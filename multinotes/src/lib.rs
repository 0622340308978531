pub mod app;
pub mod config;
pub mod db;
pub mod pages;
pub mod seed;
pub mod services;

use anyhow::Result;
use notes_axum::AxumApp;

pub use config::Settings;

/// Open the database and assemble the HTTP application.
pub async fn build(settings: &Settings) -> Result<AxumApp> {
    let pool = db::connect(&settings.database_url).await?;
    app::notes_app(pool, settings)
}
