use anyhow::Result;
use clap::{Parser, Subcommand};
use multinotes::{config, db, seed, Settings};
use notes_auth::PasswordHasher;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "multinotes", version, about = "Multi-tenant notes server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Insert the demo tenants and users
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_snapshot(config::from_env().snapshot())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let app = multinotes::build(&settings).await?;
            app.listen(settings.addr()).await?;
        }
        Command::Seed => {
            let pool = db::connect(&settings.database_url).await?;
            let hasher = PasswordHasher::new(settings.hash_cost);
            let created = seed::seed(&pool, &hasher).await?;
            tracing::info!(created, "seed finished");
        }
    }

    Ok(())
}
