use catalog_buddy::{api, config, errors::Result};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load application settings
    let settings = config::load_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!(
        "Policy: warn after {} days, expire after {} days",
        settings.policy.warn_after_days, settings.policy.expire_after_days
    );

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve the HTTP API
    api::serve(db, settings).await
}
