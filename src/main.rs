use catering_ledger::{
    api::{self, AppState},
    auth::HostedAuth,
    config::{categories, database, settings::Settings},
    core::category::seed_categories,
    errors::Result,
    repository::SeaOrmLedger,
    storage::{LocalReceiptStore, ReceiptPolicy},
};
use dotenvy::dotenv;
use std::sync::Arc;
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
    info!("Attempted to load .env file.");

    // 3. Settings and category seed list
    let settings = Settings::from_env()
        .inspect_err(|e| error!("Failed to load server settings: {}", e))?;
    let config = categories::load_default_config()?;

    // 4. Data directories and database
    tokio::fs::create_dir_all(&settings.receipts_dir).await?;
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    seed_categories(&db, &config.category_names()).await?;
    info!("Database initialized successfully.");

    // 5. Receipt storage
    let store = Arc::new(LocalReceiptStore::new(
        &settings.receipts_dir,
        &settings.public_base_url,
    ));
    let policy = ReceiptPolicy {
        max_bytes: settings.receipt_max_bytes,
    };

    // 6. Serve
    let repo = Arc::new(SeaOrmLedger::new(db, store, policy));
    let auth = Arc::new(HostedAuth::new(
        &settings.auth_url,
        &settings.auth_anon_key,
    ));
    api::serve(&settings, AppState::new(repo, auth)).await
}
