use std::sync::Arc;

use taxi::config::{AppConfig, StorageBackend};
use taxi::db::init_pool;
use taxi::error::AppError;
use taxi::routes::create_router;
use taxi::services::{
    ids::UuidIds, kv::SqliteSlots, memory::MemorySlots, storage::JsonFileSlots, Ledger, SlotStore,
};
use taxi::state::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let slots = open_slots(&config).await?;

    let (ledger, warnings) = Ledger::open(slots, Arc::new(UuidIds)).await;
    for warning in &warnings {
        warn!("starting with defaults for {warning}");
    }

    let state = AppState::new(ledger);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn open_slots(config: &AppConfig) -> Result<Arc<dyn SlotStore>, AppError> {
    let slots: Arc<dyn SlotStore> = match config.storage {
        StorageBackend::Json => {
            let files = JsonFileSlots::new(config.data_root.clone());
            files.ensure_structure().await?;
            info!("storing data under {}", files.root().display());
            Arc::new(files)
        }
        StorageBackend::Sqlite => {
            let db = init_pool(&config.database_url).await?;
            info!("storing data in {}", config.database_url);
            Arc::new(SqliteSlots::new(db))
        }
        StorageBackend::Memory => {
            warn!("memory storage selected, nothing survives a restart");
            Arc::new(MemorySlots::new())
        }
    };
    Ok(slots)
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,taxi=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
