use engine::{DirectoryStore, DocumentStore, SqliteStore};
use migration::{Migrator, MigratorTrait};
use settings::Storage;
use std::sync::Arc;

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "registers={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let storage = settings.server.storage.unwrap_or_default();
    tracing::info!("Using {storage} storage");
    let store = match open_store(&storage).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!("failed to open {storage} storage: {err}");
            return Err(err);
        }
    };

    let engine = engine::Engine::builder().shared_store(store).build()?;

    tracing::info!("Starting server on {}", settings.server.addr);
    let listener = match tokio::net::TcpListener::bind(&settings.server.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return Err(err.into());
        }
    };
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn open_store(storage: &Storage) -> Result<Arc<dyn DocumentStore>, BoxError> {
    let url = match storage {
        Storage::Directory(path) => return Ok(Arc::new(DirectoryStore::open(path).await?)),
        Storage::Memory => String::from("sqlite::memory:"),
        Storage::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(Arc::new(SqliteStore::new(database)))
}
