use qr_hosting_server::{
    config::Config,
    database::Database,
    expiry,
    handlers::{AppState, SettingsStore},
    storage::{self, StorageGateway},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qr_hosting_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;
    tracing::info!("Connected to database");

    let object_storage = storage::create_storage(&config)?;
    let gateway = StorageGateway::from_config(object_storage, &config);

    let state = AppState {
        database: database.clone(),
        gateway,
        settings: SettingsStore::default(),
        config: config.clone(),
    };

    // Server-side expiry enforcement: expired rows are swept every minute
    // whether or not any client is connected.
    tokio::spawn(expiry::run_sweeper(database));

    let app = qr_hosting_server::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
