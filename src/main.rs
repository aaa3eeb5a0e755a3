use rollcall::api::{self, app_state::AppState};
use rollcall::config::loader::ConfigLoader;
use rollcall::observability::init_tracing;
use rollcall::services::create_student_service;
use rollcall::storage::StorageFactory;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;

    init_tracing(&config.logging)?;
    info!("Starting {} ({})...", config.app_name, config.environment);

    let store = StorageFactory::create(&config).await?;
    info!("Document store initialized: {:?}", config.storage.backend);

    let student_service = create_student_service(store.clone(), config.storage.patch_policy);
    info!(
        "Student service initialized (patch policy: {:?})",
        config.storage.patch_policy
    );

    let app_state = AppState::new(store, student_service, env!("CARGO_PKG_VERSION"));
    let router = api::create_router(app_state, &config)?;
    info!("API router initialized");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
