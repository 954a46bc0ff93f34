use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use careers::catalog::Catalog;
use careers::config::Config;
use careers::routes::build_router;
use careers::state::AppState;
use careers::store::{self, CareerStore, OfflineStore};
use careers::{init_tracing, LogTarget};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing backend is not fatal; a malformed config is.
    let config = Config::from_env()?;

    init_tracing(&config.rust_log, LogTarget::Stdout);

    info!("Starting careers-web v{}", env!("CARGO_PKG_VERSION"));
    info!("Data backend: {}", config.backend.label());

    let store: Arc<dyn CareerStore> = match store::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            warn!("Failed to initialize data backend, continuing in demo mode: {e:#}");
            Arc::new(OfflineStore)
        }
    };
    let backend_status = store::probe(store.as_ref()).await;

    let state = AppState::new(store, Catalog::builtin(), backend_status, config.clone());

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
