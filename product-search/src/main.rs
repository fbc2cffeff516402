//! Product search API service entry point.

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use product_search::{Dependencies, ServiceError};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let deps = Dependencies::init().await?;
    let app = product_search_api::router(deps.state);

    let listener = tokio::net::TcpListener::bind(&deps.bind_addr).await?;
    info!(addr = %deps.bind_addr, "Product search API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received shutdown signal");
}
