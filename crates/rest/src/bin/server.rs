//! The gelato REST API server binary.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use gelato_rest::{ServerConfig, create_app_with_config, init_logging};
use gelato_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    let store = Arc::new(MemoryStore::new());
    let address = config.bind_address();
    let app = create_app_with_config(store, config);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "gelato server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
