//! Agro server binary.
//!
//! Reads configuration from flags/environment (see `agro-server --help`),
//! connects the selected store, and serves until Ctrl-C or SIGTERM.

use std::sync::Arc;

use agro_server::cli::{ServerArgs, StorageBackend};
use agro_server::logging::init_tracing;
use agro_server::network::NetworkModule;
use agro_server::storage::{MemoryProducerStore, PostgresProducerStore};
use agro_server::ProducerStore;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.log_format)?;

    let db_config = args.database_config();
    let store: Arc<dyn ProducerStore> = match args.storage {
        StorageBackend::Postgres => {
            info!(config = ?db_config, "connecting to PostgreSQL");
            Arc::new(PostgresProducerStore::connect(&db_config).await?)
        }
        StorageBackend::Memory => {
            info!("using in-memory storage");
            Arc::new(MemoryProducerStore::new())
        }
    };

    if db_config.init_schema {
        store.initialize().await?;
    }

    let mut network = NetworkModule::new(args.network_config(), args.api_config(), store);
    let port = network.start().await?;
    info!(port, "agro server listening");

    network.serve(shutdown_signal()).await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
