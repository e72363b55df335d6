pub mod api;
pub mod config;

// std
use std::sync::Arc;
use std::time::Duration;
// crates
use color_eyre::eyre::{eyre, Result};
use da_core::{Store, StoreError};
use da_kzgrs_backend::{load_global_parameters, DaVerifier, VerifierError};
use da_network_client::backend::http::HttpNetworkBackend;
use da_store::{MemStore, NetworkStore};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
// internal
pub use config::{Config, HttpArgs, HttpSettings, LogArgs, StoreSettings};

/// Upper bound on how long expired memstore entries linger before being pruned.
const MAX_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

fn setup_unavailable(error: VerifierError) -> StoreError {
    StoreError::SetupUnavailable(error.to_string())
}

/// Builds the configured store. The memstore pruner, if any, stops when `shutdown` fires.
pub fn load_store(
    settings: &StoreSettings,
    shutdown: &CancellationToken,
) -> Result<Arc<dyn Store>, StoreError> {
    match settings {
        StoreSettings::Memory(settings) => {
            info!("Using memstore backend");
            let store = Arc::new(MemStore::new(settings.clone()));
            if let Some(expiration) = settings.expiration {
                let interval = expiration.min(MAX_PRUNE_INTERVAL).max(Duration::from_millis(1));
                Arc::clone(&store).spawn_pruner(interval, shutdown.clone());
            }
            Ok(store)
        }
        StoreSettings::Network(settings) => {
            info!("Using network backend");
            let global_parameters =
                load_global_parameters(&settings.setup).map_err(setup_unavailable)?;
            let verifier = DaVerifier::new(global_parameters).map_err(setup_unavailable)?;
            let max_blob_size = settings.max_blob_size.min(verifier.max_blob_size());
            let backend = HttpNetworkBackend::new(settings.disperser.clone(), max_blob_size)
                .map_err(|e| StoreError::Network(e.to_string()))?;
            let store = NetworkStore::new(backend, verifier, settings.store_settings());
            info!(max_blob_size = store.max_blob_size(), "Network store ready");
            Ok(Arc::new(store))
        }
    }
}

/// Serves the proxy until ctrl-c.
pub async fn run(config: Config) -> Result<()> {
    let shutdown = CancellationToken::new();
    let store =
        load_store(&config.store, &shutdown).map_err(|e| eyre!("Failed to load store: {e}"))?;

    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutting down");
                signal.cancel();
            }
            Err(e) => error!("Unable to listen for shutdown signal: {e}"),
        }
    });

    api::serve(&config.http, store, shutdown).await?;
    Ok(())
}
