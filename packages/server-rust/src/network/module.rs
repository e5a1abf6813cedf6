//! Network module with deferred startup lifecycle.
//!
//! `new()` wires shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves.
//! Binding before serving lets the caller learn the OS-assigned port.

use std::future::Future;
use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::{ApiConfig, NetworkConfig, TlsConfig};
use super::handlers::{
    create_producer, dashboard_handler, delete_producer, get_producer, health_handler,
    list_producers, liveness_handler, openapi_handler, readiness_handler, update_producer,
    AppState,
};
use super::middleware::{build_http_layers, track_in_flight};
use super::shutdown::ShutdownController;
use crate::traits::ProducerStore;

/// Assembles the axum router with all routes and middleware.
///
/// Routes:
/// - `GET /producers`, `POST /producers`
/// - `GET|PUT|DELETE /producers/{id}`
/// - `GET /dashboard`
/// - `GET /health`, `GET /health/live`, `GET /health/ready`
/// - `GET /api-docs/openapi.json`
pub fn build_router(state: AppState, config: &NetworkConfig) -> Router {
    let in_flight = from_fn_with_state(Arc::clone(&state.shutdown), track_in_flight);

    Router::new()
        .route("/producers", get(list_producers).post(create_producer))
        .route(
            "/producers/{id}",
            get(get_producer).put(update_producer).delete(delete_producer),
        )
        .route("/dashboard", get(dashboard_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(in_flight)
        .layer(build_http_layers(config))
        .with_state(state)
}

/// Manages the HTTP server lifecycle.
///
/// 1. `new()` -- builds `AppState` around the injected store
/// 2. `start()` -- binds the TCP listener
/// 3. `serve()` -- serves until shutdown, then drains and closes the store
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    state: AppState,
}

impl NetworkModule {
    /// Creates the module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, api: ApiConfig, store: Arc<dyn ProducerStore>) -> Self {
        Self {
            config,
            listener: None,
            state: AppState::new(store, api),
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    /// Builds the router for this module's state and configuration.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the bound port, which differs from the configured one when
    /// port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// requests and closes the store.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called, TLS material cannot be
    /// loaded, or the server hits a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener.take() else {
            anyhow::bail!("start() must be called before serve()");
        };
        let router = self.router();

        self.state.shutdown.set_ready();

        if let Some(tls) = &self.config.tls {
            serve_tls(listener, router, tls, shutdown).await?;
        } else {
            serve_plain(listener, router, shutdown).await?;
        }

        drain(&self.state, &self.config).await;
        Ok(())
    }
}

async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving plain HTTP connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Serves TLS connections using `axum-server` with rustls, reusing the
/// pre-bound listener.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls: &TlsConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!("Serving TLS connections on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

/// Moves to Draining, waits for in-flight requests, then closes the store.
async fn drain(state: &AppState, config: &NetworkConfig) {
    state.shutdown.trigger_shutdown();

    if state.shutdown.wait_for_drain(config.drain_timeout).await {
        info!("All requests drained");
    } else {
        warn!(
            in_flight = state.shutdown.in_flight_count(),
            "Drain timeout expired with requests still in flight"
        );
    }

    state.store.close().await;
    info!("Storage closed");
}
