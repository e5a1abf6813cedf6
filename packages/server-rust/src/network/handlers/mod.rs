//! HTTP handler definitions for the Agro server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for building the router.

pub mod dashboard;
pub mod health;
pub mod openapi;
pub mod producers;

pub use dashboard::dashboard_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use openapi::{openapi_handler, ApiDoc};
pub use producers::{
    create_producer, delete_producer, get_producer, list_producers, update_producer,
};

use std::sync::Arc;
use std::time::Instant;

use super::{ApiConfig, ShutdownController};
use crate::traits::ProducerStore;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references so cloning per request is cheap. The store
/// handle is injected at construction; handlers never open connections
/// themselves.
#[derive(Clone)]
pub struct AppState {
    /// Producer persistence backend.
    pub store: Arc<dyn ProducerStore>,
    /// Health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Request-handling rules.
    pub api: Arc<ApiConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ProducerStore>, api: ApiConfig) -> Self {
        Self {
            store,
            shutdown: Arc::new(ShutdownController::new()),
            api: Arc::new(api),
            start_time: Instant::now(),
        }
    }
}
