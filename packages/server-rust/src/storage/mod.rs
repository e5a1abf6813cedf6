//! Producer storage for the Agro server.
//!
//! The [`ProducerStore`](crate::traits::ProducerStore) trait is the seam
//! between HTTP handlers and persistence. This module holds the connection
//! configuration and the concrete backends in [`datastores`].

pub mod config;
pub mod datastores;

pub use config::DatabaseConfig;
pub use datastores::{MemoryProducerStore, PostgresProducerStore};
