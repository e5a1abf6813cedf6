//! `ProducerStore` implementations.
//!
//! Provides concrete backends for the [`ProducerStore`](crate::traits::ProducerStore) trait:
//! [`PostgresProducerStore`] for production and [`MemoryProducerStore`]
//! for tests and database-less runs.

mod memory;
mod postgres;

pub use memory::MemoryProducerStore;
pub use postgres::PostgresProducerStore;
