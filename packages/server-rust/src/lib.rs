//! Agro Server — HTTP API for agricultural producers backed by `PostgreSQL`.

pub mod cli;
pub mod logging;
pub mod network;
pub mod storage;
pub mod traits;

pub use traits::{ProducerStore, StoreError, StoreResult};
