use async_trait::async_trait;
use agro_core::{DashboardStats, NewProducer, Producer};

/// Failure of a storage backend call.
///
/// Handlers do not distinguish between variants: every `StoreError` is
/// logged and surfaced as HTTP 500.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Any error reported by the database driver (connectivity, SQL,
    /// constraint violation, type mismatch).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// The backend is not accepting requests.
    #[error("storage backend unavailable")]
    Unavailable,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence backend for producer records.
/// Implementations: `PostgreSQL`, memory (tests, local runs).
///
/// Every method maps to exactly one statement against the backend. There
/// is no retry; callers see the first failure.
#[async_trait]
pub trait ProducerStore: Send + Sync {
    /// Load every producer. No ordering guarantee.
    async fn list_all(&self) -> StoreResult<Vec<Producer>>;

    /// Load a single producer by id.
    async fn find(&self, id: i32) -> StoreResult<Option<Producer>>;

    /// Insert a producer and return it with its generated id.
    async fn create(&self, producer: &NewProducer) -> StoreResult<Producer>;

    /// Replace every mutable field of the row with the given id.
    /// Returns `None` when no row matched; no row is created.
    async fn update(&self, id: i32, producer: &NewProducer) -> StoreResult<Option<Producer>>;

    /// Remove the row with the given id and return it.
    /// Returns `None` when no row matched.
    async fn delete(&self, id: i32) -> StoreResult<Option<Producer>>;

    /// Count rows and sum `total_area` across all rows.
    async fn aggregate(&self) -> StoreResult<DashboardStats>;

    /// Create the backing table if it does not exist.
    async fn initialize(&self) -> StoreResult<()>;

    /// Round-trip to the backend to confirm it is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Release resources and close connections.
    async fn close(&self);
}
