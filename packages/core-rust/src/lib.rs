//! Agro Core — producer records, dashboard stats, and request validation.

pub mod schema;
pub mod types;

pub use schema::{validate_area_invariant, validate_producer, FieldError, ValidationErrors};
pub use types::{DashboardStats, NewProducer, Producer};
