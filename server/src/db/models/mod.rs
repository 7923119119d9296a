//! Persistence models
//!
//! SurrealDB record types. Record ids serialize to `"table:id"` strings so
//! models can be returned straight from API handlers.

pub mod invoice;
pub mod order;
pub mod review;
pub mod serde_helpers;
pub mod tailor;

pub use invoice::{Counter, Invoice};
pub use order::Order;
pub use review::Review;
pub use tailor::{Tailor, TailorProfile};
