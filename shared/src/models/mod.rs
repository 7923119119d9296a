//! Data models
//!
//! Shared between the server and API clients. Record IDs travel as
//! `"table:id"` strings on the wire; the server maps them to SurrealDB
//! record ids at the repository boundary.

pub mod customer;
pub mod invoice;
pub mod order;
pub mod review;
pub mod tailor;

// Re-exports
pub use customer::*;
pub use invoice::*;
pub use order::*;
pub use review::*;
pub use tailor::*;
