//! Shared types for the KStitch marketplace backend
//!
//! Domain enums, request/response payloads and small utilities used by the
//! server crate and by API clients.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
