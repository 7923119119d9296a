//! Order domain core
//!
//! - [`lifecycle`] - the status/payment state machine (pure transitions)
//! - [`money`] - decimal-precise monetary arithmetic and checks
//! - [`notify`] - customer-facing message composition (no I/O)

pub mod lifecycle;
pub mod money;
pub mod notify;

pub use lifecycle::{OrderEvent, OrderPatch, PaymentTerms, TransitionError};
