//! Utility module - common helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error handling
//! - [`AppResponse`] - API response structure
//! - logger and validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, FieldErrors};
pub use error::{ok, ok_with_message};
pub use result::AppResult;
