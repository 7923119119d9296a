//! Application result alias

use crate::utils::AppError;

/// Result type used by API handlers
pub type AppResult<T> = Result<T, AppError>;
