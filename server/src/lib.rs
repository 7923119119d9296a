//! KStitch Server - tailoring shop backend
//!
//! Order lifecycle tracking for tailor shops: garment orders move from
//! creation through cutting, completion, payment and delivery, with
//! invoicing, partial payments, customer rollups and review-driven ratings.
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # configuration, shared state, HTTP server loop
//! ├── auth/          # JWT + Argon2 authentication
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order domain core: lifecycle, money, messages
//! ├── db/            # embedded SurrealDB storage and repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __ __ _____ __  _ __       __
   / //_// ___// /_(_) /______/ /_
  / ,<   \__ \/ __/ / __/ ___/ __ \
 / /| | ___/ / /_/ / /_/ /__/ / / /
/_/ |_|/____/\__/_/\__/\___/_/ /_/
    "#
    );
}

/// Load `.env`, make sure the work directory exists and start the logger.
pub fn setup_environment() -> Result<(), AppError> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/kstitch".into());
    std::fs::create_dir_all(&work_dir)
        .map_err(|e| AppError::internal(format!("Failed to create work dir {work_dir}: {e}")))?;

    let log_dir = format!("{work_dir}/logs");
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| AppError::internal(format!("Failed to create log dir {log_dir}: {e}")))?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    init_logger_with_file(Some(&log_level), Some(&log_dir));

    Ok(())
}
