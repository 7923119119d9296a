use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    CounterRepository, InvoiceRepository, OrderRepository, ReviewRepository, TailorRepository,
};
use crate::utils::AppError;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt: Arc<JwtService>,
    pub orders: OrderRepository,
    pub invoices: InvoiceRepository,
    pub reviews: ReviewRepository,
    pub tailors: TailorRepository,
    pub counters: CounterRepository,
}

impl ServerState {
    /// Open the on-disk database under `config.work_dir` and wire up the
    /// repositories.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_path = PathBuf::from(&config.work_dir).join("kstitch.db");
        let service = DbService::new(&db_path.to_string_lossy()).await?;
        Ok(Self::from_db(config.clone(), service.db))
    }

    /// In-memory state for integration tests.
    pub async fn initialize_in_memory(config: Config) -> Result<Self, AppError> {
        let service = DbService::new_in_memory().await?;
        Ok(Self::from_db(config, service.db))
    }

    fn from_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            orders: OrderRepository::new(db.clone()),
            invoices: InvoiceRepository::new(db.clone()),
            reviews: ReviewRepository::new(db.clone()),
            tailors: TailorRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            config,
            db,
            jwt,
        }
    }
}
