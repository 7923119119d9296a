//! Database Module
//!
//! Embedded SurrealDB: connection setup, namespace selection and schema
//! (index) definition.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::utils::AppError;

const NAMESPACE: &str = "kstitch";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<surrealdb::engine::local::RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::init(db).await?;
        tracing::info!("Database ready at {db_path}");
        Ok(service)
    }

    /// In-memory database, used by integration tests.
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Define tables and the indexes the business rules rely on:
/// unique tailor emails, one invoice per order, one review per
/// (tailor, customer) pair.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS tailor SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_tailor_email ON TABLE tailor COLUMNS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_orders_tailor ON TABLE orders COLUMNS tailor;

        DEFINE TABLE IF NOT EXISTS invoice SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_invoice_order ON TABLE invoice COLUMNS order_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS uniq_invoice_number ON TABLE invoice COLUMNS number UNIQUE;

        DEFINE TABLE IF NOT EXISTS review SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS uniq_review_pair ON TABLE review COLUMNS tailor, customer UNIQUE;

        DEFINE TABLE IF NOT EXISTS counter SCHEMALESS;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
