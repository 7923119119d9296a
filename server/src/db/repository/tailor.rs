//! Tailor Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::util::now_millis;

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Tailor;

const TABLE: &str = "tailor";

#[derive(Clone)]
pub struct TailorRepository {
    base: BaseRepository,
}

/// Fields for a new account; the password is already hashed by the caller.
pub struct NewTailor {
    pub shop_name: String,
    pub owner_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl TailorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an account; a duplicate email hits the unique index and
    /// surfaces as [`RepoError::Duplicate`].
    pub async fn create(&self, data: NewTailor) -> RepoResult<Tailor> {
        let now = now_millis();
        let tailor = Tailor {
            id: None,
            shop_name: data.shop_name,
            owner_name: data.owner_name,
            email: data.email.to_lowercase(),
            password_hash: data.password_hash,
            phone: data.phone,
            address: data.address,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        };
        let created: Option<Tailor> = self.base.db().create(TABLE).content(tailor).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create tailor".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Tailor>> {
        let record = parse_id(TABLE, id)?;
        let tailor: Option<Tailor> = self.base.db().select(record).await?;
        Ok(tailor)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Tailor>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT * FROM {TABLE} WHERE email = $email"))
            .bind(("email", email.to_lowercase()))
            .await?;
        let tailors: Vec<Tailor> = result.take(0)?;
        Ok(tailors.into_iter().next())
    }
}
