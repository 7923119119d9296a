//! Review Repository
//!
//! One review per (tailor, customer) pair. Every mutation recomputes the
//! tailor's rating rollup in the same call so the stored mean never drifts
//! from the review rows.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use shared::models::{ReviewCreate, ReviewUpdate};
use shared::util::now_millis;

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Review;

const TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a review; duplicates for the same (tailor, customer) pair are
    /// rejected by the unique index and surface as [`RepoError::Duplicate`].
    pub async fn create(&self, data: ReviewCreate) -> RepoResult<Review> {
        let tailor = parse_id("tailor", &data.tailor_id)?;
        let now = now_millis();
        let review = Review {
            id: None,
            tailor: tailor.clone(),
            customer: data.customer_id,
            rating: data.rating,
            comment: data.comment,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))?;
        self.recompute_tailor_rating(&tailor).await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let record = parse_id(TABLE, id)?;
        let review: Option<Review> = self.base.db().select(record).await?;
        Ok(review)
    }

    pub async fn update(&self, id: &str, data: ReviewUpdate) -> RepoResult<Review> {
        let record = parse_id(TABLE, id)?;
        let existing: Option<Review> = self.base.db().select(record.clone()).await?;
        let mut review =
            existing.ok_or_else(|| RepoError::NotFound(format!("Review {id} not found")))?;

        if let Some(rating) = data.rating {
            review.rating = rating;
        }
        if let Some(comment) = data.comment {
            review.comment = comment;
        }
        review.updated_at = now_millis();
        let tailor = review.tailor.clone();

        let updated: Option<Review> = self.base.db().update(record).content(review).await?;
        let updated =
            updated.ok_or_else(|| RepoError::NotFound(format!("Review {id} not found")))?;
        self.recompute_tailor_rating(&tailor).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = parse_id(TABLE, id)?;
        let deleted: Option<Review> = self.base.db().delete(record).await?;
        match deleted {
            Some(review) => {
                self.recompute_tailor_rating(&review.tailor).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Reviews for a tailor, newest first.
    pub async fn list_for_tailor(&self, tailor: RecordId) -> RepoResult<Vec<Review>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {TABLE} WHERE tailor = $tailor ORDER BY created_at DESC"
            ))
            // Record links in this schema are stored in string form
            .bind(("tailor", tailor.to_string()))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews)
    }

    /// Store the arithmetic mean of the tailor's review ratings on the
    /// tailor row, 0.0 when no reviews remain.
    async fn recompute_tailor_rating(&self, tailor: &RecordId) -> RepoResult<()> {
        #[derive(Deserialize)]
        struct MeanRow {
            rating: Option<f64>,
        }

        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT math::mean(rating) AS rating FROM {TABLE} WHERE tailor = $tailor GROUP ALL"
            ))
            .bind(("tailor", tailor.to_string()))
            .await?;
        let rows: Vec<MeanRow> = result.take(0)?;
        let mean = rows
            .into_iter()
            .next()
            .and_then(|r| r.rating)
            .unwrap_or(0.0);

        self.base
            .db()
            .query("UPDATE $thing SET rating = $rating, updated_at = $now")
            .bind(("thing", tailor.clone()))
            .bind(("rating", mean))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }
}
