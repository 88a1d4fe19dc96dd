//! Storage seam for engagement data.
//!
//! The aggregation engine reads through [`EngagementStore`] so it can run
//! against PostgreSQL in production and an in-memory store (`test-util`) in
//! tests. Writes live on a separate trait; the HTTP surface is read-only.

use async_trait::async_trait;
use validator::Validate;

use crate::error::StoreError;
use crate::models::comment::{Comment, NewComment};
use crate::models::like::Like;
use crate::models::rating::{NewRating, Rating, RatingSummary};
use crate::repositories::{CommentRepo, LikeRepo, RatingRepo};
use crate::DbPool;

/// Read access to ratings, comments, and likes, keyed by configuration id.
#[async_trait]
pub trait EngagementStore: Send + Sync + 'static {
    async fn count_likes(&self, config_id: &str) -> Result<i64, StoreError>;

    async fn list_likes(&self, config_id: &str) -> Result<Vec<Like>, StoreError>;

    async fn list_comments(&self, config_id: &str) -> Result<Vec<Comment>, StoreError>;

    async fn list_ratings(&self, config_id: &str) -> Result<Vec<Rating>, StoreError>;

    /// Totals for every configuration with at least `min_ratings` ratings,
    /// best average first, ties broken by more ratings.
    async fn rating_summaries(
        &self,
        min_ratings: i64,
        limit: Option<i64>,
    ) -> Result<Vec<RatingSummary>, StoreError>;

    /// Cheap reachability probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Outcome of [`EngagementWriter::upsert_rating`].
#[derive(Debug, Clone, PartialEq)]
pub enum RatingUpsert {
    Created(Rating),
    Updated(Rating),
}

impl RatingUpsert {
    pub fn rating(&self) -> &Rating {
        match self {
            RatingUpsert::Created(r) | RatingUpsert::Updated(r) => r,
        }
    }
}

/// Outcome of [`EngagementWriter::toggle_like`].
#[derive(Debug, Clone, PartialEq)]
pub enum LikeToggle {
    Added(Like),
    Removed,
}

/// Writes that keep the engagement invariants: one rating and one like per
/// (configuration, user) pair, scores within range, non-blank comments.
#[async_trait]
pub trait EngagementWriter: Send + Sync + 'static {
    async fn upsert_rating(&self, input: &NewRating) -> Result<RatingUpsert, StoreError>;

    async fn toggle_like(&self, config_id: &str, user_id: &str) -> Result<LikeToggle, StoreError>;

    async fn add_comment(&self, input: &NewComment) -> Result<Comment, StoreError>;
}

/// Shared input checks for every writer implementation.
pub(crate) fn validate_rating(input: &NewRating) -> Result<(), StoreError> {
    input.validate()?;
    Ok(())
}

pub(crate) fn validate_comment(input: &NewComment) -> Result<(), StoreError> {
    input.validate()?;
    if input.comment.trim().is_empty() {
        return Err(StoreError::Validation("comment must not be blank".into()));
    }
    Ok(())
}

pub(crate) fn validate_pair(config_id: &str, user_id: &str) -> Result<(), StoreError> {
    if config_id.is_empty() || user_id.is_empty() {
        return Err(StoreError::Validation(
            "config_id and user_id must not be empty".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`EngagementStore`] backed by the local PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PgEngagementStore {
    pool: DbPool,
}

impl PgEngagementStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl EngagementStore for PgEngagementStore {
    async fn count_likes(&self, config_id: &str) -> Result<i64, StoreError> {
        Ok(LikeRepo::count_by_config(&self.pool, config_id).await?)
    }

    async fn list_likes(&self, config_id: &str) -> Result<Vec<Like>, StoreError> {
        Ok(LikeRepo::list_by_config(&self.pool, config_id).await?)
    }

    async fn list_comments(&self, config_id: &str) -> Result<Vec<Comment>, StoreError> {
        Ok(CommentRepo::list_by_config(&self.pool, config_id).await?)
    }

    async fn list_ratings(&self, config_id: &str) -> Result<Vec<Rating>, StoreError> {
        Ok(RatingRepo::list_by_config(&self.pool, config_id).await?)
    }

    async fn rating_summaries(
        &self,
        min_ratings: i64,
        limit: Option<i64>,
    ) -> Result<Vec<RatingSummary>, StoreError> {
        Ok(RatingRepo::summaries(&self.pool, min_ratings, limit).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

#[async_trait]
impl EngagementWriter for PgEngagementStore {
    async fn upsert_rating(&self, input: &NewRating) -> Result<RatingUpsert, StoreError> {
        validate_rating(input)?;
        let row = RatingRepo::upsert(&self.pool, input).await?;
        tracing::debug!(
            config_id = %input.config_id,
            user_id = %input.user_id,
            inserted = row.inserted,
            "Rating stored",
        );
        Ok(if row.inserted {
            RatingUpsert::Created(row.rating)
        } else {
            RatingUpsert::Updated(row.rating)
        })
    }

    async fn toggle_like(&self, config_id: &str, user_id: &str) -> Result<LikeToggle, StoreError> {
        validate_pair(config_id, user_id)?;
        let outcome = match LikeRepo::toggle(&self.pool, config_id, user_id).await? {
            Some(like) => LikeToggle::Added(like),
            None => LikeToggle::Removed,
        };
        tracing::debug!(config_id, user_id, added = matches!(outcome, LikeToggle::Added(_)), "Like toggled");
        Ok(outcome)
    }

    async fn add_comment(&self, input: &NewComment) -> Result<Comment, StoreError> {
        validate_comment(input)?;
        Ok(CommentRepo::create(&self.pool, input).await?)
    }
}
