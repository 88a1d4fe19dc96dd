use serde::{Deserialize, Serialize};
use setuphub_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `ratings` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Rating {
    pub id: Uuid,
    pub config_id: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for rating a configuration. A second rating by the same user
/// replaces the first.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRating {
    #[validate(length(min = 1))]
    pub config_id: String,
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
}

/// Per-configuration rating totals, as computed by the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RatingSummary {
    pub config_id: String,
    pub total_ratings: i64,
    pub score_sum: i64,
}
