use serde::{Deserialize, Serialize};
use setuphub_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A row from the `comments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub config_id: String,
    pub user_id: String,
    pub comment: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1))]
    pub config_id: String,
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1, max = 5000))]
    pub comment: String,
}
