use serde::Serialize;
use setuphub_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `likes` table. At most one per (config, user).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Like {
    pub id: Uuid,
    pub config_id: String,
    pub user_id: String,
    pub created_at: Timestamp,
}
