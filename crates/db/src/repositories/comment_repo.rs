//! Repository for the `comments` table.

use sqlx::PgPool;

use crate::models::comment::{Comment, NewComment};

const COLUMNS: &str = "id, config_id, user_id, comment, created_at";

/// Provides data access for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// All comments of one configuration, in posting order.
    pub async fn list_by_config(pool: &PgPool, config_id: &str) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE config_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(config_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &NewComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (config_id, user_id, comment)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.config_id)
            .bind(&input.user_id)
            .bind(input.comment.trim())
            .fetch_one(pool)
            .await
    }
}
