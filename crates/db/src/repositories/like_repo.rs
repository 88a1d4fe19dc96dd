//! Repository for the `likes` table.

use sqlx::PgPool;

use crate::models::like::Like;

const COLUMNS: &str = "id, config_id, user_id, created_at";

/// Provides data access for likes.
pub struct LikeRepo;

impl LikeRepo {
    pub async fn count_by_config(pool: &PgPool, config_id: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE config_id = $1")
            .bind(config_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// All likes of one configuration, oldest first.
    pub async fn list_by_config(pool: &PgPool, config_id: &str) -> Result<Vec<Like>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM likes WHERE config_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Like>(&query)
            .bind(config_id)
            .fetch_all(pool)
            .await
    }

    /// Remove the user's like if present, otherwise add one.
    ///
    /// Returns the new like, or `None` when an existing like was removed.
    pub async fn toggle(
        pool: &PgPool,
        config_id: &str,
        user_id: &str,
    ) -> Result<Option<Like>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM likes WHERE config_id = $1 AND user_id = $2")
            .bind(config_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            tx.commit().await?;
            return Ok(None);
        }

        // A concurrent toggle may have inserted in between; keep its row.
        let query = format!(
            "INSERT INTO likes (config_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_likes_config_user DO UPDATE
                SET created_at = likes.created_at
             RETURNING {COLUMNS}"
        );
        let like = sqlx::query_as::<_, Like>(&query)
            .bind(config_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(like))
    }
}
