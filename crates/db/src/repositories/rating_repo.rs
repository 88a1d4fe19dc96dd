//! Repository for the `ratings` table.

use sqlx::{FromRow, PgPool};

use crate::models::rating::{NewRating, Rating, RatingSummary};

/// Column list for `ratings` queries.
const COLUMNS: &str = "id, config_id, user_id, rating, comment, created_at, updated_at";

/// A rating returned by an upsert, with whether the row was newly created.
#[derive(Debug, FromRow)]
pub struct UpsertedRating {
    #[sqlx(flatten)]
    pub rating: Rating,
    pub inserted: bool,
}

/// Provides data access for ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// All ratings of one configuration, oldest first.
    pub async fn list_by_config(pool: &PgPool, config_id: &str) -> Result<Vec<Rating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ratings WHERE config_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(config_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a rating, or replace the score and comment of the user's
    /// existing rating of the same configuration.
    pub async fn upsert(pool: &PgPool, input: &NewRating) -> Result<UpsertedRating, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (config_id, user_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_ratings_config_user DO UPDATE
                SET rating = EXCLUDED.rating,
                    comment = EXCLUDED.comment,
                    updated_at = now()
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        sqlx::query_as::<_, UpsertedRating>(&query)
            .bind(&input.config_id)
            .bind(&input.user_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Rating totals per configuration with at least `min_ratings` ratings,
    /// best average first, then most ratings. `limit = None` returns all.
    pub async fn summaries(
        pool: &PgPool,
        min_ratings: i64,
        limit: Option<i64>,
    ) -> Result<Vec<RatingSummary>, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT config_id,
                    COUNT(*) AS total_ratings,
                    SUM(rating)::BIGINT AS score_sum
             FROM ratings
             GROUP BY config_id
             HAVING COUNT(*) >= $1
             ORDER BY SUM(rating)::FLOAT8 / COUNT(*) DESC, COUNT(*) DESC, config_id ASC
             LIMIT $2",
        )
        .bind(min_ratings)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
