//! Repository tests against a real database.
//!
//! Run with a reachable PostgreSQL in `DATABASE_URL` and `--ignored`.

use assert_matches::assert_matches;
use setuphub_db::models::comment::NewComment;
use setuphub_db::models::rating::NewRating;
use setuphub_db::repositories::{CommentRepo, LikeRepo, RatingRepo};
use setuphub_db::{EngagementStore, EngagementWriter, PgEngagementStore, RatingUpsert, StoreError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_rating(config_id: &str, user_id: &str, rating: i32) -> NewRating {
    NewRating {
        config_id: config_id.to_string(),
        user_id: user_id.to_string(),
        rating,
        comment: None,
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn upsert_keeps_one_rating_per_user(pool: PgPool) {
    let first = RatingRepo::upsert(&pool, &new_rating("cfg", "u1", 2)).await.unwrap();
    assert!(first.inserted);

    let second = RatingRepo::upsert(&pool, &new_rating("cfg", "u1", 4)).await.unwrap();
    assert!(!second.inserted);
    assert_eq!(second.rating.id, first.rating.id);
    assert_eq!(second.rating.rating, 4);

    let rows = RatingRepo::list_by_config(&pool, "cfg").await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn check_constraint_rejects_out_of_range_scores(pool: PgPool) {
    let err = RatingRepo::upsert(&pool, &new_rating("cfg", "u1", 9)).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(_));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn store_validates_before_writing(pool: PgPool) {
    let store = PgEngagementStore::new(pool);
    let err = store.upsert_rating(&new_rating("cfg", "u1", 0)).await.unwrap_err();
    assert_matches!(err, StoreError::Validation(_));

    let created = store.upsert_rating(&new_rating("cfg", "u1", 5)).await.unwrap();
    assert_matches!(created, RatingUpsert::Created(_));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn summaries_filter_and_rank(pool: PgPool) {
    for (cfg, scores) in [("a", [5, 4, 4]), ("b", [5, 5, 4]), ("c", [1, 2, 3])] {
        for (i, score) in scores.into_iter().enumerate() {
            RatingRepo::upsert(&pool, &new_rating(cfg, &format!("u{i}"), score))
                .await
                .unwrap();
        }
    }
    RatingRepo::upsert(&pool, &new_rating("d", "u0", 5)).await.unwrap();

    let ranked = RatingRepo::summaries(&pool, 3, None).await.unwrap();
    let ids: Vec<&str> = ranked.iter().map(|s| s.config_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(ranked[0].score_sum, 14);
    assert_eq!(ranked[0].total_ratings, 3);

    let limited = RatingRepo::summaries(&pool, 1, Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].config_id, "d");
}

// ---------------------------------------------------------------------------
// Likes and comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn toggle_like_twice_restores_count(pool: PgPool) {
    assert!(LikeRepo::toggle(&pool, "cfg", "u1").await.unwrap().is_some());
    assert_eq!(LikeRepo::count_by_config(&pool, "cfg").await.unwrap(), 1);

    assert!(LikeRepo::toggle(&pool, "cfg", "u1").await.unwrap().is_none());
    assert_eq!(LikeRepo::count_by_config(&pool, "cfg").await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn comments_list_in_posting_order(pool: PgPool) {
    for text in ["first", "second"] {
        let input = NewComment {
            config_id: "cfg".into(),
            user_id: "u1".into(),
            comment: text.into(),
        };
        CommentRepo::create(&pool, &input).await.unwrap();
    }

    let store = PgEngagementStore::new(pool);
    let comments = store.list_comments("cfg").await.unwrap();
    let texts: Vec<&str> = comments.iter().map(|c| c.comment.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert!(store.list_comments("other").await.unwrap().is_empty());
}
