//! In-memory [`EngagementStore`] for tests.
//!
//! Keeps rows in insertion order and can be told to fail, either entirely
//! or for selected configuration ids.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::comment::{Comment, NewComment};
use crate::models::like::Like;
use crate::models::rating::{NewRating, Rating, RatingSummary};
use crate::store::{
    validate_comment, validate_pair, validate_rating, EngagementStore, EngagementWriter,
    LikeToggle, RatingUpsert,
};

#[derive(Debug, Default)]
struct FakeState {
    ratings: Vec<Rating>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    unavailable: bool,
    failing_configs: HashSet<String>,
}

/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct FakeEngagementStore {
    state: Arc<RwLock<FakeState>>,
}

impl FakeEngagementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().expect("fake store lock").unavailable = unavailable;
    }

    /// Make reads for one configuration fail.
    pub fn fail_config(&self, config_id: &str) {
        self.state
            .write()
            .expect("fake store lock")
            .failing_configs
            .insert(config_id.to_string());
    }

    /// Insert a rating row directly, bypassing upsert semantics.
    pub fn seed_rating(&self, config_id: &str, user_id: &str, rating: i32) -> Rating {
        let now = Utc::now();
        let row = Rating {
            id: Uuid::now_v7(),
            config_id: config_id.to_string(),
            user_id: user_id.to_string(),
            rating,
            comment: None,
            created_at: now,
            updated_at: now,
        };
        self.state.write().expect("fake store lock").ratings.push(row.clone());
        row
    }

    pub fn seed_comment(&self, config_id: &str, user_id: &str, comment: &str) -> Comment {
        let row = Comment {
            id: Uuid::now_v7(),
            config_id: config_id.to_string(),
            user_id: user_id.to_string(),
            comment: comment.to_string(),
            created_at: Utc::now(),
        };
        self.state.write().expect("fake store lock").comments.push(row.clone());
        row
    }

    pub fn seed_like(&self, config_id: &str, user_id: &str) -> Like {
        let row = Like {
            id: Uuid::now_v7(),
            config_id: config_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        self.state.write().expect("fake store lock").likes.push(row.clone());
        row
    }

    fn check(&self, config_id: Option<&str>) -> Result<(), StoreError> {
        let state = self.state.read().expect("fake store lock");
        if state.unavailable {
            return Err(StoreError::Unavailable("fake store offline".into()));
        }
        if let Some(id) = config_id {
            if state.failing_configs.contains(id) {
                return Err(StoreError::Unavailable(format!("fake failure for {id}")));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EngagementStore for FakeEngagementStore {
    async fn count_likes(&self, config_id: &str) -> Result<i64, StoreError> {
        self.check(Some(config_id))?;
        let state = self.state.read().expect("fake store lock");
        Ok(state.likes.iter().filter(|l| l.config_id == config_id).count() as i64)
    }

    async fn list_likes(&self, config_id: &str) -> Result<Vec<Like>, StoreError> {
        self.check(Some(config_id))?;
        let state = self.state.read().expect("fake store lock");
        Ok(state.likes.iter().filter(|l| l.config_id == config_id).cloned().collect())
    }

    async fn list_comments(&self, config_id: &str) -> Result<Vec<Comment>, StoreError> {
        self.check(Some(config_id))?;
        let state = self.state.read().expect("fake store lock");
        Ok(state.comments.iter().filter(|c| c.config_id == config_id).cloned().collect())
    }

    async fn list_ratings(&self, config_id: &str) -> Result<Vec<Rating>, StoreError> {
        self.check(Some(config_id))?;
        let state = self.state.read().expect("fake store lock");
        Ok(state.ratings.iter().filter(|r| r.config_id == config_id).cloned().collect())
    }

    async fn rating_summaries(
        &self,
        min_ratings: i64,
        limit: Option<i64>,
    ) -> Result<Vec<RatingSummary>, StoreError> {
        self.check(None)?;
        let state = self.state.read().expect("fake store lock");

        let mut summaries: Vec<RatingSummary> = Vec::new();
        for rating in &state.ratings {
            match summaries.iter_mut().find(|s| s.config_id == rating.config_id) {
                Some(summary) => {
                    summary.total_ratings += 1;
                    summary.score_sum += i64::from(rating.rating);
                }
                None => summaries.push(RatingSummary {
                    config_id: rating.config_id.clone(),
                    total_ratings: 1,
                    score_sum: i64::from(rating.rating),
                }),
            }
        }

        summaries.retain(|s| s.total_ratings >= min_ratings);
        summaries.sort_by(|a, b| {
            let avg_a = a.score_sum as f64 / a.total_ratings as f64;
            let avg_b = b.score_sum as f64 / b.total_ratings as f64;
            avg_b
                .total_cmp(&avg_a)
                .then(b.total_ratings.cmp(&a.total_ratings))
                .then_with(|| a.config_id.cmp(&b.config_id))
        });
        if let Some(limit) = limit {
            summaries.truncate(limit.max(0) as usize);
        }
        Ok(summaries)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check(None)
    }
}

#[async_trait]
impl EngagementWriter for FakeEngagementStore {
    async fn upsert_rating(&self, input: &NewRating) -> Result<RatingUpsert, StoreError> {
        validate_rating(input)?;
        self.check(Some(&input.config_id))?;
        let mut state = self.state.write().expect("fake store lock");

        let existing = state
            .ratings
            .iter_mut()
            .find(|r| r.config_id == input.config_id && r.user_id == input.user_id);
        if let Some(row) = existing {
            row.rating = input.rating;
            row.comment = input.comment.clone();
            row.updated_at = Utc::now();
            return Ok(RatingUpsert::Updated(row.clone()));
        }

        let now = Utc::now();
        let row = Rating {
            id: Uuid::now_v7(),
            config_id: input.config_id.clone(),
            user_id: input.user_id.clone(),
            rating: input.rating,
            comment: input.comment.clone(),
            created_at: now,
            updated_at: now,
        };
        state.ratings.push(row.clone());
        Ok(RatingUpsert::Created(row))
    }

    async fn toggle_like(&self, config_id: &str, user_id: &str) -> Result<LikeToggle, StoreError> {
        validate_pair(config_id, user_id)?;
        self.check(Some(config_id))?;
        let mut state = self.state.write().expect("fake store lock");

        let before = state.likes.len();
        state.likes.retain(|l| !(l.config_id == config_id && l.user_id == user_id));
        if state.likes.len() < before {
            return Ok(LikeToggle::Removed);
        }

        let like = Like {
            id: Uuid::now_v7(),
            config_id: config_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        state.likes.push(like.clone());
        Ok(LikeToggle::Added(like))
    }

    async fn add_comment(&self, input: &NewComment) -> Result<Comment, StoreError> {
        validate_comment(input)?;
        self.check(Some(&input.config_id))?;
        let comment = Comment {
            id: Uuid::now_v7(),
            config_id: input.config_id.clone(),
            user_id: input.user_id.clone(),
            comment: input.comment.trim().to_string(),
            created_at: Utc::now(),
        };
        self.state.write().expect("fake store lock").comments.push(comment.clone());
        Ok(comment)
    }
}
