//! Composite read models returned to API callers.
//!
//! These are computed per request and never persisted.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::Timestamp;

/// Display identity of a configuration's owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub username: String,
    pub email: Option<String>,
}

/// A comment enriched with its contributor's display identity.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    pub comment: String,
    pub created_at: Timestamp,
}

/// A rating enriched with its contributor's username.
#[derive(Debug, Clone, Serialize)]
pub struct RatingView {
    pub id: String,
    pub config_id: String,
    pub user_id: String,
    pub username: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A like enriched with its contributor's username.
#[derive(Debug, Clone, Serialize)]
pub struct LikeView {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub created_at: Timestamp,
}

/// A configuration combined with its engagement statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationView {
    pub id: String,
    pub game: String,
    pub title: String,
    pub description: Option<String>,
    pub parameters: Map<String, Value>,
    pub tags: Vec<String>,
    pub author: Author,
    /// Raw owner id, for follow-up lookups by the caller.
    pub user_id: String,
    pub created_at: Timestamp,
    pub views: i64,
    /// `null` when the configuration has no ratings yet.
    pub average_rating: Option<f64>,
    pub total_ratings: i64,
    pub comments: Vec<CommentView>,
    pub comments_count: i64,
    pub likes_count: i64,
}

/// Full detail of one configuration: the view plus every rating and like.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationDetails {
    #[serde(flatten)]
    pub view: ConfigurationView,
    pub ratings: Vec<RatingView>,
    pub likes: Vec<LikeView>,
}

/// Response of the per-game listing.
#[derive(Debug, Serialize)]
pub struct GameConfigurationsView {
    pub game: String,
    pub total_configurations: usize,
    pub configurations: Vec<ConfigurationView>,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Response of the search endpoint: the listing shape plus echoed filters.
#[derive(Debug, Serialize)]
pub struct SearchConfigurationsView {
    pub game: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub sort_by: String,
    pub sort_order: String,
    pub total_configurations: usize,
    pub configurations: Vec<ConfigurationView>,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Likes of one configuration.
#[derive(Debug, Serialize)]
pub struct ConfigurationLikesView {
    pub config_id: String,
    pub total_likes: usize,
    pub likes: Vec<LikeView>,
}

/// Rating statistics of one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamePopularity {
    pub game: String,
    pub total_ratings: i64,
    pub average_rating: f64,
}
