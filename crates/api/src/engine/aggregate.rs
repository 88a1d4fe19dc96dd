//! Per-configuration enrichment.
//!
//! The configuration store and engagement storage are hard dependencies of
//! a single enrichment; identity is soft and degrades to a placeholder.
//! In batch mode a failing configuration is skipped and logged.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use setuphub_core::configuration::Configuration;
use setuphub_core::error::CoreError;
use setuphub_core::rating::RatingStats;
use setuphub_core::sanitize::{find_residual_ids, sanitize_in_place};
use setuphub_core::types::RawDocument;
use setuphub_core::view::{
    Author, CommentView, ConfigurationDetails, ConfigurationLikesView, ConfigurationView,
    LikeView, RatingView,
};
use setuphub_db::models::comment::Comment;
use setuphub_db::models::like::Like;
use setuphub_db::models::rating::Rating;
use setuphub_db::EngagementStore;
use setuphub_upstream::{Identity, IdentityLookup};

type Identities = HashMap<String, Identity>;

/// Sanitize and decode a raw configuration document.
///
/// Residual opaque identifiers are logged; an undecodable document is
/// reported as a bad answer from the configuration store.
pub fn decode_document(raw: RawDocument) -> Result<Configuration, CoreError> {
    let mut document = raw;
    let replaced = sanitize_in_place(&mut document);
    if replaced > 0 {
        tracing::debug!(replaced, "Normalized opaque identifiers");
    }

    let residual = find_residual_ids(&document);
    if !residual.is_empty() {
        tracing::warn!(paths = ?residual, "Opaque identifiers survived sanitization");
    }

    Configuration::from_document(document).map_err(|e| {
        CoreError::ServiceUnavailable(format!(
            "configuration store returned an unsupported document: {e}"
        ))
    })
}

/// How much of the like data to load.
enum Likes {
    Count(i64),
    Rows(Vec<Like>),
}

/// Engagement rows of one configuration.
struct Engagement {
    comments: Vec<Comment>,
    ratings: Vec<Rating>,
    likes: Likes,
}

/// Combines configurations with engagement data and identities.
#[derive(Clone)]
pub struct Aggregator {
    engagement: Arc<dyn EngagementStore>,
    identities: Arc<dyn IdentityLookup>,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(
        engagement: Arc<dyn EngagementStore>,
        identities: Arc<dyn IdentityLookup>,
        concurrency: usize,
    ) -> Self {
        Self {
            engagement,
            identities,
            concurrency: concurrency.max(1),
        }
    }

    pub fn engagement(&self) -> &Arc<dyn EngagementStore> {
        &self.engagement
    }

    // ---------------------------------------------------------------------------
    // Configuration views
    // ---------------------------------------------------------------------------

    /// Enrich one configuration with counts, comments and the owner's identity.
    pub async fn enrich(&self, config: Configuration) -> Result<ConfigurationView, CoreError> {
        let engagement = self.load(&config.id, false).await?;
        let identities = self.resolve_for(&config, &engagement).await;
        Ok(build_view(config, engagement, &identities).0)
    }

    /// Enrich one configuration and include every rating and like.
    pub async fn details(&self, config: Configuration) -> Result<ConfigurationDetails, CoreError> {
        let engagement = self.load(&config.id, true).await?;
        let identities = self.resolve_for(&config, &engagement).await;
        let (view, ratings, likes) = build_view(config, engagement, &identities);

        let ratings = ratings
            .into_iter()
            .map(|r| {
                let identity = lookup(&identities, &r.user_id);
                rating_view(r, &identity)
            })
            .collect();
        let likes = likes
            .into_iter()
            .map(|l| {
                let identity = lookup(&identities, &l.user_id);
                like_view(l, &identity)
            })
            .collect();

        Ok(ConfigurationDetails { view, ratings, likes })
    }

    /// Enrich many configurations concurrently, preserving input order.
    ///
    /// A configuration whose enrichment fails is logged and left out.
    pub async fn enrich_batch(&self, configs: Vec<Configuration>) -> Vec<ConfigurationView> {
        let requested = configs.len();
        let views: Vec<ConfigurationView> = stream::iter(configs)
            .map(|config| async move {
                let config_id = config.id.clone();
                (config_id, self.enrich(config).await)
            })
            .buffered(self.concurrency)
            .filter_map(|(config_id, result)| async move {
                match result {
                    Ok(view) => Some(view),
                    Err(e) => {
                        tracing::warn!(config_id = %config_id, error = %e, "Skipping configuration");
                        None
                    }
                }
            })
            .collect()
            .await;

        if views.len() < requested {
            tracing::debug!(requested, enriched = views.len(), "Batch enrichment skipped items");
        }
        views
    }

    // ---------------------------------------------------------------------------
    // Engagement listings
    // ---------------------------------------------------------------------------

    pub async fn ratings(&self, config_id: &str) -> Result<Vec<RatingView>, CoreError> {
        let rows = self.engagement.list_ratings(config_id).await?;
        let identities = self.resolve(rows.iter().map(|r| r.user_id.as_str())).await;
        Ok(rows
            .into_iter()
            .map(|r| {
                let identity = lookup(&identities, &r.user_id);
                rating_view(r, &identity)
            })
            .collect())
    }

    pub async fn comments(&self, config_id: &str) -> Result<Vec<CommentView>, CoreError> {
        let rows = self.engagement.list_comments(config_id).await?;
        let identities = self.resolve(rows.iter().map(|c| c.user_id.as_str())).await;
        Ok(rows
            .into_iter()
            .map(|c| {
                let identity = lookup(&identities, &c.user_id);
                comment_view(c, &identity)
            })
            .collect())
    }

    pub async fn likes(&self, config_id: &str) -> Result<ConfigurationLikesView, CoreError> {
        let rows = self.engagement.list_likes(config_id).await?;
        let identities = self.resolve(rows.iter().map(|l| l.user_id.as_str())).await;
        let likes: Vec<LikeView> = rows
            .into_iter()
            .map(|l| {
                let identity = lookup(&identities, &l.user_id);
                like_view(l, &identity)
            })
            .collect();
        Ok(ConfigurationLikesView {
            config_id: config_id.to_string(),
            total_likes: likes.len(),
            likes,
        })
    }

    // ---- private helpers ----

    async fn load(&self, config_id: &str, with_like_rows: bool) -> Result<Engagement, CoreError> {
        let likes = async {
            if with_like_rows {
                self.engagement.list_likes(config_id).await.map(Likes::Rows)
            } else {
                self.engagement.count_likes(config_id).await.map(Likes::Count)
            }
        };
        let (comments, ratings, likes) = futures::try_join!(
            self.engagement.list_comments(config_id),
            self.engagement.list_ratings(config_id),
            likes,
        )?;
        Ok(Engagement { comments, ratings, likes })
    }

    /// Resolve every user an enriched configuration mentions.
    async fn resolve_for(&self, config: &Configuration, engagement: &Engagement) -> Identities {
        let mut users: Vec<&str> = vec![config.user_id.as_str()];
        users.extend(engagement.comments.iter().map(|c| c.user_id.as_str()));
        if let Likes::Rows(likes) = &engagement.likes {
            users.extend(engagement.ratings.iter().map(|r| r.user_id.as_str()));
            users.extend(likes.iter().map(|l| l.user_id.as_str()));
        }
        self.resolve(users).await
    }

    /// Resolve each distinct user once.
    async fn resolve<'a, I>(&self, user_ids: I) -> Identities
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<String> = user_ids.into_iter().map(str::to_string).collect();
        stream::iter(distinct)
            .map(|user_id| async move {
                let identity = self.identities.resolve(&user_id).await;
                (user_id, identity)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }
}

fn lookup(identities: &Identities, user_id: &str) -> Identity {
    identities.get(user_id).cloned().unwrap_or_else(Identity::unknown)
}

/// Assemble the view; returns the rating and like rows for detail output.
fn build_view(
    config: Configuration,
    engagement: Engagement,
    identities: &Identities,
) -> (ConfigurationView, Vec<Rating>, Vec<Like>) {
    let Engagement { comments, ratings, likes } = engagement;
    let stats = RatingStats::from_scores(ratings.iter().map(|r| r.rating));
    let (likes_count, like_rows) = match likes {
        Likes::Count(count) => (count, Vec::new()),
        Likes::Rows(rows) => (rows.len() as i64, rows),
    };

    let owner = lookup(identities, &config.user_id);
    let comments: Vec<CommentView> = comments
        .into_iter()
        .map(|c| {
            let identity = lookup(identities, &c.user_id);
            comment_view(c, &identity)
        })
        .collect();

    let view = ConfigurationView {
        id: config.id,
        game: config.game,
        title: config.title,
        description: config.description,
        parameters: config.parameters,
        tags: config.tags,
        author: Author {
            username: owner.username,
            email: owner.email,
        },
        user_id: config.user_id,
        created_at: config.created_at,
        views: config.views,
        average_rating: stats.average,
        total_ratings: stats.total,
        comments_count: comments.len() as i64,
        comments,
        likes_count,
    };
    (view, ratings, like_rows)
}

fn comment_view(comment: Comment, identity: &Identity) -> CommentView {
    CommentView {
        id: comment.id.to_string(),
        user_id: comment.user_id,
        username: identity.username.clone(),
        avatar_url: identity.avatar_or_placeholder(),
        comment: comment.comment,
        created_at: comment.created_at,
    }
}

fn rating_view(rating: Rating, identity: &Identity) -> RatingView {
    RatingView {
        id: rating.id.to_string(),
        config_id: rating.config_id,
        user_id: rating.user_id,
        username: identity.username.clone(),
        rating: rating.rating,
        comment: rating.comment,
        created_at: rating.created_at,
        updated_at: rating.updated_at,
    }
}

fn like_view(like: Like, identity: &Identity) -> LikeView {
    LikeView {
        id: like.id.to_string(),
        user_id: like.user_id,
        username: identity.username.clone(),
        created_at: like.created_at,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_legacy_document_shapes() {
        let config = decode_document(json!({
            "_id": { "$oid": "65f0" },
            "game": "StarCraft II",
            "title": "Rush",
            "owner_id": { "$oid": "77aa" },
            "parameters": { "nested": [{ "ref": { "$uuid": "abc" } }] }
        }))
        .unwrap();
        assert_eq!(config.id, "65f0");
        assert_eq!(config.user_id, "77aa");
        assert_eq!(config.parameters["nested"][0]["ref"], "abc");
    }

    #[test]
    fn unsupported_document_is_unavailability() {
        let err = decode_document(json!({ "_id": "x", "title": "no game" })).unwrap_err();
        assert!(matches!(err, CoreError::ServiceUnavailable(_)));
    }
}
