//! Listing, search and statistics over the configuration store.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use setuphub_core::configuration::Configuration;
use setuphub_core::error::CoreError;
use setuphub_core::listing::{paginate, sort_views, SortSpec};
use setuphub_core::rating::RatingStats;
use setuphub_core::view::{
    ConfigurationDetails, ConfigurationView, GameConfigurationsView, GamePopularity,
    SearchConfigurationsView,
};
use setuphub_upstream::ConfigLookup;

use super::aggregate::{decode_document, Aggregator};

/// Minimum number of ratings for a configuration to be ranked.
pub const MIN_RATINGS_FOR_RANKING: i64 = 3;

/// Number of games reported by [`Catalog::popular_games`].
pub const POPULAR_GAMES_LIMIT: usize = 10;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: usize,
    pub offset: usize,
}

impl Window {
    /// Build from already-clamped values.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: usize::try_from(limit).unwrap_or(0),
            offset: usize::try_from(offset).unwrap_or(0),
        }
    }
}

/// Search filters. `game` selects the candidate set; without it the search
/// matches nothing.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub game: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
}

impl SearchFilters {
    fn matches(&self, config: &Configuration) -> bool {
        let title_ok = self
            .title
            .as_deref()
            .map_or(true, |needle| config.title_contains(needle));
        let wanted_tags = self.tags.iter().any(|t| !t.trim().is_empty());
        let tags_ok = !wanted_tags || config.has_any_tag(&self.tags);
        title_ok && tags_ok
    }
}

/// Read-side entry point combining the configuration store with the
/// aggregator.
#[derive(Clone)]
pub struct Catalog {
    configs: Arc<dyn ConfigLookup>,
    aggregator: Aggregator,
    concurrency: usize,
}

impl Catalog {
    pub fn new(configs: Arc<dyn ConfigLookup>, aggregator: Aggregator, concurrency: usize) -> Self {
        Self {
            configs,
            aggregator,
            concurrency: concurrency.max(1),
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// One configuration with every rating and like.
    pub async fn detail(&self, config_id: &str) -> Result<ConfigurationDetails, CoreError> {
        let raw = self
            .configs
            .get_by_id(config_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Configuration",
                id: config_id.to_string(),
            })?;
        let config = decode_document(raw)?;
        self.aggregator.details(config).await
    }

    /// Configurations of one game, sorted and windowed.
    pub async fn by_game(
        &self,
        game: &str,
        sort: SortSpec,
        window: Window,
    ) -> Result<GameConfigurationsView, CoreError> {
        let candidates = self.fetch_game(game).await?;
        let mut views = self.aggregator.enrich_batch(candidates).await;
        sort_views(&mut views, sort);
        let page = paginate(views, window.limit, window.offset);

        tracing::debug!(game, total = page.total, returned = page.items.len(), "Listed configurations");

        Ok(GameConfigurationsView {
            game: game.to_string(),
            total_configurations: page.total,
            configurations: page.items,
            limit: page.limit,
            offset: page.offset,
            has_more: page.has_more,
        })
    }

    /// Filtered search. Filters are applied before enrichment.
    pub async fn search(
        &self,
        filters: SearchFilters,
        sort: SortSpec,
        window: Window,
    ) -> Result<SearchConfigurationsView, CoreError> {
        let candidates = match filters.game.as_deref() {
            Some(game) => self.fetch_game(game).await?,
            None => Vec::new(),
        };
        let matching: Vec<Configuration> =
            candidates.into_iter().filter(|c| filters.matches(c)).collect();

        let mut views = self.aggregator.enrich_batch(matching).await;
        sort_views(&mut views, sort);
        let page = paginate(views, window.limit, window.offset);

        Ok(SearchConfigurationsView {
            game: filters.game,
            title: filters.title,
            tags: filters.tags,
            sort_by: sort.field.as_str().to_string(),
            sort_order: sort.order.as_str().to_string(),
            total_configurations: page.total,
            configurations: page.items,
            limit: page.limit,
            offset: page.offset,
            has_more: page.has_more,
        })
    }

    /// Best-rated configurations with at least [`MIN_RATINGS_FOR_RANKING`]
    /// ratings, best average first, then most ratings.
    pub async fn top_configurations(&self, limit: i64) -> Result<Vec<ConfigurationView>, CoreError> {
        let ranked = self
            .aggregator
            .engagement()
            .rating_summaries(MIN_RATINGS_FOR_RANKING, Some(limit))
            .await?;
        let ids: Vec<String> = ranked.into_iter().map(|s| s.config_id).collect();
        let configs = self.fetch_many(ids).await;
        Ok(self.aggregator.enrich_batch(configs).await)
    }

    /// Rating totals per game, most rated first.
    pub async fn popular_games(&self) -> Result<Vec<GamePopularity>, CoreError> {
        let summaries = self.aggregator.engagement().rating_summaries(1, None).await?;
        let ids: Vec<String> = summaries.iter().map(|s| s.config_id.clone()).collect();
        let games: HashMap<String, String> = self
            .fetch_many(ids)
            .await
            .into_iter()
            .map(|c| (c.id, c.game))
            .collect();

        let mut totals: HashMap<&str, (i64, i64)> = HashMap::new();
        for summary in &summaries {
            if let Some(game) = games.get(&summary.config_id) {
                let entry = totals.entry(game.as_str()).or_default();
                entry.0 += summary.total_ratings;
                entry.1 += summary.score_sum;
            }
        }

        let mut popular: Vec<GamePopularity> = totals
            .into_iter()
            .map(|(game, (total, sum))| GamePopularity {
                game: game.to_string(),
                total_ratings: total,
                average_rating: RatingStats::from_totals(sum, total).sort_key(),
            })
            .collect();
        popular.sort_by(|a, b| {
            b.total_ratings
                .cmp(&a.total_ratings)
                .then_with(|| a.game.cmp(&b.game))
        });
        popular.truncate(POPULAR_GAMES_LIMIT);
        Ok(popular)
    }

    // ---- private helpers ----

    /// Every decodable configuration of `game`. The store itself failing is
    /// fatal; an undecodable document is skipped.
    async fn fetch_game(&self, game: &str) -> Result<Vec<Configuration>, CoreError> {
        let documents = self.configs.list_by_game(game).await?;
        Ok(documents
            .into_iter()
            .filter_map(|raw| match decode_document(raw) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(game, error = %e, "Skipping undecodable configuration");
                    None
                }
            })
            .collect())
    }

    /// Fetch configurations by id, in order, skipping any that are missing
    /// or cannot be fetched.
    async fn fetch_many(&self, ids: Vec<String>) -> Vec<Configuration> {
        stream::iter(ids)
            .map(|id| async move {
                let result = self.configs.get_by_id(&id).await;
                (id, result)
            })
            .buffered(self.concurrency)
            .filter_map(|(id, result)| async move {
                let outcome = match result {
                    Ok(Some(raw)) => decode_document(raw),
                    Ok(None) => {
                        tracing::debug!(config_id = %id, "Rated configuration no longer exists");
                        return None;
                    }
                    Err(e) => Err(e.into()),
                };
                match outcome {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(config_id = %id, error = %e, "Skipping configuration");
                        None
                    }
                }
            })
            .collect()
            .await
    }
}
