//! Handlers for configuration visualizations.
//!
//! Read-only: every endpoint aggregates the remote configuration store, the
//! identity service and local engagement storage.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use setuphub_core::listing::{
    clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_GAME_LIMIT, MAX_SEARCH_LIMIT, MAX_TOP_LIMIT,
};

use crate::engine::{SearchFilters, Window};
use crate::error::AppResult;
use crate::query::{GameListingParams, SearchParams, TopParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Single configuration
// ---------------------------------------------------------------------------

/// GET /visualizations/configs/{config_id}
pub async fn get_configuration(
    State(state): State<AppState>,
    Path(config_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let details = state.catalog.detail(&config_id).await?;
    Ok(Json(details))
}

/// GET /visualizations/configs/{config_id}/ratings
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(config_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let ratings = state.catalog.aggregator().ratings(&config_id).await?;
    Ok(Json(ratings))
}

/// GET /visualizations/configs/{config_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(config_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let comments = state.catalog.aggregator().comments(&config_id).await?;
    Ok(Json(comments))
}

/// GET /visualizations/configs/{config_id}/likes
pub async fn list_likes(
    State(state): State<AppState>,
    Path(config_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let likes = state.catalog.aggregator().likes(&config_id).await?;
    Ok(Json(likes))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /visualizations/game/{game_name}
///
/// Unknown `sort_by` / `order` values are rejected with 400.
pub async fn list_by_game(
    State(state): State<AppState>,
    Path(game_name): Path<String>,
    Query(params): Query<GameListingParams>,
) -> AppResult<impl IntoResponse> {
    let sort = params.sort()?;
    let window = Window::new(
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_GAME_LIMIT),
        clamp_offset(params.offset),
    );
    let listing = state.catalog.by_game(&game_name, sort, window).await?;
    Ok(Json(listing))
}

/// GET /visualizations/search
///
/// Without `game` the result is empty. Unknown sort values fall back to
/// `created_at` / `desc`.
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let params = SearchParams::from_pairs(pairs)?;
    let sort = params.sort();
    let window = Window::new(
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_SEARCH_LIMIT),
        clamp_offset(params.offset),
    );
    let filters = SearchFilters {
        game: params.game,
        title: params.title,
        tags: params.tags,
    };

    tracing::debug!(
        game = ?filters.game,
        title = ?filters.title,
        tags = ?filters.tags,
        sort_by = sort.field.as_str(),
        "Search executed",
    );

    let results = state.catalog.search(filters, sort, window).await?;
    Ok(Json(results))
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// GET /visualizations/stats/top-configurations
pub async fn top_configurations(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_TOP_LIMIT);
    let top = state.catalog.top_configurations(limit).await?;
    Ok(Json(json!({ "top_configurations": top })))
}

/// GET /visualizations/stats/popular-games
pub async fn popular_games(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let games = state.catalog.popular_games().await?;
    Ok(Json(json!({ "popular_games": games })))
}
