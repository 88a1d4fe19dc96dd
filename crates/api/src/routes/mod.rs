pub mod health;
pub mod visualizations;

use axum::Router;

use crate::state::AppState;

/// Build the `/visualizations` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /configs/{config_id}                     detail with ratings and likes
/// /configs/{config_id}/ratings             ratings with usernames
/// /configs/{config_id}/comments            comments with usernames and avatars
/// /configs/{config_id}/likes               likes with usernames
///
/// /game/{game_name}                        per-game listing (sort, paginate)
/// /search                                  filtered search (sort, paginate)
///
/// /stats/top-configurations                best-rated configurations
/// /stats/popular-games                     rating totals per game
/// ```
pub fn api_routes() -> Router<AppState> {
    visualizations::router()
}
