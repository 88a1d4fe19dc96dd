//! Route definitions for configuration visualizations.

use axum::routing::get;
use axum::Router;

use crate::handlers::visualizations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/configs/{config_id}", get(visualizations::get_configuration))
        .route("/configs/{config_id}/ratings", get(visualizations::list_ratings))
        .route("/configs/{config_id}/comments", get(visualizations::list_comments))
        .route("/configs/{config_id}/likes", get(visualizations::list_likes))
        .route("/game/{game_name}", get(visualizations::list_by_game))
        .route("/search", get(visualizations::search))
        .route("/stats/top-configurations", get(visualizations::top_configurations))
        .route("/stats/popular-games", get(visualizations::popular_games))
}
