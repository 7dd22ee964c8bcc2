use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use crate::api::handlers::{
    matches::post_match_result,
    players::get_players,
    standings::{get_overall_standings, get_tournament_standings},
    tournaments::{generate_round, get_tournament_matches, get_tournaments},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/players", get(get_players))
        .route("/api/tournaments", get(get_tournaments))
        .route("/api/tournaments/:id/matches", get(get_tournament_matches))
        .route("/api/tournaments/:id/standings", get(get_tournament_standings))
        .route("/api/tournaments/:id/rounds", post(generate_round))
        .route("/api/matches/:id/result", post(post_match_result))
        .route("/api/standings", get(get_overall_standings))
        .with_state(state)
}
