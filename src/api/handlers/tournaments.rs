use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

use crate::api::models::GenerateRoundRequest;
use crate::domain::{Match, Tournament};
use crate::services::tournament::{RoundOptions, TournamentService};
use super::{ApiError, AppState};

pub async fn get_tournaments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    let service = TournamentService::new(&state.pool, &state.config);
    Ok(Json(service.list_tournaments()?))
}

pub async fn get_tournament_matches(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<String>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let service = TournamentService::new(&state.pool, &state.config);
    Ok(Json(service.list_matches(Some(&tournament_id))?))
}

pub async fn generate_round(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<String>,
    body: Option<Json<GenerateRoundRequest>>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let options = RoundOptions {
        strategy: request.strategy,
        format: request.format,
    };

    let service = TournamentService::new(&state.pool, &state.config);
    Ok(Json(service.generate_round(Some(&tournament_id), options)?))
}
