use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

use crate::api::models::MatchResultRequest;
use crate::domain::Match;
use crate::services::tournament::TournamentService;
use super::{ApiError, AppState};

pub async fn post_match_result(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
    Json(request): Json<MatchResultRequest>,
) -> Result<Json<Match>, ApiError> {
    let service = TournamentService::new(&state.pool, &state.config);
    let saved = service.save_result(
        &match_id,
        &request.scores,
        request.winner_team_id.as_deref(),
    )?;
    Ok(Json(saved))
}
