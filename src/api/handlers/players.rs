use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use crate::domain::{Player, SkillLevel};
use crate::services::tournament::TournamentService;
use super::{parse_param, ApiError, AppState, PlayerParams};

pub async fn get_players(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let skill: Option<SkillLevel> = parse_param("skill", params.skill.as_deref())?;
    let service = TournamentService::new(&state.pool, &state.config);

    let players = service.list_players(params.search.as_deref(), skill)?;
    Ok(Json(players))
}
