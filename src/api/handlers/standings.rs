use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use std::sync::Arc;

use crate::api::models::{StandingRow, StandingsResponse};
use crate::domain::PlayerStats;
use crate::services::tournament::{LeaderboardQuery, TournamentService};
use super::{parse_param, ApiError, AppState, StandingsParams};

pub async fn get_tournament_standings(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<String>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let query = leaderboard_query(&params)?;
    let service = TournamentService::new(&state.pool, &state.config);

    let standings = service.tournament_standings(Some(&tournament_id))?;
    Ok(Json(build_response(Some(tournament_id), query.apply(standings))))
}

pub async fn get_overall_standings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let query = leaderboard_query(&params)?;
    let service = TournamentService::new(&state.pool, &state.config);

    let standings = service.overall_standings()?;
    Ok(Json(build_response(None, query.apply(standings))))
}

fn leaderboard_query(params: &StandingsParams) -> Result<LeaderboardQuery, ApiError> {
    Ok(LeaderboardQuery {
        skill: parse_param("skill", params.skill.as_deref())?,
        sort_by: parse_param("sortBy", params.sort_by.as_deref())?.unwrap_or_default(),
        top: params.top,
    })
}

fn build_response(tournament_id: Option<String>, standings: Vec<PlayerStats>) -> StandingsResponse {
    let items = standings
        .iter()
        .enumerate()
        .map(|(i, stats)| StandingRow::from_stats(i + 1, stats))
        .collect();
    StandingsResponse { tournament_id, items }
}
