use serde::{Deserialize, Serialize};

use crate::domain::{MatchFormat, MatchSetScore, PairingStrategy, PlayerStats, SkillLevel};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub rank: usize,
    pub player_id: String,
    pub name: String,
    pub surname: String,
    pub nickname: Option<String>,
    pub skill_level: SkillLevel,
    pub matches_played: u32,
    pub matches_won: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub set_ratio: String,
    pub games_won: u32,
    pub games_lost: u32,
    pub points: u32,
}

impl StandingRow {
    pub fn from_stats(rank: usize, stats: &PlayerStats) -> Self {
        Self {
            rank,
            player_id: stats.player_id.clone(),
            name: stats.name.clone(),
            surname: stats.surname.clone(),
            nickname: stats.nickname.clone(),
            skill_level: stats.skill_level,
            matches_played: stats.matches_played,
            matches_won: stats.matches_won,
            sets_won: stats.sets_won,
            sets_lost: stats.sets_lost,
            set_ratio: stats.set_ratio().to_string(),
            games_won: stats.games_won,
            games_lost: stats.games_lost,
            points: stats.points,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsResponse {
    pub tournament_id: Option<String>,
    pub items: Vec<StandingRow>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoundRequest {
    pub strategy: Option<PairingStrategy>,
    pub format: Option<MatchFormat>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultRequest {
    #[serde(default)]
    pub scores: Vec<MatchSetScore>,
    pub winner_team_id: Option<String>,
}
