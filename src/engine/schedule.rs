use std::collections::HashSet;

use log::debug;

use super::errors::{EngineError, EngineResult};
use super::pairing::form_teams;
use super::partition::partition_by_skill;
use super::shuffle::Shuffler;
use crate::domain::{Match, MatchFormat, PairingStrategy, Player, Team};

/// Everything needed to draw one round
#[derive(Debug, Clone)]
pub struct RoundRequest<'a> {
    pub tournament_id: Option<&'a str>,
    pub round: u32,
    pub strategy: PairingStrategy,
    pub format: MatchFormat,
    pub min_players: usize,
}

/// Pair consecutive teams into matches; an odd trailing team is dropped
pub fn schedule_round(
    teams: &[Team],
    round: u32,
    format: MatchFormat,
    tournament_id: Option<&str>,
) -> Vec<Match> {
    teams
        .chunks_exact(2)
        .map(|pair| build_match(&pair[0], &pair[1], round, format, tournament_id))
        .collect()
}

fn build_match(
    team1: &Team,
    team2: &Team,
    round: u32,
    format: MatchFormat,
    tournament_id: Option<&str>,
) -> Match {
    let mut scheduled = Match::pending(team1.clone(), team2.clone(), round, format);
    scheduled.tournament_id = tournament_id.map(str::to_string);
    scheduled
}

pub fn create_manual_match(
    team_a: &Team,
    team_b: &Team,
    format: MatchFormat,
    court: Option<&str>,
    tournament_id: Option<&str>,
    round: u32,
) -> EngineResult<Match> {
    validate_team(team_a)?;
    validate_team(team_b)?;
    ensure_disjoint(team_a, team_b)?;

    let mut manual = build_match(team_a, team_b, round, format, tournament_id);
    manual.court = court
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    Ok(manual)
}

fn validate_team(team: &Team) -> EngineResult<()> {
    if team.player1.id == team.player2.id {
        return Err(EngineError::InvalidComposition(format!(
            "team {} lists player {} twice",
            team.id, team.player1.id
        )));
    }
    Ok(())
}

fn ensure_disjoint(team_a: &Team, team_b: &Team) -> EngineResult<()> {
    if let Some(shared) = team_a.player_ids().into_iter().find(|id| team_b.contains(id)) {
        return Err(EngineError::InvalidComposition(format!(
            "player {} cannot play for both teams",
            shared
        )));
    }
    Ok(())
}

/// Build a team from exactly two roster player ids
pub fn assemble_team(roster: &[Player], player_ids: &[&str]) -> EngineResult<Team> {
    let [first_id, second_id] = player_ids else {
        return Err(EngineError::InvalidComposition(format!(
            "a team needs exactly 2 players, got {}",
            player_ids.len()
        )));
    };

    if first_id == second_id {
        return Err(EngineError::InvalidComposition(format!(
            "player {} selected twice",
            first_id
        )));
    }

    let first = find_player(roster, first_id)?;
    let second = find_player(roster, second_id)?;
    Ok(Team::new(first, second))
}

fn find_player(roster: &[Player], player_id: &str) -> EngineResult<Player> {
    roster
        .iter()
        .find(|p| p.id == player_id)
        .cloned()
        .ok_or_else(|| EngineError::InvalidComposition(format!("unknown player {}", player_id)))
}

/// Pairing must not run while a match of the current round is still open
pub fn ensure_round_finished(matches: &[Match]) -> EngineResult<()> {
    let pending = matches.iter().filter(|m| !m.is_completed()).count();
    if pending > 0 {
        return Err(EngineError::RoundNotFinished { pending });
    }
    Ok(())
}

/// Full pipeline: precondition, partition, pairing, scheduling
pub fn generate_round<S: Shuffler>(
    roster: &[Player],
    existing: &[Match],
    request: &RoundRequest<'_>,
    shuffler: &mut S,
) -> EngineResult<Vec<Match>> {
    ensure_round_finished(existing)?;

    let brackets = partition_by_skill(roster, request.min_players, shuffler)?;
    let teams = form_teams(brackets, request.strategy, shuffler)?;
    let matches = schedule_round(&teams, request.round, request.format, request.tournament_id);

    debug!(
        "Scheduled {} matches for round {} ({} players sit out)",
        matches.len(),
        request.round,
        roster.len() - count_scheduled_players(&matches)
    );
    Ok(matches)
}

fn count_scheduled_players(matches: &[Match]) -> usize {
    matches
        .iter()
        .flat_map(|m| m.player_ids())
        .collect::<HashSet<_>>()
        .len()
}
