use std::collections::HashMap;

use log::debug;

use super::errors::{EngineError, EngineResult};
use super::ranking::sort_standings;
use crate::domain::{
    Match, MatchFormat, Player, PlayerId, PlayerStats, PointsConfig, TeamSide, Tournament,
};

/// Match subset standings are computed over
#[derive(Debug, Clone, Copy)]
pub enum StandingsScope<'a> {
    Tournament(&'a Tournament),
    Overall,
}

impl StandingsScope<'_> {
    pub fn tournament_id(&self) -> Option<&str> {
        match self {
            StandingsScope::Tournament(tournament) => Some(tournament.id.as_str()),
            StandingsScope::Overall => None,
        }
    }

    fn includes_player(&self, player: &Player) -> bool {
        match self {
            StandingsScope::Tournament(tournament) => tournament.has_player(&player.id),
            StandingsScope::Overall => true,
        }
    }

    fn includes_match(&self, m: &Match) -> bool {
        match self {
            StandingsScope::Tournament(tournament) => {
                m.tournament_id.as_deref() == Some(tournament.id.as_str())
            }
            StandingsScope::Overall => true,
        }
    }
}

/// Sets and games won by each side of one match
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct MatchTally {
    sets: [u32; 2],
    games: [u32; 2],
}

impl MatchTally {
    fn sets_for(&self, side: TeamSide) -> u32 {
        self.sets[side_index(side)]
    }

    fn games_for(&self, side: TeamSide) -> u32 {
        self.games[side_index(side)]
    }
}

fn side_index(side: TeamSide) -> usize {
    match side {
        TeamSide::One => 0,
        TeamSide::Two => 1,
    }
}

/// Recompute per-player statistics from scratch, in ranking order.
///
/// Tournament and overall standings both go through here; only the scope
/// differs. Participants outside the scope's roster are ignored.
pub fn compute_standings(
    matches: &[Match],
    players: &[Player],
    points: &PointsConfig,
    scope: Option<&StandingsScope<'_>>,
) -> EngineResult<Vec<PlayerStats>> {
    let scope = scope.ok_or(EngineError::NoScope)?;

    let mut table = initialize_table(players, scope);
    let mut counted = 0;

    for m in matches.iter().filter(|m| scope.includes_match(m)) {
        if let Some(winner) = decided_winner(m) {
            apply_match(&mut table, m, winner, points);
            counted += 1;
        }
    }

    debug!(
        "Computed standings for {} players over {} completed matches",
        table.len(),
        counted
    );

    let mut standings: Vec<PlayerStats> = table.into_values().collect();
    sort_standings(&mut standings);
    Ok(standings)
}

fn initialize_table(
    players: &[Player],
    scope: &StandingsScope<'_>,
) -> HashMap<PlayerId, PlayerStats> {
    players
        .iter()
        .filter(|p| scope.includes_player(p))
        .map(|p| (p.id.clone(), PlayerStats::zeroed(p, scope.tournament_id())))
        .collect()
}

fn decided_winner(m: &Match) -> Option<TeamSide> {
    if m.is_completed() {
        m.winner_side()
    } else {
        None
    }
}

fn apply_match(
    table: &mut HashMap<PlayerId, PlayerStats>,
    m: &Match,
    winner: TeamSide,
    points: &PointsConfig,
) {
    let tally = tally_match(m, winner);

    for player_id in m.player_ids() {
        let Some(stats) = table.get_mut(player_id) else {
            continue;
        };
        if let Some(side) = m.side_of_player(player_id) {
            record_outcome(stats, m.format, side, winner, &tally, points);
        }
    }
}

fn tally_match(m: &Match, winner: TeamSide) -> MatchTally {
    match m.format {
        MatchFormat::GoldenPoint => golden_point_tally(winner),
        MatchFormat::BestOfThree => best_of_three_tally(m),
    }
}

fn golden_point_tally(winner: TeamSide) -> MatchTally {
    let mut tally = MatchTally::default();
    tally.sets[side_index(winner)] = 1;
    tally
}

fn best_of_three_tally(m: &Match) -> MatchTally {
    let mut tally = MatchTally::default();

    for set in &m.scores {
        if let Some(side) = set.set_winner() {
            tally.sets[side_index(side)] += 1;
        }
        if let Some((team1, team2)) = set.numeric_pair() {
            tally.games[0] = tally.games[0].saturating_add(team1);
            tally.games[1] = tally.games[1].saturating_add(team2);
        }
    }

    tally
}

fn record_outcome(
    stats: &mut PlayerStats,
    format: MatchFormat,
    side: TeamSide,
    winner: TeamSide,
    tally: &MatchTally,
    points: &PointsConfig,
) {
    let sets_won = tally.sets_for(side);
    let sets_lost = tally.sets_for(side.opponent());

    // counters saturate; game scores are unbounded user input
    stats.matches_played = stats.matches_played.saturating_add(1);
    stats.sets_won = stats.sets_won.saturating_add(sets_won);
    stats.sets_lost = stats.sets_lost.saturating_add(sets_lost);
    stats.games_won = stats.games_won.saturating_add(tally.games_for(side));
    stats.games_lost = stats.games_lost.saturating_add(tally.games_for(side.opponent()));

    let earned = if side == winner {
        stats.matches_won = stats.matches_won.saturating_add(1);
        points.win
    } else {
        loss_points(format, sets_won, sets_lost, points)
    };
    stats.points = stats.points.saturating_add(earned);
}

fn loss_points(format: MatchFormat, sets_won: u32, sets_lost: u32, points: &PointsConfig) -> u32 {
    let lost_in_third_set = format == MatchFormat::BestOfThree && sets_won == 1 && sets_lost == 2;
    if lost_in_third_set {
        points.tie_break_loss
    } else {
        points.loss
    }
}
