use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{ParseEnumError, PlayerStats, SkillLevel};

/// Primary column of a leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Points,
    MatchesWon,
    SetsWon,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Points => "points",
            SortKey::MatchesWon => "matches_won",
            SortKey::SetsWon => "sets_won",
        }
    }

    fn primary(&self, stats: &PlayerStats) -> u32 {
        match self {
            SortKey::Points => stats.points,
            SortKey::MatchesWon => stats.matches_won,
            SortKey::SetsWon => stats.sets_won,
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "points" => Ok(SortKey::Points),
            "matcheswon" | "wins" => Ok(SortKey::MatchesWon),
            "setswon" | "sets" => Ok(SortKey::SetsWon),
            _ => Err(ParseEnumError::new("sort key", s)),
        }
    }
}

/// Standard ranking: points, wins, set ratio, name, id
pub fn compare_standings(a: &PlayerStats, b: &PlayerStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| tie_break(a, b))
}

/// Everything after the primary column
fn tie_break(a: &PlayerStats, b: &PlayerStats) -> Ordering {
    b.matches_won
        .cmp(&a.matches_won)
        .then_with(|| compare_ratio(a, b))
        .then_with(|| compare_names(a, b))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

fn compare_ratio(a: &PlayerStats, b: &PlayerStats) -> Ordering {
    b.set_ratio().as_f64().total_cmp(&a.set_ratio().as_f64())
}

fn compare_names(a: &PlayerStats, b: &PlayerStats) -> Ordering {
    let left = a.full_name();
    let right = b.full_name();
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(&right))
}

pub fn sort_standings(stats: &mut [PlayerStats]) {
    stats.sort_by(compare_standings);
}

/// Leaderboard ordered by the chosen column, ties resolved like the ranking
pub fn rank_by(stats: &[PlayerStats], key: SortKey) -> Vec<PlayerStats> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| {
        key.primary(b)
            .cmp(&key.primary(a))
            .then_with(|| match key {
                SortKey::Points => tie_break(a, b),
                _ => compare_standings(a, b),
            })
    });
    ranked
}

pub fn filter_by_skill(stats: &[PlayerStats], skill: SkillLevel) -> Vec<PlayerStats> {
    stats
        .iter()
        .filter(|s| s.skill_level == skill)
        .cloned()
        .collect()
}

pub fn top(stats: &[PlayerStats], n: usize) -> &[PlayerStats] {
    &stats[..stats.len().min(n)]
}
