use log::debug;

use super::errors::{EngineError, EngineResult};
use crate::domain::{Match, MatchFormat, MatchSetScore, MatchStatus, ScoreValue, TeamSide};

const MAX_SETS: usize = 3;
const SETS_TO_WIN: u32 = 2;

/// Turn entered scores (or a declared winner) into a completed match.
///
/// The input match is left untouched; on failure nothing is returned
/// and the caller's match stays in its current state.
pub fn resolve_result(
    current: &Match,
    scores: &[MatchSetScore],
    declared_winner: Option<&str>,
) -> EngineResult<Match> {
    let (winner, final_scores) = match current.format {
        MatchFormat::GoldenPoint => resolve_golden_point(current, declared_winner)?,
        MatchFormat::BestOfThree => resolve_best_of_three(scores)?,
    };

    let mut resolved = current.clone();
    resolved.winner_team_id = Some(resolved.team(winner).id.clone());
    resolved.scores = final_scores;
    resolved.status = MatchStatus::Completed;

    debug!(
        "Resolved match {}: winner {} ({})",
        resolved.id,
        resolved.team(winner).label(),
        resolved.score_line()
    );
    Ok(resolved)
}

/// Store draft scores without deciding the match.
///
/// Only meaningful for open matches; a completed match keeps its status.
pub fn save_draft_scores(current: &Match, scores: &[MatchSetScore]) -> Match {
    let mut draft = current.clone();
    draft.scores = scores.iter().filter(|s| !s.is_blank()).copied().collect();
    if draft.status == MatchStatus::Pending {
        draft.status = MatchStatus::InProgress;
    }
    draft
}

fn resolve_golden_point(
    current: &Match,
    declared_winner: Option<&str>,
) -> EngineResult<(TeamSide, Vec<MatchSetScore>)> {
    let winner_id = declared_winner.ok_or_else(|| {
        EngineError::IncompleteScore("golden point needs a declared winner".to_string())
    })?;

    let winner = current.side_of_team(winner_id).ok_or_else(|| {
        EngineError::IncompleteScore(format!(
            "team {} does not play in match {}",
            winner_id, current.id
        ))
    })?;

    Ok((winner, vec![golden_point_set(winner)]))
}

fn golden_point_set(winner: TeamSide) -> MatchSetScore {
    match winner {
        TeamSide::One => MatchSetScore::new(1, ScoreValue::GoldenPointWin, ScoreValue::Unset),
        TeamSide::Two => MatchSetScore::new(1, ScoreValue::Unset, ScoreValue::GoldenPointWin),
    }
}

fn resolve_best_of_three(
    scores: &[MatchSetScore],
) -> EngineResult<(TeamSide, Vec<MatchSetScore>)> {
    let slots = &scores[..scores.len().min(MAX_SETS)];
    let (winner, deciding_slot) = decide_best_of_three(slots)?;
    Ok((winner, prune_unplayed(&slots[..=deciding_slot])))
}

/// Winner and the index of the slot that decided the match
fn decide_best_of_three(slots: &[MatchSetScore]) -> EngineResult<(TeamSide, usize)> {
    let mut team1_sets = 0;
    let mut team2_sets = 0;

    for (index, set) in slots.iter().enumerate() {
        if set.is_blank() {
            continue;
        }
        validate_set_entry(set)?;

        match set.set_winner() {
            Some(TeamSide::One) => team1_sets += 1,
            Some(TeamSide::Two) => team2_sets += 1,
            None => {}
        }

        if team1_sets == SETS_TO_WIN {
            return Ok((TeamSide::One, index));
        }
        if team2_sets == SETS_TO_WIN {
            return Ok((TeamSide::Two, index));
        }
    }

    Err(EngineError::IncompleteScore(format!(
        "sets stand at {}-{}, no team has won {} sets",
        team1_sets, team2_sets, SETS_TO_WIN
    )))
}

fn validate_set_entry(set: &MatchSetScore) -> EngineResult<()> {
    if set.is_half_filled() {
        return Err(EngineError::IncompleteScore(format!(
            "set {} has only one score entered",
            set.set_number
        )));
    }
    if set.numeric_pair().is_none() {
        return Err(EngineError::IncompleteScore(format!(
            "set {} is not a numeric score",
            set.set_number
        )));
    }
    Ok(())
}

fn prune_unplayed(slots: &[MatchSetScore]) -> Vec<MatchSetScore> {
    slots.iter().filter(|s| !s.is_blank()).copied().collect()
}
