use log::debug;

use super::errors::{EngineError, EngineResult};
use super::shuffle::Shuffler;
use crate::domain::{Player, SkillLevel};

/// Players split by skill, each bracket in shuffled order
#[derive(Debug, Clone, Default)]
pub struct SkillBrackets {
    pub high: Vec<Player>,
    pub medium_low: Vec<Player>,
}

impl SkillBrackets {
    pub fn len(&self) -> usize {
        self.high.len() + self.medium_low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn partition_by_skill<S: Shuffler>(
    players: &[Player],
    min_count: usize,
    shuffler: &mut S,
) -> EngineResult<SkillBrackets> {
    let mut brackets = split_brackets(players);
    ensure_enough_players(&brackets, min_count)?;

    shuffler.shuffle(&mut brackets.high);
    shuffler.shuffle(&mut brackets.medium_low);

    debug!(
        "Partitioned roster: {} high, {} medium/low",
        brackets.high.len(),
        brackets.medium_low.len()
    );
    Ok(brackets)
}

fn split_brackets(players: &[Player]) -> SkillBrackets {
    let mut brackets = SkillBrackets::default();

    for player in players {
        match player.skill_level {
            SkillLevel::High => brackets.high.push(player.clone()),
            SkillLevel::MediumLow => brackets.medium_low.push(player.clone()),
            SkillLevel::Unassigned => {}
        }
    }

    brackets
}

fn ensure_enough_players(brackets: &SkillBrackets, min_count: usize) -> EngineResult<()> {
    let available = brackets.len();
    if available < min_count {
        return Err(EngineError::InsufficientPlayers {
            required: min_count,
            available,
        });
    }
    Ok(())
}
