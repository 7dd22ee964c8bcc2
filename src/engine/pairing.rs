use log::debug;

use super::errors::{EngineError, EngineResult};
use super::partition::SkillBrackets;
use super::shuffle::Shuffler;
use crate::domain::{PairingStrategy, Player, Team};

const MIN_TEAMS: usize = 2;

/// Build two-player teams from the brackets; leftover players sit out.
///
/// Players are taken from the end of each bracket. The returned list is
/// reshuffled so that pairing order does not predict match opponents.
pub fn form_teams<S: Shuffler>(
    brackets: SkillBrackets,
    strategy: PairingStrategy,
    shuffler: &mut S,
) -> EngineResult<Vec<Team>> {
    let SkillBrackets {
        mut high,
        mut medium_low,
    } = brackets;

    let mut teams = match strategy {
        PairingStrategy::Balanced => pair_across(&mut high, &mut medium_low),
        PairingStrategy::HighOnly => pair_within(&mut high),
        PairingStrategy::MediumLowOnly => pair_within(&mut medium_low),
        PairingStrategy::Mixed => pair_mixed(high, medium_low, shuffler),
    };

    ensure_enough_teams(&teams)?;
    shuffler.shuffle(&mut teams);

    debug!(
        "Formed {} teams with strategy {}",
        teams.len(),
        strategy.as_str()
    );
    Ok(teams)
}

fn pair_across(high: &mut Vec<Player>, medium_low: &mut Vec<Player>) -> Vec<Team> {
    let mut teams = Vec::new();

    while let (Some(first), Some(second)) = pop_across(high, medium_low) {
        teams.push(Team::new(first, second));
    }

    teams
}

fn pop_across(
    high: &mut Vec<Player>,
    medium_low: &mut Vec<Player>,
) -> (Option<Player>, Option<Player>) {
    if high.is_empty() || medium_low.is_empty() {
        return (None, None);
    }
    (high.pop(), medium_low.pop())
}

fn pair_within(pool: &mut Vec<Player>) -> Vec<Team> {
    let mut teams = Vec::new();

    while pool.len() >= 2 {
        if let (Some(first), Some(second)) = (pool.pop(), pool.pop()) {
            teams.push(Team::new(first, second));
        }
    }

    teams
}

fn pair_mixed<S: Shuffler>(
    high: Vec<Player>,
    medium_low: Vec<Player>,
    shuffler: &mut S,
) -> Vec<Team> {
    let mut pool = high;
    pool.extend(medium_low);
    shuffler.shuffle(&mut pool);
    pair_within(&mut pool)
}

fn ensure_enough_teams(teams: &[Team]) -> EngineResult<()> {
    if teams.len() < MIN_TEAMS {
        return Err(EngineError::NotEnoughTeams {
            formed: teams.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkillLevel;
    use crate::engine::shuffle::{PreserveOrder, RandomShuffler};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn players(prefix: &str, count: usize, skill: SkillLevel) -> Vec<Player> {
        (0..count)
            .map(|i| {
                let id = format!("{prefix}{i}");
                Player::new(&id, "Test", skill).with_id(&id)
            })
            .collect()
    }

    fn brackets(high: usize, medium_low: usize) -> SkillBrackets {
        SkillBrackets {
            high: players("h", high, SkillLevel::High),
            medium_low: players("m", medium_low, SkillLevel::MediumLow),
        }
    }

    fn pair_ids(team: &Team) -> (String, String) {
        (team.player1.id.clone(), team.player2.id.clone())
    }

    #[test]
    fn test_balanced_pops_from_the_end() {
        let teams = form_teams(brackets(3, 2), PairingStrategy::Balanced, &mut PreserveOrder)
            .unwrap();

        let pairs: Vec<_> = teams.iter().map(pair_ids).collect();
        assert_eq!(
            pairs,
            vec![
                ("h2".to_string(), "m1".to_string()),
                ("h1".to_string(), "m0".to_string()),
            ]
        );
    }

    #[test]
    fn test_high_only_drops_odd_player() {
        let teams = form_teams(brackets(5, 4), PairingStrategy::HighOnly, &mut PreserveOrder)
            .unwrap();

        let pairs: Vec<_> = teams.iter().map(pair_ids).collect();
        assert_eq!(
            pairs,
            vec![
                ("h4".to_string(), "h3".to_string()),
                ("h2".to_string(), "h1".to_string()),
            ]
        );
    }

    #[test]
    fn test_medium_low_only_uses_single_bracket() {
        let teams = form_teams(
            brackets(6, 4),
            PairingStrategy::MediumLowOnly,
            &mut PreserveOrder,
        )
        .unwrap();

        assert_eq!(teams.len(), 2);
        assert!(teams
            .iter()
            .all(|t| t.player1.skill_level == SkillLevel::MediumLow
                && t.player2.skill_level == SkillLevel::MediumLow));
    }

    #[test]
    fn test_mixed_combines_both_brackets() {
        let teams = form_teams(brackets(3, 2), PairingStrategy::Mixed, &mut PreserveOrder)
            .unwrap();

        let pairs: Vec<_> = teams.iter().map(pair_ids).collect();
        assert_eq!(
            pairs,
            vec![
                ("m1".to_string(), "m0".to_string()),
                ("h2".to_string(), "h1".to_string()),
            ]
        );
    }

    #[test]
    fn test_fails_with_fewer_than_two_teams() {
        let result = form_teams(brackets(1, 3), PairingStrategy::Balanced, &mut PreserveOrder);
        assert_eq!(result.unwrap_err(), EngineError::NotEnoughTeams { formed: 1 });

        let result = form_teams(brackets(8, 1), PairingStrategy::MediumLowOnly, &mut PreserveOrder);
        assert_eq!(result.unwrap_err(), EngineError::NotEnoughTeams { formed: 0 });
    }

    #[test]
    fn test_no_player_appears_twice_for_any_strategy() {
        let strategies = [
            PairingStrategy::Balanced,
            PairingStrategy::HighOnly,
            PairingStrategy::MediumLowOnly,
            PairingStrategy::Mixed,
        ];

        for seed in 0..10 {
            for strategy in strategies {
                let mut shuffler = RandomShuffler::from_rng(StdRng::seed_from_u64(seed));
                let teams = form_teams(brackets(7, 6), strategy, &mut shuffler).unwrap();

                let mut seen = HashSet::new();
                for team in &teams {
                    assert_ne!(team.player1.id, team.player2.id);
                    assert!(seen.insert(team.player1.id.clone()));
                    assert!(seen.insert(team.player2.id.clone()));
                }
            }
        }
    }

    #[test]
    fn test_team_ids_are_unique() {
        let teams = form_teams(brackets(4, 4), PairingStrategy::Balanced, &mut PreserveOrder)
            .unwrap();
        let ids: HashSet<_> = teams.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), teams.len());
        assert!(teams.iter().all(|t| t.id.starts_with("t-")));
    }
}
