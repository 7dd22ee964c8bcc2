pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod report;
pub mod services;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::{
    Command, MatchCommand, PlayerCommand, RoundCommand, SettingsCommand, StandingsArgs,
    TournamentCommand,
};
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::domain::MatchSetScore;
use crate::services::server::ServerService;
use crate::services::tournament::{
    LeaderboardQuery, ManualMatch, NewPlayer, NewTournament, PlayerUpdate, RoundOptions,
    SettingsUpdate, TournamentService, TournamentUpdate,
};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

/// Open the configured database and run `f` against an initialized service
fn with_service<T>(f: impl FnOnce(&TournamentService) -> Result<T>) -> Result<T> {
    let config = AppConfig::new();
    let pool: DbPool = database::create_pool(&config.database.path)?;
    let service = TournamentService::new(&pool, &config);
    service.initialize()?;
    f(&service)
}

pub fn handle_player(command: &PlayerCommand) -> Result<()> {
    with_service(|service| match command {
        PlayerCommand::Add {
            name,
            surname,
            nickname,
            contact,
            skill,
        } => {
            let player = service.add_player(NewPlayer {
                name: name.clone(),
                surname: surname.clone(),
                nickname: nickname.clone(),
                contact: contact.clone(),
                skill_level: *skill,
            })?;
            report::print_player(&player);
            Ok(())
        }
        PlayerCommand::Update {
            id,
            name,
            surname,
            nickname,
            contact,
            skill,
        } => {
            let player = service.update_player(
                id,
                PlayerUpdate {
                    name: name.clone(),
                    surname: surname.clone(),
                    nickname: nickname.clone(),
                    contact: contact.clone(),
                    skill_level: *skill,
                },
            )?;
            report::print_player(&player);
            Ok(())
        }
        PlayerCommand::List { search, skill } => {
            let players = service.list_players(search.as_deref(), *skill)?;
            report::print_players(&players);
            Ok(())
        }
        PlayerCommand::Remove { id } => {
            service.remove_player(id)?;
            println!("Removed player {}", id);
            Ok(())
        }
    })
}

pub fn handle_tournament(command: &TournamentCommand) -> Result<()> {
    with_service(|service| match command {
        TournamentCommand::Create {
            name,
            description,
            max_players,
            players,
            start_date,
            end_date,
        } => {
            let tournament = service.create_tournament(NewTournament {
                name: name.clone(),
                description: description.clone(),
                max_players: *max_players,
                player_ids: players.clone(),
                start_date: start_date.clone(),
                end_date: end_date.clone(),
            })?;
            report::print_tournament(&tournament);
            Ok(())
        }
        TournamentCommand::Update {
            id,
            name,
            description,
            status,
            max_players,
            players,
            start_date,
            end_date,
        } => {
            let tournament = service.update_tournament(
                id,
                TournamentUpdate {
                    name: name.clone(),
                    description: description.clone(),
                    status: *status,
                    max_players: *max_players,
                    player_ids: players.clone(),
                    start_date: start_date.clone(),
                    end_date: end_date.clone(),
                },
            )?;
            report::print_tournament(&tournament);
            Ok(())
        }
        TournamentCommand::List => {
            let tournaments = service.list_tournaments()?;
            let settings = service.settings()?;
            report::print_tournaments(&tournaments, settings.current_tournament_id.as_deref());
            Ok(())
        }
        TournamentCommand::Select { id } => {
            let tournament = service.select_tournament(id)?;
            report::print_tournament(&tournament);
            Ok(())
        }
        TournamentCommand::Delete { id } => {
            service.delete_tournament(id)?;
            println!("Deleted tournament {}", id);
            Ok(())
        }
    })
}

pub fn handle_round(command: &RoundCommand) -> Result<()> {
    with_service(|service| match command {
        RoundCommand::Generate {
            tournament,
            strategy,
            format,
        } => {
            let options = RoundOptions {
                strategy: *strategy,
                format: *format,
            };
            let matches = service.generate_round(tournament.as_deref(), options)?;
            report::print_matches(&matches);
            Ok(())
        }
        RoundCommand::Clear { tournament } => {
            let removed = service.clear_unfinished_matches(tournament.as_deref())?;
            println!("Removed {} unfinished matches", removed);
            Ok(())
        }
    })
}

pub fn handle_match(command: &MatchCommand) -> Result<()> {
    with_service(|service| match command {
        MatchCommand::Create {
            team_a,
            team_b,
            court,
            format,
            tournament,
        } => {
            let manual = ManualMatch {
                team_a: team_a.clone(),
                team_b: team_b.clone(),
                court: court.clone(),
                format: *format,
            };
            let created = service.create_manual_match(tournament.as_deref(), manual)?;
            report::print_match(&created);
            Ok(())
        }
        MatchCommand::List { tournament } => {
            let matches = service.list_matches(tournament.as_deref())?;
            report::print_matches(&matches);
            Ok(())
        }
        MatchCommand::Record { id, sets, winner } => {
            let scores = parse_sets(sets)?;
            let saved = service.save_result(id, &scores, winner.as_deref())?;
            report::print_match(&saved);
            if let Some(tournament_id) = saved.tournament_id.as_deref() {
                println!();
                report::print_standings("Updated standings", &service.stored_standings(tournament_id)?);
            }
            Ok(())
        }
        MatchCommand::Draft { id, sets } => {
            let scores = parse_sets(sets)?;
            let saved = service.save_draft(id, &scores)?;
            report::print_match(&saved);
            Ok(())
        }
    })
}

pub fn handle_standings(args: &StandingsArgs) -> Result<()> {
    with_service(|service| {
        let query = LeaderboardQuery {
            skill: args.skill,
            sort_by: args.sort_by,
            top: args.top,
        };
        if args.overall {
            let standings = query.apply(service.overall_standings()?);
            report::print_standings("Overall ranking", &standings);
            return Ok(());
        }

        let title = match args.tournament.as_deref() {
            Some(id) => format!("Standings of '{}'", service.find_tournament(id)?.name),
            None => match service.current_tournament()? {
                Some(current) => format!("Standings of '{}'", current.name),
                None => "Standings".to_string(),
            },
        };
        let standings = query.apply(service.tournament_standings(args.tournament.as_deref())?);
        report::print_standings(&title, &standings);
        Ok(())
    })
}

pub fn handle_settings(command: &SettingsCommand) -> Result<()> {
    with_service(|service| {
        let settings = match command {
            SettingsCommand::Show => service.settings()?,
            SettingsCommand::Set {
                points_win,
                points_tie_break_loss,
                points_loss,
                strategy,
                format,
            } => service.update_settings(SettingsUpdate {
                points_win: *points_win,
                points_tie_break_loss: *points_tie_break_loss,
                points_loss: *points_loss,
                pairing_strategy: *strategy,
                match_format: *format,
            })?,
        };
        report::print_settings(&settings);
        Ok(())
    })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

/// Positional set scores become numbered sets starting at 1
fn parse_sets(sets: &[String]) -> Result<Vec<MatchSetScore>> {
    sets.iter()
        .enumerate()
        .map(|(index, text)| {
            MatchSetScore::parse(index as u32 + 1, text)
                .with_context(|| format!("invalid score for set {}: '{}'", index + 1, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreValue;

    #[test]
    fn test_parse_sets_numbers_from_one() {
        let sets = vec!["6-4".to_string(), "GP-".to_string()];
        let parsed = parse_sets(&sets).unwrap();

        assert_eq!(parsed[0], MatchSetScore::numeric(1, 6, 4));
        assert_eq!(parsed[1].set_number, 2);
        assert_eq!(parsed[1].team1_score, ScoreValue::GoldenPointWin);
        assert!(parsed[1].team2_score.is_unset());
    }

    #[test]
    fn test_parse_sets_reports_bad_set() {
        let sets = vec!["6-4".to_string(), "x-2".to_string()];
        let err = parse_sets(&sets).unwrap_err();
        assert!(err.to_string().contains("set 2"));
    }
}
