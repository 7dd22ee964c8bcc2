use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, DbPool};
use crate::domain::{
    AppSettings, Match, MatchFormat, MatchSetScore, MatchStatus, PairingStrategy, Player,
    PlayerStats, SkillLevel, Tournament, TournamentStatus,
};
use crate::engine::{
    self, filter_by_skill, rank_by, top, RandomShuffler, RoundRequest, Shuffler, SortKey,
    StandingsScope,
};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default)]
pub struct NewPlayer {
    pub name: String,
    pub surname: String,
    pub nickname: Option<String>,
    pub contact: Option<String>,
    pub skill_level: Option<SkillLevel>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTournament {
    pub name: String,
    pub description: Option<String>,
    pub max_players: Option<u32>,
    pub player_ids: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Fields left as `None` keep their stored value; an empty text clears it
#[derive(Debug, Clone, Default)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub nickname: Option<String>,
    pub contact: Option<String>,
    pub skill_level: Option<SkillLevel>,
}

#[derive(Debug, Clone, Default)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TournamentStatus>,
    pub max_players: Option<u32>,
    pub player_ids: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Per-round overrides of the stored settings
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundOptions {
    pub strategy: Option<PairingStrategy>,
    pub format: Option<MatchFormat>,
}

#[derive(Debug, Clone, Default)]
pub struct ManualMatch {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub court: Option<String>,
    pub format: Option<MatchFormat>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsUpdate {
    pub points_win: Option<u32>,
    pub points_tie_break_loss: Option<u32>,
    pub points_loss: Option<u32>,
    pub pairing_strategy: Option<PairingStrategy>,
    pub match_format: Option<MatchFormat>,
}

/// Leaderboard view over computed standings
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderboardQuery {
    pub skill: Option<SkillLevel>,
    pub sort_by: SortKey,
    pub top: Option<usize>,
}

impl LeaderboardQuery {
    pub fn apply(&self, standings: Vec<PlayerStats>) -> Vec<PlayerStats> {
        let filtered = match self.skill {
            Some(skill) => filter_by_skill(&standings, skill),
            None => standings,
        };
        let ranked = rank_by(&filtered, self.sort_by);
        match self.top {
            Some(n) => top(&ranked, n).to_vec(),
            None => ranked,
        }
    }
}

/// Loads snapshots, runs the engine and persists the outcome
pub struct TournamentService<'a> {
    pool: &'a DbPool,
    config: &'a AppConfig,
}

impl<'a> TournamentService<'a> {
    pub fn new(pool: &'a DbPool, config: &'a AppConfig) -> Self {
        Self { pool, config }
    }

    fn connection(&self) -> Result<DbConn> {
        database::get_connection(self.pool)
    }

    pub fn initialize(&self) -> Result<()> {
        let mut conn = self.connection()?;
        database::initialize_database(&mut conn, &self.config.scoring.defaults)
    }

    // --- settings ---

    pub fn settings(&self) -> Result<AppSettings> {
        let mut conn = self.connection()?;
        load_settings(&mut conn, self.config)
    }

    pub fn update_settings(&self, update: SettingsUpdate) -> Result<AppSettings> {
        let mut conn = self.connection()?;
        let mut settings = load_settings(&mut conn, self.config)?;

        if let Some(win) = update.points_win {
            settings.points.win = win;
        }
        if let Some(tie_break_loss) = update.points_tie_break_loss {
            settings.points.tie_break_loss = tie_break_loss;
        }
        if let Some(loss) = update.points_loss {
            settings.points.loss = loss;
        }
        if let Some(strategy) = update.pairing_strategy {
            settings.pairing_strategy = strategy;
        }
        if let Some(format) = update.match_format {
            settings.match_format = format;
        }

        let saved = database::settings::save(&mut conn, &settings)?;
        info!(
            "Settings updated: win {} / tie-break loss {} / loss {}, {} pairing, {} format",
            saved.points.win,
            saved.points.tie_break_loss,
            saved.points.loss,
            saved.pairing_strategy.as_str(),
            saved.match_format.as_str()
        );
        Ok(saved)
    }

    // --- players ---

    pub fn add_player(&self, new_player: NewPlayer) -> Result<Player> {
        let name = required_text("name", &new_player.name)?;
        let surname = required_text("surname", &new_player.surname)?;
        let skill = new_player.skill_level.unwrap_or(SkillLevel::Unassigned);

        let player = Player::new(&name, &surname, skill)
            .with_nickname(new_player.nickname)
            .with_contact(new_player.contact);

        let mut conn = self.connection()?;
        let stored = database::players::insert_player(&mut conn, &player)?;
        info!("Added player {} ({})", stored.full_name(), stored.skill_level.label());
        Ok(stored)
    }

    pub fn update_player(&self, id: &str, update: PlayerUpdate) -> Result<Player> {
        let mut conn = self.connection()?;
        let mut player = database::players::find_by_id(&mut conn, id)?
            .ok_or_else(|| ServiceError::missing_player(id))?;

        if let Some(name) = update.name {
            player.name = required_text("name", &name)?;
        }
        if let Some(surname) = update.surname {
            player.surname = required_text("surname", &surname)?;
        }
        if let Some(nickname) = update.nickname {
            player.nickname = optional_text(nickname);
        }
        if let Some(contact) = update.contact {
            player.contact = optional_text(contact);
        }
        if let Some(skill) = update.skill_level {
            player.skill_level = skill;
        }

        let stored = database::players::update_player(&mut conn, &player)?
            .ok_or_else(|| ServiceError::missing_player(id))?;
        info!("Updated player {} ({})", stored.full_name(), stored.skill_level.label());
        Ok(stored)
    }

    pub fn find_player(&self, id: &str) -> Result<Player> {
        let mut conn = self.connection()?;
        database::players::find_by_id(&mut conn, id)?
            .ok_or_else(|| ServiceError::missing_player(id).into())
    }

    pub fn list_players(&self, search: Option<&str>, skill: Option<SkillLevel>) -> Result<Vec<Player>> {
        let mut conn = self.connection()?;
        let players = match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => database::players::search(&mut conn, term)?,
            None => database::players::list_all(&mut conn)?,
        };

        Ok(players
            .into_iter()
            .filter(|p| skill.is_none_or(|level| p.skill_level == level))
            .collect())
    }

    /// Refused while the player is part of an unresolved match
    pub fn remove_player(&self, id: &str) -> Result<()> {
        let mut conn = self.connection()?;
        let player = database::players::find_by_id(&mut conn, id)?
            .ok_or_else(|| ServiceError::missing_player(id))?;

        let open_matches = database::matches::list_all(&mut conn)?
            .into_iter()
            .filter(|m| !m.is_completed() && m.involves(id))
            .count();
        if open_matches > 0 {
            warn!("Refusing to remove {}: {} open match(es)", player.full_name(), open_matches);
            return Err(ServiceError::Conflict(format!(
                "player {} is in {} unfinished match(es)",
                player.full_name(),
                open_matches
            ))
            .into());
        }

        drop_from_rosters(&mut conn, id)?;
        database::players::delete_player(&mut conn, id)?;
        self.refresh_overall_counters(&mut conn)?;

        info!("Removed player {}", player.full_name());
        Ok(())
    }

    // --- tournaments ---

    /// Create a tournament and make it the current selection
    pub fn create_tournament(&self, new_tournament: NewTournament) -> Result<Tournament> {
        let name = required_text("name", &new_tournament.name)?;
        let max_players = new_tournament
            .max_players
            .unwrap_or(self.config.tournament.default_max_players);
        let player_ids = dedup_ids(new_tournament.player_ids);
        self.validate_capacity(max_players, player_ids.len())?;

        let mut conn = self.connection()?;
        ensure_players_exist(&mut conn, &player_ids)?;

        let mut tournament = Tournament::new(&name, max_players, player_ids);
        tournament.description = new_tournament.description.filter(|d| !d.trim().is_empty());
        tournament.start_date = new_tournament.start_date;
        tournament.end_date = new_tournament.end_date;

        let stored = database::tournaments::insert_tournament(&mut conn, &tournament)?;
        select_in_settings(&mut conn, self.config, Some(stored.id.clone()))?;

        info!(
            "Created tournament '{}' with {} players (max {})",
            stored.name,
            stored.player_ids.len(),
            stored.max_players
        );
        Ok(stored)
    }

    /// Edit details, roster or status; a roster change refreshes the stored stats
    pub fn update_tournament(&self, id: &str, update: TournamentUpdate) -> Result<Tournament> {
        let mut conn = self.connection()?;
        let mut tournament = find_tournament(&mut conn, id)?;

        if let Some(name) = update.name {
            tournament.name = required_text("name", &name)?;
        }
        if let Some(description) = update.description {
            tournament.description = optional_text(description);
        }
        if let Some(status) = update.status {
            tournament.status = status;
        }
        if let Some(start_date) = update.start_date {
            tournament.start_date = optional_text(start_date);
        }
        if let Some(end_date) = update.end_date {
            tournament.end_date = optional_text(end_date);
        }

        let roster_changed = update.player_ids.is_some();
        if let Some(player_ids) = update.player_ids {
            let player_ids = dedup_ids(player_ids);
            ensure_players_exist(&mut conn, &player_ids)?;
            tournament.player_ids = player_ids;
        }
        if let Some(max_players) = update.max_players {
            tournament.max_players = max_players;
        }
        self.validate_capacity(tournament.max_players, tournament.player_ids.len())?;

        let stored = database::tournaments::update_tournament(&mut conn, &tournament)?
            .ok_or_else(|| ServiceError::missing_tournament(id))?;
        if roster_changed {
            self.refresh_tournament_stats(&mut conn, &stored.id)?;
        }

        info!(
            "Updated tournament '{}' ({}, {} players)",
            stored.name,
            stored.status.as_str(),
            stored.player_ids.len()
        );
        Ok(stored)
    }

    fn validate_capacity(&self, max_players: u32, roster_size: usize) -> Result<()> {
        let cap = self.config.tournament.max_players_cap;
        if max_players == 0 || max_players > cap {
            return Err(ServiceError::Invalid(format!(
                "max players must be between 1 and {}, got {}",
                cap, max_players
            ))
            .into());
        }
        if roster_size > max_players as usize {
            return Err(ServiceError::Invalid(format!(
                "roster has {} players, tournament allows {}",
                roster_size, max_players
            ))
            .into());
        }
        Ok(())
    }

    pub fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        let mut conn = self.connection()?;
        database::tournaments::list_all(&mut conn)
    }

    pub fn find_tournament(&self, id: &str) -> Result<Tournament> {
        let mut conn = self.connection()?;
        find_tournament(&mut conn, id)
    }

    pub fn select_tournament(&self, id: &str) -> Result<Tournament> {
        let mut conn = self.connection()?;
        let tournament = find_tournament(&mut conn, id)?;
        select_in_settings(&mut conn, self.config, Some(tournament.id.clone()))?;
        info!("Selected tournament '{}'", tournament.name);
        Ok(tournament)
    }

    pub fn current_tournament(&self) -> Result<Option<Tournament>> {
        let mut conn = self.connection()?;
        current_tournament(&mut conn, self.config)
    }

    pub fn delete_tournament(&self, id: &str) -> Result<()> {
        let mut conn = self.connection()?;
        let tournament = find_tournament(&mut conn, id)?;

        database::tournaments::delete_tournament(&mut conn, id)?;

        let settings = load_settings(&mut conn, self.config)?;
        if settings.current_tournament_id.as_deref() == Some(id) {
            select_in_settings(&mut conn, self.config, None)?;
        }
        self.refresh_overall_counters(&mut conn)?;

        info!("Deleted tournament '{}'", tournament.name);
        Ok(())
    }

    // --- matches ---

    pub fn list_matches(&self, tournament_id: Option<&str>) -> Result<Vec<Match>> {
        let mut conn = self.connection()?;
        let tournament = self.resolve_tournament(&mut conn, tournament_id)?;
        database::matches::list_by_tournament(&mut conn, &tournament.id)
    }

    pub fn generate_round(
        &self,
        tournament_id: Option<&str>,
        options: RoundOptions,
    ) -> Result<Vec<Match>> {
        self.generate_round_with(tournament_id, options, &mut RandomShuffler::new())
    }

    /// Draw the next round and advance the tournament's round counter
    pub fn generate_round_with<S: Shuffler>(
        &self,
        tournament_id: Option<&str>,
        options: RoundOptions,
        shuffler: &mut S,
    ) -> Result<Vec<Match>> {
        let mut conn = self.connection()?;
        let mut tournament = self.resolve_tournament(&mut conn, tournament_id)?;
        let settings = load_settings(&mut conn, self.config)?;

        let players = database::players::list_all(&mut conn)?;
        let roster: Vec<Player> = tournament.roster(&players).into_iter().cloned().collect();
        let existing = database::matches::list_by_tournament(&mut conn, &tournament.id)?;

        let strategy = options.strategy.unwrap_or(settings.pairing_strategy);
        let format = options.format.unwrap_or(settings.match_format);
        let request = RoundRequest {
            tournament_id: Some(&tournament.id),
            round: tournament.current_round,
            strategy,
            format,
            min_players: self.config.tournament.min_players,
        };

        info!("=== Generating round {} of '{}' ===", request.round, tournament.name);
        let scheduled = engine::generate_round(&roster, &existing, &request, shuffler)?;
        let stored = database::matches::insert_many(&mut conn, &scheduled)?;

        tournament.current_round += 1;
        if tournament.status == TournamentStatus::Draft {
            tournament.status = TournamentStatus::Active;
        }
        database::tournaments::update_tournament(&mut conn, &tournament)?;

        info!(
            "  → {} matches scheduled ({} strategy, {} format)",
            stored.len(),
            strategy.as_str(),
            format.as_str()
        );
        Ok(stored)
    }

    /// Manual matches join the latest generated round
    pub fn create_manual_match(
        &self,
        tournament_id: Option<&str>,
        manual: ManualMatch,
    ) -> Result<Match> {
        let mut conn = self.connection()?;
        let tournament = self.resolve_tournament(&mut conn, tournament_id)?;
        let settings = load_settings(&mut conn, self.config)?;

        let players = database::players::list_all(&mut conn)?;
        let roster: Vec<Player> = tournament.roster(&players).into_iter().cloned().collect();

        let team_a = engine::assemble_team(&roster, &id_refs(&manual.team_a))?;
        let team_b = engine::assemble_team(&roster, &id_refs(&manual.team_b))?;
        let round = tournament.current_round.saturating_sub(1).max(1);

        let created = engine::create_manual_match(
            &team_a,
            &team_b,
            manual.format.unwrap_or(settings.match_format),
            manual.court.as_deref(),
            Some(&tournament.id),
            round,
        )?;
        let stored = database::matches::insert_match(&mut conn, &created)?;

        info!("Created manual match {} vs {}", stored.team1.label(), stored.team2.label());
        Ok(stored)
    }

    /// Resolve entered scores, persist the completed match and refresh stats
    pub fn save_result(
        &self,
        match_id: &str,
        scores: &[MatchSetScore],
        declared_winner: Option<&str>,
    ) -> Result<Match> {
        let mut conn = self.connection()?;
        let current = find_match(&mut conn, match_id)?;

        let resolved = engine::resolve_result(&current, scores, declared_winner)?;
        let stored = database::matches::update_result(&mut conn, &resolved)?
            .ok_or_else(|| ServiceError::missing_match(match_id))?;

        if let Some(tournament_id) = stored.tournament_id.as_deref() {
            self.refresh_tournament_stats(&mut conn, tournament_id)?;
        }
        self.refresh_overall_counters(&mut conn)?;

        info!("Recorded result for match {}: {}", stored.id, stored.score_line());
        Ok(stored)
    }

    /// Store partial scores; completed matches are refused
    pub fn save_draft(&self, match_id: &str, scores: &[MatchSetScore]) -> Result<Match> {
        let mut conn = self.connection()?;
        let current = find_match(&mut conn, match_id)?;

        if current.status == MatchStatus::Completed {
            warn!("Refusing draft scores for completed match {}", match_id);
            return Err(ServiceError::Conflict(format!(
                "match {} is already completed",
                match_id
            ))
            .into());
        }

        let draft = engine::save_draft_scores(&current, scores);
        database::matches::update_result(&mut conn, &draft)?
            .ok_or_else(|| ServiceError::missing_match(match_id).into())
    }

    pub fn clear_unfinished_matches(&self, tournament_id: Option<&str>) -> Result<usize> {
        let mut conn = self.connection()?;
        let tournament = self.resolve_tournament(&mut conn, tournament_id)?;
        let removed = database::matches::delete_unfinished(&mut conn, &tournament.id)?;
        info!("Removed {} unfinished matches from '{}'", removed, tournament.name);
        Ok(removed)
    }

    // --- standings ---

    /// Standings of the given tournament, or of the selected one
    pub fn tournament_standings(&self, tournament_id: Option<&str>) -> Result<Vec<PlayerStats>> {
        let mut conn = self.connection()?;
        let settings = load_settings(&mut conn, self.config)?;

        let tournament = match tournament_id.or(settings.current_tournament_id.as_deref()) {
            Some(id) => Some(find_tournament(&mut conn, id)?),
            None => None,
        };
        let scope = tournament.as_ref().map(StandingsScope::Tournament);

        let matches = match &tournament {
            Some(t) => database::matches::list_by_tournament(&mut conn, &t.id)?,
            None => Vec::new(),
        };
        let players = database::players::list_all(&mut conn)?;

        Ok(engine::compute_standings(
            &matches,
            &players,
            &settings.points,
            scope.as_ref(),
        )?)
    }

    /// Snapshot stored by the last result or roster change, in ranking order
    pub fn stored_standings(&self, tournament_id: &str) -> Result<Vec<PlayerStats>> {
        let mut conn = self.connection()?;
        find_tournament(&mut conn, tournament_id)?;
        let mut stored = database::stats::list_by_tournament(&mut conn, tournament_id)?;
        engine::sort_standings(&mut stored);
        Ok(stored)
    }

    pub fn overall_standings(&self) -> Result<Vec<PlayerStats>> {
        let mut conn = self.connection()?;
        let settings = load_settings(&mut conn, self.config)?;
        compute_overall(&mut conn, &settings)
    }

    fn refresh_tournament_stats(&self, conn: &mut DbConn, tournament_id: &str) -> Result<()> {
        let tournament = find_tournament(conn, tournament_id)?;
        let settings = load_settings(conn, self.config)?;
        let matches = database::matches::list_by_tournament(conn, tournament_id)?;
        let players = database::players::list_all(conn)?;

        let standings = engine::compute_standings(
            &matches,
            &players,
            &settings.points,
            Some(&StandingsScope::Tournament(&tournament)),
        )?;
        database::stats::replace_for_tournament(conn, tournament_id, &standings)?;
        Ok(())
    }

    fn refresh_overall_counters(&self, conn: &mut DbConn) -> Result<()> {
        let settings = load_settings(conn, self.config)?;
        for stats in compute_overall(conn, &settings)? {
            database::players::update_counters(conn, &stats)?;
        }
        Ok(())
    }

    fn resolve_tournament(&self, conn: &mut DbConn, tournament_id: Option<&str>) -> Result<Tournament> {
        match tournament_id {
            Some(id) => find_tournament(conn, id),
            None => current_tournament(conn, self.config)?.ok_or_else(|| {
                ServiceError::Invalid("no tournament selected".to_string()).into()
            }),
        }
    }
}

fn load_settings(conn: &mut DbConn, config: &AppConfig) -> Result<AppSettings> {
    Ok(database::settings::load(conn)?.unwrap_or_else(|| config.scoring.defaults.clone()))
}

fn select_in_settings(
    conn: &mut DbConn,
    config: &AppConfig,
    tournament_id: Option<String>,
) -> Result<AppSettings> {
    let mut settings = load_settings(conn, config)?;
    settings.current_tournament_id = tournament_id;
    database::settings::save(conn, &settings)
}

fn current_tournament(conn: &mut DbConn, config: &AppConfig) -> Result<Option<Tournament>> {
    match load_settings(conn, config)?.current_tournament_id {
        Some(id) => database::tournaments::find_by_id(conn, &id),
        None => Ok(None),
    }
}

fn find_tournament(conn: &mut DbConn, id: &str) -> Result<Tournament> {
    database::tournaments::find_by_id(conn, id)?
        .ok_or_else(|| ServiceError::missing_tournament(id).into())
}

fn find_match(conn: &mut DbConn, id: &str) -> Result<Match> {
    database::matches::find_by_id(conn, id)?
        .ok_or_else(|| ServiceError::missing_match(id).into())
}

fn compute_overall(conn: &mut DbConn, settings: &AppSettings) -> Result<Vec<PlayerStats>> {
    let matches = database::matches::list_all(conn)?;
    let players = database::players::list_all(conn)?;
    Ok(engine::compute_standings(
        &matches,
        &players,
        &settings.points,
        Some(&StandingsScope::Overall),
    )?)
}

fn drop_from_rosters(conn: &mut DbConn, player_id: &str) -> Result<()> {
    for mut tournament in database::tournaments::list_all(conn)? {
        if tournament.has_player(player_id) {
            tournament.player_ids.retain(|id| id != player_id);
            database::tournaments::update_tournament(conn, &tournament)
                .with_context(|| format!("Failed to update roster of '{}'", tournament.name))?;
        }
    }
    Ok(())
}

fn ensure_players_exist(conn: &mut DbConn, player_ids: &[String]) -> Result<()> {
    for id in player_ids {
        if database::players::find_by_id(conn, id)?.is_none() {
            return Err(ServiceError::missing_player(id).into());
        }
    }
    Ok(())
}

fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

fn id_refs(ids: &[String]) -> Vec<&str> {
    ids.iter().map(String::as_str).collect()
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!(ServiceError::Invalid(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreValue;
    use crate::engine::{EngineError, PreserveOrder};

    struct Fixture {
        pool: DbPool,
        config: AppConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Self {
                pool: database::create_memory_pool().unwrap(),
                config: AppConfig::default(),
            };
            fixture.service().initialize().unwrap();
            fixture
        }

        fn service(&self) -> TournamentService<'_> {
            TournamentService::new(&self.pool, &self.config)
        }
    }

    fn add(service: &TournamentService, name: &str, skill: SkillLevel) -> Player {
        service
            .add_player(NewPlayer {
                name: name.to_string(),
                surname: "Test".to_string(),
                skill_level: Some(skill),
                ..NewPlayer::default()
            })
            .unwrap()
    }

    fn seeded_tournament(service: &TournamentService, size: usize) -> (Tournament, Vec<Player>) {
        let players: Vec<Player> = (0..size)
            .map(|i| {
                let skill = if i % 2 == 0 { SkillLevel::High } else { SkillLevel::MediumLow };
                add(service, &format!("Player{i}"), skill)
            })
            .collect();
        let tournament = service
            .create_tournament(NewTournament {
                name: "Autumn Open".to_string(),
                player_ids: players.iter().map(|p| p.id.clone()).collect(),
                ..NewTournament::default()
            })
            .unwrap();
        (tournament, players)
    }

    fn straight_sets() -> Vec<MatchSetScore> {
        vec![MatchSetScore::numeric(1, 6, 2), MatchSetScore::numeric(2, 6, 3)]
    }

    fn engine_error(error: &anyhow::Error) -> Option<&EngineError> {
        error.downcast_ref::<EngineError>()
    }

    #[test]
    fn test_create_tournament_selects_it() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (tournament, _) = seeded_tournament(&service, 4);

        let current = service.current_tournament().unwrap().unwrap();
        assert_eq!(current.id, tournament.id);
        assert_eq!(current.max_players, 24);
    }

    #[test]
    fn test_create_tournament_validates_capacity() {
        let fixture = Fixture::new();
        let service = fixture.service();

        let too_big = service.create_tournament(NewTournament {
            name: "Huge".to_string(),
            max_players: Some(40),
            ..NewTournament::default()
        });
        assert!(too_big.is_err());

        let ghost = service.create_tournament(NewTournament {
            name: "Ghosts".to_string(),
            player_ids: vec!["nobody".to_string()],
            ..NewTournament::default()
        });
        let error = ghost.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ServiceError>(),
            Some(ServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_generate_round_advances_counter() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (tournament, _) = seeded_tournament(&service, 8);

        let matches = service
            .generate_round_with(None, RoundOptions::default(), &mut PreserveOrder)
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.round == 1 && m.status == MatchStatus::Pending));

        let updated = service.find_tournament(&tournament.id).unwrap();
        assert_eq!(updated.current_round, 2);
        assert_eq!(updated.status, TournamentStatus::Active);
    }

    #[test]
    fn test_generate_round_refuses_open_round() {
        let fixture = Fixture::new();
        let service = fixture.service();
        seeded_tournament(&service, 8);

        service.generate_round(None, RoundOptions::default()).unwrap();
        let error = service.generate_round(None, RoundOptions::default()).unwrap_err();

        assert_eq!(
            engine_error(&error),
            Some(&EngineError::RoundNotFinished { pending: 2 })
        );
    }

    #[test]
    fn test_generate_round_needs_four_players() {
        let fixture = Fixture::new();
        let service = fixture.service();
        seeded_tournament(&service, 3);

        let error = service.generate_round(None, RoundOptions::default()).unwrap_err();
        assert!(matches!(
            engine_error(&error),
            Some(EngineError::InsufficientPlayers { available: 3, .. })
        ));
    }

    #[test]
    fn test_save_result_updates_standings_and_counters() {
        let fixture = Fixture::new();
        let service = fixture.service();
        seeded_tournament(&service, 4);

        let round = service.generate_round(None, RoundOptions::default()).unwrap();
        let m = &round[0];
        let saved = service.save_result(&m.id, &straight_sets(), None).unwrap();
        assert_eq!(saved.status, MatchStatus::Completed);

        let standings = service.tournament_standings(None).unwrap();
        let winners: Vec<_> = standings.iter().filter(|s| s.points == 3).collect();
        assert_eq!(winners.len(), 2);
        assert!(standings.iter().all(|s| s.matches_played == 1));

        let winner = service.find_player(&saved.team1.player1.id).unwrap();
        assert_eq!((winner.matches_won, winner.points, winner.games_won), (1, 3, 12));
    }

    #[test]
    fn test_incomplete_result_leaves_match_open() {
        let fixture = Fixture::new();
        let service = fixture.service();
        seeded_tournament(&service, 4);

        let round = service.generate_round(None, RoundOptions::default()).unwrap();
        let scores = vec![MatchSetScore::numeric(1, 6, 4), MatchSetScore::numeric(2, 4, 6)];
        let error = service.save_result(&round[0].id, &scores, None).unwrap_err();
        assert!(matches!(engine_error(&error), Some(EngineError::IncompleteScore(_))));

        let matches = service.list_matches(None).unwrap();
        assert_eq!(matches[0].status, MatchStatus::Pending);
    }

    #[test]
    fn test_golden_point_result() {
        let fixture = Fixture::new();
        let service = fixture.service();
        seeded_tournament(&service, 4);

        let options = RoundOptions {
            format: Some(MatchFormat::GoldenPoint),
            ..RoundOptions::default()
        };
        let round = service.generate_round(None, options).unwrap();
        let m = &round[0];

        let saved = service.save_result(&m.id, &[], Some(&m.team2.id)).unwrap();
        assert_eq!(saved.winner_team_id.as_deref(), Some(m.team2.id.as_str()));
        assert_eq!(saved.scores[0].team2_score, ScoreValue::GoldenPointWin);
    }

    #[test]
    fn test_draft_then_refused_after_completion() {
        let fixture = Fixture::new();
        let service = fixture.service();
        seeded_tournament(&service, 4);

        let round = service.generate_round(None, RoundOptions::default()).unwrap();
        let m = &round[0];

        let draft = service.save_draft(&m.id, &[MatchSetScore::numeric(1, 6, 4)]).unwrap();
        assert_eq!(draft.status, MatchStatus::InProgress);

        service.save_result(&m.id, &straight_sets(), None).unwrap();
        let error = service.save_draft(&m.id, &[]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ServiceError>(),
            Some(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn test_remove_player_refused_while_playing() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (tournament, _) = seeded_tournament(&service, 4);

        let round = service.generate_round(None, RoundOptions::default()).unwrap();
        let busy = round[0].team1.player1.id.clone();
        assert!(service.remove_player(&busy).is_err());

        service.clear_unfinished_matches(None).unwrap();
        service.remove_player(&busy).unwrap();

        let roster = service.find_tournament(&tournament.id).unwrap().player_ids;
        assert_eq!(roster.len(), 3);
        assert!(!roster.contains(&busy));
    }

    #[test]
    fn test_manual_match_uses_roster() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (_, players) = seeded_tournament(&service, 4);
        let outsider = add(&service, "Outsider", SkillLevel::High);

        let ids = |i: usize, j: usize| vec![players[i].id.clone(), players[j].id.clone()];
        let created = service
            .create_manual_match(
                None,
                ManualMatch {
                    team_a: ids(0, 1),
                    team_b: ids(2, 3),
                    court: Some("Centrale".to_string()),
                    format: None,
                },
            )
            .unwrap();
        assert_eq!(created.court.as_deref(), Some("Centrale"));
        assert_eq!(created.round, 1);

        let error = service
            .create_manual_match(
                None,
                ManualMatch {
                    team_a: vec![players[0].id.clone(), outsider.id.clone()],
                    team_b: ids(2, 3),
                    ..ManualMatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(engine_error(&error), Some(EngineError::InvalidComposition(_))));
    }

    #[test]
    fn test_standings_without_selection_is_no_scope() {
        let fixture = Fixture::new();
        let service = fixture.service();
        add(&service, "Solo", SkillLevel::High);

        let error = service.tournament_standings(None).unwrap_err();
        assert_eq!(engine_error(&error), Some(&EngineError::NoScope));
        assert_eq!(service.overall_standings().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_tournament_clears_selection() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (tournament, _) = seeded_tournament(&service, 4);

        service.delete_tournament(&tournament.id).unwrap();

        assert!(service.current_tournament().unwrap().is_none());
        assert!(service.settings().unwrap().current_tournament_id.is_none());
    }

    #[test]
    fn test_update_settings_changes_points() {
        let fixture = Fixture::new();
        let service = fixture.service();

        let updated = service
            .update_settings(SettingsUpdate {
                points_win: Some(2),
                pairing_strategy: Some(PairingStrategy::Mixed),
                ..SettingsUpdate::default()
            })
            .unwrap();

        assert_eq!(updated.points.win, 2);
        assert_eq!(updated.points.tie_break_loss, 1);
        assert_eq!(service.settings().unwrap().pairing_strategy, PairingStrategy::Mixed);
    }

    #[test]
    fn test_leaderboard_query() {
        let fixture = Fixture::new();
        let service = fixture.service();
        add(&service, "Anna", SkillLevel::High);
        add(&service, "Bea", SkillLevel::MediumLow);
        add(&service, "Carla", SkillLevel::High);

        let standings = service.overall_standings().unwrap();
        let query = LeaderboardQuery {
            skill: Some(SkillLevel::High),
            top: Some(1),
            ..LeaderboardQuery::default()
        };

        let view = query.apply(standings);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Anna");
    }

    #[test]
    fn test_player_search_and_skill_filter() {
        let fixture = Fixture::new();
        let service = fixture.service();
        add(&service, "Marco", SkillLevel::High);
        add(&service, "Marta", SkillLevel::MediumLow);

        assert_eq!(service.list_players(Some("mar"), None).unwrap().len(), 2);
        assert_eq!(
            service.list_players(Some("mar"), Some(SkillLevel::High)).unwrap()[0].name,
            "Marco"
        );
        assert!(service.add_player(NewPlayer::default()).is_err());
    }

    #[test]
    fn test_create_tournament_ignores_repeated_ids_for_capacity() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let anna = add(&service, "Anna", SkillLevel::High);
        let bea = add(&service, "Bea", SkillLevel::MediumLow);

        let created = service
            .create_tournament(NewTournament {
                name: "Doubles".to_string(),
                max_players: Some(2),
                player_ids: vec![anna.id.clone(), bea.id.clone(), anna.id.clone()],
                ..NewTournament::default()
            })
            .unwrap();
        assert_eq!(created.player_ids, vec![anna.id, bea.id]);
    }

    #[test]
    fn test_update_player_changes_only_given_fields() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let marco = service
            .add_player(NewPlayer {
                name: "Marco".to_string(),
                surname: "Bianchi".to_string(),
                nickname: Some("Bomber".to_string()),
                ..NewPlayer::default()
            })
            .unwrap();

        let updated = service
            .update_player(
                &marco.id,
                PlayerUpdate {
                    skill_level: Some(SkillLevel::High),
                    contact: Some("marco@example.com".to_string()),
                    nickname: Some(" ".to_string()),
                    ..PlayerUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.skill_level, SkillLevel::High);
        assert_eq!(updated.contact.as_deref(), Some("marco@example.com"));
        assert_eq!(updated.nickname, None);
        assert_eq!(updated.surname, "Bianchi");
        assert_eq!(service.find_player(&marco.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_player_is_not_found() {
        let fixture = Fixture::new();
        let service = fixture.service();

        let error = service
            .update_player("ghost", PlayerUpdate::default())
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<ServiceError>(),
            Some(&ServiceError::missing_player("ghost"))
        );
    }

    #[test]
    fn test_update_tournament_roster_and_status() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (tournament, players) = seeded_tournament(&service, 4);
        let newcomer = add(&service, "Newcomer", SkillLevel::High);

        let mut roster: Vec<String> = players.iter().map(|p| p.id.clone()).collect();
        roster.push(newcomer.id.clone());
        let updated = service
            .update_tournament(
                &tournament.id,
                TournamentUpdate {
                    name: Some("Autumn Final".to_string()),
                    player_ids: Some(roster),
                    status: Some(TournamentStatus::Completed),
                    ..TournamentUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Autumn Final");
        assert_eq!(updated.status, TournamentStatus::Completed);
        assert!(updated.has_player(&newcomer.id));
        assert_eq!(service.stored_standings(&tournament.id).unwrap().len(), 5);
    }

    #[test]
    fn test_update_tournament_validates_roster() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (tournament, players) = seeded_tournament(&service, 4);

        let shrink = service.update_tournament(
            &tournament.id,
            TournamentUpdate {
                max_players: Some(3),
                ..TournamentUpdate::default()
            },
        );
        assert!(matches!(
            shrink.unwrap_err().downcast_ref::<ServiceError>(),
            Some(ServiceError::Invalid(_))
        ));

        let ghost = service.update_tournament(
            &tournament.id,
            TournamentUpdate {
                player_ids: Some(vec![players[0].id.clone(), "nobody".to_string()]),
                ..TournamentUpdate::default()
            },
        );
        assert!(matches!(
            ghost.unwrap_err().downcast_ref::<ServiceError>(),
            Some(ServiceError::NotFound { .. })
        ));

        let unchanged = service.find_tournament(&tournament.id).unwrap();
        assert_eq!(unchanged.player_ids.len(), 4);
        assert_eq!(unchanged.max_players, 24);
    }

    #[test]
    fn test_stored_standings_follow_results() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let (tournament, _) = seeded_tournament(&service, 4);

        let round = service.generate_round(None, RoundOptions::default()).unwrap();
        service.save_result(&round[0].id, &straight_sets(), None).unwrap();

        let stored = service.stored_standings(&tournament.id).unwrap();
        let computed = service.tournament_standings(Some(&tournament.id)).unwrap();
        assert_eq!(stored, computed);
        assert_eq!(stored[0].points, 3);
    }
}
