use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

pub type PlayerId = String;
pub type TeamId = String;
pub type MatchId = String;
pub type TournamentId = String;

#[derive(Debug, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Skill bracket a player is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    High,
    MediumLow,
    Unassigned,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::High => "high",
            SkillLevel::MediumLow => "medium_low",
            SkillLevel::Unassigned => "unassigned",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::High => "High",
            SkillLevel::MediumLow => "Medium/Low",
            SkillLevel::Unassigned => "Unassigned",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "a" => Ok(SkillLevel::High),
            "medium_low" | "medium-low" | "mediumlow" | "b" => Ok(SkillLevel::MediumLow),
            "unassigned" | "none" => Ok(SkillLevel::Unassigned),
            _ => Err(ParseEnumError::new("skill level", s)),
        }
    }
}

/// Player data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub surname: String,
    pub nickname: Option<String>,
    pub contact: Option<String>,
    pub skill_level: SkillLevel,
    pub matches_played: u32,
    pub matches_won: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points: u32,
    pub created_at: Option<NaiveDateTime>,
}

impl Player {
    pub fn new(name: &str, surname: &str, skill_level: SkillLevel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
            nickname: None,
            contact: None,
            skill_level,
            matches_played: 0,
            matches_won: 0,
            sets_won: 0,
            sets_lost: 0,
            games_won: 0,
            games_lost: 0,
            points: 0,
            created_at: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_nickname(mut self, nickname: Option<String>) -> Self {
        self.nickname = nickname.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn with_contact(mut self, contact: Option<String>) -> Self {
        self.contact = contact.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn display_name(&self) -> String {
        self.nickname.clone().unwrap_or_else(|| self.full_name())
    }

    /// Case-insensitive match over name, surname and nickname
    pub fn matches_search(&self, term: &str) -> bool {
        let haystack = format!(
            "{} {} {}",
            self.name,
            self.surname,
            self.nickname.as_deref().unwrap_or("")
        )
        .to_lowercase();
        haystack.contains(&term.trim().to_lowercase())
    }

    /// Copy the cumulative counters from a freshly computed stats record
    pub fn apply_stats(&mut self, stats: &PlayerStats) {
        self.matches_played = stats.matches_played;
        self.matches_won = stats.matches_won;
        self.sets_won = stats.sets_won;
        self.sets_lost = stats.sets_lost;
        self.games_won = stats.games_won;
        self.games_lost = stats.games_lost;
        self.points = stats.points;
    }
}

/// Two players playing together for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub player1: Player,
    pub player2: Player,
}

impl Team {
    pub fn new(player1: Player, player2: Player) -> Self {
        Self {
            id: format!("t-{}", Uuid::new_v4()),
            player1,
            player2,
        }
    }

    pub fn player_ids(&self) -> [&str; 2] {
        [self.player1.id.as_str(), self.player2.id.as_str()]
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.player1.id == player_id || self.player2.id == player_id
    }

    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            self.player1.display_name(),
            self.player2.display_name()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    One,
    Two,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::One => TeamSide::Two,
            TeamSide::Two => TeamSide::One,
        }
    }
}

/// One side of a set score.
///
/// Stored and exchanged as a number, `"GP"`, or an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreValue {
    Numeric(u32),
    GoldenPointWin,
    #[default]
    Unset,
}

impl ScoreValue {
    pub fn as_number(&self) -> Option<u32> {
        match self {
            ScoreValue::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, ScoreValue::Unset)
    }
}

impl FromStr for ScoreValue {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return Ok(ScoreValue::Unset);
        }
        if trimmed.eq_ignore_ascii_case("gp") {
            return Ok(ScoreValue::GoldenPointWin);
        }
        trimmed
            .parse::<u32>()
            .map(ScoreValue::Numeric)
            .map_err(|_| ParseEnumError::new("score", s))
    }
}

impl Serialize for ScoreValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScoreValue::Numeric(n) => serializer.serialize_u32(*n),
            ScoreValue::GoldenPointWin => serializer.serialize_str("GP"),
            ScoreValue::Unset => serializer.serialize_str(""),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for ScoreValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<RawScore>::deserialize(deserializer)? {
            None => Ok(ScoreValue::Unset),
            Some(RawScore::Number(n)) => Ok(ScoreValue::Numeric(n)),
            Some(RawScore::Text(text)) => text.parse().map_err(de::Error::custom),
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Numeric(n) => write!(f, "{}", n),
            ScoreValue::GoldenPointWin => write!(f, "GP"),
            ScoreValue::Unset => Ok(()),
        }
    }
}

/// Score of a single set, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSetScore {
    pub set_number: u32,
    #[serde(default)]
    pub team1_score: ScoreValue,
    #[serde(default)]
    pub team2_score: ScoreValue,
}

impl MatchSetScore {
    pub fn new(set_number: u32, team1_score: ScoreValue, team2_score: ScoreValue) -> Self {
        Self {
            set_number,
            team1_score,
            team2_score,
        }
    }

    pub fn numeric(set_number: u32, team1: u32, team2: u32) -> Self {
        Self::new(set_number, ScoreValue::Numeric(team1), ScoreValue::Numeric(team2))
    }

    pub fn blank(set_number: u32) -> Self {
        Self::new(set_number, ScoreValue::Unset, ScoreValue::Unset)
    }

    /// Parse "6-4", "6-", "-4" or "-"
    pub fn parse(set_number: u32, text: &str) -> Result<Self, ParseEnumError> {
        let (left, right) = text.split_once('-').unwrap_or((text, ""));
        Ok(Self::new(set_number, left.parse()?, right.parse()?))
    }

    pub fn is_blank(&self) -> bool {
        self.team1_score.is_unset() && self.team2_score.is_unset()
    }

    pub fn is_half_filled(&self) -> bool {
        self.team1_score.is_unset() != self.team2_score.is_unset()
    }

    /// Both sides numeric
    pub fn numeric_pair(&self) -> Option<(u32, u32)> {
        Some((self.team1_score.as_number()?, self.team2_score.as_number()?))
    }

    /// Side that won the set; equal scores count for nobody
    pub fn set_winner(&self) -> Option<TeamSide> {
        let (team1, team2) = self.numeric_pair()?;
        if team1 > team2 {
            Some(TeamSide::One)
        } else if team2 > team1 {
            Some(TeamSide::Two)
        } else {
            None
        }
    }
}

impl fmt::Display for MatchSetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team1_score, self.team2_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "PENDING",
            MatchStatus::InProgress => "IN_PROGRESS",
            MatchStatus::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed)
    }
}

impl FromStr for MatchStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(MatchStatus::Pending),
            "IN_PROGRESS" => Ok(MatchStatus::InProgress),
            "COMPLETED" => Ok(MatchStatus::Completed),
            _ => Err(ParseEnumError::new("match status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    #[default]
    BestOfThree,
    GoldenPoint,
}

impl MatchFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFormat::BestOfThree => "best_of_three",
            MatchFormat::GoldenPoint => "golden_point",
        }
    }
}

impl FromStr for MatchFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "best_of_three" | "bo3" => Ok(MatchFormat::BestOfThree),
            "golden_point" | "gp" => Ok(MatchFormat::GoldenPoint),
            _ => Err(ParseEnumError::new("match format", s)),
        }
    }
}

/// Rule used to combine skill brackets into teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    #[default]
    Balanced,
    HighOnly,
    MediumLowOnly,
    Mixed,
}

impl PairingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingStrategy::Balanced => "balanced",
            PairingStrategy::HighOnly => "high_only",
            PairingStrategy::MediumLowOnly => "medium_low_only",
            PairingStrategy::Mixed => "mixed",
        }
    }
}

impl FromStr for PairingStrategy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "balanced" => Ok(PairingStrategy::Balanced),
            "high_only" | "high" => Ok(PairingStrategy::HighOnly),
            "medium_low_only" | "medium_low" => Ok(PairingStrategy::MediumLowOnly),
            "mixed" | "random" => Ok(PairingStrategy::Mixed),
            _ => Err(ParseEnumError::new("pairing strategy", s)),
        }
    }
}

/// Match data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: Option<TournamentId>,
    pub round: u32,
    pub team1: Team,
    pub team2: Team,
    pub court: Option<String>,
    pub scores: Vec<MatchSetScore>,
    pub winner_team_id: Option<TeamId>,
    pub status: MatchStatus,
    pub format: MatchFormat,
    pub created_at: Option<NaiveDateTime>,
}

impl Match {
    /// Fresh match with no scores and no winner
    pub fn pending(team1: Team, team2: Team, round: u32, format: MatchFormat) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tournament_id: None,
            round,
            team1,
            team2,
            court: None,
            scores: Vec::new(),
            winner_team_id: None,
            status: MatchStatus::Pending,
            format,
            created_at: None,
        }
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::One => &self.team1,
            TeamSide::Two => &self.team2,
        }
    }

    pub fn side_of_team(&self, team_id: &str) -> Option<TeamSide> {
        if self.team1.id == team_id {
            Some(TeamSide::One)
        } else if self.team2.id == team_id {
            Some(TeamSide::Two)
        } else {
            None
        }
    }

    pub fn side_of_player(&self, player_id: &str) -> Option<TeamSide> {
        if self.team1.contains(player_id) {
            Some(TeamSide::One)
        } else if self.team2.contains(player_id) {
            Some(TeamSide::Two)
        } else {
            None
        }
    }

    pub fn winner_side(&self) -> Option<TeamSide> {
        self.winner_team_id
            .as_deref()
            .and_then(|id| self.side_of_team(id))
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.side_of_player(player_id).is_some()
    }

    pub fn player_ids(&self) -> [&str; 4] {
        let [a, b] = self.team1.player_ids();
        let [c, d] = self.team2.player_ids();
        [a, b, c, d]
    }

    pub fn score_line(&self) -> String {
        self.scores
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Draft => "DRAFT",
            TournamentStatus::Active => "ACTIVE",
            TournamentStatus::Completed => "COMPLETED",
        }
    }
}

impl FromStr for TournamentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(TournamentStatus::Draft),
            "ACTIVE" => Ok(TournamentStatus::Active),
            "COMPLETED" => Ok(TournamentStatus::Completed),
            _ => Err(ParseEnumError::new("tournament status", s)),
        }
    }
}

/// Tournament data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub status: TournamentStatus,
    pub max_players: u32,
    pub player_ids: Vec<PlayerId>,
    pub current_round: u32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl Tournament {
    pub fn new(name: &str, max_players: u32, player_ids: Vec<PlayerId>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            status: TournamentStatus::Draft,
            max_players,
            player_ids,
            current_round: 1,
            start_date: None,
            end_date: None,
            created_at: None,
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.player_ids.iter().any(|id| id == player_id)
    }

    /// Roster players, in the order of the given snapshot
    pub fn roster<'a>(&self, players: &'a [Player]) -> Vec<&'a Player> {
        players.iter().filter(|p| self.has_player(&p.id)).collect()
    }
}

/// Points awarded per match outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsConfig {
    pub win: u32,
    pub tie_break_loss: u32,
    pub loss: u32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            win: 3,
            tie_break_loss: 1,
            loss: 0,
        }
    }
}

/// Runtime settings, persisted alongside the data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub points: PointsConfig,
    pub pairing_strategy: PairingStrategy,
    pub match_format: MatchFormat,
    pub current_tournament_id: Option<TournamentId>,
}

/// Sets won divided by sets lost
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetRatio {
    Finite(f64),
    Infinite,
}

impl SetRatio {
    pub fn from_counts(won: u32, lost: u32) -> Self {
        match (won, lost) {
            (0, 0) => SetRatio::Finite(0.0),
            (_, 0) => SetRatio::Infinite,
            _ => SetRatio::Finite(won as f64 / lost as f64),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            SetRatio::Finite(value) => *value,
            SetRatio::Infinite => f64::INFINITY,
        }
    }
}

impl fmt::Display for SetRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetRatio::Finite(value) => write!(f, "{:.2}", value),
            SetRatio::Infinite => write!(f, "Inf"),
        }
    }
}

/// Per-player statistics recomputed from match history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub tournament_id: Option<TournamentId>,
    pub name: String,
    pub surname: String,
    pub nickname: Option<String>,
    pub skill_level: SkillLevel,
    pub matches_played: u32,
    pub matches_won: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points: u32,
}

impl PlayerStats {
    pub fn zeroed(player: &Player, tournament_id: Option<&str>) -> Self {
        Self {
            player_id: player.id.clone(),
            tournament_id: tournament_id.map(str::to_string),
            name: player.name.clone(),
            surname: player.surname.clone(),
            nickname: player.nickname.clone(),
            skill_level: player.skill_level,
            matches_played: 0,
            matches_won: 0,
            sets_won: 0,
            sets_lost: 0,
            games_won: 0,
            games_lost: 0,
            points: 0,
        }
    }

    pub fn set_ratio(&self) -> SetRatio {
        SetRatio::from_counts(self.sets_won, self.sets_lost)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn display_name(&self) -> String {
        self.nickname.clone().unwrap_or_else(|| self.full_name())
    }
}
