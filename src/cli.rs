use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::{MatchFormat, PairingStrategy, SkillLevel, TournamentStatus};
use crate::engine::SortKey;

#[derive(Parser, Debug)]
#[command(author, version, about = "padel tournament pairing and standings")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Manage players
    Player {
        #[clap(subcommand)]
        command: PlayerCommand,
    },
    /// Manage tournaments
    Tournament {
        #[clap(subcommand)]
        command: TournamentCommand,
    },
    /// Generate or clear rounds of the selected tournament
    Round {
        #[clap(subcommand)]
        command: RoundCommand,
    },
    /// Create matches and record results
    Match {
        #[clap(subcommand)]
        command: MatchCommand,
    },
    /// Print the ranking
    Standings(StandingsArgs),
    /// Show or change scoring and pairing settings
    Settings {
        #[clap(subcommand)]
        command: SettingsCommand,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum PlayerCommand {
    /// Register a new player
    Add {
        name: String,
        surname: String,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        /// high (a), medium_low (b) or unassigned
        #[arg(short, long)]
        skill: Option<SkillLevel>,
    },
    /// Change details of a player; an empty value clears nickname or contact
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(short, long)]
        skill: Option<SkillLevel>,
    },
    /// List players
    List {
        /// Substring of name, surname or nickname
        #[arg(short = 'q', long)]
        search: Option<String>,
        #[arg(short, long)]
        skill: Option<SkillLevel>,
    },
    /// Remove a player not involved in open matches
    Remove { id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum TournamentCommand {
    /// Create a tournament and select it
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        max_players: Option<u32>,
        /// Comma-separated player ids
        #[arg(long, value_delimiter = ',')]
        players: Vec<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Edit a tournament; --players replaces the whole roster
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// draft, active or completed
        #[arg(long)]
        status: Option<TournamentStatus>,
        #[arg(long)]
        max_players: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        players: Option<Vec<String>>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// List tournaments
    List,
    /// Make a tournament the current one
    Select { id: String },
    /// Delete a tournament with its matches
    Delete { id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum RoundCommand {
    /// Pair players and schedule the next round
    Generate {
        #[arg(short, long)]
        tournament: Option<String>,
        /// balanced, high_only, medium_low_only or mixed
        #[arg(short, long)]
        strategy: Option<PairingStrategy>,
        /// best_of_three or golden_point
        #[arg(short, long)]
        format: Option<MatchFormat>,
    },
    /// Delete pending and in-progress matches
    Clear {
        #[arg(short, long)]
        tournament: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum MatchCommand {
    /// Create a match between two hand-picked teams
    Create {
        /// Two comma-separated player ids
        #[arg(long, value_delimiter = ',', required = true)]
        team_a: Vec<String>,
        /// Two comma-separated player ids
        #[arg(long, value_delimiter = ',', required = true)]
        team_b: Vec<String>,
        #[arg(long)]
        court: Option<String>,
        #[arg(short, long)]
        format: Option<MatchFormat>,
        #[arg(short, long)]
        tournament: Option<String>,
    },
    /// List matches of a tournament
    List {
        #[arg(short, long)]
        tournament: Option<String>,
    },
    /// Record the final result
    #[command(name = "result")]
    Record {
        id: String,
        /// Set scores such as 6-4 3-6 7-5
        #[arg(allow_hyphen_values = true)]
        sets: Vec<String>,
        /// Winning team id, required for golden point
        #[arg(short, long)]
        winner: Option<String>,
    },
    /// Save partial scores without deciding the match
    Draft {
        id: String,
        #[arg(allow_hyphen_values = true)]
        sets: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct StandingsArgs {
    /// Rank across every tournament
    #[arg(long, conflicts_with = "tournament")]
    pub overall: bool,
    #[arg(short, long)]
    pub tournament: Option<String>,
    #[arg(short, long)]
    pub skill: Option<SkillLevel>,
    /// points, matches_won or sets_won
    #[arg(long, default_value = "points")]
    pub sort_by: SortKey,
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum SettingsCommand {
    /// Print current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long)]
        points_win: Option<u32>,
        #[arg(long)]
        points_tie_break_loss: Option<u32>,
        #[arg(long)]
        points_loss: Option<u32>,
        #[arg(long)]
        strategy: Option<PairingStrategy>,
        #[arg(long)]
        format: Option<MatchFormat>,
    },
}
