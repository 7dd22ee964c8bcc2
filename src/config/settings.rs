use crate::domain::AppSettings;

const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
const DEFAULT_DATABASE_PATH: &str = "padel_tournament.db";

#[derive(Debug, Clone)]
pub struct TournamentSettings {
    pub min_players: usize,
    pub max_players_cap: u32,
    pub default_max_players: u32,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            min_players: 4,
            max_players_cap: 32,
            default_max_players: 24,
        }
    }
}

/// Defaults written to the settings table when it is first created
#[derive(Debug, Clone, Default)]
pub struct ScoringSettings {
    pub defaults: AppSettings,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Self {
        std::env::var(DATABASE_PATH_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(|path| Self { path })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub tournament: TournamentSettings,
    pub scoring: ScoringSettings,
    pub database: DatabaseSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            tournament: TournamentSettings::default(),
            scoring: ScoringSettings::default(),
            database: DatabaseSettings::from_env(),
        }
    }

    pub fn with_database_path(mut self, path: &str) -> Self {
        self.database.path = path.to_string();
        self
    }
}
