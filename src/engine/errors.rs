use thiserror::Error;

/// Validation failures reported by the pairing and scoring engine.
///
/// Every variant is recoverable by adjusting the input and retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Insufficient players: {available} eligible, at least {required} required")]
    InsufficientPlayers { required: usize, available: usize },

    #[error("Cannot form enough teams: {formed} formed, at least 2 required")]
    NotEnoughTeams { formed: usize },

    #[error("Invalid team composition: {0}")]
    InvalidComposition(String),

    #[error("Incomplete score: {0}")]
    IncompleteScore(String),

    #[error("No scope selected for standings")]
    NoScope,

    #[error("Round not finished: {pending} match(es) still pending or in progress")]
    RoundNotFinished { pending: usize },
}

impl EngineError {
    /// Stable machine-readable tag
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InsufficientPlayers { .. } => "insufficient_players",
            EngineError::NotEnoughTeams { .. } => "not_enough_teams",
            EngineError::InvalidComposition(_) => "invalid_composition",
            EngineError::IncompleteScore(_) => "incomplete_score",
            EngineError::NoScope => "no_scope",
            EngineError::RoundNotFinished { .. } => "round_not_finished",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
