use thiserror::Error;

/// Refusals raised by the service layer, on top of engine validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Operation refused: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl ServiceError {
    pub fn missing_player(id: &str) -> Self {
        Self::NotFound {
            kind: "Player",
            id: id.to_string(),
        }
    }

    pub fn missing_tournament(id: &str) -> Self {
        Self::NotFound {
            kind: "Tournament",
            id: id.to_string(),
        }
    }

    pub fn missing_match(id: &str) -> Self {
        Self::NotFound {
            kind: "Match",
            id: id.to_string(),
        }
    }
}
