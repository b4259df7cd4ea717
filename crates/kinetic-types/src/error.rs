use thiserror::Error;

#[derive(Error, Debug)]
pub enum KineticError {
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Negative population in {context}: species {species} has count {count}")]
    NegativePopulation {
        species: usize,
        count: i64,
        context: String,
    },

    #[error("Mass not conserved across split: expected {expected}, got {actual}")]
    MassNotConserved { expected: f64, actual: f64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KineticError {
    /// True for the error classes that must abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            KineticError::InvariantViolation(_)
                | KineticError::NegativePopulation { .. }
                | KineticError::MassNotConserved { .. }
        )
    }
}

pub type KineticResult<T> = Result<T, KineticError>;
