//! Calculation errors

use thiserror::Error;

/// Errors raised while parsing profile input or computing targets
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown diet type: '{0}'")]
    UnknownDietType(String),

    #[error("Unknown activity level: '{0}'")]
    UnknownActivityLevel(String),

    #[error("Unknown goal: '{0}'")]
    UnknownGoal(String),

    #[error("Unknown sex: '{0}' (expected male or female)")]
    UnknownSex(String),

    #[error("Diet plan name is required")]
    MissingName,
}

/// Result type for nutrition calculations
pub type CalcResult<T> = Result<T, CalcError>;
