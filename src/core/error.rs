use thiserror::Error;

use crate::severity::SeverityTier;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Invalid damage event: {field} = {value}")]
    InvalidDamage { field: &'static str, value: f64 },

    #[error("Strategy '{strategy}' is misconfigured: {message}")]
    StrategyConfig { strategy: String, message: String },

    #[error("Strategy not found: {0}")]
    StrategyNotFound(String),

    #[error("No severity range defined for tier {tier:?}")]
    UndefinedSeverity { tier: SeverityTier },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error in {path}: {message}")]
    Toml { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl HealthError {
    pub(crate) fn config(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        HealthError::StrategyConfig {
            strategy: strategy.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HealthError>;
