use crate::adventure::result::RetryPoint;
use crate::adventure::state::SaveError;
use crate::campaign::loader::LoadError;
use crate::core::config::ConfigError;
use crate::core::types::Difficulty;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrackError {
    #[error("Campaign load error: {0}")]
    Load(#[from] LoadError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Adventure error: {0}")]
    Adventure(#[from] AdventureError),
}

/// Operational errors during play.
///
/// These never escape a transition; the adventure turns them into
/// `action: error` result records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdventureError {
    #[error("No {0} recorded to retry from")]
    NoTarget(RetryPoint),

    #[error("Unknown choice: {0}")]
    UnknownChoice(String),

    #[error("Encounter {0} has no choices")]
    NoChoices(String),

    #[error("Encounter {0} is decided by a choice, not an outcome")]
    ChoiceRequired(String),

    #[error("Unknown encounter: {0}")]
    UnknownEncounter(String),

    #[error("Difficulty {0} is locked")]
    DifficultyLocked(Difficulty),
}

/// Failure reported by an achievement or event hook
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Hook failed: {0}")]
pub struct HookError(pub String);

impl From<&str> for HookError {
    fn from(msg: &str) -> Self {
        HookError(msg.to_string())
    }
}

impl From<String> for HookError {
    fn from(msg: String) -> Self {
        HookError(msg)
    }
}

pub type Result<T> = std::result::Result<T, CrackError>;
