pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{AdventureError, CrackError, HookError, Result};
pub use types::{Difficulty, EncounterKind, GameMode, Outcome};
