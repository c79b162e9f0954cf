//! Crackquest - hash-cracking adventure progression engine
//!
//! Campaigns are static chapter/encounter graphs loaded from TOML or JSON.
//! An `Adventure` walks one player through a campaign, awarding XP,
//! tracking deaths and retries, and persisting a `PlayerState` snapshot.

pub mod adventure;
pub mod campaign;
pub mod core;
pub mod hashes;

pub use adventure::{Adventure, AdventureResult, PlayerState};
pub use campaign::Campaign;
pub use crate::core::{CrackError, Difficulty, GameMode, Outcome, Result};
pub use hashes::HashIndex;
