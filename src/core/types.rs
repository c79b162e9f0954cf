//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty level a campaign is played at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    Heroic,
    Mythic,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Normal, Difficulty::Heroic, Difficulty::Mythic];

    /// XP multiplier applied to a successful encounter, in percent
    pub fn xp_percent(&self) -> u64 {
        match self {
            Difficulty::Normal => 100,
            Difficulty::Heroic => 150,
            Difficulty::Mythic => 200,
        }
    }

    pub fn xp_multiplier(&self) -> f64 {
        self.xp_percent() as f64 / 100.0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Heroic => "heroic",
            Difficulty::Mythic => "mythic",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Difficulty::Normal),
            "heroic" => Ok(Difficulty::Heroic),
            "mythic" => Ok(Difficulty::Mythic),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// How the player is solving challenges
///
/// Ordering is the completion-credit rank: a clear recorded under a
/// lower mode can be upgraded by replaying under a higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// No external tooling, answers revealed as hints
    Observer,
    John,
    Hashcat,
    #[default]
    Full,
}

impl GameMode {
    /// XP multiplier in percent; observer clears pay a fifth
    pub fn xp_percent(&self) -> u64 {
        match self {
            GameMode::Full | GameMode::Hashcat | GameMode::John => 100,
            GameMode::Observer => 20,
        }
    }

    pub fn xp_multiplier(&self) -> f64 {
        self.xp_percent() as f64 / 100.0
    }

    /// Rank used by the completion-mode upgrade rule
    pub fn priority(&self) -> u8 {
        match self {
            GameMode::Observer => 0,
            GameMode::John => 1,
            GameMode::Hashcat => 2,
            GameMode::Full => 3,
        }
    }

    pub fn outranks(&self, other: GameMode) -> bool {
        self.priority() > other.priority()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Observer => "observer",
            GameMode::John => "john",
            GameMode::Hashcat => "hashcat",
            GameMode::Full => "full",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observer" => Ok(GameMode::Observer),
            "john" => Ok(GameMode::John),
            "hashcat" => Ok(GameMode::Hashcat),
            "full" => Ok(GameMode::Full),
            other => Err(format!("unknown game mode '{}'", other)),
        }
    }
}

/// Result of one encounter attempt, as reported by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
    Partial,
    Skip,
}

/// Interaction style of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    /// Pure narrative beat, no challenge
    Story,
    /// Crack a hash with the external tooling
    #[default]
    Crack,
    /// Answer immediately from what was just taught
    Instant,
    /// Walkthrough that cannot be failed
    Guided,
    /// Free exploration of a toolset
    Explore,
    /// Crack against the clock
    Timed,
    /// Discrete branching choice
    Fork,
    /// Several chained sub-steps
    MultiStep,
    /// End-of-chapter showdown
    Boss,
}

impl EncounterKind {
    /// Kinds that route the player through choices rather than a linear successor
    pub fn is_branching(&self) -> bool {
        matches!(self, EncounterKind::Fork)
    }

    pub fn is_no_fail(&self) -> bool {
        matches!(self, EncounterKind::Guided | EncounterKind::Story)
    }
}
