//! Result records handed back to the presentation layer
//!
//! Every transition returns exactly one record. Serialized, the variant
//! name lands in an `action` field (`"continue"`, `"game_over"`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a retry repositions the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPoint {
    Checkpoint,
    Fork,
    ChapterStart,
}

impl fmt::Display for RetryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryPoint::Checkpoint => write!(f, "checkpoint"),
            RetryPoint::Fork => write!(f, "fork"),
            RetryPoint::ChapterStart => write!(f, "chapter start"),
        }
    }
}

/// Recovery options offered after a failure, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryOption {
    RetryCheckpoint,
    RetryFork,
    StartOver,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdventureResult {
    /// Keep playing at `encounter_id`
    Continue {
        encounter_id: String,
        text: String,
        xp_earned: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        penalty: Option<String>,
        achievements: Vec<String>,
    },
    ChapterComplete {
        chapter_id: String,
        chapter_title: String,
        outro_text: String,
        next_chapter_id: String,
        next_encounter_id: String,
        xp_earned: u32,
        achievements: Vec<String>,
    },
    /// The whole campaign is finished
    Complete {
        campaign_id: String,
        outro_text: String,
        xp_earned: u32,
        total_xp: u32,
        session_xp: u32,
        deaths: u32,
        achievements: Vec<String>,
    },
    GameOver {
        encounter_id: String,
        text: String,
        deaths: u32,
        options: Vec<RecoveryOption>,
        achievements: Vec<String>,
    },
    /// Observer mode stops after the prologue
    PrologueGate {
        chapter_id: String,
        message: String,
        xp_earned: u32,
        achievements: Vec<String>,
    },
    Retry {
        point: RetryPoint,
        chapter_id: String,
        encounter_id: String,
    },
    Restart {
        chapter_id: String,
        encounter_id: String,
    },
    Error {
        message: String,
    },
}

impl AdventureResult {
    pub fn error(message: impl Into<String>) -> Self {
        AdventureResult::Error { message: message.into() }
    }

    /// The wire name of the `action` tag
    pub fn action(&self) -> &'static str {
        match self {
            AdventureResult::Continue { .. } => "continue",
            AdventureResult::ChapterComplete { .. } => "chapter_complete",
            AdventureResult::Complete { .. } => "complete",
            AdventureResult::GameOver { .. } => "game_over",
            AdventureResult::PrologueGate { .. } => "prologue_gate",
            AdventureResult::Retry { .. } => "retry",
            AdventureResult::Restart { .. } => "restart",
            AdventureResult::Error { .. } => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AdventureResult::Error { .. })
    }

    /// Achievements unlocked by the transition that produced this record
    pub fn achievements(&self) -> &[String] {
        match self {
            AdventureResult::Continue { achievements, .. }
            | AdventureResult::ChapterComplete { achievements, .. }
            | AdventureResult::Complete { achievements, .. }
            | AdventureResult::GameOver { achievements, .. }
            | AdventureResult::PrologueGate { achievements, .. } => achievements,
            AdventureResult::Retry { .. }
            | AdventureResult::Restart { .. }
            | AdventureResult::Error { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tag_matches_wire_name() {
        let result = AdventureResult::GameOver {
            encounter_id: "e1".into(),
            text: "You were caught.".into(),
            deaths: 1,
            options: vec![RecoveryOption::StartOver, RecoveryOption::Leave],
            achievements: vec![],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["action"], result.action());
        assert_eq!(json["options"][0], "start_over");
    }

    #[test]
    fn test_error_record() {
        let result = AdventureResult::error("nope");
        assert!(result.is_error());
        assert_eq!(result.action(), "error");
        assert!(result.achievements().is_empty());
    }
}
