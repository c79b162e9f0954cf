//! Collaborator interfaces the adventure calls out to
//!
//! Both the achievement tracker and event handlers report failure through
//! `HookError`. The adventure logs and discards those errors; a failing
//! observer never interrupts a transition.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::HookError;
use crate::core::types::{Difficulty, GameMode};

/// Points in play where achievements may unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// First successful encounter ever
    FirstEncounter,
    /// Value: running count of completed encounters
    EncountersCompleted,
    /// Value: lifetime XP
    XpTotal,
    /// Value: seconds taken to clear the encounter
    SpeedClear,
    FirstDeath,
    /// Value: lifetime deaths
    DeathCount,
    /// Value: running count of completed chapters
    ChapterComplete,
    NoDeathChapter,
    CampaignComplete,
    NoDeathCampaign,
    RogueComplete,
    AllChoicesCorrect,
}

/// Where the trigger fired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub campaign_id: String,
    pub chapter_id: String,
    pub encounter_id: String,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    /// Clear-time threshold, only set for `SpeedClear`
    pub speed_target_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    pub name: String,
}

impl UnlockedAchievement {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Decides which achievements a trigger unlocks
pub trait AchievementTracker {
    fn check_trigger(
        &mut self,
        kind: TriggerKind,
        value: Option<f64>,
        context: &TriggerContext,
    ) -> Result<Vec<UnlockedAchievement>, HookError>;
}

/// Tracker that never unlocks anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAchievements;

impl AchievementTracker for NoAchievements {
    fn check_trigger(
        &mut self,
        _kind: TriggerKind,
        _value: Option<f64>,
        _context: &TriggerContext,
    ) -> Result<Vec<UnlockedAchievement>, HookError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    EncounterStarted,
    HintUsed,
    AttemptCompleted,
    EncounterSuccess,
    EncounterFailure,
    CheckpointReached,
    ChoiceMade,
    ChapterCompleted,
    CampaignCompleted,
}

/// Event payloads delivered to profile/analytics handlers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    EncounterStarted {
        encounter_id: String,
    },
    HintUsed {
        encounter_id: String,
        cost: u32,
    },
    AttemptCompleted {
        encounter_id: String,
        correct: bool,
        attempts: u32,
    },
    EncounterSuccess {
        encounter_id: String,
        xp: u32,
        mode: GameMode,
    },
    EncounterFailure {
        encounter_id: String,
        deaths: u32,
    },
    CheckpointReached {
        encounter_id: String,
    },
    ChoiceMade {
        fork_id: String,
        choice_id: String,
        correct: bool,
    },
    ChapterCompleted {
        chapter_id: String,
        deaths: u32,
    },
    CampaignCompleted {
        campaign_id: String,
        difficulty: Difficulty,
        total_xp: u32,
    },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::EncounterStarted { .. } => EventKind::EncounterStarted,
            GameEvent::HintUsed { .. } => EventKind::HintUsed,
            GameEvent::AttemptCompleted { .. } => EventKind::AttemptCompleted,
            GameEvent::EncounterSuccess { .. } => EventKind::EncounterSuccess,
            GameEvent::EncounterFailure { .. } => EventKind::EncounterFailure,
            GameEvent::CheckpointReached { .. } => EventKind::CheckpointReached,
            GameEvent::ChoiceMade { .. } => EventKind::ChoiceMade,
            GameEvent::ChapterCompleted { .. } => EventKind::ChapterCompleted,
            GameEvent::CampaignCompleted { .. } => EventKind::CampaignCompleted,
        }
    }
}

pub type EventHandler = Box<dyn FnMut(&GameEvent) -> Result<(), HookError>>;

/// Caller-supplied handlers keyed by event kind
#[derive(Default)]
pub struct EventHooks {
    handlers: AHashMap<EventKind, Vec<EventHandler>>,
}

impl EventHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> &mut Self
    where
        F: FnMut(&GameEvent) -> Result<(), HookError> + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
        self
    }

    pub fn has_handlers(&self, kind: EventKind) -> bool {
        self.handlers.get(&kind).map_or(false, |h| !h.is_empty())
    }

    /// Deliver an event to every matching handler, discarding failures
    pub fn emit(&mut self, event: &GameEvent) {
        let Some(handlers) = self.handlers.get_mut(&event.kind()) else {
            return;
        };
        for handler in handlers.iter_mut() {
            if let Err(e) = handler(event) {
                tracing::warn!("Event handler for {:?} failed: {}", event.kind(), e);
            }
        }
    }
}

impl std::fmt::Debug for EventHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort_by_key(|k| format!("{:?}", k));
        f.debug_struct("EventHooks").field("kinds", &kinds).finish()
    }
}
