//! Player progression snapshot
//!
//! `PlayerState` is the only thing that gets persisted. Every map is a
//! `BTreeMap` so that saving the same state twice yields identical bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::campaign::Campaign;
use crate::core::types::{Difficulty, GameMode};

/// Errors that can occur when saving or restoring a snapshot
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("No save path configured")]
    NoPath,
    #[error("Save file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player_name: String,
    pub campaign_id: String,
    pub chapter_id: String,
    pub encounter_id: String,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub rogue_mode: bool,
    pub prologue_complete: bool,
    pub campaign_complete: bool,

    /// Encounter ids in the order they were first cleared
    pub completed_encounters: Vec<String>,
    /// Best mode each encounter was cleared under
    pub completion_modes: BTreeMap<String, GameMode>,
    pub completed_chapters: Vec<String>,

    pub last_checkpoint: Option<String>,
    pub last_fork: Option<String>,
    /// Fork encounter id -> chosen choice id
    pub choice_history: BTreeMap<String, String>,

    /// XP earned this playthrough
    pub xp_earned: u32,
    /// XP earned across every playthrough
    pub total_xp: u32,
    pub achievements: Vec<String>,
    /// Set by the first successful encounter ever, kept across new games
    #[serde(default)]
    pub first_clear_done: bool,

    /// Lifetime deaths, kept across new games
    pub deaths: u32,
    /// Deaths in the current playthrough
    #[serde(default)]
    pub run_deaths: u32,
    /// Deaths since the current chapter was entered
    pub chapter_deaths: u32,
    pub attempts: u32,
    pub hints_used: u32,
    /// Chapter id -> hints used in that chapter
    pub chapter_hints: BTreeMap<String, u32>,
    /// Campaign id -> difficulties the campaign has been finished on
    pub completed_difficulties: BTreeMap<String, Vec<Difficulty>>,

    pub started_at: DateTime<Utc>,
}

impl PlayerState {
    /// Fresh state positioned at the campaign's first chapter and encounter
    pub fn new(
        campaign: &Campaign,
        player_name: &str,
        difficulty: Difficulty,
        game_mode: GameMode,
    ) -> Self {
        let (chapter_id, encounter_id) = match campaign.start_chapter() {
            Some(chapter) => (chapter.id.clone(), chapter.first_encounter.clone()),
            None => (campaign.first_chapter.clone(), String::new()),
        };

        Self {
            player_name: player_name.to_string(),
            campaign_id: campaign.id.clone(),
            chapter_id,
            encounter_id,
            difficulty,
            game_mode,
            rogue_mode: false,
            prologue_complete: false,
            campaign_complete: false,
            completed_encounters: Vec::new(),
            completion_modes: BTreeMap::new(),
            completed_chapters: Vec::new(),
            last_checkpoint: None,
            last_fork: None,
            choice_history: BTreeMap::new(),
            xp_earned: 0,
            total_xp: 0,
            achievements: Vec::new(),
            first_clear_done: false,
            deaths: 0,
            run_deaths: 0,
            chapter_deaths: 0,
            attempts: 0,
            hints_used: 0,
            chapter_hints: BTreeMap::new(),
            completed_difficulties: BTreeMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn is_completed(&self, encounter_id: &str) -> bool {
        self.completed_encounters.iter().any(|id| id == encounter_id)
    }

    /// Record a clear; returns false if the encounter was already cleared
    pub fn mark_completed(&mut self, encounter_id: &str) -> bool {
        if self.is_completed(encounter_id) {
            return false;
        }
        self.completed_encounters.push(encounter_id.to_string());
        true
    }

    /// Store the completion mode unless an equal or better one is recorded
    pub fn record_completion_mode(&mut self, encounter_id: &str, mode: GameMode) {
        match self.completion_modes.get(encounter_id) {
            Some(existing) if !mode.outranks(*existing) => {}
            _ => {
                self.completion_modes.insert(encounter_id.to_string(), mode);
            }
        }
    }

    pub fn mark_chapter_completed(&mut self, chapter_id: &str) {
        if !self.completed_chapters.iter().any(|id| id == chapter_id) {
            self.completed_chapters.push(chapter_id.to_string());
        }
    }

    pub fn add_xp(&mut self, xp: u32) {
        self.xp_earned = self.xp_earned.saturating_add(xp);
        self.total_xp = self.total_xp.saturating_add(xp);
    }

    /// Merge unlocked achievement ids, skipping ones already held
    pub fn merge_achievements<I>(&mut self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = Vec::new();
        for id in ids {
            if !self.achievements.contains(&id) {
                self.achievements.push(id.clone());
                added.push(id);
            }
        }
        added
    }

    pub fn hints_in_chapter(&self, chapter_id: &str) -> u32 {
        self.chapter_hints.get(chapter_id).copied().unwrap_or(0)
    }

    pub fn has_completed_difficulty(&self, campaign_id: &str, level: Difficulty) -> bool {
        self.completed_difficulties
            .get(campaign_id)
            .map_or(false, |levels| levels.contains(&level))
    }

    pub fn record_completed_difficulty(&mut self, campaign_id: &str, level: Difficulty) {
        let levels = self.completed_difficulties.entry(campaign_id.to_string()).or_default();
        if !levels.contains(&level) {
            levels.push(level);
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the whole snapshot, replacing any previous file
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        tracing::info!("Saved progress for '{}' to {}", self.player_name, path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SaveError::NotFound(path.to_path_buf()),
            _ => SaveError::Io(e),
        })?;
        let state = Self::from_json(&content)?;
        tracing::info!("Restored progress for '{}' from {}", state.player_name, path.display());
        Ok(state)
    }
}
