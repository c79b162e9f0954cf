//! The adventure state machine
//!
//! One `Adventure` owns one `PlayerState` and walks it through a shared,
//! read-only `Campaign`. Every mutating call performs exactly one
//! transition and returns one `AdventureResult`. Calls must not overlap;
//! if answers are verified off-thread, funnel the outcomes back in order.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::adventure::hints::{self, HintStatus};
use crate::adventure::hooks::{
    AchievementTracker, EventHooks, GameEvent, NoAchievements, TriggerContext, TriggerKind,
};
use crate::adventure::result::{AdventureResult, RecoveryOption, RetryPoint};
use crate::adventure::state::{PlayerState, SaveError};
use crate::campaign::{Campaign, Chapter, Encounter};
use crate::core::config::GameConfig;
use crate::core::error::AdventureError;
use crate::core::types::{Difficulty, GameMode, Outcome};

const PROLOGUE_GATE_MESSAGE: &str =
    "Observer mode ends after the prologue. Install a cracking tool to keep going.";

impl From<AdventureError> for AdventureResult {
    fn from(e: AdventureError) -> Self {
        AdventureResult::error(e.to_string())
    }
}

/// Snapshot of how far the player has come
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub percent: f64,
    pub completed: usize,
    pub total: usize,
    pub xp_earned: u32,
    pub total_xp: u32,
    pub deaths: u32,
    pub hints_used: u32,
    /// 1-based
    pub chapter_number: usize,
    pub chapter_count: usize,
    pub campaign_complete: bool,
}

pub struct Adventure {
    campaign: Arc<Campaign>,
    state: PlayerState,
    config: GameConfig,
    save_path: Option<PathBuf>,
    achievements: Box<dyn AchievementTracker>,
    hooks: EventHooks,
    /// Encounter being timed for the speed trigger
    timer: Option<(String, Instant)>,
}

impl Adventure {
    /// Start a fresh adventure at the campaign's first encounter
    pub fn new(
        campaign: Arc<Campaign>,
        player_name: &str,
        difficulty: Difficulty,
        game_mode: GameMode,
    ) -> Self {
        let state = PlayerState::new(&campaign, player_name, difficulty, game_mode);
        tracing::info!(
            "New adventure for '{}' in '{}' ({}, {})",
            player_name,
            campaign.id,
            difficulty,
            game_mode
        );
        Self::from_state(campaign, state)
    }

    /// Resume from an already-restored snapshot
    pub fn from_state(campaign: Arc<Campaign>, state: PlayerState) -> Self {
        if state.campaign_id != campaign.id {
            tracing::warn!(
                "Snapshot belongs to campaign '{}' but is being played in '{}'",
                state.campaign_id,
                campaign.id
            );
        }
        Self {
            campaign,
            state,
            config: GameConfig::default(),
            save_path: None,
            achievements: Box::new(NoAchievements),
            hooks: EventHooks::new(),
            timer: None,
        }
    }

    /// Restore progress from a snapshot file; that file becomes the save path
    pub fn load(campaign: Arc<Campaign>, save_path: &Path) -> Result<Self, SaveError> {
        let state = PlayerState::load(save_path)?;
        Ok(Self::from_state(campaign, state).with_save_path(save_path))
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn with_achievements<T>(mut self, tracker: T) -> Self
    where
        T: AchievementTracker + 'static,
    {
        self.achievements = Box::new(tracker);
        self
    }

    pub fn with_hooks(mut self, hooks: EventHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_rogue_mode(mut self, rogue: bool) -> Self {
        self.state.rogue_mode = rogue;
        self
    }

    // === QUERIES ===

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.campaign.chapter(&self.state.chapter_id)
    }

    pub fn current_chapter_index(&self) -> Option<usize> {
        self.campaign.chapter_index(&self.state.chapter_id)
    }

    pub fn current_encounter(&self) -> Option<&Encounter> {
        self.campaign.encounter(&self.state.encounter_id)
    }

    pub fn effective_hash(&self) -> Option<&str> {
        self.current_encounter()?.effective_hash(self.state.difficulty)
    }

    pub fn effective_hash_type(&self) -> Option<&str> {
        self.current_encounter()?.effective_hash_type(self.state.difficulty)
    }

    pub fn effective_hint(&self) -> Option<&str> {
        self.current_encounter()?.effective_hint(self.state.difficulty)
    }

    pub fn effective_solution(&self) -> Option<&str> {
        self.current_encounter()?.effective_solution(self.state.difficulty)
    }

    /// XP a Success on the current encounter would pay
    pub fn effective_xp_reward(&self) -> u32 {
        self.current_encounter()
            .map_or(0, |e| success_xp(e, self.state.difficulty, self.state.game_mode))
    }

    /// Compare a trimmed answer against the current effective solution
    pub fn check_answer(&self, answer: &str) -> bool {
        self.effective_solution()
            .map_or(false, |solution| solution.trim() == answer.trim())
    }

    pub fn can_use_hint(&self) -> (bool, HintStatus) {
        let status = hints::hint_status(&self.state, &self.config);
        (status.allowed(), status)
    }

    pub fn is_difficulty_unlocked(&self, level: Difficulty) -> bool {
        if self.state.game_mode == GameMode::Observer {
            return true;
        }
        match level {
            Difficulty::Normal | Difficulty::Heroic => true,
            Difficulty::Mythic => self
                .state
                .has_completed_difficulty(&self.campaign.id, Difficulty::Heroic),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.campaign_complete
    }

    pub fn progress(&self) -> ProgressSummary {
        let total = self.campaign.encounter_count();
        let completed = self
            .state
            .completed_encounters
            .iter()
            .filter(|id| self.campaign.has_encounter(id))
            .count();
        let percent = if total == 0 {
            0.0
        } else {
            completed as f64 * 100.0 / total as f64
        };

        ProgressSummary {
            percent,
            completed,
            total,
            xp_earned: self.state.xp_earned,
            total_xp: self.state.total_xp,
            deaths: self.state.deaths,
            hints_used: self.state.hints_used,
            chapter_number: self.current_chapter_index().map_or(0, |idx| idx + 1),
            chapter_count: self.campaign.chapter_count(),
            campaign_complete: self.state.campaign_complete,
        }
    }

    // === TRANSITIONS ===

    /// Begin timing the current encounter and announce it
    pub fn start_encounter(&mut self) {
        let encounter_id = self.state.encounter_id.clone();
        self.timer = Some((encounter_id.clone(), Instant::now()));
        self.hooks.emit(&GameEvent::EncounterStarted { encounter_id });
    }

    /// Count one answer attempt on the current encounter
    pub fn record_attempt(&mut self, correct: bool) {
        self.state.attempts += 1;
        self.hooks.emit(&GameEvent::AttemptCompleted {
            encounter_id: self.state.encounter_id.clone(),
            correct,
            attempts: self.state.attempts,
        });
    }

    pub fn record_outcome(&mut self, outcome: Outcome) -> AdventureResult {
        let campaign = Arc::clone(&self.campaign);
        let Some(encounter) = campaign.encounter(&self.state.encounter_id) else {
            return AdventureError::UnknownEncounter(self.state.encounter_id.clone()).into();
        };

        tracing::debug!("Outcome {:?} on encounter '{}'", outcome, encounter.id);

        // A fork only moves forward through make_choice
        if encounter.has_choices() && outcome != Outcome::Failure {
            return AdventureError::ChoiceRequired(encounter.id.clone()).into();
        }

        match outcome {
            Outcome::Success => self.succeed(&campaign, encounter),
            Outcome::Failure if encounter.kind.is_no_fail() => AdventureResult::Continue {
                encounter_id: encounter.id.clone(),
                text: encounter.failure_text.clone(),
                xp_earned: 0,
                penalty: Some("This step can't be failed. Try it again.".to_string()),
                achievements: Vec::new(),
            },
            Outcome::Failure => self.lose(encounter),
            Outcome::Partial => {
                // Half the authored base reward; variants and multipliers don't apply
                let xp = encounter.xp_reward / self.config.partial_xp_divisor.max(1);
                self.state.add_xp(xp);
                self.advance_linear(&campaign, encounter);
                AdventureResult::Continue {
                    encounter_id: self.state.encounter_id.clone(),
                    text: encounter.success_text.clone(),
                    xp_earned: xp,
                    penalty: Some(format!(
                        "Partial credit: {} of {} XP",
                        xp, encounter.xp_reward
                    )),
                    achievements: Vec::new(),
                }
            }
            Outcome::Skip => {
                self.advance_linear(&campaign, encounter);
                AdventureResult::Continue {
                    encounter_id: self.state.encounter_id.clone(),
                    text: String::new(),
                    xp_earned: 0,
                    penalty: None,
                    achievements: Vec::new(),
                }
            }
        }
    }

    pub fn make_choice(&mut self, choice_id: &str) -> AdventureResult {
        let campaign = Arc::clone(&self.campaign);
        let Some(fork) = campaign.encounter(&self.state.encounter_id) else {
            return AdventureError::UnknownEncounter(self.state.encounter_id.clone()).into();
        };
        if !fork.has_choices() {
            return AdventureError::NoChoices(fork.id.clone()).into();
        }
        let Some(choice) = fork.choice(choice_id) else {
            return AdventureError::UnknownChoice(choice_id.to_string()).into();
        };

        tracing::debug!(
            "Choice '{}' at fork '{}' (correct: {})",
            choice.id,
            fork.id,
            choice.is_correct
        );

        self.state.choice_history.insert(fork.id.clone(), choice.id.clone());
        self.state.last_fork = Some(fork.id.clone());
        self.hooks.emit(&GameEvent::ChoiceMade {
            fork_id: fork.id.clone(),
            choice_id: choice.id.clone(),
            correct: choice.is_correct,
        });

        // A wrong pick is a loss even on an otherwise no-fail encounter
        if !choice.is_correct {
            return self.lose(fork);
        }

        self.state.mark_completed(&fork.id);
        self.state.record_completion_mode(&fork.id, self.state.game_mode);
        self.move_to(&campaign, &choice.leads_to);

        AdventureResult::Continue {
            encounter_id: self.state.encounter_id.clone(),
            text: fork.success_text.clone(),
            xp_earned: 0,
            penalty: None,
            achievements: Vec::new(),
        }
    }

    pub fn retry_from_checkpoint(&mut self) -> AdventureResult {
        match self.state.last_checkpoint.clone() {
            Some(target) => self.reposition(RetryPoint::Checkpoint, &target),
            None => AdventureError::NoTarget(RetryPoint::Checkpoint).into(),
        }
    }

    pub fn retry_from_fork(&mut self) -> AdventureResult {
        match self.state.last_fork.clone() {
            Some(target) => self.reposition(RetryPoint::Fork, &target),
            None => AdventureError::NoTarget(RetryPoint::Fork).into(),
        }
    }

    /// Restart the current chapter; the last checkpoint survives
    pub fn start_over(&mut self) -> AdventureResult {
        let Some(chapter) = self.current_chapter() else {
            return AdventureError::NoTarget(RetryPoint::ChapterStart).into();
        };
        let chapter_id = chapter.id.clone();
        let encounter_id = chapter.first_encounter.clone();

        self.state.encounter_id = encounter_id.clone();
        self.state.last_fork = None;
        self.timer = None;

        tracing::debug!("Restarting chapter '{}'", chapter_id);
        AdventureResult::Restart {
            chapter_id,
            encounter_id,
        }
    }

    /// Spend a hint; returns the XP charged, `None` when denied
    pub fn use_hint(&mut self) -> Option<u32> {
        let cost = hints::charge_hint(&mut self.state, &self.config)?;
        self.hooks.emit(&GameEvent::HintUsed {
            encounter_id: self.state.encounter_id.clone(),
            cost,
        });
        Some(cost)
    }

    pub fn set_difficulty(&mut self, level: Difficulty) -> Result<(), AdventureError> {
        if !self.is_difficulty_unlocked(level) {
            return Err(AdventureError::DifficultyLocked(level));
        }
        self.state.difficulty = level;
        Ok(())
    }

    /// Switch how challenges are solved
    ///
    /// Leaving observer mode lifts the prologue gate: a player parked at the
    /// end of the prologue moves on to the next chapter. A difficulty only
    /// observers may pick falls back to Normal.
    pub fn set_game_mode(&mut self, mode: GameMode) {
        if self.state.game_mode == mode {
            return;
        }
        tracing::info!(
            "'{}' switches from {} to {}",
            self.state.player_name,
            self.state.game_mode,
            mode
        );
        self.state.game_mode = mode;
        if mode == GameMode::Observer {
            return;
        }

        if !self.is_difficulty_unlocked(self.state.difficulty) {
            tracing::warn!(
                "{} is locked outside observer mode, using normal",
                self.state.difficulty
            );
            self.state.difficulty = Difficulty::Normal;
        }

        if !self.state.prologue_complete {
            return;
        }
        self.state.prologue_complete = false;

        let campaign = Arc::clone(&self.campaign);
        let Some(idx) = self.current_chapter_index() else {
            return;
        };
        if idx != 0 || campaign.is_last_chapter(idx) {
            return;
        }
        if let Some(next) = campaign.chapter_at(idx + 1) {
            self.state.chapter_deaths = 0;
            self.state.chapter_id = next.id.clone();
            self.state.encounter_id = next.first_encounter.clone();
            self.timer = None;
            tracing::debug!("Prologue gate lifted, entering '{}'", next.id);
        }
    }

    /// Begin a new playthrough
    ///
    /// Position and per-run counters reset. Lifetime XP, lifetime deaths,
    /// achievements and finished difficulties carry over.
    pub fn new_game(&mut self, difficulty: Difficulty) -> Result<(), AdventureError> {
        if !self.is_difficulty_unlocked(difficulty) {
            return Err(AdventureError::DifficultyLocked(difficulty));
        }

        let mut fresh = PlayerState::new(
            &self.campaign,
            &self.state.player_name,
            difficulty,
            self.state.game_mode,
        );
        fresh.rogue_mode = self.state.rogue_mode;
        fresh.total_xp = self.state.total_xp;
        fresh.deaths = self.state.deaths;
        fresh.first_clear_done = self.state.first_clear_done;
        fresh.achievements = std::mem::take(&mut self.state.achievements);
        fresh.completed_difficulties = std::mem::take(&mut self.state.completed_difficulties);

        self.state = fresh;
        self.timer = None;
        tracing::info!("New game for '{}' on {}", self.state.player_name, difficulty);
        Ok(())
    }

    pub fn save(&self) -> Result<(), SaveError> {
        let path = self.save_path.as_deref().ok_or(SaveError::NoPath)?;
        self.state.save(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        self.state.save(path)
    }

    // === INTERNALS ===

    fn succeed(&mut self, campaign: &Campaign, encounter: &Encounter) -> AdventureResult {
        let xp = success_xp(encounter, self.state.difficulty, self.state.game_mode);
        let first_clear_ever = !self.state.first_clear_done;
        self.state.first_clear_done = true;

        self.state.add_xp(xp);
        self.state.mark_completed(&encounter.id);
        self.state.record_completion_mode(&encounter.id, self.state.game_mode);

        if encounter.is_checkpoint {
            self.state.last_checkpoint = Some(encounter.id.clone());
            self.hooks.emit(&GameEvent::CheckpointReached {
                encounter_id: encounter.id.clone(),
            });
        }
        self.hooks.emit(&GameEvent::EncounterSuccess {
            encounter_id: encounter.id.clone(),
            xp,
            mode: self.state.game_mode,
        });

        let mut unlocked = Vec::new();
        if first_clear_ever {
            unlocked.extend(self.fire(TriggerKind::FirstEncounter, None));
        }
        let cleared = self.state.completed_encounters.len() as f64;
        unlocked.extend(self.fire(TriggerKind::EncountersCompleted, Some(cleared)));
        let total_xp = self.state.total_xp as f64;
        unlocked.extend(self.fire(TriggerKind::XpTotal, Some(total_xp)));
        if let Some(seconds) = self.take_elapsed(&encounter.id) {
            unlocked.extend(self.fire(TriggerKind::SpeedClear, Some(seconds)));
        }

        match &encounter.next_encounter {
            Some(next) => {
                self.move_to(campaign, next);
                AdventureResult::Continue {
                    encounter_id: self.state.encounter_id.clone(),
                    text: encounter.success_text.clone(),
                    xp_earned: xp,
                    penalty: None,
                    achievements: unlocked,
                }
            }
            None => self.complete_chapter(campaign, xp, unlocked),
        }
    }

    fn lose(&mut self, encounter: &Encounter) -> AdventureResult {
        self.state.deaths += 1;
        self.state.run_deaths += 1;
        self.state.chapter_deaths += 1;
        self.timer = None;
        self.hooks.emit(&GameEvent::EncounterFailure {
            encounter_id: encounter.id.clone(),
            deaths: self.state.deaths,
        });

        let mut unlocked = Vec::new();
        if self.state.deaths == 1 {
            unlocked.extend(self.fire(TriggerKind::FirstDeath, None));
        }
        let deaths = self.state.deaths as f64;
        unlocked.extend(self.fire(TriggerKind::DeathCount, Some(deaths)));

        AdventureResult::GameOver {
            encounter_id: encounter.id.clone(),
            text: encounter.failure_text.clone(),
            deaths: self.state.deaths,
            options: self.recovery_options(),
            achievements: unlocked,
        }
    }

    fn recovery_options(&self) -> Vec<RecoveryOption> {
        let mut options = Vec::with_capacity(4);
        if self.state.last_checkpoint.is_some() {
            options.push(RecoveryOption::RetryCheckpoint);
        }
        if self.state.last_fork.is_some() {
            options.push(RecoveryOption::RetryFork);
        }
        options.push(RecoveryOption::StartOver);
        options.push(RecoveryOption::Leave);
        options
    }

    fn complete_chapter(
        &mut self,
        campaign: &Campaign,
        xp: u32,
        mut unlocked: Vec<String>,
    ) -> AdventureResult {
        let Some(idx) = campaign.chapter_index(&self.state.chapter_id) else {
            return AdventureResult::error(format!("Unknown chapter: {}", self.state.chapter_id));
        };
        let chapter = &campaign.chapters()[idx];

        self.state.mark_chapter_completed(&chapter.id);
        self.hooks.emit(&GameEvent::ChapterCompleted {
            chapter_id: chapter.id.clone(),
            deaths: self.state.chapter_deaths,
        });
        let chapters_done = self.state.completed_chapters.len() as f64;
        unlocked.extend(self.fire(TriggerKind::ChapterComplete, Some(chapters_done)));
        if self.state.chapter_deaths == 0 {
            unlocked.extend(self.fire(TriggerKind::NoDeathChapter, None));
        }

        if !campaign.is_last_chapter(idx) {
            if self.state.game_mode == GameMode::Observer && idx == 0 {
                self.state.prologue_complete = true;
                tracing::debug!("Observer prologue gate reached in '{}'", chapter.id);
                return AdventureResult::PrologueGate {
                    chapter_id: chapter.id.clone(),
                    message: PROLOGUE_GATE_MESSAGE.to_string(),
                    xp_earned: xp,
                    achievements: unlocked,
                };
            }

            let next = &campaign.chapters()[idx + 1];
            self.state.chapter_deaths = 0;
            self.state.chapter_id = next.id.clone();
            self.state.encounter_id = next.first_encounter.clone();
            self.timer = None;

            tracing::debug!("Chapter '{}' complete, entering '{}'", chapter.id, next.id);
            return AdventureResult::ChapterComplete {
                chapter_id: chapter.id.clone(),
                chapter_title: chapter.title.clone(),
                outro_text: chapter.outro_text.clone(),
                next_chapter_id: next.id.clone(),
                next_encounter_id: next.first_encounter.clone(),
                xp_earned: xp,
                achievements: unlocked,
            };
        }

        self.state.campaign_complete = true;
        unlocked.extend(self.fire(TriggerKind::CampaignComplete, None));
        if self.state.run_deaths == 0 {
            unlocked.extend(self.fire(TriggerKind::NoDeathCampaign, None));
        }
        if self.state.rogue_mode {
            unlocked.extend(self.fire(TriggerKind::RogueComplete, None));
        }
        if self.all_choices_correct(campaign) {
            unlocked.extend(self.fire(TriggerKind::AllChoicesCorrect, None));
        }

        let difficulty = self.state.difficulty;
        self.state.record_completed_difficulty(&campaign.id, difficulty);
        self.hooks.emit(&GameEvent::CampaignCompleted {
            campaign_id: campaign.id.clone(),
            difficulty,
            total_xp: self.state.total_xp,
        });

        tracing::info!(
            "'{}' completed '{}' on {} with {} XP",
            self.state.player_name,
            campaign.id,
            difficulty,
            self.state.total_xp
        );
        AdventureResult::Complete {
            campaign_id: campaign.id.clone(),
            outro_text: campaign.meta.outro_text.clone(),
            xp_earned: xp,
            total_xp: self.state.total_xp,
            session_xp: self.state.xp_earned,
            deaths: self.state.run_deaths,
            achievements: unlocked,
        }
    }

    /// Every recorded fork resolved to its correct option
    fn all_choices_correct(&self, campaign: &Campaign) -> bool {
        !self.state.choice_history.is_empty()
            && self.state.choice_history.iter().all(|(fork_id, choice_id)| {
                campaign
                    .encounter(fork_id)
                    .and_then(|fork| fork.choice(choice_id))
                    .map_or(false, |choice| choice.is_correct)
            })
    }

    fn reposition(&mut self, point: RetryPoint, target: &str) -> AdventureResult {
        let Some(chapter) = self.campaign.chapter_of(target) else {
            return AdventureError::UnknownEncounter(target.to_string()).into();
        };
        let chapter_id = chapter.id.clone();

        self.state.chapter_id = chapter_id.clone();
        self.state.encounter_id = target.to_string();
        self.timer = None;

        tracing::debug!("Retrying from {} '{}'", point, target);
        AdventureResult::Retry {
            point,
            chapter_id,
            encounter_id: target.to_string(),
        }
    }

    fn advance_linear(&mut self, campaign: &Campaign, encounter: &Encounter) {
        if let Some(next) = &encounter.next_encounter {
            self.move_to(campaign, next);
        }
    }

    fn move_to(&mut self, campaign: &Campaign, encounter_id: &str) {
        self.state.encounter_id = encounter_id.to_string();
        if let Some(chapter) = campaign.chapter_of(encounter_id) {
            if chapter.id != self.state.chapter_id {
                self.state.chapter_id = chapter.id.clone();
            }
        }
        self.timer = None;
    }

    fn take_elapsed(&mut self, encounter_id: &str) -> Option<f64> {
        match self.timer.take() {
            Some((id, started)) if id == encounter_id => Some(started.elapsed().as_secs_f64()),
            _ => None,
        }
    }

    /// Ask the tracker about a trigger and merge whatever it unlocks
    fn fire(&mut self, kind: TriggerKind, value: Option<f64>) -> Vec<String> {
        let context = TriggerContext {
            campaign_id: self.campaign.id.clone(),
            chapter_id: self.state.chapter_id.clone(),
            encounter_id: self.state.encounter_id.clone(),
            difficulty: self.state.difficulty,
            game_mode: self.state.game_mode,
            speed_target_seconds: match kind {
                TriggerKind::SpeedClear => Some(self.config.speed_clear_seconds),
                _ => None,
            },
        };

        match self.achievements.check_trigger(kind, value, &context) {
            Ok(unlocked) => self.state.merge_achievements(unlocked.into_iter().map(|a| a.id)),
            Err(e) => {
                tracing::warn!("Achievement trigger {:?} failed: {}", kind, e);
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for Adventure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adventure")
            .field("campaign", &self.campaign.id)
            .field("state", &self.state)
            .field("save_path", &self.save_path)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// floor(effective base XP x difficulty multiplier x mode multiplier)
pub fn success_xp(encounter: &Encounter, difficulty: Difficulty, mode: GameMode) -> u32 {
    let base = encounter.effective_xp(difficulty) as u64;
    let scaled = base * difficulty.xp_percent() * mode.xp_percent() / 10_000;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
