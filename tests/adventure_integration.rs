//! Adventure state machine integration tests
//!
//! Every test plays the bundled heist campaign:
//! prologue: warmup (checkpoint) -> wordlist
//! heist:    fork (keypad correct, vent incorrect) -> vault (checkpoint)

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use crackquest::adventure::{
    AchievementTracker, Adventure, AdventureResult, EventHooks, EventKind, GameEvent, HintStatus,
    RecoveryOption, RetryPoint, TriggerContext, TriggerKind, UnlockedAchievement,
};
use crackquest::campaign::{self, Campaign, Chapter, Encounter};
use crackquest::core::config::GameConfig;
use crackquest::core::error::{AdventureError, HookError};
use crackquest::core::types::{Difficulty, EncounterKind, GameMode, Outcome};

fn heist() -> Arc<Campaign> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/campaigns/heist.toml");
    Arc::new(campaign::load(&path).unwrap())
}

fn adventure(difficulty: Difficulty, mode: GameMode) -> Adventure {
    Adventure::new(heist(), "neo", difficulty, mode)
}

/// Play the whole campaign taking the correct branch
fn play_through(adventure: &mut Adventure) -> AdventureResult {
    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);
    adventure.make_choice("keypad");
    adventure.record_outcome(Outcome::Success)
}

/// Records every trigger and unlocks a fixed achievement per kind
#[derive(Default, Clone)]
struct RecordingTracker {
    fired: Rc<RefCell<Vec<(TriggerKind, Option<f64>, Option<f64>)>>>,
    unlocks: Vec<(TriggerKind, &'static str)>,
}

impl AchievementTracker for RecordingTracker {
    fn check_trigger(
        &mut self,
        kind: TriggerKind,
        value: Option<f64>,
        context: &TriggerContext,
    ) -> Result<Vec<UnlockedAchievement>, HookError> {
        self.fired.borrow_mut().push((kind, value, context.speed_target_seconds));
        Ok(self
            .unlocks
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| UnlockedAchievement::new(*id, *id))
            .collect())
    }
}

struct BrokenTracker;

impl AchievementTracker for BrokenTracker {
    fn check_trigger(
        &mut self,
        _kind: TriggerKind,
        _value: Option<f64>,
        _context: &TriggerContext,
    ) -> Result<Vec<UnlockedAchievement>, HookError> {
        Err(HookError::from("achievement service unavailable"))
    }
}

// ============================================================================
// Linear progression
// ============================================================================

/// Integration test: a clean Normal run from first encounter to campaign end
#[test]
fn test_full_playthrough() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);

    match adventure.record_outcome(Outcome::Success) {
        AdventureResult::Continue { encounter_id, xp_earned, text, .. } => {
            assert_eq!(encounter_id, "wordlist");
            assert_eq!(xp_earned, 10);
            assert_eq!(text, "Easy.");
        }
        other => panic!("expected continue, got {:?}", other),
    }

    match adventure.record_outcome(Outcome::Success) {
        AdventureResult::ChapterComplete {
            chapter_id,
            next_chapter_id,
            next_encounter_id,
            outro_text,
            ..
        } => {
            assert_eq!(chapter_id, "prologue");
            assert_eq!(next_chapter_id, "heist");
            assert_eq!(next_encounter_id, "fork");
            assert_eq!(outro_text, "The crew is impressed.");
        }
        other => panic!("expected chapter_complete, got {:?}", other),
    }
    assert_eq!(adventure.state().chapter_id, "heist");
    assert_eq!(adventure.current_encounter().unwrap().id, "fork");

    let result = adventure.make_choice("keypad");
    assert!(matches!(
        result,
        AdventureResult::Continue { ref encounter_id, xp_earned: 0, .. } if encounter_id == "vault"
    ));

    match adventure.record_outcome(Outcome::Success) {
        AdventureResult::Complete { campaign_id, total_xp, deaths, .. } => {
            assert_eq!(campaign_id, "heist");
            assert_eq!(total_xp, 40);
            assert_eq!(deaths, 0);
        }
        other => panic!("expected complete, got {:?}", other),
    }

    let state = adventure.state();
    assert!(adventure.is_complete());
    assert_eq!(state.completed_encounters, vec!["warmup", "wordlist", "fork", "vault"]);
    assert_eq!(state.completed_chapters, vec!["prologue", "heist"]);
    assert_eq!(state.choice_history.get("fork").map(String::as_str), Some("keypad"));
    assert_eq!(state.last_checkpoint.as_deref(), Some("vault"));
    assert!(state.has_completed_difficulty("heist", Difficulty::Normal));
}

/// Integration test: two linear encounters then a one-encounter finale
#[test]
fn test_three_successes_finish_campaign() {
    let mut campaign = Campaign::new("mini", "Mini");
    campaign.push_chapter(
        Chapter::new("ch1", "One", "e1"),
        vec![
            Encounter::new("e1", "E1", EncounterKind::Crack).with_next("e2").with_xp(10),
            Encounter::new("e2", "E2", EncounterKind::Crack).with_xp(10),
        ],
    );
    campaign.push_chapter(
        Chapter::new("ch2", "Two", "e3"),
        vec![Encounter::new("e3", "E3", EncounterKind::Crack).with_xp(20)],
    );
    assert!(campaign::validate(&campaign).is_empty());

    let mut adventure =
        Adventure::new(Arc::new(campaign), "neo", Difficulty::Normal, GameMode::Full);
    let actions: Vec<AdventureResult> = (0..3)
        .map(|_| adventure.record_outcome(Outcome::Success))
        .collect();

    assert!(matches!(actions[0], AdventureResult::Continue { xp_earned: 10, .. }));
    assert_eq!(actions[1].action(), "chapter_complete");
    assert!(matches!(actions[2], AdventureResult::Complete { total_xp: 40, .. }));
}

#[test]
fn test_progress_summary() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    adventure.record_outcome(Outcome::Success);

    let summary = adventure.progress();
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.percent, 25.0);
    assert_eq!(summary.xp_earned, 10);
    assert_eq!(summary.chapter_number, 1);
    assert_eq!(summary.chapter_count, 2);
    assert!(!summary.campaign_complete);
}

#[test]
fn test_success_is_idempotent_on_completion_list() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    adventure.record_outcome(Outcome::Success);
    adventure.retry_from_checkpoint();
    adventure.record_outcome(Outcome::Success);

    assert_eq!(adventure.state().completed_encounters, vec!["warmup"]);
    // XP is still paid for the replay
    assert_eq!(adventure.state().total_xp, 20);
}

// ============================================================================
// XP scaling
// ============================================================================

#[test]
fn test_heroic_xp_without_variant_reward() {
    let mut adventure = adventure(Difficulty::Heroic, GameMode::Full);
    let warmup = adventure.current_encounter().unwrap();
    assert_eq!(warmup.effective_xp(Difficulty::Mythic), 15);
    assert_eq!(adventure.effective_solution(), Some("letmein"));

    let result = adventure.record_outcome(Outcome::Success);
    assert!(matches!(result, AdventureResult::Continue { xp_earned: 15, .. }));
}

#[test]
fn test_observer_mythic_xp() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Observer);
    adventure.set_difficulty(Difficulty::Mythic).unwrap();

    // Mythic variant pays 15: 15 x 2.0 x 0.2
    assert_eq!(adventure.effective_xp_reward(), 6);
    assert_eq!(adventure.effective_hash(), Some("ef92b778bafe771e89245b89ecbc08a4"));
    assert!(adventure.check_answer("hunter2"));

    adventure.record_outcome(Outcome::Success);
    assert_eq!(adventure.state().total_xp, 6);
}

#[test]
fn test_partial_and_skip() {
    let mut adventure = adventure(Difficulty::Heroic, GameMode::Full);

    match adventure.record_outcome(Outcome::Partial) {
        AdventureResult::Continue { xp_earned, penalty, encounter_id, .. } => {
            assert_eq!(xp_earned, 5);
            assert!(penalty.is_some());
            assert_eq!(encounter_id, "wordlist");
        }
        other => panic!("expected continue, got {:?}", other),
    }

    // No linear successor: skip stays put
    let result = adventure.record_outcome(Outcome::Skip);
    assert!(matches!(
        result,
        AdventureResult::Continue { ref encounter_id, xp_earned: 0, .. }
            if encounter_id == "wordlist"
    ));
    assert!(adventure.state().completed_encounters.is_empty());
}

/// Integration test: partial credit halves the authored reward, not the variant's
#[test]
fn test_mythic_partial_pays_half_base() {
    let mut adventure = adventure(Difficulty::Mythic, GameMode::Observer);
    let warmup = adventure.current_encounter().unwrap();
    assert_eq!(warmup.effective_xp(Difficulty::Mythic), 15);

    match adventure.record_outcome(Outcome::Partial) {
        AdventureResult::Continue { xp_earned, penalty, .. } => {
            assert_eq!(xp_earned, 5);
            assert_eq!(penalty.as_deref(), Some("Partial credit: 5 of 10 XP"));
        }
        other => panic!("expected continue, got {:?}", other),
    }
    assert_eq!(adventure.state().total_xp, 5);
}

/// Integration test: a fork only moves forward through a choice
#[test]
fn test_outcomes_at_fork_point_to_make_choice() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);
    let before = adventure.state().clone();

    for outcome in [Outcome::Success, Outcome::Partial, Outcome::Skip] {
        match adventure.record_outcome(outcome) {
            AdventureResult::Error { message } => {
                assert_eq!(message, AdventureError::ChoiceRequired("fork".into()).to_string());
            }
            other => panic!("expected error, got {:?}", other),
        }
    }
    assert_eq!(adventure.state(), &before);
    assert_eq!(adventure.state().completed_chapters, vec!["prologue"]);
    assert!(!adventure.is_complete());

    assert_eq!(adventure.make_choice("keypad").action(), "continue");
    assert_eq!(adventure.state().encounter_id, "vault");
}

// ============================================================================
// Failure and recovery
// ============================================================================

/// Integration test: a wrong branch is a death even though it leads to the same room
#[test]
fn test_incorrect_choice_is_game_over() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);

    match adventure.make_choice("vent") {
        AdventureResult::GameOver { encounter_id, deaths, options, text, .. } => {
            assert_eq!(encounter_id, "fork");
            assert_eq!(deaths, 1);
            assert_eq!(text, "Alarms.");
            assert_eq!(
                options,
                vec![
                    RecoveryOption::RetryCheckpoint,
                    RecoveryOption::RetryFork,
                    RecoveryOption::StartOver,
                    RecoveryOption::Leave,
                ]
            );
        }
        other => panic!("expected game_over, got {:?}", other),
    }

    let state = adventure.state();
    assert_eq!(state.encounter_id, "fork");
    assert_eq!(state.last_fork.as_deref(), Some("fork"));
    assert!(!state.is_completed("fork"));
}

#[test]
fn test_retry_from_fork_then_checkpoint() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);
    adventure.make_choice("vent");

    assert_eq!(
        adventure.retry_from_fork(),
        AdventureResult::Retry {
            point: RetryPoint::Fork,
            chapter_id: "heist".into(),
            encounter_id: "fork".into(),
        }
    );

    // The checkpoint lives in the previous chapter
    assert_eq!(
        adventure.retry_from_checkpoint(),
        AdventureResult::Retry {
            point: RetryPoint::Checkpoint,
            chapter_id: "prologue".into(),
            encounter_id: "warmup".into(),
        }
    );
    assert_eq!(adventure.current_chapter().unwrap().id, "prologue");
}

#[test]
fn test_start_over_keeps_checkpoint_clears_fork() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);
    adventure.make_choice("vent");

    let result = adventure.start_over();
    assert_eq!(
        result,
        AdventureResult::Restart {
            chapter_id: "heist".into(),
            encounter_id: "fork".into(),
        }
    );
    assert_eq!(adventure.state().last_fork, None);
    assert_eq!(adventure.state().last_checkpoint.as_deref(), Some("warmup"));

    match adventure.retry_from_fork() {
        AdventureResult::Error { message } => {
            assert_eq!(message, AdventureError::NoTarget(RetryPoint::Fork).to_string());
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[test]
fn test_first_failure_offers_only_restart() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    match adventure.record_outcome(Outcome::Failure) {
        AdventureResult::GameOver { options, .. } => {
            assert_eq!(options, vec![RecoveryOption::StartOver, RecoveryOption::Leave]);
        }
        other => panic!("expected game_over, got {:?}", other),
    }
    assert!(adventure.retry_from_checkpoint().is_error());
}

// ============================================================================
// Gating
// ============================================================================

/// Integration test: observer mode stops after the prologue
#[test]
fn test_observer_prologue_gate() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Observer);
    adventure.record_outcome(Outcome::Success);

    let result = adventure.record_outcome(Outcome::Success);
    assert_eq!(result.action(), "prologue_gate");
    assert!(adventure.state().prologue_complete);
    assert_eq!(adventure.state().chapter_id, "prologue");
    assert_eq!(adventure.state().encounter_id, "wordlist");

    // Outcomes on the gated encounter don't slip past the gate
    assert_eq!(adventure.record_outcome(Outcome::Success).action(), "prologue_gate");
    assert_eq!(adventure.state().encounter_id, "wordlist");

    let mut full = self::adventure(Difficulty::Normal, GameMode::Full);
    full.record_outcome(Outcome::Success);
    assert_eq!(full.record_outcome(Outcome::Success).action(), "chapter_complete");
    assert_eq!(full.state().chapter_id, "heist");
    assert!(!full.state().prologue_complete);
}

/// Integration test: a second playthrough keeps lifetime counters and spent first-time triggers
#[test]
fn test_new_game_keeps_lifetime_counters() {
    let tracker = RecordingTracker::default();
    let fired = Rc::clone(&tracker.fired);
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full).with_achievements(tracker);

    adventure.record_outcome(Outcome::Failure);
    adventure.start_over();
    play_through(&mut adventure);
    assert_eq!(adventure.state().deaths, 1);

    adventure.new_game(Difficulty::Heroic).unwrap();
    assert_eq!(adventure.state().deaths, 1);
    assert_eq!(adventure.state().run_deaths, 0);

    let result = play_through(&mut adventure);
    assert!(matches!(result, AdventureResult::Complete { deaths: 0, .. }));
    assert_eq!(adventure.state().deaths, 1);

    let kinds: Vec<TriggerKind> = fired.borrow().iter().map(|(k, _, _)| *k).collect();
    let count = |kind: TriggerKind| kinds.iter().filter(|k| **k == kind).count();
    assert_eq!(count(TriggerKind::FirstEncounter), 1);
    assert_eq!(count(TriggerKind::FirstDeath), 1);
    // Only the clean second run counts
    assert_eq!(count(TriggerKind::NoDeathCampaign), 1);
}

/// Integration test: Mythic opens only after a Heroic clear of the same campaign
#[test]
fn test_mythic_unlock_after_heroic() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    assert!(!adventure.is_difficulty_unlocked(Difficulty::Mythic));
    assert_eq!(
        adventure.set_difficulty(Difficulty::Mythic),
        Err(AdventureError::DifficultyLocked(Difficulty::Mythic))
    );

    play_through(&mut adventure);
    assert!(!adventure.is_difficulty_unlocked(Difficulty::Mythic), "Normal clear is not enough");

    adventure.new_game(Difficulty::Heroic).unwrap();
    assert_eq!(adventure.state().xp_earned, 0);
    assert_eq!(adventure.state().total_xp, 40);
    assert_eq!(adventure.state().encounter_id, "warmup");

    let result = play_through(&mut adventure);
    assert!(matches!(result, AdventureResult::Complete { total_xp: 100, session_xp: 60, .. }));
    assert!(adventure.is_difficulty_unlocked(Difficulty::Mythic));

    adventure.new_game(Difficulty::Mythic).unwrap();
    assert_eq!(adventure.state().difficulty, Difficulty::Mythic);
}

#[test]
fn test_observer_sees_every_difficulty() {
    let adventure = adventure(Difficulty::Normal, GameMode::Observer);
    for level in Difficulty::ALL {
        assert!(adventure.is_difficulty_unlocked(level));
    }
}

/// Integration test: an observer clear upgrades to full and never downgrades
#[test]
fn test_completion_mode_upgrade() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Observer);
    adventure.record_outcome(Outcome::Success);
    assert_eq!(adventure.state().completion_modes["warmup"], GameMode::Observer);

    adventure.set_game_mode(GameMode::Full);
    adventure.retry_from_checkpoint();
    adventure.record_outcome(Outcome::Success);
    assert_eq!(adventure.state().game_mode, GameMode::Full);
    assert_eq!(adventure.state().completion_modes["warmup"], GameMode::Full);

    adventure.set_game_mode(GameMode::John);
    adventure.retry_from_checkpoint();
    adventure.record_outcome(Outcome::Success);
    assert_eq!(adventure.state().completion_modes["warmup"], GameMode::Full);
    assert_eq!(adventure.state().completed_encounters, vec!["warmup"]);
}

/// Integration test: a gated observer who switches modes carries on into the next chapter
#[test]
fn test_leaving_observer_lifts_prologue_gate() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Observer);
    adventure.record_outcome(Outcome::Success);
    assert_eq!(adventure.record_outcome(Outcome::Success).action(), "prologue_gate");

    // Staying an observer keeps the gate closed
    adventure.set_game_mode(GameMode::Observer);
    assert!(adventure.state().prologue_complete);
    assert_eq!(adventure.state().encounter_id, "wordlist");

    adventure.set_game_mode(GameMode::Hashcat);
    let state = adventure.state();
    assert_eq!(state.game_mode, GameMode::Hashcat);
    assert!(!state.prologue_complete);
    assert_eq!(state.chapter_id, "heist");
    assert_eq!(state.encounter_id, "fork");
    assert_eq!(state.completed_chapters, vec!["prologue"]);

    adventure.make_choice("keypad");
    assert_eq!(adventure.record_outcome(Outcome::Success).action(), "complete");
}

/// Integration test: Mythic picked as an observer falls back once the player stops observing
#[test]
fn test_leaving_observer_drops_locked_difficulty() {
    let mut adventure = adventure(Difficulty::Mythic, GameMode::Observer);
    adventure.set_game_mode(GameMode::Full);
    assert_eq!(adventure.state().difficulty, Difficulty::Normal);
    assert_eq!(adventure.state().encounter_id, "warmup");
}

// ============================================================================
// Hints
// ============================================================================

#[test]
fn test_heroic_hint_quota() {
    let mut adventure = adventure(Difficulty::Heroic, GameMode::Full);
    assert_eq!(adventure.effective_hint(), Some("What you say at a locked door"));

    for _ in 0..3 {
        assert_eq!(adventure.use_hint(), Some(0));
    }
    assert_eq!(adventure.use_hint(), None);
    assert_eq!(adventure.can_use_hint(), (false, HintStatus::QuotaExhausted { quota: 3 }));

    // Quota refreshes in the next chapter
    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);
    assert!(adventure.can_use_hint().0);
}

#[test]
fn test_mythic_hint_spends_lifetime_xp() {
    let config = GameConfig {
        mythic_hint_cost: 40,
        ..GameConfig::default()
    };
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full).with_config(config);
    play_through(&mut adventure);
    adventure.new_game(Difficulty::Heroic).unwrap();
    play_through(&mut adventure);
    adventure.new_game(Difficulty::Mythic).unwrap();
    assert_eq!(adventure.state().total_xp, 100);

    assert_eq!(adventure.can_use_hint(), (true, HintStatus::Costs { cost: 40, balance: 100 }));
    assert_eq!(adventure.use_hint(), Some(40));
    assert_eq!(adventure.use_hint(), Some(40));
    assert_eq!(adventure.state().total_xp, 20);
    assert_eq!(adventure.state().xp_earned, 0);

    assert_eq!(
        adventure.can_use_hint(),
        (false, HintStatus::InsufficientXp { cost: 40, balance: 20 })
    );
    assert_eq!(adventure.use_hint(), None);
    assert_eq!(adventure.state().hints_used, 2);
}

// ============================================================================
// Collaborators
// ============================================================================

#[test]
fn test_triggers_over_a_clean_run() {
    let tracker = RecordingTracker::default();
    let fired = Rc::clone(&tracker.fired);
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full)
        .with_rogue_mode(true)
        .with_achievements(tracker);

    play_through(&mut adventure);

    let kinds: Vec<TriggerKind> = fired.borrow().iter().map(|(k, _, _)| *k).collect();
    assert_eq!(kinds.iter().filter(|k| **k == TriggerKind::FirstEncounter).count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == TriggerKind::NoDeathChapter).count(), 2);
    for expected in [
        TriggerKind::CampaignComplete,
        TriggerKind::NoDeathCampaign,
        TriggerKind::RogueComplete,
        TriggerKind::AllChoicesCorrect,
    ] {
        assert!(kinds.contains(&expected), "missing {:?}", expected);
    }
    assert!(!kinds.contains(&TriggerKind::FirstDeath));

    let xp_values: Vec<f64> = fired
        .borrow()
        .iter()
        .filter(|(k, _, _)| *k == TriggerKind::XpTotal)
        .filter_map(|(_, v, _)| *v)
        .collect();
    assert_eq!(xp_values, vec![10.0, 20.0, 40.0]);
}

#[test]
fn test_wrong_choice_blocks_all_choices_correct() {
    let tracker = RecordingTracker::default();
    let fired = Rc::clone(&tracker.fired);
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full).with_achievements(tracker);

    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);
    adventure.make_choice("vent");
    adventure.retry_from_fork();
    adventure.make_choice("keypad");
    adventure.record_outcome(Outcome::Success);

    let kinds: Vec<TriggerKind> = fired.borrow().iter().map(|(k, _, _)| *k).collect();
    // The latest pick at each fork counts
    assert!(kinds.contains(&TriggerKind::AllChoicesCorrect));
    assert!(kinds.contains(&TriggerKind::FirstDeath));
    assert!(!kinds.contains(&TriggerKind::NoDeathCampaign));
}

#[test]
fn test_speed_trigger_needs_started_timer() {
    let tracker = RecordingTracker::default();
    let fired = Rc::clone(&tracker.fired);
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full).with_achievements(tracker);

    adventure.record_outcome(Outcome::Success);
    adventure.start_encounter();
    adventure.record_outcome(Outcome::Success);

    let speed: Vec<_> = fired
        .borrow()
        .iter()
        .filter(|(k, _, _)| *k == TriggerKind::SpeedClear)
        .cloned()
        .collect();
    assert_eq!(speed.len(), 1);
    let (_, elapsed, target) = speed[0];
    assert!(elapsed.unwrap() >= 0.0);
    assert_eq!(target, Some(60.0));
}

#[test]
fn test_achievements_are_deduplicated() {
    let tracker = RecordingTracker {
        unlocks: vec![(TriggerKind::EncountersCompleted, "cracker")],
        ..Default::default()
    };
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full).with_achievements(tracker);

    let first = adventure.record_outcome(Outcome::Success);
    assert_eq!(first.achievements(), ["cracker".to_string()]);

    let second = adventure.record_outcome(Outcome::Success);
    assert!(second.achievements().is_empty());
    assert_eq!(adventure.state().achievements, vec!["cracker"]);
}

/// Integration test: failing collaborators never interrupt a transition
#[test]
fn test_failing_collaborators_are_swallowed() {
    let mut hooks = EventHooks::new();
    hooks.on(EventKind::EncounterSuccess, |_| Err(HookError::from("profile db locked")));
    hooks.on(EventKind::CheckpointReached, |_| Err(HookError::from("analytics down")));

    let mut adventure = adventure(Difficulty::Normal, GameMode::Full)
        .with_achievements(BrokenTracker)
        .with_hooks(hooks);

    let result = adventure.record_outcome(Outcome::Success);
    assert!(matches!(result, AdventureResult::Continue { xp_earned: 10, .. }));
    assert_eq!(adventure.state().last_checkpoint.as_deref(), Some("warmup"));
    assert!(adventure.state().achievements.is_empty());
}

#[test]
fn test_events_follow_play() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut hooks = EventHooks::new();
    for kind in [
        EventKind::EncounterStarted,
        EventKind::AttemptCompleted,
        EventKind::CheckpointReached,
        EventKind::ChoiceMade,
        EventKind::ChapterCompleted,
        EventKind::CampaignCompleted,
    ] {
        let sink = Rc::clone(&events);
        hooks.on(kind, move |event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });
    }

    let mut adventure = adventure(Difficulty::Normal, GameMode::Full).with_hooks(hooks);
    adventure.start_encounter();
    adventure.record_attempt(false);
    adventure.record_attempt(true);
    play_through(&mut adventure);

    let events = events.borrow();
    assert_eq!(events[0], GameEvent::EncounterStarted { encounter_id: "warmup".into() });
    assert_eq!(
        events[2],
        GameEvent::AttemptCompleted {
            encounter_id: "warmup".into(),
            correct: true,
            attempts: 2,
        }
    );
    assert!(events.contains(&GameEvent::ChoiceMade {
        fork_id: "fork".into(),
        choice_id: "keypad".into(),
        correct: true,
    }));
    let checkpoints = events.iter().filter(|e| e.kind() == EventKind::CheckpointReached).count();
    assert_eq!(checkpoints, 2);
    assert_eq!(
        events.last(),
        Some(&GameEvent::CampaignCompleted {
            campaign_id: "heist".into(),
            difficulty: Difficulty::Normal,
            total_xp: 40,
        })
    );
}

#[test]
fn test_error_records_for_bad_choices() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    let result = adventure.make_choice("keypad");
    assert_eq!(result, AdventureResult::from(AdventureError::NoChoices("warmup".into())));

    adventure.record_outcome(Outcome::Success);
    adventure.record_outcome(Outcome::Success);
    let result = adventure.make_choice("window");
    assert_eq!(result, AdventureResult::from(AdventureError::UnknownChoice("window".into())));
    assert_eq!(adventure.state().deaths, 0);
}

// ============================================================================
// Persistence
// ============================================================================

/// Integration test: save, reload, keep playing
#[test]
fn test_save_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("saves/neo.json");

    let mut adventure = adventure(Difficulty::Heroic, GameMode::Hashcat).with_save_path(&save_path);
    adventure.record_outcome(Outcome::Success);
    adventure.use_hint();
    adventure.save().unwrap();

    let mut resumed = Adventure::load(heist(), &save_path).unwrap();
    assert_eq!(resumed.state(), adventure.state());
    assert_eq!(resumed.current_encounter().unwrap().id, "wordlist");

    resumed.save().unwrap();
    let first = std::fs::read_to_string(&save_path).unwrap();
    let again = Adventure::load(heist(), &save_path).unwrap();
    again.save().unwrap();
    assert_eq!(std::fs::read_to_string(&save_path).unwrap(), first);

    let result = resumed.record_outcome(Outcome::Success);
    assert_eq!(result.action(), "chapter_complete");
}

#[test]
fn test_result_records_serialize_with_action_tag() {
    let mut adventure = adventure(Difficulty::Normal, GameMode::Full);
    let result = adventure.record_outcome(Outcome::Failure);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["action"], "game_over");
    assert_eq!(json["deaths"], 1);
    assert_eq!(json["options"], serde_json::json!(["start_over", "leave"]));
}
