//! Hint economy
//!
//! - Normal: free, unlimited
//! - Heroic: fixed quota per chapter
//! - Mythic: each hint costs lifetime XP
//! - Observer mode: always free, whatever the difficulty

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::adventure::state::PlayerState;
use crate::core::config::GameConfig;
use crate::core::types::{Difficulty, GameMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HintStatus {
    Free,
    QuotaRemaining { remaining: u32, quota: u32 },
    QuotaExhausted { quota: u32 },
    Costs { cost: u32, balance: u32 },
    InsufficientXp { cost: u32, balance: u32 },
}

impl HintStatus {
    pub fn allowed(&self) -> bool {
        matches!(
            self,
            HintStatus::Free | HintStatus::QuotaRemaining { .. } | HintStatus::Costs { .. }
        )
    }

    /// XP a hint would cost right now
    pub fn cost(&self) -> u32 {
        match self {
            HintStatus::Costs { cost, .. } => *cost,
            _ => 0,
        }
    }
}

impl fmt::Display for HintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintStatus::Free => write!(f, "Hints are free"),
            HintStatus::QuotaRemaining { remaining, quota } => {
                write!(f, "{}/{} hints left this chapter", remaining, quota)
            }
            HintStatus::QuotaExhausted { quota } => {
                write!(f, "All {} hints for this chapter are used", quota)
            }
            HintStatus::Costs { cost, balance } => {
                write!(f, "Hint costs {} XP ({} XP banked)", cost, balance)
            }
            HintStatus::InsufficientXp { cost, balance } => {
                write!(f, "Need {} XP for a hint, have {}", cost, balance)
            }
        }
    }
}

/// Current hint availability for the player's chapter and difficulty
pub fn hint_status(state: &PlayerState, config: &GameConfig) -> HintStatus {
    if state.game_mode == GameMode::Observer {
        return HintStatus::Free;
    }

    match state.difficulty {
        Difficulty::Normal => HintStatus::Free,
        Difficulty::Heroic => {
            let used = state.hints_in_chapter(&state.chapter_id);
            let quota = config.heroic_hint_quota;
            if used < quota {
                HintStatus::QuotaRemaining {
                    remaining: quota - used,
                    quota,
                }
            } else {
                HintStatus::QuotaExhausted { quota }
            }
        }
        Difficulty::Mythic => {
            let cost = config.mythic_hint_cost;
            let balance = state.total_xp;
            if balance >= cost {
                HintStatus::Costs { cost, balance }
            } else {
                HintStatus::InsufficientXp { cost, balance }
            }
        }
    }
}

/// Spend a hint; returns the XP charged, or `None` when denied
///
/// Both XP counters are floored at zero. Lifetime XP cannot actually go
/// below the cost because the purchase is denied first.
pub fn charge_hint(state: &mut PlayerState, config: &GameConfig) -> Option<u32> {
    let status = hint_status(state, config);
    if !status.allowed() {
        return None;
    }

    let cost = status.cost();
    state.total_xp = state.total_xp.saturating_sub(cost);
    state.xp_earned = state.xp_earned.saturating_sub(cost);
    state.hints_used += 1;
    *state.chapter_hints.entry(state.chapter_id.clone()).or_default() += 1;

    Some(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{Campaign, Chapter, Encounter};
    use crate::core::types::EncounterKind;

    fn state(difficulty: Difficulty, mode: GameMode) -> PlayerState {
        let mut campaign = Campaign::new("c", "Hints");
        campaign.push_chapter(
            Chapter::new("ch1", "One", "e1"),
            vec![Encounter::new("e1", "E1", EncounterKind::Crack)],
        );
        PlayerState::new(&campaign, "neo", difficulty, mode)
    }

    #[test]
    fn test_normal_hints_are_free_and_unlimited() {
        let config = GameConfig::default();
        let mut state = state(Difficulty::Normal, GameMode::Full);
        for _ in 0..10 {
            assert_eq!(charge_hint(&mut state, &config), Some(0));
        }
        assert_eq!(state.hints_used, 10);
    }

    #[test]
    fn test_heroic_quota_per_chapter() {
        let config = GameConfig::default();
        let mut state = state(Difficulty::Heroic, GameMode::Full);

        for _ in 0..3 {
            assert_eq!(charge_hint(&mut state, &config), Some(0));
        }
        assert_eq!(hint_status(&state, &config), HintStatus::QuotaExhausted { quota: 3 });
        assert_eq!(charge_hint(&mut state, &config), None);

        // New chapter, fresh quota
        state.chapter_id = "ch2".into();
        assert_eq!(
            hint_status(&state, &config),
            HintStatus::QuotaRemaining { remaining: 3, quota: 3 }
        );
    }

    #[test]
    fn test_mythic_hint_costs_xp() {
        let config = GameConfig::default();
        let mut state = state(Difficulty::Mythic, GameMode::Full);
        state.total_xp = 30;
        state.xp_earned = 10;

        assert_eq!(charge_hint(&mut state, &config), Some(25));
        assert_eq!(state.total_xp, 5);
        assert_eq!(state.xp_earned, 0);

        assert_eq!(
            hint_status(&state, &config),
            HintStatus::InsufficientXp { cost: 25, balance: 5 }
        );
        assert_eq!(charge_hint(&mut state, &config), None);
        assert_eq!(state.total_xp, 5);
    }

    #[test]
    fn test_observer_always_free() {
        let config = GameConfig::default();
        let mut state = state(Difficulty::Mythic, GameMode::Observer);
        assert_eq!(hint_status(&state, &config), HintStatus::Free);
        assert_eq!(charge_hint(&mut state, &config), Some(0));
        assert_eq!(state.total_xp, 0);
    }
}
