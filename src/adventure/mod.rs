//! Adventure progression: player state, transitions and the hint economy

pub mod hints;
pub mod hooks;
pub mod machine;
pub mod result;
pub mod state;

pub use hints::{charge_hint, hint_status, HintStatus};
pub use hooks::{
    AchievementTracker, EventHandler, EventHooks, EventKind, GameEvent, NoAchievements,
    TriggerContext, TriggerKind, UnlockedAchievement,
};
pub use machine::{success_xp, Adventure, ProgressSummary};
pub use result::{AdventureResult, RecoveryOption, RetryPoint};
pub use state::{PlayerState, SaveError};
