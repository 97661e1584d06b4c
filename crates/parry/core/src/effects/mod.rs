//! Side effects applied after a successful parry.
//!
//! Each applier is driven by the engine and touches only the party slots in
//! the mask it was given.
mod negation;
mod reward;
mod sound;

pub use negation::{NegationTick, PendingNegation};
pub use reward::{REWARD_PERCENT, RewardGrant, apply_reward, reward_delta};
pub use sound::{PendingSoundCue, SOUND_RESET_FRAMES};
