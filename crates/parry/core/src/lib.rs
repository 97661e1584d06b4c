//! Frame-stepped parry timing for a host combat simulation.
//!
//! `parry-core` watches the host's queue of pending enemy actions, opens a
//! short timing window when one targets the party, and grades the confirm
//! input against it. A successful parry negates the damage that lands on the
//! targeted slots, grants a small limit-charge reward and pulses a hit sound.
//! Every window produces one [`TimingSession`] record.
//!
//! All state lives in [`ParryEngine`], which is stepped once per host frame
//! through [`ParryEngine::update`]. The host is reached only through the
//! [`BattleHost`] and [`ConfirmInput`] traits, and records leave through a
//! [`TelemetrySink`]; the crate performs no I/O of its own.
pub mod config;
pub mod effects;
pub mod engine;
pub mod frames;
pub mod host;
pub mod lead;
pub mod mask;
pub mod monitor;
pub mod overlay;
pub mod scanner;
pub mod telemetry;
pub mod window;

pub use config::{AttackKind, ParryConfig, TimingMode};
pub use effects::{
    NegationTick, PendingNegation, PendingSoundCue, REWARD_PERCENT, RewardGrant,
    SOUND_RESET_FRAMES, apply_reward, reward_delta,
};
pub use engine::{FrameReport, ParryEngine, WindowOpened};
pub use frames::{FRAME_RATE, SecondsRange, frames_to_seconds, seconds_to_frames};
pub use host::{
    ActorId, ActorSlot, ActorSnapshot, AttackCue, BattleHost, CONFIRM_SOUND_ID, ConfirmInput,
    MAX_CUE_COMMANDS, MemoryBattle, MemoryInput,
};
pub use lead::{LeadCancel, LeadCountdown, LeadStep};
pub use mask::{ENEMY_CAPACITY, PARTY_CAPACITY, PartyMask};
pub use monitor::DamageMonitor;
pub use overlay::{OverlayAnimator, OverlaySnapshot, OverlayState, ResultFlash};
pub use scanner::{DetectedCue, find_enemy_cue};
pub use telemetry::{
    MemoryTelemetry, NullTelemetry, TelemetryError, TelemetrySink, TimingEvent, TimingEventKind,
    TimingSession,
};
pub use window::{ActiveWindow, EndReason, WindowPhase};
