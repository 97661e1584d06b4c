//! Parry window state.
//!
//! The window lifecycle is one tagged value: idle, counting down a lead-in,
//! accepting input, or settling while the resolving action leaves the queue.
//! All timers live inside the variant that uses them.

use crate::frames::frames_to_seconds;
use crate::host::ActorId;
use crate::lead::LeadCountdown;
use crate::mask::PartyMask;

/// Why a window closed. Serialized verbatim into telemetry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// The confirm input landed inside the window.
    ParrySuccess,
    /// The window ran out of frames.
    Timeout,
    /// Damage landed on a targeted slot (resolve mode only).
    DamageResolve,
    /// The enemy cue vanished before anything resolved.
    CueCleared,
    /// The feature was switched off mid-window.
    Disabled,
}

impl EndReason {
    /// Whether this ending shows the failure banner.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Timeout | Self::DamageResolve)
    }
}

/// An open window accepting parry input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveWindow {
    pub attacker_id: ActorId,
    pub cue_index: u8,
    pub target_mask: PartyMask,
    pub remaining_frames: u32,
    pub elapsed_frames: u32,
}

impl ActiveWindow {
    pub fn new(attacker_id: ActorId, cue_index: u8, target_mask: PartyMask, frames: u32) -> Self {
        Self {
            attacker_id,
            cue_index,
            target_mask,
            remaining_frames: frames,
            elapsed_frames: 0,
        }
    }

    /// Advances one frame. Returns `true` when the window has run out.
    pub fn tick(&mut self) -> bool {
        self.elapsed_frames += 1;
        self.remaining_frames = self.remaining_frames.saturating_sub(1);
        self.remaining_frames == 0
    }

    pub fn elapsed_seconds(&self) -> f32 {
        frames_to_seconds(self.elapsed_frames)
    }

    /// Whether damage on `slot` belongs to this window's attack.
    pub fn targets_slot(&self, slot: usize) -> bool {
        self.target_mask.or_party().has_slot(slot)
    }
}

/// Window lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowPhase {
    #[default]
    Idle,
    LeadPending(LeadCountdown),
    Active(ActiveWindow),
    /// Resolved; waits for the resolving cue to leave the host queue.
    Settling { succeeded: bool },
}

impl WindowPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn active(&self) -> Option<&ActiveWindow> {
        match self {
            Self::Active(window) => Some(window),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    pub fn is_lead_pending(&self) -> bool {
        matches!(self, Self::LeadPending(_))
    }
}
