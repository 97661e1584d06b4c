use crate::effects::RewardGrant;
use crate::host::ActorId;
use crate::lead::{LeadCancel, LeadCountdown};
use crate::mask::PartyMask;
use crate::overlay::OverlaySnapshot;
use crate::window::EndReason;

/// A window opened during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowOpened {
    pub attacker_id: ActorId,
    pub cue_index: u8,
    pub target_mask: PartyMask,
    pub frames: u32,
    pub lead_frames: u32,
}

/// Everything that happened during one engine update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Frame counter of this update, starting at 1.
    pub frame: u64,
    pub lead_started: Option<LeadCountdown>,
    pub lead_cancelled: Option<LeadCancel>,
    pub opened: Option<WindowOpened>,
    pub resolved: Option<EndReason>,
    /// Party slots whose pending damage rose this frame.
    pub damage_onsets: PartyMask,
    /// Party slots whose damage was negated this frame.
    pub negated: PartyMask,
    pub rewards: Vec<RewardGrant>,
    /// Party slot that received the confirm sound pulse.
    pub sound_slot: Option<usize>,
    /// The finished timing record could not be persisted.
    pub telemetry_failed: bool,
    pub overlay: OverlaySnapshot,
}

impl FrameReport {
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        self.resolved == Some(EndReason::ParrySuccess)
    }

    /// True when nothing but the overlay moved this frame.
    pub fn is_quiet(&self) -> bool {
        self.lead_started.is_none()
            && self.lead_cancelled.is_none()
            && self.opened.is_none()
            && self.resolved.is_none()
            && self.damage_onsets.is_empty()
            && self.negated.is_empty()
            && self.rewards.is_empty()
            && self.sound_slot.is_none()
            && !self.telemetry_failed
    }
}
