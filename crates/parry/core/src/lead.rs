//! Lead-in countdown between cue detection and window open.

use crate::config::{AttackKind, ParryConfig};
use crate::frames::frames_to_seconds;
use crate::host::{ActorId, BattleHost};
use crate::mask::PartyMask;
use crate::scanner::{DetectedCue, find_enemy_cue};

/// A pending lead-in for one attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeadCountdown {
    pub attacker_id: ActorId,
    pub kind: AttackKind,
    /// Frames left before the window opens.
    pub remaining: u32,
    /// Total lead frames, reported in telemetry.
    pub applied: u32,
}

/// Why a lead-in ended without opening a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LeadCancel {
    /// The attacker no longer has a hostile cue queued.
    CueCleared,
    /// The cue is still queued but no longer targets the party.
    NoTargets,
}

/// Result of advancing a lead-in by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeadStep {
    Waiting(LeadCountdown),
    Cancelled(LeadCancel),
    /// The countdown finished; open a window for the cue as it reads now.
    Ready {
        cue: DetectedCue,
        mask: PartyMask,
        lead_frames: u32,
    },
}

impl LeadCountdown {
    /// Starts a lead-in for `cue`, or `None` when the configured lead is zero.
    pub fn start(config: &ParryConfig, cue: &DetectedCue) -> Option<Self> {
        let kind = cue.attack_kind();
        let frames = config.lead_frames(kind);
        (frames > 0).then_some(Self {
            attacker_id: cue.attacker_id(),
            kind,
            remaining: frames,
            applied: frames,
        })
    }

    pub fn lead_seconds(&self) -> f32 {
        frames_to_seconds(self.applied)
    }

    /// Advances the countdown, re-reading the attacker's cue from the host.
    pub fn tick<H>(self, host: &H) -> LeadStep
    where
        H: BattleHost + ?Sized,
    {
        let Some(cue) = find_enemy_cue(host, Some(self.attacker_id)) else {
            return LeadStep::Cancelled(LeadCancel::CueCleared);
        };

        let remaining = self.remaining.saturating_sub(1);
        if remaining > 0 {
            return LeadStep::Waiting(Self { remaining, ..self });
        }

        let mask = cue.target_mask();
        if mask.is_empty() {
            return LeadStep::Cancelled(LeadCancel::NoTargets);
        }

        LeadStep::Ready {
            cue,
            mask,
            lead_frames: self.applied,
        }
    }
}
