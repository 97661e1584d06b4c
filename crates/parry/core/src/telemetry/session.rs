use chrono::{DateTime, Utc};

use crate::config::{ParryConfig, TimingMode};
use crate::frames::frames_to_seconds;
use crate::host::ActorId;
use crate::mask::PartyMask;
use crate::window::EndReason;

/// Kind of timing event recorded during a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TimingEventKind {
    /// Pending damage appeared on a party slot.
    Hit,
}

/// A timed event inside a window.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingEvent {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: TimingEventKind,
    pub slot: usize,
    /// Window-elapsed time, from the frame counter.
    pub time_seconds: f32,
}

/// Timing record of one parry attempt.
///
/// Serialized as a single JSON object per line of the timing log.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingSession {
    pub timestamp_utc: DateTime<Utc>,
    pub attacker_id: ActorId,
    pub cue_index: u8,
    /// Party slots targeted when the window opened.
    pub target_mask: u32,
    pub command_count: u8,
    /// Raw per-command target masks, as queued by the host.
    pub command_targets: Vec<u32>,
    pub timing_mode: TimingMode,
    pub lead_seconds: f32,
    /// Clamped fixed-window length, recorded in both modes.
    pub window_seconds: f32,
    /// Clamped resolve-window length, recorded in both modes.
    pub resolve_window_seconds: f32,
    pub events: Vec<TimingEvent>,
    pub end_seconds: Option<f32>,
    pub end_reason: Option<EndReason>,
    pub parry_succeeded: bool,
}

impl TimingSession {
    /// Opens a record for a window that is starting now.
    pub fn begin(
        timestamp_utc: DateTime<Utc>,
        config: &ParryConfig,
        attacker_id: ActorId,
        cue_index: u8,
        target_mask: PartyMask,
        command_targets: &[u32],
        lead_frames: u32,
    ) -> Self {
        Self {
            timestamp_utc,
            attacker_id,
            cue_index,
            target_mask: target_mask.bits(),
            command_count: command_targets.len() as u8,
            command_targets: command_targets.to_vec(),
            timing_mode: config.timing_mode,
            lead_seconds: frames_to_seconds(lead_frames),
            window_seconds: config.fixed_window_seconds(),
            resolve_window_seconds: config.resolve_window_seconds(),
            events: Vec::new(),
            end_seconds: None,
            end_reason: None,
            parry_succeeded: false,
        }
    }

    /// Appends a damage onset observed `elapsed_frames` into the window.
    pub fn record_hit(&mut self, slot: usize, elapsed_frames: u32) {
        self.events.push(TimingEvent {
            kind: TimingEventKind::Hit,
            slot,
            time_seconds: frames_to_seconds(elapsed_frames),
        });
    }

    /// Stamps the ending onto the record.
    pub fn finish(&mut self, reason: EndReason, elapsed_frames: u32) {
        self.end_seconds = Some(frames_to_seconds(elapsed_frames));
        self.end_reason = Some(reason);
        self.parry_succeeded = reason == EndReason::ParrySuccess;
    }

    pub fn is_finished(&self) -> bool {
        self.end_reason.is_some()
    }
}
