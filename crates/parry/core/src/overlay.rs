//! Presentation state for the parry banner.
//!
//! The renderer polls an [`OverlaySnapshot`] once per render tick. The state
//! is derived from the engine every frame and never set by window logic.

use crate::frames::FRAME_DURATION_SECONDS;

/// Frames the success/failure banner lingers after a result.
pub const RESULT_FLASH_FRAMES: u32 = 45;

/// Seconds for the banner to fade fully in or out.
pub const FADE_DURATION_SECONDS: f32 = 0.4;

/// Seconds for the pop-in scale animation to complete.
pub const SCALE_DURATION_SECONDS: f32 = 0.18;

/// Banner shown by the renderer.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum OverlayState {
    #[default]
    Hidden,
    Parry,
    Success,
    Failure,
}

/// Result banner timers owned by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultFlash {
    /// Held from a success until its cue leaves the queue.
    pub success_latched: bool,
    pub success_frames: u32,
    pub failure_frames: u32,
}

impl ResultFlash {
    pub fn show_success(&mut self) {
        self.success_latched = true;
        self.success_frames = self.success_frames.max(RESULT_FLASH_FRAMES);
        self.failure_frames = 0;
    }

    /// Releases the success latch, keeping the banner up for a full flash.
    pub fn release_success(&mut self) {
        if self.success_latched {
            self.success_latched = false;
            self.success_frames = self.success_frames.max(RESULT_FLASH_FRAMES);
        }
    }

    pub fn show_failure(&mut self, indicator: bool) {
        if indicator {
            self.failure_frames = RESULT_FLASH_FRAMES;
        }
        self.success_frames = 0;
    }

    pub fn tick(&mut self) {
        self.success_frames = self.success_frames.saturating_sub(1);
        self.failure_frames = self.failure_frames.saturating_sub(1);
    }

    pub fn showing_success(&self) -> bool {
        self.success_latched || self.success_frames > 0
    }

    pub fn showing_failure(&self) -> bool {
        self.failure_frames > 0
    }
}

/// Picks the banner for this frame.
pub fn derive_state(window_active: bool, flash: &ResultFlash) -> OverlayState {
    if window_active {
        OverlayState::Parry
    } else if flash.showing_success() {
        OverlayState::Success
    } else if flash.showing_failure() {
        OverlayState::Failure
    } else {
        OverlayState::Hidden
    }
}

/// Banner state and animation progress, advanced once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayAnimator {
    state: OverlayState,
    last_visible: OverlayState,
    visibility: f32,
    scale_progress: f32,
}

impl OverlayAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to `next` and steps both animations by one frame.
    pub fn advance(&mut self, next: OverlayState) {
        if next != self.state {
            self.state = next;
            if next != OverlayState::Hidden {
                self.last_visible = next;
                self.scale_progress = 0.0;
            }
        }

        let fade_step = FRAME_DURATION_SECONDS / FADE_DURATION_SECONDS;
        self.visibility = if self.state == OverlayState::Hidden {
            (self.visibility - fade_step).max(0.0)
        } else {
            (self.visibility + fade_step).min(1.0)
        };

        if self.state != OverlayState::Hidden {
            let scale_step = FRAME_DURATION_SECONDS / SCALE_DURATION_SECONDS;
            self.scale_progress = (self.scale_progress + scale_step).min(1.0);
        }
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            state: self.state,
            last_visible: self.last_visible,
            visibility: self.visibility,
            scale_progress: self.scale_progress,
        }
    }
}

/// What the renderer needs to draw the banner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlaySnapshot {
    pub state: OverlayState,
    /// Most recent non-hidden state, drawn while fading out.
    pub last_visible: OverlayState,
    /// Fade progress in `[0, 1]`.
    pub visibility: f32,
    /// Pop-in progress in `[0, 1]`.
    pub scale_progress: f32,
}

impl OverlaySnapshot {
    /// Banner to draw: the current state, or the last one while fading out.
    pub fn display_state(&self) -> OverlayState {
        if self.state != OverlayState::Hidden {
            self.state
        } else {
            self.last_visible
        }
    }

    /// Whether anything needs drawing this tick.
    pub fn is_visible(&self) -> bool {
        self.state != OverlayState::Hidden || self.visibility > 0.01
    }

    /// Draw scale for the banner, overshooting slightly on pop-in.
    pub fn eased_scale(&self) -> f32 {
        eased_scale(self.scale_progress)
    }
}

/// Maps pop-in progress to a draw scale in `[0.5, 1.1]`.
pub fn eased_scale(progress: f32) -> f32 {
    let eased = cubic_bezier(progress.clamp(0.0, 1.0), 1.6, 0.8);
    0.5 + 0.5 * eased.clamp(0.0, 1.2)
}

/// One-dimensional cubic Bezier with endpoints 0 and 1.
fn cubic_bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - t;
    3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t
}
