//! Conversions between configured seconds and battle frames.
//!
//! The host simulation runs at a fixed 30 Hz, so every "seconds" option is
//! converted to whole frames at the point of use. Conversion rounds half away
//! from zero and never yields a negative count.

/// Battle frame rate of the host simulation.
pub const FRAME_RATE: f32 = 30.0;

/// Duration of one battle frame in seconds.
pub const FRAME_DURATION_SECONDS: f32 = 1.0 / FRAME_RATE;

/// Converts seconds to whole frames (`round(seconds * 30)`, floored at zero).
///
/// Non-finite input yields zero frames.
pub fn seconds_to_frames(seconds: f32) -> u32 {
    if !seconds.is_finite() {
        return 0;
    }
    let frames = (seconds * FRAME_RATE).round();
    if frames <= 0.0 { 0 } else { frames as u32 }
}

/// Converts an elapsed frame count back to seconds.
pub fn frames_to_seconds(frames: u32) -> f32 {
    frames as f32 / FRAME_RATE
}

/// Inclusive range a seconds option is clamped into before conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecondsRange {
    pub min: f32,
    pub max: f32,
}

impl SecondsRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamps `value` into the range. NaN collapses to the minimum.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Clamps `value` and converts the result to frames.
    pub fn frames(&self, value: f32) -> u32 {
        seconds_to_frames(self.clamp(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(seconds_to_frames(0.1), 3);
        assert_eq!(seconds_to_frames(0.05), 2); // 1.5 frames
        assert_eq!(seconds_to_frames(1.0), 30);
        assert_eq!(seconds_to_frames(0.8), 24);
    }

    #[test]
    fn never_negative() {
        assert_eq!(seconds_to_frames(-0.5), 0);
        assert_eq!(seconds_to_frames(f32::NAN), 0);
        assert_eq!(seconds_to_frames(f32::NEG_INFINITY), 0);
    }

    #[test]
    fn monotonic_over_lead_range() {
        let mut previous = 0;
        for step in 0..=100 {
            let seconds = step as f32 * 0.01;
            let frames = seconds_to_frames(seconds);
            assert!(frames >= previous, "{seconds}s went backwards");
            assert_eq!(frames, (seconds * FRAME_RATE).round() as u32);
            previous = frames;
        }
    }

    #[test]
    fn range_clamps_before_conversion() {
        let range = SecondsRange::new(0.5, 2.0);
        assert_eq!(range.frames(0.0), 15);
        assert_eq!(range.frames(9.0), 60);
        assert_eq!(range.frames(f32::NAN), 15);
        assert_eq!(range.frames(f32::INFINITY), 60);
    }
}
