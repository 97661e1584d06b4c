use crate::frames::SecondsRange;

/// How the length of a parry window is decided.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimingMode {
    /// The window lasts exactly `window_seconds`.
    FixedWindow,
    /// The window closes when damage lands, `resolve_window_seconds` at most.
    #[default]
    ApplyDamageClamp,
}

/// Attack category used to pick the lead-time option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Physical,
    Magic,
}

/// Parry settings read once per frame.
///
/// Numeric options are stored as entered and clamped into their ranges at the
/// point of use, so out-of-range persisted values are never rejected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParryConfig {
    pub enabled: bool,
    pub timing_mode: TimingMode,
    pub window_seconds: f32,
    pub resolve_window_seconds: f32,
    pub lead_physical_seconds: f32,
    pub lead_magic_seconds: f32,
    /// Show the result banner and failure flash.
    pub indicator: bool,
    /// Pulse the confirm sound on success.
    pub audio: bool,
    /// Grant the limit-charge reward on success.
    pub reward_boost: bool,
    /// Zero the damage that lands on parried targets.
    pub negate_damage: bool,
    /// Emit per-frame engine diagnostics.
    pub logging: bool,
}

impl ParryConfig {
    // ===== fixed ranges =====
    pub const WINDOW_RANGE: SecondsRange = SecondsRange::new(0.5, 2.0);
    pub const RESOLVE_WINDOW_RANGE: SecondsRange = SecondsRange::new(0.2, 2.0);
    pub const LEAD_PHYSICAL_RANGE: SecondsRange = SecondsRange::new(0.0, 0.5);
    pub const LEAD_MAGIC_RANGE: SecondsRange = SecondsRange::new(0.0, 1.0);

    // ===== defaults =====
    pub const DEFAULT_WINDOW_SECONDS: f32 = 1.0;
    pub const DEFAULT_RESOLVE_WINDOW_SECONDS: f32 = 0.8;
    pub const DEFAULT_LEAD_PHYSICAL_SECONDS: f32 = 0.10;
    pub const DEFAULT_LEAD_MAGIC_SECONDS: f32 = 0.30;

    pub fn new() -> Self {
        Self {
            enabled: true,
            timing_mode: TimingMode::default(),
            window_seconds: Self::DEFAULT_WINDOW_SECONDS,
            resolve_window_seconds: Self::DEFAULT_RESOLVE_WINDOW_SECONDS,
            lead_physical_seconds: Self::DEFAULT_LEAD_PHYSICAL_SECONDS,
            lead_magic_seconds: Self::DEFAULT_LEAD_MAGIC_SECONDS,
            indicator: true,
            audio: true,
            reward_boost: true,
            negate_damage: true,
            logging: true,
        }
    }

    pub fn with_timing_mode(mut self, timing_mode: TimingMode) -> Self {
        self.timing_mode = timing_mode;
        self
    }

    /// Returns a copy with every numeric option clamped into its range.
    pub fn clamped(&self) -> Self {
        Self {
            window_seconds: Self::WINDOW_RANGE.clamp(self.window_seconds),
            resolve_window_seconds: Self::RESOLVE_WINDOW_RANGE.clamp(self.resolve_window_seconds),
            lead_physical_seconds: Self::LEAD_PHYSICAL_RANGE.clamp(self.lead_physical_seconds),
            lead_magic_seconds: Self::LEAD_MAGIC_RANGE.clamp(self.lead_magic_seconds),
            ..self.clone()
        }
    }

    pub fn is_resolve_mode(&self) -> bool {
        self.timing_mode == TimingMode::ApplyDamageClamp
    }

    /// Clamped `window_seconds` (recorded for audit in both modes).
    pub fn fixed_window_seconds(&self) -> f32 {
        Self::WINDOW_RANGE.clamp(self.window_seconds)
    }

    /// Clamped `resolve_window_seconds` (recorded for audit in both modes).
    pub fn resolve_window_seconds(&self) -> f32 {
        Self::RESOLVE_WINDOW_RANGE.clamp(self.resolve_window_seconds)
    }

    /// Length of a newly opened window under the active timing mode.
    pub fn window_frames(&self) -> u32 {
        match self.timing_mode {
            TimingMode::FixedWindow => Self::WINDOW_RANGE.frames(self.window_seconds),
            TimingMode::ApplyDamageClamp => {
                Self::RESOLVE_WINDOW_RANGE.frames(self.resolve_window_seconds)
            }
        }
    }

    /// Lead delay before a window opens for the given attack category.
    pub fn lead_frames(&self, kind: AttackKind) -> u32 {
        match kind {
            AttackKind::Physical => Self::LEAD_PHYSICAL_RANGE.frames(self.lead_physical_seconds),
            AttackKind::Magic => Self::LEAD_MAGIC_RANGE.frames(self.lead_magic_seconds),
        }
    }
}

impl Default for ParryConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_settings() {
        let config = ParryConfig::default();
        assert!(config.enabled);
        assert_eq!(config.timing_mode, TimingMode::ApplyDamageClamp);
        assert_eq!(config.window_frames(), 24);
        assert_eq!(config.lead_frames(AttackKind::Physical), 3);
        assert_eq!(config.lead_frames(AttackKind::Magic), 9);
    }

    #[test]
    fn fixed_window_is_clamped_before_conversion() {
        let mut config = ParryConfig::new().with_timing_mode(TimingMode::FixedWindow);

        config.window_seconds = 1.0;
        assert_eq!(config.window_frames(), 30);

        config.window_seconds = 0.1;
        assert_eq!(config.window_frames(), 15);

        config.window_seconds = 12.0;
        assert_eq!(config.window_frames(), 60);

        config.window_seconds = -3.0;
        assert_eq!(config.window_frames(), 15);
    }

    #[test]
    fn resolve_window_uses_its_own_range() {
        let mut config = ParryConfig::new();
        config.resolve_window_seconds = 0.0;
        assert_eq!(config.window_frames(), 6);
        config.resolve_window_seconds = 5.0;
        assert_eq!(config.window_frames(), 60);
    }

    #[test]
    fn lead_ranges_differ_by_kind() {
        let mut config = ParryConfig::new();
        config.lead_physical_seconds = 1.0;
        config.lead_magic_seconds = 1.0;
        assert_eq!(config.lead_frames(AttackKind::Physical), 15);
        assert_eq!(config.lead_frames(AttackKind::Magic), 30);

        config.lead_physical_seconds = 0.0;
        assert_eq!(config.lead_frames(AttackKind::Physical), 0);
    }

    #[test]
    fn clamped_copies_toggles() {
        let mut config = ParryConfig::new();
        config.audio = false;
        config.window_seconds = 7.0;
        config.lead_magic_seconds = f32::NAN;

        let clamped = config.clamped();
        assert!(!clamped.audio);
        assert_eq!(clamped.window_seconds, 2.0);
        assert_eq!(clamped.lead_magic_seconds, 0.0);
    }

    #[test]
    fn timing_mode_parses_snake_case() {
        assert_eq!(
            "fixed_window".parse::<TimingMode>().unwrap(),
            TimingMode::FixedWindow
        );
        assert_eq!(TimingMode::ApplyDamageClamp.as_ref(), "apply_damage_clamp");
    }
}
