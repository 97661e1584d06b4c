//! Per-frame parry engine.
//!
//! [`ParryEngine::update`] is called once per host simulation frame. A frame
//! with the feature disabled only clears state. Otherwise the stages run in a
//! fixed order so that an event detected early in the frame can close a
//! window in the same frame:
//!
//! 1. cooldown tick
//! 2. attack cue scan (open lead/window, or close on a cleared cue)
//! 3. lead countdown
//! 4. damage-resolve monitor
//! 5. pending negation
//! 6. sound pulse reset
//! 7. window tick (timeout, then confirm input)
//! 8. result flash tick and overlay derivation
//!
//! When a cue vanishes on the same frame damage lands, stage 2 closes the
//! window with `cue_cleared` before stage 4 sees the damage.

mod outcome;

pub use outcome::{FrameReport, WindowOpened};

use chrono::{DateTime, Utc};

use crate::config::ParryConfig;
use crate::effects::{PendingNegation, PendingSoundCue, apply_reward};
use crate::host::{BattleHost, ConfirmInput};
use crate::lead::{LeadCancel, LeadCountdown, LeadStep};
use crate::mask::PartyMask;
use crate::monitor::DamageMonitor;
use crate::overlay::{OverlayAnimator, OverlaySnapshot, ResultFlash, derive_state};
use crate::scanner::{DetectedCue, find_enemy_cue};
use crate::telemetry::{TelemetrySink, TimingSession};
use crate::window::{ActiveWindow, EndReason, WindowPhase};

/// Debug diagnostics, emitted only while the `logging` option is on.
macro_rules! parry_debug {
    ($config:expr, $($arg:tt)+) => {
        if $config.logging {
            tracing::debug!($($arg)+);
        }
    };
}

/// Frame-stepped parry state machine.
///
/// Owns the window lifecycle, effect timers, damage edge flags, overlay
/// animation, and the live timing session. Host state, input, settings, and
/// the telemetry sink are borrowed per frame.
#[derive(Clone, Debug)]
pub struct ParryEngine {
    phase: WindowPhase,
    /// Frames during which no new window may open.
    cooldown: u32,
    monitor: DamageMonitor,
    negation: PendingNegation,
    sound: PendingSoundCue,
    flash: ResultFlash,
    overlay: OverlayAnimator,
    session: Option<TimingSession>,
    frame: u64,
    clock: fn() -> DateTime<Utc>,
}

impl ParryEngine {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Uses `clock` to timestamp timing sessions.
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Self {
            phase: WindowPhase::Idle,
            cooldown: 0,
            monitor: DamageMonitor::new(),
            negation: PendingNegation::default(),
            sound: PendingSoundCue::default(),
            flash: ResultFlash::default(),
            overlay: OverlayAnimator::new(),
            session: None,
            frame: 0,
            clock,
        }
    }

    pub fn phase(&self) -> &WindowPhase {
        &self.phase
    }

    pub fn cooldown_frames(&self) -> u32 {
        self.cooldown
    }

    pub fn pending_negation(&self) -> &PendingNegation {
        &self.negation
    }

    pub fn pending_sound(&self) -> &PendingSoundCue {
        &self.sound
    }

    /// Timing record of the open window, if any.
    pub fn session(&self) -> Option<&TimingSession> {
        self.session.as_ref()
    }

    pub fn overlay(&self) -> OverlaySnapshot {
        self.overlay.snapshot()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Runs one simulation frame.
    pub fn update<H, I, S>(
        &mut self,
        config: &ParryConfig,
        host: &mut H,
        input: &I,
        sink: &mut S,
    ) -> FrameReport
    where
        H: BattleHost + ?Sized,
        I: ConfirmInput + ?Sized,
        S: TelemetrySink + ?Sized,
    {
        self.frame += 1;
        let mut report = FrameReport::new(self.frame);

        if !config.enabled {
            self.disable(config, sink, &mut report);
            self.overlay.advance(derive_state(false, &self.flash));
            report.overlay = self.overlay.snapshot();
            return report;
        }

        self.cooldown = self.cooldown.saturating_sub(1);

        self.scan_cues(config, host, sink, &mut report);
        self.advance_lead(config, host, &mut report);
        self.monitor_damage(config, host, sink, &mut report);
        self.process_negation(config, host, &mut report);
        if let Some(slot) = self.sound.tick(host) {
            parry_debug!(config, slot, "reset temporary hit sound flag");
        }
        self.tick_window(config, host, input, sink, &mut report);

        self.flash.tick();
        self.overlay
            .advance(derive_state(self.phase.is_active(), &self.flash));
        report.overlay = self.overlay.snapshot();
        report
    }

    // ------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------

    fn scan_cues<H, S>(
        &mut self,
        config: &ParryConfig,
        host: &mut H,
        sink: &mut S,
        report: &mut FrameReport,
    ) where
        H: BattleHost + ?Sized,
        S: TelemetrySink + ?Sized,
    {
        if let Some(cue) = find_enemy_cue(host, None) {
            let mask = cue.target_mask();
            if mask.is_empty() {
                parry_debug!(
                    config,
                    attacker = cue.attacker_id(),
                    "enemy action ignored (no party targets)"
                );
                return;
            }
            if self.phase.is_idle() && self.cooldown == 0 {
                self.start_lead_or_window(config, &cue, mask, report);
            }
            return;
        }

        match self.phase {
            WindowPhase::Active(_) => {
                parry_debug!(config, "enemy cue cleared without parry input; closing window");
                self.close_window(config, EndReason::CueCleared, sink, report);
                self.phase = WindowPhase::Idle;
            }
            WindowPhase::LeadPending(lead) => {
                parry_debug!(
                    config,
                    attacker = lead.attacker_id,
                    "lead-in cancelled because cue disappeared"
                );
                self.phase = WindowPhase::Idle;
                report.lead_cancelled = Some(LeadCancel::CueCleared);
            }
            WindowPhase::Settling { .. } => {
                self.flash.release_success();
                self.phase = WindowPhase::Idle;
                parry_debug!(config, "enemy action resolved; parry ready");
            }
            WindowPhase::Idle => {}
        }
    }

    fn start_lead_or_window(
        &mut self,
        config: &ParryConfig,
        cue: &DetectedCue,
        mask: PartyMask,
        report: &mut FrameReport,
    ) {
        match LeadCountdown::start(config, cue) {
            None => self.open_window(config, cue, mask, 0, report),
            Some(lead) => {
                parry_debug!(
                    config,
                    attacker = lead.attacker_id,
                    frames = lead.applied,
                    kind = %lead.kind,
                    targets = mask.bits(),
                    "lead delay started"
                );
                self.phase = WindowPhase::LeadPending(lead);
                report.lead_started = Some(lead);
            }
        }
    }

    fn advance_lead<H>(&mut self, config: &ParryConfig, host: &H, report: &mut FrameReport)
    where
        H: BattleHost + ?Sized,
    {
        let WindowPhase::LeadPending(lead) = self.phase else {
            return;
        };

        match lead.tick(host) {
            LeadStep::Waiting(next) => self.phase = WindowPhase::LeadPending(next),
            LeadStep::Cancelled(reason) => {
                parry_debug!(config, attacker = lead.attacker_id, %reason, "lead-in cancelled");
                self.phase = WindowPhase::Idle;
                report.lead_cancelled = Some(reason);
            }
            LeadStep::Ready {
                cue,
                mask,
                lead_frames,
            } => self.open_window(config, &cue, mask, lead_frames, report),
        }
    }

    fn open_window(
        &mut self,
        config: &ParryConfig,
        cue: &DetectedCue,
        mask: PartyMask,
        lead_frames: u32,
        report: &mut FrameReport,
    ) {
        let frames = config.window_frames();
        let window = ActiveWindow::new(cue.attacker_id(), cue.index, mask, frames);

        self.phase = WindowPhase::Active(window);
        self.cooldown = 0;
        self.flash.failure_frames = 0;
        self.flash.success_latched = false;
        self.session = Some(TimingSession::begin(
            (self.clock)(),
            config,
            cue.attacker_id(),
            cue.index,
            mask,
            cue.cue.commands(),
            lead_frames,
        ));

        parry_debug!(
            config,
            attacker = cue.attacker_id(),
            cue_index = cue.index,
            frames,
            targets = mask.bits(),
            "parry window open"
        );
        report.opened = Some(WindowOpened {
            attacker_id: cue.attacker_id(),
            cue_index: cue.index,
            target_mask: mask,
            frames,
            lead_frames,
        });
    }

    fn monitor_damage<H, S>(
        &mut self,
        config: &ParryConfig,
        host: &H,
        sink: &mut S,
        report: &mut FrameReport,
    ) where
        H: BattleHost + ?Sized,
        S: TelemetrySink + ?Sized,
    {
        let rising = self.monitor.scan(host);
        report.damage_onsets = rising;

        for slot in rising.slots() {
            let Some(window) = self.phase.active().copied() else {
                continue;
            };
            if let Some(session) = self.session.as_mut() {
                session.record_hit(slot, window.elapsed_frames);
            }

            if config.is_resolve_mode() && window.targets_slot(slot) {
                parry_debug!(config, slot, "incoming damage detected; closing parry window");
                self.fail(config, EndReason::DamageResolve, sink, report);
            }
        }
    }

    fn process_negation<H>(&mut self, config: &ParryConfig, host: &mut H, report: &mut FrameReport)
    where
        H: BattleHost + ?Sized,
    {
        if !config.negate_damage {
            self.negation.clear();
            return;
        }
        if !self.negation.is_armed() {
            return;
        }

        let tick = self.negation.process(host);
        for slot in tick.negated.slots() {
            parry_debug!(config, slot, "negated pending damage");
        }
        if !tick.expired.is_empty() {
            parry_debug!(config, slots = tick.expired.bits(), "pending negation expired");
        }
        report.negated = tick.negated;
    }

    fn tick_window<H, I, S>(
        &mut self,
        config: &ParryConfig,
        host: &mut H,
        input: &I,
        sink: &mut S,
        report: &mut FrameReport,
    ) where
        H: BattleHost + ?Sized,
        I: ConfirmInput + ?Sized,
        S: TelemetrySink + ?Sized,
    {
        let WindowPhase::Active(mut window) = self.phase else {
            return;
        };

        let expired = window.tick();
        self.phase = WindowPhase::Active(window);

        if expired {
            self.fail(config, EndReason::Timeout, sink, report);
        } else if input.just_pressed() {
            self.succeed(config, host, sink, report);
        }
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    fn succeed<H, S>(
        &mut self,
        config: &ParryConfig,
        host: &mut H,
        sink: &mut S,
        report: &mut FrameReport,
    ) where
        H: BattleHost + ?Sized,
        S: TelemetrySink + ?Sized,
    {
        let Some(window) = self.phase.active().copied() else {
            return;
        };

        self.cooldown = self.cooldown.max(window.remaining_frames.max(1));
        self.flash.show_success();
        parry_debug!(config, attacker = window.attacker_id, "parry input detected");

        self.close_window(config, EndReason::ParrySuccess, sink, report);
        self.phase = WindowPhase::Settling { succeeded: true };

        if config.negate_damage {
            let frames = config.window_frames();
            self.negation = PendingNegation::arm(window.target_mask, frames);
            parry_debug!(config, targets = self.negation.mask().bits(), "queued damage negation");
        }

        if config.reward_boost {
            report.rewards = apply_reward(host, window.target_mask);
            for grant in &report.rewards {
                parry_debug!(
                    config,
                    slot = grant.slot,
                    before = grant.before,
                    after = grant.after,
                    "increased limit charge"
                );
            }
        }

        if config.audio {
            report.sound_slot = self.sound.play(host);
            if let Some(slot) = report.sound_slot {
                parry_debug!(config, slot, "queued confirm-style hit sound");
            }
        }
    }

    fn fail<S>(
        &mut self,
        config: &ParryConfig,
        reason: EndReason,
        sink: &mut S,
        report: &mut FrameReport,
    ) where
        S: TelemetrySink + ?Sized,
    {
        if let Some(window) = self.phase.active() {
            parry_debug!(config, attacker = window.attacker_id, %reason, "parry failed");
        }
        self.flash.show_failure(config.indicator);
        self.close_window(config, reason, sink, report);
        self.phase = WindowPhase::Settling { succeeded: false };
    }

    /// Finalizes the live session and hands it to the sink.
    ///
    /// The caller sets the next phase.
    fn close_window<S>(
        &mut self,
        config: &ParryConfig,
        reason: EndReason,
        sink: &mut S,
        report: &mut FrameReport,
    ) where
        S: TelemetrySink + ?Sized,
    {
        let elapsed = self
            .phase
            .active()
            .map(|window| window.elapsed_frames)
            .unwrap_or_default();
        if let Some(window) = self.phase.active() {
            parry_debug!(config, attacker = window.attacker_id, %reason, "parry window closed");
        }
        report.resolved = Some(reason);

        let Some(mut session) = self.session.take() else {
            return;
        };
        session.finish(reason, elapsed);
        if let Err(error) = sink.record(&session) {
            tracing::warn!(%error, "failed to write parry timing sample");
            report.telemetry_failed = true;
        }
    }

    /// Drops every in-flight timer except a raised sound pulse, which is
    /// lowered once the engine runs again. Host state is left untouched.
    fn disable<S>(&mut self, config: &ParryConfig, sink: &mut S, report: &mut FrameReport)
    where
        S: TelemetrySink + ?Sized,
    {
        let busy = !self.phase.is_idle()
            || self.cooldown > 0
            || self.negation.is_armed();

        if self.phase.is_active() {
            self.close_window(config, EndReason::Disabled, sink, report);
        }
        if busy {
            parry_debug!(config, "parry disabled; clearing state");
        }

        self.phase = WindowPhase::Idle;
        self.cooldown = 0;
        self.negation.clear();
        self.flash = ResultFlash::default();
    }
}

impl Default for ParryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingMode;
    use crate::host::{ActorSnapshot, AttackCue, MemoryBattle, MemoryInput};
    use crate::overlay::{OverlayState, RESULT_FLASH_FRAMES};
    use crate::telemetry::{MemoryTelemetry, TelemetryError};

    const ENEMY_ID: u8 = 10;

    fn fixed_clock() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn party_member() -> ActorSnapshot {
        ActorSnapshot {
            limit_charge: 50,
            limit_charge_max: 100,
            ..ActorSnapshot::party_member(100)
        }
    }

    fn no_lead(mode: TimingMode) -> ParryConfig {
        ParryConfig {
            lead_physical_seconds: 0.0,
            lead_magic_seconds: 0.0,
            ..ParryConfig::new().with_timing_mode(mode)
        }
    }

    struct Harness {
        engine: ParryEngine,
        battle: MemoryBattle,
        input: MemoryInput,
        telemetry: MemoryTelemetry,
        config: ParryConfig,
    }

    impl Harness {
        fn new(config: ParryConfig) -> Self {
            Self {
                engine: ParryEngine::with_clock(fixed_clock),
                battle: MemoryBattle::new()
                    .with_party([party_member(); 4])
                    .with_enemies([ActorSnapshot::monster(300)]),
                input: MemoryInput::new(),
                telemetry: MemoryTelemetry::new(),
                config,
            }
        }

        fn queue_attack(&mut self, targets: u32) {
            self.battle.push_cue(AttackCue::new(ENEMY_ID, &[targets]));
        }

        fn step(&mut self) -> FrameReport {
            self.frame(false)
        }

        fn press(&mut self) -> FrameReport {
            self.frame(true)
        }

        fn frame(&mut self, held: bool) -> FrameReport {
            self.input.sample(held);
            self.engine.update(
                &self.config,
                &mut self.battle,
                &self.input,
                &mut self.telemetry,
            )
        }
    }

    #[test]
    fn fixed_window_times_out_after_thirty_frames() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);

        let first = h.step();
        let opened = first.opened.unwrap();
        assert_eq!(opened.frames, 30);
        assert_eq!(opened.target_mask, PartyMask::SLOT_0);

        for _ in 2..30 {
            assert_eq!(h.step().resolved, None);
        }
        let last = h.step();
        assert_eq!(last.resolved, Some(EndReason::Timeout));
        assert_eq!(last.overlay.state, OverlayState::Failure);
        assert_eq!(h.engine.phase(), &WindowPhase::Settling { succeeded: false });

        let record = h.telemetry.last().unwrap();
        assert_eq!(record.end_reason, Some(EndReason::Timeout));
        assert!((record.end_seconds.unwrap() - 1.0).abs() < 1e-5);
        assert!(!record.parry_succeeded);
        assert_eq!(record.timestamp_utc, fixed_clock());
    }

    #[test]
    fn damage_closes_resolve_window() {
        let mut h = Harness::new(no_lead(TimingMode::ApplyDamageClamp));
        h.queue_attack(0b1);

        assert_eq!(h.step().opened.unwrap().frames, 24);
        for _ in 0..4 {
            h.step();
        }
        h.battle.set_pending_damage(0, 120, 0);

        let report = h.step();
        assert_eq!(report.resolved, Some(EndReason::DamageResolve));
        assert_eq!(report.damage_onsets, PartyMask::SLOT_0);

        let record = h.telemetry.last().unwrap();
        assert!((record.end_seconds.unwrap() - 5.0 / 30.0).abs() < 1e-5);
        assert_eq!(record.events.len(), 1);
        assert_eq!(record.events[0].slot, 0);
        assert!((record.events[0].time_seconds - 5.0 / 30.0).abs() < 1e-5);
    }

    #[test]
    fn damage_outside_targets_only_records_a_hit() {
        let mut h = Harness::new(no_lead(TimingMode::ApplyDamageClamp));
        h.queue_attack(0b1);
        h.step();

        h.battle.set_pending_damage(1, 30, 0);
        assert_eq!(h.step().resolved, None);
        assert!(h.engine.phase().is_active());
        assert_eq!(h.engine.session().unwrap().events.len(), 1);
    }

    #[test]
    fn fixed_window_ignores_damage() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        h.step();

        h.battle.set_pending_damage(0, 30, 0);
        assert_eq!(h.step().resolved, None);
        assert_eq!(h.engine.session().unwrap().events.len(), 1);
    }

    #[test]
    fn physical_lead_delays_window() {
        let mut h = Harness::new(ParryConfig::new().with_timing_mode(TimingMode::FixedWindow));
        h.queue_attack(0b1);

        let first = h.step();
        assert_eq!(first.lead_started.unwrap().applied, 3);
        assert!(first.opened.is_none());
        assert!(h.engine.phase().is_lead_pending());

        assert!(h.step().opened.is_none());
        let opened = h.step().opened.unwrap();
        assert_eq!(opened.lead_frames, 3);

        let session = h.engine.session().unwrap();
        assert!((session.lead_seconds - 0.1).abs() < 1e-6);
    }

    #[test]
    fn cancelled_lead_writes_no_record() {
        let mut h = Harness::new(ParryConfig::new());
        h.queue_attack(0b1);
        h.step();

        h.battle.clear_cues();
        let report = h.step();
        assert_eq!(report.lead_cancelled, Some(LeadCancel::CueCleared));
        assert!(h.engine.phase().is_idle());
        assert!(h.telemetry.is_empty());
    }

    #[test]
    fn cleared_cue_closes_window_without_failure() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        h.step();
        h.step();

        h.battle.clear_cues();
        let report = h.step();
        assert_eq!(report.resolved, Some(EndReason::CueCleared));
        assert_eq!(report.overlay.state, OverlayState::Hidden);
        assert!(h.engine.phase().is_idle());
        assert_eq!(
            h.telemetry.last().unwrap().end_reason,
            Some(EndReason::CueCleared)
        );
    }

    #[test]
    fn cleared_cue_wins_over_same_frame_damage() {
        let mut h = Harness::new(no_lead(TimingMode::ApplyDamageClamp));
        h.queue_attack(0b1);
        h.step();

        h.battle.clear_cues();
        h.battle.set_pending_damage(0, 10, 0);
        assert_eq!(h.step().resolved, Some(EndReason::CueCleared));
        assert_eq!(h.telemetry.len(), 1);
    }

    #[test]
    fn success_applies_effects_once() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b101);
        h.step();
        h.step();

        let report = h.press();
        assert!(report.succeeded());
        assert_eq!(report.overlay.state, OverlayState::Success);
        assert_eq!(report.sound_slot, Some(0));
        assert_eq!(report.rewards.len(), 2);
        assert_eq!(h.battle.party_actor(0).unwrap().limit_charge, 55);
        assert_eq!(h.battle.party_actor(1).unwrap().limit_charge, 50);
        assert_eq!(h.battle.party_actor(2).unwrap().limit_charge, 55);
        assert_eq!(h.battle.party_actor(0).unwrap().sound_hit, 3);
        assert_eq!(h.engine.cooldown_frames(), 27);
        assert_eq!(h.engine.pending_negation().mask(), PartyMask::SLOT_0 | PartyMask::SLOT_2);

        // Another press on the same cue does nothing.
        h.step();
        let again = h.press();
        assert_eq!(again.resolved, None);
        assert!(again.rewards.is_empty());
        assert_eq!(h.telemetry.len(), 1);

        let record = h.telemetry.last().unwrap();
        assert!(record.parry_succeeded);
        assert_eq!(record.end_reason, Some(EndReason::ParrySuccess));
        assert_eq!(record.target_mask, 0b101);
        assert_eq!(record.command_targets, vec![0b101]);
    }

    #[test]
    fn negation_only_touches_parried_slots() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b101);
        h.step();
        h.press();

        h.battle.set_pending_damage(0, 80, 0);
        h.battle.set_pending_damage(1, 80, 0);
        h.battle.set_pending_damage(2, 0, 12);
        let report = h.step();
        assert_eq!(report.negated, PartyMask::SLOT_0 | PartyMask::SLOT_2);

        let slot0 = h.battle.party_actor(0).unwrap();
        assert_eq!((slot0.damage_hp, slot0.damage_mp), (0, 0));
        assert!(slot0.avoid_damage);
        let slot1 = h.battle.party_actor(1).unwrap();
        assert_eq!(slot1.damage_hp, 80);
        assert!(!slot1.avoid_damage);
        let slot2 = h.battle.party_actor(2).unwrap();
        assert_eq!(slot2.damage_mp, 0);
        assert!(!h.engine.pending_negation().is_armed());
    }

    #[test]
    fn negation_toggle_off_skips_host_writes() {
        let mut config = no_lead(TimingMode::FixedWindow);
        config.negate_damage = false;
        let mut h = Harness::new(config);
        h.queue_attack(0b1);
        h.step();
        h.press();

        h.battle.set_pending_damage(0, 80, 0);
        assert!(h.step().negated.is_empty());
        assert_eq!(h.battle.party_actor(0).unwrap().damage_hp, 80);
    }

    #[test]
    fn sound_flag_resets_after_six_frames() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        h.step();
        h.press();

        for _ in 0..5 {
            h.step();
            assert_eq!(h.battle.party_actor(0).unwrap().sound_hit, 3);
        }
        h.step();
        assert_eq!(h.battle.party_actor(0).unwrap().sound_hit, 0);
        assert!(!h.engine.pending_sound().is_pending());
    }

    #[test]
    fn cooldown_blocks_next_window() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        h.step();
        h.step();
        h.press();
        assert_eq!(h.engine.cooldown_frames(), 27);

        h.battle.clear_cues();
        h.step();
        assert!(h.engine.phase().is_idle());

        h.queue_attack(0b10);
        for _ in 0..25 {
            assert!(h.step().opened.is_none());
        }
        assert!(h.step().opened.is_some());
    }

    #[test]
    fn success_banner_holds_until_cue_clears() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        h.step();
        h.press();

        for _ in 0..60 {
            assert_eq!(h.step().overlay.state, OverlayState::Success);
        }

        h.battle.clear_cues();
        for _ in 1..RESULT_FLASH_FRAMES {
            assert_eq!(h.step().overlay.state, OverlayState::Success);
        }
        assert_eq!(h.step().overlay.state, OverlayState::Hidden);
    }

    #[test]
    fn failure_banner_respects_indicator() {
        let mut config = no_lead(TimingMode::FixedWindow);
        config.window_seconds = 0.5;
        config.indicator = false;
        let mut h = Harness::new(config);
        h.queue_attack(0b1);

        let mut last = h.step();
        while last.resolved.is_none() {
            last = h.step();
        }
        assert_eq!(last.resolved, Some(EndReason::Timeout));
        assert_eq!(last.overlay.state, OverlayState::Hidden);
    }

    #[test]
    fn disabling_closes_window_and_goes_quiet() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        for _ in 0..12 {
            h.step();
        }
        assert!((h.engine.overlay().visibility - 1.0).abs() < 1e-5);

        h.config.enabled = false;
        let report = h.step();
        assert_eq!(report.resolved, Some(EndReason::Disabled));
        assert!(h.engine.phase().is_idle());
        assert_eq!(
            h.telemetry.last().unwrap().end_reason,
            Some(EndReason::Disabled)
        );

        h.battle.set_pending_damage(0, 10, 0);
        let before = h.battle.clone();
        for _ in 0..11 {
            let report = h.step();
            assert_eq!(report.resolved, None);
            assert!(report.opened.is_none());
        }
        assert_eq!(h.battle, before);
        assert!(!h.engine.overlay().is_visible());
        assert_eq!(h.telemetry.len(), 1);
    }

    #[test]
    fn disabling_drops_effects_without_host_writes() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        h.step();
        h.press();
        assert!(h.engine.pending_sound().is_pending());

        h.config.enabled = false;
        let before = h.battle.clone();
        h.step();
        h.step();
        assert_eq!(h.battle, before);
        assert_eq!(h.engine.cooldown_frames(), 0);
        assert!(!h.engine.pending_negation().is_armed());
        assert!(h.engine.pending_sound().is_pending());
    }

    #[test]
    fn sound_flag_lowers_after_reenable() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        h.step();
        h.press();
        assert_eq!(h.battle.party_actor(0).unwrap().sound_hit, 3);

        h.config.enabled = false;
        h.step();
        assert_eq!(h.battle.party_actor(0).unwrap().sound_hit, 3);

        h.config.enabled = true;
        h.battle.clear_cues();
        for _ in 0..200 {
            h.step();
        }
        assert_eq!(h.battle.party_actor(0).unwrap().sound_hit, 0);
        assert!(!h.engine.pending_sound().is_pending());
    }

    #[test]
    fn disabling_during_lead_cancels_it_silently() {
        let mut h = Harness::new(ParryConfig::new().with_timing_mode(TimingMode::FixedWindow));
        h.queue_attack(0b1);
        assert_eq!(h.step().lead_started.unwrap().applied, 3);
        assert!(h.engine.phase().is_lead_pending());

        h.config.enabled = false;
        let report = h.step();
        assert!(h.engine.phase().is_idle());
        assert_eq!(report.resolved, None);
        assert!(report.opened.is_none());
        assert!(h.telemetry.is_empty());

        h.config.enabled = true;
        let restarted = h.step();
        assert_eq!(restarted.lead_started.unwrap().applied, 3);
        assert!(h.engine.phase().is_lead_pending());
        assert!(h.telemetry.is_empty());
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let mut config = no_lead(TimingMode::FixedWindow);
        config.window_seconds = 10.0;
        let mut h = Harness::new(config);
        h.queue_attack(0b1);
        assert_eq!(h.step().opened.unwrap().frames, 60);

        let mut config = no_lead(TimingMode::ApplyDamageClamp);
        config.resolve_window_seconds = f32::NAN;
        let mut h = Harness::new(config);
        h.queue_attack(0b1);
        assert_eq!(h.step().opened.unwrap().frames, 6);
        assert!((h.engine.session().unwrap().resolve_window_seconds - 0.2).abs() < 1e-6);
    }

    #[test]
    fn friendly_cues_are_ignored() {
        let mut h = Harness::new(no_lead(TimingMode::FixedWindow));
        h.battle.push_cue(AttackCue::new(1, &[0b1]));
        assert!(h.step().opened.is_none());

        h.battle.clear_cues();
        h.queue_attack(0);
        assert!(h.step().opened.is_none());
        assert!(h.engine.phase().is_idle());
    }

    #[test]
    fn every_opened_window_writes_one_record() {
        let mut h = Harness::new(ParryConfig::new());
        let mut opened = 0;

        for round in 0..6u32 {
            h.queue_attack(1 << (round % 4));
            for frame in 0..40u32 {
                let held = round % 3 == 0 && frame == 5;
                if round % 3 == 1 && frame == 8 {
                    h.battle.set_pending_damage((round % 4) as usize, 25, 0);
                }
                if round % 3 == 2 && frame == 10 {
                    h.battle.clear_cues();
                }
                if h.frame(held).opened.is_some() {
                    opened += 1;
                }
            }
            h.battle.clear_cues();
            h.battle.land_pending_damage((round % 4) as usize);
            for _ in 0..40 {
                if h.step().opened.is_some() {
                    opened += 1;
                }
            }
        }

        assert_eq!(opened, 6);
        assert_eq!(h.telemetry.len(), opened);
        assert!(h.telemetry.records().iter().all(|record| record.is_finished()));
    }

    struct BrokenSink;

    impl TelemetrySink for BrokenSink {
        fn record(&mut self, _session: &TimingSession) -> Result<(), TelemetryError> {
            Err(TelemetryError::Unavailable("disk gone".into()))
        }
    }

    #[test]
    fn telemetry_failure_does_not_stop_the_engine() {
        let config = no_lead(TimingMode::FixedWindow);
        let mut battle = MemoryBattle::new()
            .with_party([party_member()])
            .with_enemies([ActorSnapshot::monster(300)]);
        battle.push_cue(AttackCue::new(ENEMY_ID, &[0b1]));
        let mut engine = ParryEngine::new();
        let mut sink = BrokenSink;

        engine.update(&config, &mut battle, &false, &mut sink);
        let report = engine.update(&config, &mut battle, &true, &mut sink);
        assert!(report.succeeded());
        assert!(report.telemetry_failed);
        assert_eq!(battle.party_actor(0).unwrap().limit_charge, 55);
    }
}
