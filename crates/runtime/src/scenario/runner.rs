use parry_core::{
    AttackCue, EndReason, FrameReport, MemoryBattle, MemoryInput, OverlaySnapshot, TelemetrySink,
};

use super::{Scenario, ScenarioAction};
use crate::error::Result;
use crate::runtime::ParryRuntime;

/// Replays a [`Scenario`] frame by frame.
pub struct ScenarioRunner<S> {
    scenario: Scenario,
    runtime: ParryRuntime<S>,
    battle: MemoryBattle,
    input: MemoryInput,
    next_step: usize,
    frame: u64,
}

impl<S> ScenarioRunner<S>
where
    S: TelemetrySink,
{
    /// Prepares a replay. The scenario's options replace the runtime's.
    pub fn new(scenario: Scenario, runtime: ParryRuntime<S>) -> Result<Self> {
        scenario.validate()?;
        runtime.settings().replace(scenario.settings.clone())?;

        Ok(Self {
            battle: scenario.initial_battle(),
            scenario,
            runtime,
            input: MemoryInput::new(),
            next_step: 0,
            frame: 0,
        })
    }

    pub fn battle(&self) -> &MemoryBattle {
        &self.battle
    }

    pub fn runtime(&self) -> &ParryRuntime<S> {
        &self.runtime
    }

    pub fn into_runtime(self) -> ParryRuntime<S> {
        self.runtime
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.scenario.total_frames()
    }

    /// Applies this frame's timeline steps and runs one engine frame.
    pub fn step(&mut self) -> Result<FrameReport> {
        self.frame += 1;

        let mut pressed = false;
        while let Some(step) = self.scenario.timeline.get(self.next_step) {
            if step.frame > self.frame {
                break;
            }
            let action = step.action.clone();
            self.next_step += 1;
            pressed |= self.apply(action)?;
        }

        self.input.sample(pressed);
        Ok(self.runtime.step(&mut self.battle, &self.input))
    }

    /// Runs the remaining frames and summarizes them.
    pub fn run(mut self) -> Result<ScenarioReport> {
        let mut report = self.start_report();
        while !self.is_finished() {
            let frame = self.step()?;
            report.record(frame);
        }
        Ok(self.finish(report))
    }

    /// Empty report for a caller that drives [`step`](Self::step) itself.
    pub fn start_report(&self) -> ScenarioReport {
        tracing::info!(
            "Replaying scenario '{}' for {} frames",
            self.scenario.name,
            self.scenario.total_frames()
        );

        ScenarioReport {
            name: self.scenario.name.clone(),
            ..ScenarioReport::default()
        }
    }

    /// Stamps the final host and overlay state onto `report`.
    pub fn finish(self, mut report: ScenarioReport) -> ScenarioReport {
        report.frames_run = self.frame;
        report.final_overlay = self.runtime.engine().overlay();
        report.final_battle = self.battle;

        tracing::info!(
            opened = report.windows_opened(),
            succeeded = report.successes(),
            "scenario '{}' finished",
            report.name
        );
        report
    }

    /// Returns whether the action presses the confirm button.
    fn apply(&mut self, action: ScenarioAction) -> Result<bool> {
        tracing::debug!(frame = self.frame, ?action, "scenario step");

        match action {
            ScenarioAction::QueueCue { attacker, targets } => {
                self.battle.push_cue(AttackCue::new(attacker, &targets));
            }
            ScenarioAction::ClearCues => self.battle.clear_cues(),
            ScenarioAction::RemoveCues { attacker } => self.battle.remove_cues_from(attacker),
            ScenarioAction::PendingDamage { slot, hp, mp } => {
                self.battle.set_pending_damage(slot, hp, mp);
            }
            ScenarioAction::LandDamage { slot } => self.battle.land_pending_damage(slot),
            ScenarioAction::KnockOut { slot } => {
                if let Some(actor) = self.battle.party_mut(slot) {
                    actor.hp = 0;
                }
            }
            ScenarioAction::Press => return Ok(true),
            ScenarioAction::SetEnabled(enabled) => {
                self.runtime
                    .settings()
                    .update(|config| config.enabled = enabled)?;
            }
            ScenarioAction::Configure(config) => {
                self.runtime.settings().replace(config)?;
            }
        }
        Ok(false)
    }
}

/// Outcome of a full replay.
#[derive(Clone, Debug, Default)]
pub struct ScenarioReport {
    pub name: String,
    pub frames_run: u64,
    /// Every frame in which something besides the overlay changed.
    pub events: Vec<FrameReport>,
    pub final_overlay: OverlaySnapshot,
    pub final_battle: MemoryBattle,
}

impl ScenarioReport {
    /// Keeps `frame` if anything besides the overlay happened in it.
    pub fn record(&mut self, frame: FrameReport) {
        if !frame.is_quiet() {
            self.events.push(frame);
        }
    }

    pub fn windows_opened(&self) -> usize {
        self.events.iter().filter(|f| f.opened.is_some()).count()
    }

    /// Window endings in frame order.
    pub fn resolutions(&self) -> Vec<(u64, EndReason)> {
        self.events
            .iter()
            .filter_map(|f| f.resolved.map(|reason| (f.frame, reason)))
            .collect()
    }

    pub fn successes(&self) -> usize {
        self.events.iter().filter(|f| f.succeeded()).count()
    }

    pub fn telemetry_failures(&self) -> usize {
        self.events.iter().filter(|f| f.telemetry_failed).count()
    }
}
