//! Replay a scenario file through the parry engine.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use parry_core::{FRAME_RATE, FrameReport, MemoryTelemetry, TelemetrySink};
use parry_runtime::{
    JsonlTimingLog, ParryRuntime, RuntimeConfig, Scenario, ScenarioReport, ScenarioRunner,
};

/// Replay a scenario file through the engine
#[derive(Parser)]
pub struct Replay {
    /// Scenario RON file
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Pace frames at the host frame rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Keep timing records in memory instead of appending to the timing log
    #[arg(long)]
    dry_run: bool,

    /// Print every frame in which something happened
    #[arg(short, long)]
    verbose: bool,
}

impl Replay {
    pub async fn execute(self, config: &RuntimeConfig) -> Result<()> {
        let scenario = Scenario::load_from_file(&self.scenario)
            .with_context(|| format!("loading {}", self.scenario.display()))?;

        let sink: Box<dyn TelemetrySink> = if self.dry_run {
            Box::new(MemoryTelemetry::new())
        } else {
            let log = JsonlTimingLog::open_or_create(&config.telemetry_dir, &config.telemetry_file)
                .context("opening timing log")?;
            println!("Timing log: {}", log.path().display());
            Box::new(log)
        };

        let runtime = ParryRuntime::builder(sink).build();
        let mut runner = ScenarioRunner::new(scenario, runtime)?;
        let mut report = runner.start_report();

        let mut pacer = self.realtime.then(|| {
            tokio::time::interval(Duration::from_secs_f32(1.0 / FRAME_RATE))
        });

        while !runner.is_finished() {
            if let Some(interval) = pacer.as_mut() {
                interval.tick().await;
            }
            let frame = runner.step()?;
            if self.verbose && !frame.is_quiet() {
                print_frame(&frame);
            }
            report.record(frame);
        }

        print_summary(&runner.finish(report));
        Ok(())
    }
}

fn print_frame(frame: &FrameReport) {
    let mut parts = Vec::new();
    if let Some(lead) = frame.lead_started {
        parts.push(format!("lead {} ({} frames)", lead.kind, lead.applied));
    }
    if let Some(reason) = frame.lead_cancelled {
        parts.push(format!("lead cancelled: {reason}"));
    }
    if let Some(opened) = frame.opened {
        parts.push(format!(
            "window open: attacker {} targets {:#05b} for {} frames",
            opened.attacker_id,
            opened.target_mask.bits(),
            opened.frames
        ));
    }
    if !frame.damage_onsets.is_empty() {
        parts.push(format!("damage onset {:#05b}", frame.damage_onsets.bits()));
    }
    if let Some(reason) = frame.resolved {
        parts.push(format!("closed: {reason}"));
    }
    if !frame.negated.is_empty() {
        parts.push(format!("negated {:#05b}", frame.negated.bits()));
    }
    for grant in &frame.rewards {
        parts.push(format!(
            "slot {} limit {} -> {}",
            grant.slot, grant.before, grant.after
        ));
    }
    if let Some(slot) = frame.sound_slot {
        parts.push(format!("sound on slot {slot}"));
    }
    if frame.telemetry_failed {
        parts.push("telemetry write failed".to_string());
    }

    println!("[{:>5}] {}", frame.frame, parts.join(", "));
}

fn print_summary(report: &ScenarioReport) {
    println!();
    println!("Scenario: {}", report.name);
    println!("Frames:   {}", report.frames_run);
    println!("Windows:  {}", report.windows_opened());
    println!("Parries:  {}", report.successes());
    for (frame, reason) in report.resolutions() {
        println!("  frame {frame:>5}: {reason}");
    }
    if report.telemetry_failures() > 0 {
        println!("Telemetry write failures: {}", report.telemetry_failures());
    }
    println!(
        "Overlay:  {} (visibility {:.2})",
        report.final_overlay.display_state(),
        report.final_overlay.visibility
    );
}
