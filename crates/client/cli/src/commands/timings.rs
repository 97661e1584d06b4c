//! Summarize the JSON-lines timing log.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use parry_core::TimingSession;
use parry_runtime::{JsonlTimingLog, RuntimeConfig};

/// Summarize the timing log
#[derive(Parser)]
pub struct Timings {
    /// Timing log to read (defaults to the configured telemetry file)
    #[arg(short, long, value_name = "FILE")]
    path: Option<PathBuf>,

    /// Print the most recent N records after the summary (0 = none)
    #[arg(short, long, default_value = "0")]
    tail: usize,
}

impl Timings {
    pub fn execute(self, config: &RuntimeConfig) -> Result<()> {
        let path = self.path.unwrap_or_else(|| config.telemetry_path());
        if !path.exists() {
            println!("No timing log at {}", path.display());
            return Ok(());
        }

        let records = JsonlTimingLog::read_path(&path)
            .with_context(|| format!("reading {}", path.display()))?;

        println!("Timing log: {}", path.display());
        println!("Records:    {}", records.len());

        let mut by_reason: BTreeMap<String, usize> = BTreeMap::new();
        for record in &records {
            let reason = record
                .end_reason
                .map_or_else(|| "unfinished".to_string(), |r| r.to_string());
            *by_reason.entry(reason).or_default() += 1;
        }
        for (reason, count) in &by_reason {
            println!("  {reason:<16} {count}");
        }

        let successes: Vec<&TimingSession> =
            records.iter().filter(|r| r.parry_succeeded).collect();
        if !successes.is_empty() {
            let total: f32 = successes.iter().filter_map(|r| r.end_seconds).sum();
            println!(
                "Mean parry time: {:.3}s over {} parries",
                total / successes.len() as f32,
                successes.len()
            );
        }

        let skip = records.len().saturating_sub(self.tail);
        for record in records.iter().skip(skip) {
            println!(
                "{} attacker={} mode={} targets={:#05b} lead={:.2}s end={} at {}",
                record.timestamp_utc.to_rfc3339(),
                record.attacker_id,
                record.timing_mode,
                record.target_mask,
                record.lead_seconds,
                record
                    .end_reason
                    .map_or_else(|| "-".to_string(), |r| r.to_string()),
                record
                    .end_seconds
                    .map_or_else(|| "-".to_string(), |s| format!("{s:.3}s")),
            );
        }

        Ok(())
    }
}
