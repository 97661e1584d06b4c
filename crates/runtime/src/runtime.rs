//! Frame driver that ties the engine to settings and telemetry.
//!
//! Design: [`ParryRuntime`] owns the engine and the telemetry sink and holds
//! a [`SharedSettings`] handle. Each [`step`](ParryRuntime::step) snapshots
//! the options once and runs exactly one engine frame against the host.
use chrono::{DateTime, Utc};
use parry_core::{
    BattleHost, ConfirmInput, FrameReport, ParryConfig, ParryEngine, TelemetrySink,
};

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::repository::JsonlTimingLog;
use crate::settings::SharedSettings;

pub struct ParryRuntime<S> {
    engine: ParryEngine,
    settings: SharedSettings,
    sink: S,
}

impl ParryRuntime<JsonlTimingLog> {
    /// Loads persisted settings and opens the timing log named by `config`.
    ///
    /// Unreadable settings fall back to defaults; an unopenable log is an
    /// error.
    pub fn open(config: &RuntimeConfig) -> Result<Self> {
        let settings = config.settings_store().load_or_default();
        let log = JsonlTimingLog::open_or_create(&config.telemetry_dir, &config.telemetry_file)?;

        tracing::info!(
            settings = %config.settings_path.display(),
            telemetry = %log.path().display(),
            "parry runtime ready"
        );

        Ok(Self::builder(log)
            .settings(SharedSettings::new(settings))
            .build())
    }
}

impl<S> ParryRuntime<S>
where
    S: TelemetrySink,
{
    /// Create a new runtime builder around `sink`.
    pub fn builder(sink: S) -> ParryRuntimeBuilder<S> {
        ParryRuntimeBuilder::new(sink)
    }

    /// Runs one host frame with the options as they are right now.
    pub fn step<H, I>(&mut self, host: &mut H, input: &I) -> FrameReport
    where
        H: BattleHost + ?Sized,
        I: ConfirmInput + ?Sized,
    {
        let config = self.settings.snapshot();
        self.engine.update(&config, host, input, &mut self.sink)
    }

    /// Handle for changing options between frames.
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Options the next frame would run with.
    pub fn current_config(&self) -> ParryConfig {
        self.settings.snapshot()
    }

    pub fn engine(&self) -> &ParryEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Builder for [`ParryRuntime`].
pub struct ParryRuntimeBuilder<S> {
    sink: S,
    settings: Option<SharedSettings>,
    clock: Option<fn() -> DateTime<Utc>>,
}

impl<S> ParryRuntimeBuilder<S>
where
    S: TelemetrySink,
{
    fn new(sink: S) -> Self {
        Self {
            sink,
            settings: None,
            clock: None,
        }
    }

    /// Share an existing settings handle (default: fresh defaults).
    pub fn settings(mut self, settings: SharedSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Override the clock used to timestamp timing records.
    pub fn clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> ParryRuntime<S> {
        let engine = match self.clock {
            Some(clock) => ParryEngine::with_clock(clock),
            None => ParryEngine::new(),
        };

        ParryRuntime {
            engine,
            settings: self.settings.unwrap_or_default(),
            sink: self.sink,
        }
    }
}
