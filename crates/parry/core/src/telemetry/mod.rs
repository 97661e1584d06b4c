//! Timing telemetry for parry attempts.
//!
//! A [`TimingSession`] is opened with each window, collects damage onsets as
//! it runs, and is stamped and handed to a [`TelemetrySink`] when the window
//! resolves. Sink failures are reported to the caller, which logs them and
//! carries on.
mod error;
mod session;
mod sink;

pub use error::TelemetryError;
pub use session::{TimingEvent, TimingEventKind, TimingSession};
pub use sink::{MemoryTelemetry, NullTelemetry, TelemetrySink};
