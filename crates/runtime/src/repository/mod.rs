//! Persistent sinks for timing records.
mod timing_log;

pub use timing_log::JsonlTimingLog;
