//! Host-side plumbing for the parry engine.
//!
//! This crate wires [`parry_core::ParryEngine`] to the things a running game
//! needs around it: persisted options, a JSON-lines timing log, and a frame
//! driver that snapshots options once per frame. It also replays scripted
//! battles over the in-memory host for tooling and tests.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the frame driver and its builder
//! - [`settings`] loads, saves and shares the option set
//! - [`repository`] persists timing records
//! - [`scenario`] replays scripted battles
pub mod config;
pub mod error;
pub mod repository;
pub mod runtime;
pub mod scenario;
pub mod settings;

pub use config::{RuntimeConfig, default_data_dir};
pub use error::{Result, RuntimeError, ScenarioError, SettingsError};
pub use repository::JsonlTimingLog;
pub use runtime::{ParryRuntime, ParryRuntimeBuilder};
pub use scenario::{Scenario, ScenarioAction, ScenarioReport, ScenarioRunner, ScenarioStep};
pub use settings::{SettingsStore, SharedSettings};
