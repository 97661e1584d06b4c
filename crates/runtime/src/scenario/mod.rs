//! Scripted battle replays.
//!
//! A scenario is an initial battle plus a timeline of host changes keyed by
//! frame. Replaying it through [`ScenarioRunner`] drives the real engine over
//! an in-memory host, which makes timing behavior reproducible without the
//! game running.
//!
//! ```ron
//! (
//!     name: "single parry",
//!     settings: (timing_mode: fixed_window, lead_physical_seconds: 0.0),
//!     party: [(exists: true, hp: 100, limit_charge_max: 100)],
//!     enemies: [(exists: true, hp: 300, group: 1)],
//!     frames: 60,
//!     timeline: [
//!         (frame: 1, action: QueueCue(attacker: 10, targets: [1])),
//!         (frame: 5, action: Press),
//!     ],
//! )
//! ```
mod runner;

pub use runner::{ScenarioReport, ScenarioRunner};

use std::path::Path;

use parry_core::{ActorId, ActorSnapshot, MemoryBattle, ParryConfig};
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;

/// Frames replayed after the last timeline step when `frames` is not set.
pub const DEFAULT_TAIL_FRAMES: u64 = 60;

/// A host change applied just before a given frame runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScenarioAction {
    /// Queue an action for `attacker` with one raw target mask per command.
    QueueCue { attacker: ActorId, targets: Vec<u32> },
    /// Empty the action queue.
    ClearCues,
    /// Drop every queued action from one attacker.
    RemoveCues { attacker: ActorId },
    /// Stage pending damage on a party slot.
    PendingDamage {
        slot: usize,
        hp: i32,
        #[serde(default)]
        mp: i32,
    },
    /// Apply and clear a slot's pending damage.
    LandDamage { slot: usize },
    /// Set a party member's hp to zero.
    KnockOut { slot: usize },
    /// Hold the confirm button for this frame only.
    Press,
    SetEnabled(bool),
    /// Replace the whole option set.
    Configure(ParryConfig),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Engine frame (1-based) this change precedes.
    pub frame: u64,
    pub action: ScenarioAction,
}

/// A replayable battle script.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub settings: ParryConfig,
    #[serde(default)]
    pub party: Vec<ActorSnapshot>,
    #[serde(default)]
    pub enemies: Vec<ActorSnapshot>,
    /// Total frames to run (default: last step plus a short tail).
    #[serde(default)]
    pub frames: Option<u64>,
    #[serde(default)]
    pub timeline: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, settings: ParryConfig) -> Self {
        Self {
            name: name.into(),
            settings,
            party: Vec::new(),
            enemies: Vec::new(),
            frames: None,
            timeline: Vec::new(),
        }
    }

    pub fn with_party(mut self, party: impl IntoIterator<Item = ActorSnapshot>) -> Self {
        self.party = party.into_iter().collect();
        self
    }

    pub fn with_enemies(mut self, enemies: impl IntoIterator<Item = ActorSnapshot>) -> Self {
        self.enemies = enemies.into_iter().collect();
        self
    }

    pub fn with_frames(mut self, frames: u64) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Appends a step. Steps must be added in frame order.
    pub fn at(mut self, frame: u64, action: ScenarioAction) -> Self {
        self.timeline.push(ScenarioStep { frame, action });
        self
    }

    /// Load scenario from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let scenario = Self::from_ron(&content)?;
        tracing::info!(
            "Loaded scenario '{}' with {} timeline steps",
            scenario.name,
            scenario.timeline.len()
        );
        Ok(scenario)
    }

    /// Parse scenario RON and check its timeline order.
    pub fn from_ron(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario =
            ron::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Rejects timelines whose frames go backwards.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut previous = 0;
        for step in &self.timeline {
            if step.frame < previous {
                return Err(ScenarioError::OutOfOrder {
                    frame: step.frame,
                    previous,
                });
            }
            previous = step.frame;
        }
        Ok(())
    }

    /// Number of frames a replay runs.
    pub fn total_frames(&self) -> u64 {
        self.frames.unwrap_or_else(|| {
            self.timeline.last().map_or(0, |step| step.frame) + DEFAULT_TAIL_FRAMES
        })
    }

    /// Initial host state.
    pub fn initial_battle(&self) -> MemoryBattle {
        MemoryBattle::new()
            .with_party(self.party.iter().copied())
            .with_enemies(self.enemies.iter().copied())
    }
}
