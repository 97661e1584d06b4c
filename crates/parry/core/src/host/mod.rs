//! Typed access to the host battle simulation.
//!
//! The engine never sees host memory directly. Adapters over the live game
//! implement [`BattleHost`] and [`ConfirmInput`]; [`MemoryBattle`] is a plain
//! data implementation used by scenario replay and tests.
mod memory;

pub use memory::{MemoryBattle, MemoryInput};

use crate::mask::{ENEMY_CAPACITY, PARTY_CAPACITY};

/// Maximum number of commands carried by a single attack cue.
pub const MAX_CUE_COMMANDS: usize = 4;

/// Hit-sound value written to pulse the confirm-style feedback sound.
pub const CONFIRM_SOUND_ID: u8 = 3;

/// Host actor identifier. Ids `0..10` are party slots, `10..20` enemies.
pub type ActorId = u8;

/// Which actor array an [`ActorId`] points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorSlot {
    Party(usize),
    Enemy(usize),
}

impl ActorSlot {
    /// Resolves an actor id, or `None` when it lies outside both arrays.
    pub fn from_id(id: ActorId) -> Option<Self> {
        let id = id as usize;
        if id < PARTY_CAPACITY {
            Some(Self::Party(id))
        } else if id - PARTY_CAPACITY < ENEMY_CAPACITY {
            Some(Self::Enemy(id - PARTY_CAPACITY))
        } else {
            None
        }
    }
}

/// Read view of one host actor record for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorSnapshot {
    pub exists: bool,
    pub hp: i32,
    /// Group tag; non-zero marks the monster side.
    pub group: u8,
    /// Command-type classifier; non-zero marks magic-like actions.
    pub command_type: u8,
    pub damage_hp: i32,
    pub damage_mp: i32,
    pub damage_ctb: i32,
    pub avoid_damage: bool,
    pub limit_charge: u8,
    pub limit_charge_max: u8,
    pub sound_hit: u8,
}

impl ActorSnapshot {
    /// A living party member with the given hp.
    pub fn party_member(hp: i32) -> Self {
        Self {
            exists: true,
            hp,
            ..Self::default()
        }
    }

    /// A living monster with the given hp.
    pub fn monster(hp: i32) -> Self {
        Self {
            exists: true,
            hp,
            group: 1,
            ..Self::default()
        }
    }

    pub fn is_alive(&self) -> bool {
        self.exists && self.hp > 0
    }

    /// True while the host has computed HP or MP damage that has not landed.
    pub fn has_pending_damage(&self) -> bool {
        self.damage_hp != 0 || self.damage_mp != 0
    }
}

/// A queued enemy action and the targets of its commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttackCue {
    pub attacker_id: ActorId,
    pub command_count: u8,
    /// Raw target bitmask per command slot.
    pub command_targets: [u32; MAX_CUE_COMMANDS],
}

impl AttackCue {
    /// Builds a cue from up to four raw command target masks.
    pub fn new(attacker_id: ActorId, targets: &[u32]) -> Self {
        let count = targets.len().min(MAX_CUE_COMMANDS);
        let mut command_targets = [0; MAX_CUE_COMMANDS];
        command_targets[..count].copy_from_slice(&targets[..count]);
        Self {
            attacker_id,
            command_count: count as u8,
            command_targets,
        }
    }

    /// Target masks of the commands actually in use.
    pub fn commands(&self) -> &[u32] {
        let count = (self.command_count as usize).min(MAX_CUE_COMMANDS);
        &self.command_targets[..count]
    }
}

/// Per-frame read/write access to the host battle.
///
/// Every read returns `None` when the host cannot provide the data this
/// frame; the engine treats that as absence. Writes to unavailable slots are
/// ignored by implementations.
pub trait BattleHost {
    /// Party actor record, or `None` when the party array is unavailable.
    fn party_actor(&self, slot: usize) -> Option<ActorSnapshot>;

    /// Enemy actor record, or `None` when the enemy array is unavailable.
    fn enemy_actor(&self, index: usize) -> Option<ActorSnapshot>;

    /// Number of queued attack cues, or `None` when no battle is loaded.
    fn attack_cue_count(&self) -> Option<usize>;

    fn attack_cue(&self, index: usize) -> Option<AttackCue>;

    /// Zeroes the pending HP, MP and combat-timer damage of a party slot.
    fn clear_pending_damage(&mut self, slot: usize);

    fn set_avoid_damage(&mut self, slot: usize, avoided: bool);

    fn set_limit_charge(&mut self, slot: usize, value: u8);

    fn set_sound_hit(&mut self, slot: usize, value: u8);

    /// True when the party array can be read this frame.
    fn party_available(&self) -> bool {
        self.party_actor(0).is_some()
    }

    /// Looks up any actor by host id.
    fn actor(&self, id: ActorId) -> Option<ActorSnapshot> {
        match ActorSlot::from_id(id)? {
            ActorSlot::Party(slot) => self.party_actor(slot),
            ActorSlot::Enemy(index) => self.enemy_actor(index),
        }
    }
}

/// The single confirm button used for parry input.
pub trait ConfirmInput {
    /// True only on the frame the button went from released to pressed.
    fn just_pressed(&self) -> bool;
}

impl ConfirmInput for bool {
    fn just_pressed(&self) -> bool {
        *self
    }
}
