//! Attack cue scanning.
//!
//! Finds the first queued action that belongs to a hostile actor and derives
//! the party slots it threatens. Pure queries over the host snapshot.

use crate::config::AttackKind;
use crate::host::{ActorId, ActorSlot, ActorSnapshot, AttackCue, BattleHost};
use crate::mask::PartyMask;

/// A hostile cue found in the host queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectedCue {
    /// Position of the cue in the host list.
    pub index: u8,
    pub cue: AttackCue,
    /// Attacker record, when the host has one.
    pub attacker: Option<ActorSnapshot>,
}

impl DetectedCue {
    pub fn attacker_id(&self) -> ActorId {
        self.cue.attacker_id
    }

    pub fn target_mask(&self) -> PartyMask {
        party_target_mask(&self.cue)
    }

    pub fn attack_kind(&self) -> AttackKind {
        attack_kind(self.attacker.as_ref())
    }
}

/// Whether the actor behind `id` should be treated as an enemy.
///
/// A live record with a non-zero group is always hostile. Anything else
/// (missing, dead, or group zero) falls back to the id range: ids past the
/// party slots are hostile.
pub fn is_hostile(id: ActorId, actor: Option<&ActorSnapshot>) -> bool {
    if actor.is_some_and(|actor| actor.group != 0) {
        return true;
    }
    !matches!(ActorSlot::from_id(id), Some(ActorSlot::Party(_)))
}

/// Union of the cue's command targets, restricted to party slots.
pub fn party_target_mask(cue: &AttackCue) -> PartyMask {
    cue.commands()
        .iter()
        .fold(PartyMask::empty(), |mask, &targets| {
            mask | PartyMask::from_host(targets)
        })
}

/// Magic-like attacks carry any non-zero command type.
pub fn attack_kind(attacker: Option<&ActorSnapshot>) -> AttackKind {
    match attacker {
        Some(actor) if actor.command_type != 0 => AttackKind::Magic,
        _ => AttackKind::Physical,
    }
}

/// Returns the first hostile cue in host order, optionally for one attacker.
pub fn find_enemy_cue<H>(host: &H, attacker_filter: Option<ActorId>) -> Option<DetectedCue>
where
    H: BattleHost + ?Sized,
{
    let total = host.attack_cue_count()?.min(u8::MAX as usize + 1);

    (0..total).find_map(|index| {
        let cue = host.attack_cue(index)?;
        let attacker = host.actor(cue.attacker_id);
        if !is_hostile(cue.attacker_id, attacker.as_ref()) {
            return None;
        }
        if attacker_filter.is_some_and(|filter| filter != cue.attacker_id) {
            return None;
        }
        Some(DetectedCue {
            index: index as u8,
            cue,
            attacker,
        })
    })
}
