use super::{ActorSnapshot, AttackCue, BattleHost, ConfirmInput};
use crate::mask::{ENEMY_CAPACITY, PARTY_CAPACITY};

/// Battle state held in plain vectors.
///
/// `None` arrays model a host whose pointers are not populated yet (outside
/// battle, loading screens). Slots beyond the stored vectors read as empty,
/// non-existing records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemoryBattle {
    pub party: Option<Vec<ActorSnapshot>>,
    pub enemies: Option<Vec<ActorSnapshot>>,
    pub cues: Option<Vec<AttackCue>>,
}

impl MemoryBattle {
    /// A loaded battle with empty actor arrays and no queued cues.
    pub fn new() -> Self {
        Self {
            party: Some(Vec::new()),
            enemies: Some(Vec::new()),
            cues: Some(Vec::new()),
        }
    }

    /// A host with nothing loaded.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_party(mut self, party: impl IntoIterator<Item = ActorSnapshot>) -> Self {
        self.party = Some(party.into_iter().take(PARTY_CAPACITY).collect());
        self
    }

    pub fn with_enemies(mut self, enemies: impl IntoIterator<Item = ActorSnapshot>) -> Self {
        self.enemies = Some(enemies.into_iter().take(ENEMY_CAPACITY).collect());
        self
    }

    pub fn push_cue(&mut self, cue: AttackCue) {
        self.cues.get_or_insert_with(Vec::new).push(cue);
    }

    pub fn clear_cues(&mut self) {
        if let Some(cues) = self.cues.as_mut() {
            cues.clear();
        }
    }

    /// Removes every cue queued by `attacker_id`.
    pub fn remove_cues_from(&mut self, attacker_id: u8) {
        if let Some(cues) = self.cues.as_mut() {
            cues.retain(|cue| cue.attacker_id != attacker_id);
        }
    }

    /// Mutable party record, growing the array when the slot is in range.
    pub fn party_mut(&mut self, slot: usize) -> Option<&mut ActorSnapshot> {
        if slot >= PARTY_CAPACITY {
            return None;
        }
        let party = self.party.as_mut()?;
        if party.len() <= slot {
            party.resize(slot + 1, ActorSnapshot::default());
        }
        party.get_mut(slot)
    }

    /// Mutable enemy record, growing the array when the index is in range.
    pub fn enemy_mut(&mut self, index: usize) -> Option<&mut ActorSnapshot> {
        if index >= ENEMY_CAPACITY {
            return None;
        }
        let enemies = self.enemies.as_mut()?;
        if enemies.len() <= index {
            enemies.resize(index + 1, ActorSnapshot::default());
        }
        enemies.get_mut(index)
    }

    /// Sets pending damage on a party slot, as the host does before applying it.
    pub fn set_pending_damage(&mut self, slot: usize, hp: i32, mp: i32) {
        if let Some(actor) = self.party_mut(slot) {
            actor.damage_hp = hp;
            actor.damage_mp = mp;
            actor.damage_ctb = hp.signum();
        }
    }

    /// Lands pending damage on a party slot: hp drops and the fields clear.
    pub fn land_pending_damage(&mut self, slot: usize) {
        if let Some(actor) = self.party_mut(slot) {
            actor.hp = (actor.hp - actor.damage_hp).max(0);
            actor.damage_hp = 0;
            actor.damage_mp = 0;
            actor.damage_ctb = 0;
        }
    }
}

fn read(
    actors: &Option<Vec<ActorSnapshot>>,
    index: usize,
    capacity: usize,
) -> Option<ActorSnapshot> {
    let actors = actors.as_ref()?;
    if index >= capacity {
        return None;
    }
    Some(actors.get(index).copied().unwrap_or_default())
}

impl BattleHost for MemoryBattle {
    fn party_actor(&self, slot: usize) -> Option<ActorSnapshot> {
        read(&self.party, slot, PARTY_CAPACITY)
    }

    fn enemy_actor(&self, index: usize) -> Option<ActorSnapshot> {
        read(&self.enemies, index, ENEMY_CAPACITY)
    }

    fn attack_cue_count(&self) -> Option<usize> {
        self.cues.as_ref().map(Vec::len)
    }

    fn attack_cue(&self, index: usize) -> Option<AttackCue> {
        self.cues.as_ref()?.get(index).copied()
    }

    fn clear_pending_damage(&mut self, slot: usize) {
        if let Some(actor) = self.party_mut(slot) {
            actor.damage_hp = 0;
            actor.damage_mp = 0;
            actor.damage_ctb = 0;
        }
    }

    fn set_avoid_damage(&mut self, slot: usize, avoided: bool) {
        if let Some(actor) = self.party_mut(slot) {
            actor.avoid_damage = avoided;
        }
    }

    fn set_limit_charge(&mut self, slot: usize, value: u8) {
        if let Some(actor) = self.party_mut(slot) {
            actor.limit_charge = value;
        }
    }

    fn set_sound_hit(&mut self, slot: usize, value: u8) {
        if let Some(actor) = self.party_mut(slot) {
            actor.sound_hit = value;
        }
    }
}

/// Confirm button driven by held/released samples, one per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryInput {
    held: bool,
    was_held: bool,
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records this frame's button level.
    pub fn sample(&mut self, held: bool) {
        self.was_held = self.held;
        self.held = held;
    }
}

impl ConfirmInput for MemoryInput {
    fn just_pressed(&self) -> bool {
        self.held && !self.was_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_host_reads_nothing() {
        let battle = MemoryBattle::unavailable();
        assert!(!battle.party_available());
        assert_eq!(battle.attack_cue_count(), None);
        assert_eq!(battle.actor(12), None);
    }

    #[test]
    fn short_arrays_read_as_empty_records() {
        let battle = MemoryBattle::new().with_party([ActorSnapshot::party_member(50)]);
        assert!(battle.party_actor(0).unwrap().is_alive());
        assert_eq!(battle.party_actor(4), Some(ActorSnapshot::default()));
        assert_eq!(battle.party_actor(10), None);
    }

    #[test]
    fn input_reports_rising_edge_once() {
        let mut input = MemoryInput::new();
        input.sample(true);
        assert!(input.just_pressed());
        input.sample(true);
        assert!(!input.just_pressed());
        input.sample(false);
        input.sample(true);
        assert!(input.just_pressed());
    }
}
