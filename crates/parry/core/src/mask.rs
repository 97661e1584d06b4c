use bitflags::bitflags;

/// Number of party actor slots exposed by the host.
pub const PARTY_CAPACITY: usize = 10;

/// Number of enemy actor slots exposed by the host.
pub const ENEMY_CAPACITY: usize = 10;

bitflags! {
    /// Set of party slots threatened by (or affected after) an enemy action.
    ///
    /// One bit per party slot. Host masks carry bits for enemy targets too;
    /// [`PartyMask::from_host`] drops everything outside the party range.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PartyMask: u32 {
        const SLOT_0 = 1 << 0;
        const SLOT_1 = 1 << 1;
        const SLOT_2 = 1 << 2;
        const SLOT_3 = 1 << 3;
        const SLOT_4 = 1 << 4;
        const SLOT_5 = 1 << 5;
        const SLOT_6 = 1 << 6;
        const SLOT_7 = 1 << 7;
        const SLOT_8 = 1 << 8;
        const SLOT_9 = 1 << 9;
    }
}

impl PartyMask {
    /// Every party slot.
    pub const PARTY: Self = Self::all();

    /// Intersects a raw host target mask with the party slots.
    pub fn from_host(raw: u32) -> Self {
        Self::from_bits_truncate(raw)
    }

    /// Mask holding a single slot, empty when `slot` is outside the party.
    pub fn slot(slot: usize) -> Self {
        if slot < PARTY_CAPACITY {
            Self::from_bits_retain(1 << slot)
        } else {
            Self::empty()
        }
    }

    pub fn has_slot(&self, slot: usize) -> bool {
        !Self::slot(slot).is_empty() && self.contains(Self::slot(slot))
    }

    /// An empty mask stands for the whole party when applying effects.
    pub fn or_party(self) -> Self {
        if self.is_empty() { Self::PARTY } else { self }
    }

    /// Slot indices set in this mask, ascending.
    pub fn slots(self) -> impl Iterator<Item = usize> {
        (0..PARTY_CAPACITY).filter(move |&slot| self.has_slot(slot))
    }
}
