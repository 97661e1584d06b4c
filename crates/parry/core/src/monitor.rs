use crate::host::BattleHost;
use crate::mask::{PARTY_CAPACITY, PartyMask};

/// Edge detector for pending damage on each party slot.
///
/// A slot "resolves" on the frame its pending HP/MP damage goes from zero to
/// non-zero. Falling edges only re-arm the slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageMonitor {
    pending: [bool; PARTY_CAPACITY],
}

impl DamageMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples every party slot and returns the slots that rose this frame.
    ///
    /// When the party array is unavailable every flag clears and nothing rises.
    pub fn scan<H>(&mut self, host: &H) -> PartyMask
    where
        H: BattleHost + ?Sized,
    {
        if !host.party_available() {
            self.reset();
            return PartyMask::empty();
        }

        let mut rising = PartyMask::empty();
        for (slot, flag) in self.pending.iter_mut().enumerate() {
            let has_damage = host
                .party_actor(slot)
                .is_some_and(|actor| actor.has_pending_damage());

            if has_damage && !*flag {
                rising |= PartyMask::slot(slot);
            }
            *flag = has_damage;
        }
        rising
    }

    pub fn reset(&mut self) {
        self.pending = [false; PARTY_CAPACITY];
    }

    pub fn is_pending(&self, slot: usize) -> bool {
        self.pending.get(slot).copied().unwrap_or(false)
    }
}
