use crate::host::BattleHost;
use crate::mask::PartyMask;

/// Damage waiting to be negated on parried slots.
///
/// The host computes damage after the parry input lands, so negation waits
/// for each masked slot to show pending damage and zeroes it then. Slots
/// outside the mask are never written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingNegation {
    mask: PartyMask,
    timeout_frames: u32,
}

/// What one frame of negation processing did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NegationTick {
    /// Slots whose pending damage was zeroed this frame.
    pub negated: PartyMask,
    /// Slots dropped because their actor is dead or missing.
    pub dropped: PartyMask,
    /// Slots abandoned because the timeout ran out.
    pub expired: PartyMask,
}

impl PendingNegation {
    /// Arms negation for `mask` (empty means the whole party).
    pub fn arm(mask: PartyMask, timeout_frames: u32) -> Self {
        Self {
            mask: mask.or_party(),
            timeout_frames,
        }
    }

    pub fn mask(&self) -> PartyMask {
        self.mask
    }

    pub fn timeout_frames(&self) -> u32 {
        self.timeout_frames
    }

    pub fn is_armed(&self) -> bool {
        !self.mask.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Processes one frame against the host.
    pub fn process<H>(&mut self, host: &mut H) -> NegationTick
    where
        H: BattleHost + ?Sized,
    {
        let mut tick = NegationTick::default();
        if !self.is_armed() {
            return tick;
        }

        if !host.party_available() {
            tick.expired = self.mask;
            self.clear();
            return tick;
        }

        for slot in self.mask.slots() {
            let bit = PartyMask::slot(slot);
            let Some(actor) = host.party_actor(slot).filter(|actor| actor.is_alive()) else {
                self.mask.remove(bit);
                tick.dropped |= bit;
                continue;
            };

            if !actor.has_pending_damage() {
                continue;
            }

            host.clear_pending_damage(slot);
            host.set_avoid_damage(slot, true);
            self.mask.remove(bit);
            tick.negated |= bit;
        }

        if self.mask.is_empty() {
            self.timeout_frames = 0;
            return tick;
        }

        if self.timeout_frames > 0 {
            self.timeout_frames -= 1;
            if self.timeout_frames == 0 {
                tick.expired = self.mask;
                self.mask = PartyMask::empty();
            }
        }
        tick
    }
}
