use crate::host::{BattleHost, CONFIRM_SOUND_ID};
use crate::mask::PARTY_CAPACITY;

/// Frames the confirm sound flag stays raised.
pub const SOUND_RESET_FRAMES: u32 = 6;

/// A raised hit-sound flag waiting to be cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingSoundCue {
    slot: Option<usize>,
    frames: u32,
}

impl PendingSoundCue {
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// Raises the confirm sound on the first living party member.
    ///
    /// An outstanding pulse is cleared first so at most one flag is raised.
    /// Returns the slot that received the pulse.
    pub fn play<H>(&mut self, host: &mut H) -> Option<usize>
    where
        H: BattleHost + ?Sized,
    {
        if let Some(previous) = self.slot.take() {
            host.set_sound_hit(previous, 0);
        }

        let slot = (0..PARTY_CAPACITY)
            .find(|&slot| host.party_actor(slot).is_some_and(|actor| actor.is_alive()))?;

        host.set_sound_hit(slot, CONFIRM_SOUND_ID);
        self.slot = Some(slot);
        self.frames = SOUND_RESET_FRAMES;
        Some(slot)
    }

    /// Counts down and lowers the flag when the pulse ends.
    ///
    /// Returns the slot that was reset this frame.
    pub fn tick<H>(&mut self, host: &mut H) -> Option<usize>
    where
        H: BattleHost + ?Sized,
    {
        let slot = self.slot?;
        self.frames = self.frames.saturating_sub(1);
        if self.frames > 0 {
            return None;
        }

        host.set_sound_hit(slot, 0);
        self.slot = None;
        Some(slot)
    }
}
