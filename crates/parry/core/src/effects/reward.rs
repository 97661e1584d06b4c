use crate::host::BattleHost;
use crate::mask::PartyMask;

/// Share of the maximum limit charge granted per successful parry.
pub const REWARD_PERCENT: f32 = 0.05;

/// Limit charge granted to one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardGrant {
    pub slot: usize,
    pub before: u8,
    pub after: u8,
}

/// `max(1, round(max * 5%))`.
pub fn reward_delta(max: u8) -> u8 {
    let scaled = (max as f32 * REWARD_PERCENT).round() as u8;
    scaled.max(1)
}

/// Raises the limit charge of every living masked slot (empty means party).
///
/// Slots without a charge gauge or already full are skipped.
pub fn apply_reward<H>(host: &mut H, mask: PartyMask) -> Vec<RewardGrant>
where
    H: BattleHost + ?Sized,
{
    let mut grants = Vec::new();
    for slot in mask.or_party().slots() {
        let Some(actor) = host.party_actor(slot).filter(|actor| actor.is_alive()) else {
            continue;
        };
        let max = actor.limit_charge_max;
        if max == 0 {
            continue;
        }

        let before = actor.limit_charge;
        let after = before.saturating_add(reward_delta(max)).min(max);
        if after == before {
            continue;
        }

        host.set_limit_charge(slot, after);
        grants.push(RewardGrant {
            slot,
            before,
            after,
        });
    }
    grants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ActorSnapshot, MemoryBattle};

    fn member(charge: u8, max: u8) -> ActorSnapshot {
        ActorSnapshot {
            limit_charge: charge,
            limit_charge_max: max,
            ..ActorSnapshot::party_member(100)
        }
    }

    #[test]
    fn delta_is_five_percent_with_floor() {
        assert_eq!(reward_delta(100), 5);
        assert_eq!(reward_delta(255), 13);
        assert_eq!(reward_delta(10), 1);
        assert_eq!(reward_delta(1), 1);
    }

    #[test]
    fn grants_masked_living_slots() {
        let mut battle =
            MemoryBattle::new().with_party([member(10, 100), member(10, 100), member(98, 100)]);

        let grants = apply_reward(&mut battle, PartyMask::SLOT_0 | PartyMask::SLOT_2);
        assert_eq!(grants.len(), 2);
        assert_eq!(battle.party_actor(0).unwrap().limit_charge, 15);
        assert_eq!(battle.party_actor(1).unwrap().limit_charge, 10);
        assert_eq!(battle.party_actor(2).unwrap().limit_charge, 100);
    }

    #[test]
    fn skips_dead_and_gaugeless_slots() {
        let mut dead = member(0, 100);
        dead.hp = 0;
        let mut battle = MemoryBattle::new().with_party([dead, member(0, 0), member(100, 100)]);

        assert!(apply_reward(&mut battle, PartyMask::empty()).is_empty());
        assert_eq!(battle.party_actor(0).unwrap().limit_charge, 0);
    }
}
