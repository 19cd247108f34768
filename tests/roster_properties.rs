//! Property tests: resize and lottery keep the roster invariants.

use std::collections::HashSet;

use junta_roster::{JuntaError, MemberData, MemberKind, RosterPolicy, SlotRoster};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const MAX: usize = 20;

fn roster_with(size: usize, members: usize) -> SlotRoster {
    let policy = RosterPolicy::default().with_max_slots(MAX).with_auto_expand(false);
    let mut roster = SlotRoster::with_size(size, policy).unwrap();
    for i in 0..members.min(size - 1) {
        roster
            .fill_vacancy(&MemberData::named(format!("Member {}", i)))
            .unwrap();
    }
    roster
}

proptest! {
    #[test]
    fn resize_sets_size_and_keeps_organizer(start in 1usize..=MAX, members in 0usize..MAX, target in 0usize..=MAX + 2) {
        let mut roster = roster_with(start, members);
        let result = roster.resize(target);

        if (1..=MAX).contains(&target) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(roster.size(), target);
        } else {
            prop_assert_eq!(result, Err(JuntaError::InvalidCapacity { requested: target, max: MAX }));
            prop_assert_eq!(roster.size(), start);
        }
        let organizer = &roster.slots()[0];
        prop_assert!(organizer.occupied);
        prop_assert_eq!(organizer.member_kind, MemberKind::Administrator);
    }

    #[test]
    fn shrink_then_grow_never_restores_members(start in 3usize..=MAX, cut in 1usize..3) {
        let mut roster = roster_with(start, start - 1);
        let smaller = start - cut;
        roster.resize(smaller).unwrap();
        roster.resize(start).unwrap();

        for slot in &roster.slots()[smaller..] {
            prop_assert!(!slot.occupied);
            prop_assert_eq!(slot.draw_number, None);
        }
    }

    #[test]
    fn lottery_numbers_are_unique_and_exclude_organizer(size in 2usize..=MAX, members in 1usize..MAX, seed in any::<u64>()) {
        let mut roster = roster_with(size, members);
        let mut rng = StdRng::seed_from_u64(seed);
        let drawn = roster.run_lottery(&mut rng).unwrap();

        let numbers: Vec<u32> = roster
            .slots()
            .iter()
            .skip(1)
            .filter(|s| s.occupied)
            .filter_map(|s| s.draw_number)
            .collect();
        let unique: HashSet<u32> = numbers.iter().copied().collect();

        prop_assert_eq!(numbers.len(), drawn.len());
        prop_assert_eq!(unique.len(), numbers.len());
        prop_assert!(!unique.contains(&1));
        prop_assert!(unique.iter().all(|n| *n as usize <= size));
    }

    #[test]
    fn full_roster_at_cap_rejects_without_mutation(seed in any::<u64>()) {
        let policy = RosterPolicy::default().with_max_slots(MAX);
        let mut roster = SlotRoster::with_size(MAX, policy).unwrap();
        for i in 0..MAX - 1 {
            roster.fill_vacancy(&MemberData::named(format!("M{}", i))).unwrap();
        }
        roster.run_lottery(&mut StdRng::seed_from_u64(seed)).unwrap();
        let before = roster.slots().to_vec();

        prop_assert_eq!(
            roster.fill_vacancy(&MemberData::named("Late")),
            Err(JuntaError::Full { capacity: MAX })
        );
        prop_assert_eq!(roster.slots(), before.as_slice());
    }
}
