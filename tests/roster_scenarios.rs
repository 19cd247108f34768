//! End-to-end scenarios for filling, drawing and exchanging numbers.

use junta_roster::{
    Caller, Currency, ExchangeCoordinator, GroupInfo, Junta, JuntaError, MemberData, MemberKind,
    RosterPolicy, SlotIndex, SlotRoster,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn member(name: &str) -> MemberData {
    MemberData::named(name).with_phone("987654321")
}

#[test]
fn fills_until_capped_then_reports_full() {
    let policy = RosterPolicy::default().with_max_slots(3);
    let mut roster = SlotRoster::with_size(3, policy).unwrap();

    assert_eq!(roster.fill_vacancy(&member("A")).unwrap().position(), 2);
    assert_eq!(roster.fill_vacancy(&member("B")).unwrap().position(), 3);

    let before = roster.slots().to_vec();
    assert_eq!(
        roster.fill_vacancy(&member("C")),
        Err(JuntaError::Full { capacity: 3 })
    );
    assert_eq!(roster.slots(), before.as_slice());
}

#[test]
fn approved_request_swaps_and_drains_queue() {
    let mut roster = SlotRoster::with_size(3, RosterPolicy::default()).unwrap();
    roster.fill_vacancy(&member("A")).unwrap();
    roster.fill_vacancy(&member("B")).unwrap();
    let mut exchange = ExchangeCoordinator::new();

    let request = exchange.submit("2", "3").unwrap();
    exchange
        .approve(Caller::organizer(), &mut roster, &request)
        .unwrap();

    assert_eq!(roster.slots()[1].draw_number, Some(3));
    assert_eq!(roster.slots()[2].draw_number, Some(2));
    assert_eq!(exchange.next_pending(Caller::organizer()), Err(JuntaError::Empty));
}

#[test]
fn stale_request_is_resolved_without_touching_roster() {
    let mut roster = SlotRoster::with_size(4, RosterPolicy::default()).unwrap();
    roster.fill_vacancy(&member("A")).unwrap();
    roster.fill_vacancy(&member("B")).unwrap();
    let before = roster.slots().to_vec();
    let mut exchange = ExchangeCoordinator::new();

    let request = exchange.submit("2", "5").unwrap();
    assert_eq!(
        exchange.approve(Caller::organizer(), &mut roster, &request),
        Err(JuntaError::NumberNotFound("5".into()))
    );
    assert!(exchange.is_empty());
    assert_eq!(roster.slots(), before.as_slice());
}

#[test]
fn organizer_number_is_never_swapped() {
    let mut roster = SlotRoster::with_size(4, RosterPolicy::default()).unwrap();
    for name in ["A", "B", "C"] {
        roster.fill_vacancy(&member(name)).unwrap();
    }
    roster.run_lottery(&mut StdRng::seed_from_u64(2024)).unwrap();
    let before = roster.slots().to_vec();

    assert_eq!(
        roster.apply_swap("1", "3"),
        Err(JuntaError::OrganizerNumberProtected)
    );
    assert_eq!(roster.slots(), before.as_slice());
    assert_eq!(roster.slots()[0].draw_number, Some(1));
}

#[test]
fn organizer_review_loop_drains_in_order() {
    let junta = Junta::new(
        GroupInfo::new("Loop", 2_000, Currency::Dollars),
        RosterPolicy::default().with_initial_size(5),
    )
    .unwrap();
    for name in ["A", "B", "C", "D"] {
        junta.fill_vacancy(&member(name)).unwrap();
    }
    junta.submit_swap("2", "3").unwrap();
    junta.submit_swap("4", "9").unwrap();
    junta.submit_swap("5", "2").unwrap();

    let mut outcomes = Vec::new();
    loop {
        let request = match junta.next_pending(Caller::organizer()) {
            Ok(request) => request,
            Err(JuntaError::Empty) => break,
            Err(e) => panic!("unexpected error: {}", e),
        };
        if request.target_number == "2" {
            junta.reject(Caller::organizer(), &request).unwrap();
            outcomes.push("rejected");
        } else {
            match junta.approve(Caller::organizer(), &request) {
                Ok(_) => outcomes.push("approved"),
                Err(_) => outcomes.push("failed"),
            }
        }
    }

    assert_eq!(outcomes, vec!["approved", "failed", "rejected"]);
    let snapshot = junta.snapshot();
    assert_eq!(snapshot.slots[1].draw_number, Some(3));
    assert_eq!(snapshot.slots[2].draw_number, Some(2));
    assert_eq!(snapshot.slots[4].draw_number, Some(5));
}

#[test]
fn manual_edit_and_invitation_join_coexist() {
    let junta = Junta::new(
        GroupInfo::new("Mixed", 2_000, Currency::Soles),
        RosterPolicy::default().with_initial_size(3).with_max_slots(4),
    )
    .unwrap();
    junta.edit_slot(SlotIndex::new(1), &member("Manual")).unwrap();

    let index = junta.join_with_invitation(true, &member("Joined")).unwrap();
    assert_eq!(index.position(), 3);
    // auto-expand adds the fourth slot
    assert_eq!(junta.join_with_invitation(true, &member("Late")).unwrap().position(), 4);
    assert!(!junta.can_accept_member().unwrap());

    let snapshot = junta.snapshot();
    assert_eq!(snapshot.slots[1].member_kind, MemberKind::ManualMember);
    assert_eq!(snapshot.slots[1].draw_number, None);
    assert_eq!(snapshot.slots[2].member_kind, MemberKind::VerifiedMember);
    assert_eq!(snapshot.slots[2].draw_number, Some(2));
    assert_eq!(snapshot.slots[3].draw_number, Some(3));
}
