// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::PersistenceError;
use crate::tests::{actor, advance, create_test_event, gate_context, persistence};
use shop_event::{Command, GateContext, TransitionResult, apply};
use shop_event_domain::{EventState, ShoppingEvent};

#[test]
fn test_create_event_assigns_number_and_initial_state() {
    let mut p = persistence();
    let event: ShoppingEvent = create_test_event(&mut p);

    assert_eq!(event.event_number.value(), "SE-000001");
    assert_eq!(event.state, EventState::Requested);
    assert_eq!(event.version, 1);
    assert_eq!(event.car_number.value(), "GATX12345");
    assert_eq!(event.shop_code.value(), "UP001");
    assert!(event.cancellation.is_none());

    let history = p.history_for_event(event.event_id).expect("history loads");
    assert_eq!(history.len(), 1);
    assert!(history[0].from_state.is_none());
    assert_eq!(history[0].to_state, EventState::Requested);
}

#[test]
fn test_event_numbers_are_sequential() {
    let mut p = persistence();
    let first: ShoppingEvent = create_test_event(&mut p);
    let second: ShoppingEvent = create_test_event(&mut p);

    assert_eq!(first.event_number.value(), "SE-000001");
    assert_eq!(second.event_number.value(), "SE-000002");
}

#[test]
fn test_get_event_by_number() {
    let mut p = persistence();
    let event: ShoppingEvent = create_test_event(&mut p);

    let loaded: ShoppingEvent = p
        .get_event_by_number("SE-000001")
        .expect("lookup by number");
    assert_eq!(loaded, event);
}

#[test]
fn test_missing_event() {
    let mut p = persistence();
    assert_eq!(p.get_event(99).unwrap_err(), PersistenceError::EventNotFound(99));
    assert_eq!(
        p.get_event_by_number("SE-000099").unwrap_err(),
        PersistenceError::EventNumberNotFound(String::from("SE-000099"))
    );
}

#[test]
fn test_commit_transition_advances_row() {
    let mut p = persistence();
    let event: ShoppingEvent = create_test_event(&mut p);

    let advanced: ShoppingEvent = advance(&mut p, &event, EventState::AssignedToShop);
    assert_eq!(advanced.version, 2);

    let stored: ShoppingEvent = p.get_event(event.event_id).expect("event loads");
    assert_eq!(stored.state, EventState::AssignedToShop);
    assert_eq!(stored.version, 2);
}

#[test]
fn test_stale_version_is_rejected() {
    let mut p = persistence();
    let event: ShoppingEvent = create_test_event(&mut p);

    // Two writers apply against the same loaded version.
    let ctx: GateContext = gate_context(&mut p, event.event_id);
    let first: TransitionResult = apply(
        &event,
        Command::Transition {
            to: EventState::AssignedToShop,
            notes: None,
        },
        &ctx,
        actor(),
        "2026-03-01T10:00:00Z",
    )
    .expect("first transition applies");
    let second: TransitionResult = apply(
        &event,
        Command::Cancel {
            reason: String::from("duplicate request"),
        },
        &ctx,
        actor(),
        "2026-03-01T10:00:01Z",
    )
    .expect("second transition applies");

    p.commit_transition(&first).expect("first commit wins");
    assert_eq!(
        p.commit_transition(&second).unwrap_err(),
        PersistenceError::ConcurrentModification {
            event_id: event.event_id,
            expected_version: 1,
        }
    );

    // The loser left no trace: state is the winner's, ledger has no
    // entry for the cancel.
    let stored: ShoppingEvent = p.get_event(event.event_id).expect("event loads");
    assert_eq!(stored.state, EventState::AssignedToShop);
    let history = p.history_for_event(event.event_id).expect("history loads");
    assert_eq!(history.len(), 2);
}

#[test]
fn test_cancel_persists_metadata() {
    let mut p = persistence();
    let event: ShoppingEvent = create_test_event(&mut p);

    let result: TransitionResult = apply(
        &event,
        Command::Cancel {
            reason: String::from("owner recalled the car"),
        },
        &GateContext::empty(),
        actor(),
        "2026-03-01T11:00:00Z",
    )
    .expect("cancel applies");
    p.commit_transition(&result).expect("cancel commits");

    let stored: ShoppingEvent = p.get_event(event.event_id).expect("event loads");
    assert_eq!(stored.state, EventState::Cancelled);
    let cancellation = stored.cancellation.expect("cancellation stored");
    assert_eq!(cancellation.cancelled_by, "op-17");
    assert_eq!(cancellation.reason, "owner recalled the car");
    assert_eq!(cancellation.cancelled_at, "2026-03-01T11:00:00Z");
}

#[test]
fn test_list_events_for_car() {
    let mut p = persistence();
    let first: ShoppingEvent = create_test_event(&mut p);
    let second: ShoppingEvent = create_test_event(&mut p);

    let events = p.list_events_for_car("GATX12345").expect("list loads");
    assert_eq!(events.len(), 2);
    // Newest first.
    assert_eq!(events[0].event_id, second.event_id);
    assert_eq!(events[1].event_id, first.event_id);

    assert!(p.list_events_for_car("TILX00001").expect("list loads").is_empty());
}
