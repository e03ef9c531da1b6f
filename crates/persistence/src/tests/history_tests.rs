// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::PersistenceError;
use crate::tests::{actor, advance, create_test_event, persistence};
use shop_event::{Command, GateContext, TransitionResult, apply};
use shop_event_audit::{is_contiguous, replay};
use shop_event_domain::{EventState, ShoppingEvent};

#[test]
fn test_replaying_the_ledger_yields_the_current_state() {
    let mut p = persistence();
    let event: ShoppingEvent = create_test_event(&mut p);
    let event: ShoppingEvent = advance(&mut p, &event, EventState::AssignedToShop);
    let event: ShoppingEvent = advance(&mut p, &event, EventState::Inbound);
    let event: ShoppingEvent = advance(&mut p, &event, EventState::Inspection);

    let history = p.history_for_event(event.event_id).expect("history loads");
    assert_eq!(history.len(), 4);
    assert!(is_contiguous(&history));
    assert_eq!(replay(&history), Some(event.state));

    let stored: ShoppingEvent = p.get_event(event.event_id).expect("event loads");
    assert_eq!(stored.state, EventState::Inspection);
}

#[test]
fn test_ledger_records_actor_notes_and_side_effects() {
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

    let history = p.history_for_event(event.event_id).expect("history loads");
    let last = history.last().expect("cancel entry exists");
    assert_eq!(last.actor.id, "op-17");
    assert_eq!(last.actor.display_name, "J. Smith");
    assert_eq!(last.notes.as_deref(), Some("owner recalled the car"));
    assert_eq!(last.side_effects.len(), 1);
    assert_eq!(last.side_effects[0].kind, "event_cancelled");
}

#[test]
fn test_history_orders_by_timestamp_then_row_id() {
    let mut p = persistence();
    let event: ShoppingEvent = create_test_event(&mut p);
    let event: ShoppingEvent = advance(&mut p, &event, EventState::AssignedToShop);
    let event: ShoppingEvent = advance(&mut p, &event, EventState::Inbound);
    let event: ShoppingEvent = advance(&mut p, &event, EventState::Inspection);

    // The three transitions share one timestamp; the row id breaks the
    // tie, so entries come back in applied order.
    let history = p.history_for_event(event.event_id).expect("history loads");
    let states: Vec<EventState> = history.iter().map(|e| e.to_state).collect();
    assert_eq!(
        states,
        vec![
            EventState::Requested,
            EventState::AssignedToShop,
            EventState::Inbound,
            EventState::Inspection,
        ]
    );
    let times: Vec<&str> = history.iter().map(|e| e.occurred_at.as_str()).collect();
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_history_for_missing_event() {
    let mut p = persistence();
    assert_eq!(
        p.history_for_event(12).unwrap_err(),
        PersistenceError::EventNotFound(12)
    );
}

#[test]
fn test_histories_are_scoped_per_event() {
    let mut p = persistence();
    let first: ShoppingEvent = create_test_event(&mut p);
    let second: ShoppingEvent = create_test_event(&mut p);
    let _ = advance(&mut p, &first, EventState::AssignedToShop);

    assert_eq!(
        p.history_for_event(first.event_id)
            .expect("history loads")
            .len(),
        2
    );
    assert_eq!(
        p.history_for_event(second.event_id)
            .expect("history loads")
            .len(),
        1
    );
}
