// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod event_tests;
mod history_tests;

use crate::Persistence;
use rust_decimal_macros::dec;
use shop_event::{Command, GateContext, SubmissionSummary, TransitionResult, apply, creation_entry};
use shop_event_audit::Actor;
use shop_event_domain::{CarNumber, EventState, NewEstimateLine, ShopCode, ShoppingEvent};

pub fn persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database initializes")
}

pub fn actor() -> Actor {
    Actor::new(String::from("op-17"), String::from("J. Smith"))
}

pub const T0: &str = "2026-03-01T09:00:00Z";

pub fn create_test_event(p: &mut Persistence) -> ShoppingEvent {
    let entry = creation_entry(actor(), T0);
    p.create_event(
        &CarNumber::new("GATX12345"),
        &ShopCode::new("UP001"),
        "repair",
        Some("wheel_defect"),
        "op-17",
        &entry,
    )
    .expect("event creates")
}

/// Builds the gate context for an event from the stored submissions.
pub fn gate_context(p: &mut Persistence, event_id: i64) -> GateContext {
    let latest_submission: Option<SubmissionSummary> = p
        .latest_submission(event_id)
        .expect("latest submission query")
        .map(|s| SubmissionSummary {
            version: s.version,
            status: s.status,
            is_final: s.is_final,
        });
    let latest_final_submission: Option<SubmissionSummary> = p
        .latest_final_submission(event_id)
        .expect("latest final submission query")
        .map(|s| SubmissionSummary {
            version: s.version,
            status: s.status,
            is_final: s.is_final,
        });

    GateContext {
        latest_submission,
        latest_final_submission,
    }
}

/// Applies and commits a transition, returning the new event value.
pub fn advance(p: &mut Persistence, event: &ShoppingEvent, to: EventState) -> ShoppingEvent {
    let ctx: GateContext = gate_context(p, event.event_id);
    let result: TransitionResult = apply(
        event,
        Command::Transition { to, notes: None },
        &ctx,
        actor(),
        "2026-03-01T10:00:00Z",
    )
    .expect("transition applies");
    p.commit_transition(&result).expect("transition commits");
    result.new_event
}

pub fn test_line() -> NewEstimateLine {
    NewEstimateLine {
        task_code: String::from("AAR-42"),
        description: String::from("Replace wheel set"),
        labor_hours: dec!(8),
        material_cost: dec!(500.00),
        total_cost: dec!(1500.00),
    }
}
