// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rust_decimal_macros::dec;
use shop_event_audit::Actor;
use shop_event_persistence::Persistence;

use crate::{
    AcceptAllCars, AcceptAllShops, ApiError, ApiOutcome, CreateEventRequest, CreateEventResponse,
    EstimateLineInput, FinalizeApprovalRequest, FinalizeApprovalResponse, SubmitEstimateRequest,
    SubmitEstimateResponse, TransitionRequest, TransitionResponse,
};

pub fn persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database initializes")
}

pub fn operator() -> Actor {
    Actor::new(String::from("op-17"), String::from("J. Smith"))
}

pub fn reviewer() -> Actor {
    Actor::new(String::from("reviewer-3"), String::from("R. Alvarez"))
}

pub fn create_test_event(p: &mut Persistence) -> CreateEventResponse {
    crate::create_event(
        p,
        &AcceptAllCars,
        &AcceptAllShops,
        CreateEventRequest {
            car_number: String::from("GATX12345"),
            shop_code: String::from("UP001"),
            type_code: String::from("repair"),
            reason_code: Some(String::from("wheel_defect")),
        },
        &operator(),
    )
    .expect("event creates")
    .response
}

/// Requests a transition against the event's current version.
pub fn try_advance(
    p: &mut Persistence,
    event_id: i64,
    target: &str,
) -> Result<ApiOutcome<TransitionResponse>, ApiError> {
    let event = crate::get_event(p, event_id).expect("event loads");
    crate::request_transition(
        p,
        TransitionRequest {
            event_id,
            target_state: target.to_string(),
            expected_version: event.version,
            notes: None,
        },
        &operator(),
    )
}

pub fn advance(p: &mut Persistence, event_id: i64, target: &str) -> TransitionResponse {
    try_advance(p, event_id, target)
        .expect("transition applies")
        .response
}

pub fn test_lines() -> Vec<EstimateLineInput> {
    vec![
        EstimateLineInput {
            task_code: String::from("AAR-42"),
            description: String::from("Replace wheel set"),
            labor_hours: dec!(8),
            material_cost: dec!(500.00),
            total_cost: dec!(1500.00),
        },
        EstimateLineInput {
            task_code: String::from("AAR-17"),
            description: String::from("Repaint reporting marks"),
            labor_hours: dec!(2.5),
            material_cost: dec!(120.00),
            total_cost: dec!(400.00),
        },
    ]
}

pub fn submit(p: &mut Persistence, event_id: i64) -> SubmitEstimateResponse {
    crate::submit_estimate(
        p,
        SubmitEstimateRequest {
            event_id,
            lines: test_lines(),
        },
        &operator(),
    )
    .expect("estimate submits")
    .response
}

pub fn approve_submission(
    p: &mut Persistence,
    submission_id: i64,
    approved_line_ids: Vec<i64>,
) -> FinalizeApprovalResponse {
    crate::finalize_approval(
        p,
        FinalizeApprovalRequest {
            submission_id,
            decision: String::from("approved"),
            approved_line_ids,
            notes: None,
        },
        &reviewer(),
    )
    .expect("approval finalizes")
    .response
}

/// Walks an event from `requested` through the estimate/approval cycle
/// up to `qa_complete`.
pub fn drive_to_qa_complete(p: &mut Persistence, event_id: i64) {
    for target in ["assigned_to_shop", "inbound", "inspection"] {
        advance(p, event_id, target);
    }
    let submission: SubmitEstimateResponse = submit(p, event_id);
    let line_ids: Vec<i64> = submission
        .submission
        .lines
        .iter()
        .map(|l| l.line_id)
        .collect();
    advance(p, event_id, "estimate_submitted");
    advance(p, event_id, "estimate_under_review");
    approve_submission(p, submission.submission.submission_id, line_ids);
    for target in ["estimate_approved", "work_authorized", "in_repair", "qa_complete"] {
        advance(p, event_id, target);
    }
}
