// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end walk of one shopping event from request to release.

use crate::tests::helpers::{
    advance, approve_submission, create_test_event, operator, persistence, reviewer, submit,
    try_advance,
};
use crate::{ApiError, DecisionInput, RecordDecisionsRequest};
use rust_decimal_macros::dec;

#[test]
fn test_full_shopping_event_lifecycle() {
    let mut p = persistence();

    let event = create_test_event(&mut p);
    assert_eq!(event.event_number, "SE-000001");

    advance(&mut p, event.event_id, "assigned_to_shop");
    advance(&mut p, event.event_id, "inbound");
    advance(&mut p, event.event_id, "inspection");

    // Premature authorization: no estimate exists yet, so the gate
    // reports the business condition, not an adjacency error.
    let err = try_advance(&mut p, event.event_id, "work_authorized").unwrap_err();
    assert_eq!(
        err,
        ApiError::GateNotSatisfied {
            condition: String::from("no approved estimate: no estimate has been submitted"),
        }
    );

    // The shop submits a two-line estimate.
    let estimate = submit(&mut p, event.event_id);
    assert_eq!(estimate.submission.version, 1);
    assert_eq!(estimate.submission.total_cost, dec!(1900.00));
    let wheel_line: i64 = estimate.submission.lines[0].line_id;
    let paint_line: i64 = estimate.submission.lines[1].line_id;

    advance(&mut p, event.event_id, "estimate_submitted");
    advance(&mut p, event.event_id, "estimate_under_review");

    // An estimate alone does not open the gate; it must be approved.
    let err = try_advance(&mut p, event.event_id, "work_authorized").unwrap_err();
    assert!(matches!(err, ApiError::GateNotSatisfied { .. }));

    // The evaluator approves the wheel line; the reviewer disagrees and
    // rejects it, approving only the paint line.
    crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: estimate.submission.submission_id,
            decisions: vec![DecisionInput {
                line_id: wheel_line,
                source: String::from("automated"),
                confidence: Some(dec!(0.92)),
                verdict: String::from("approve"),
                responsibility: String::from("lessor"),
                basis_type: String::from("rule"),
                basis_reference: String::from("rule-7"),
                notes: None,
            }],
        },
        &reviewer(),
    )
    .expect("automated decision records");

    let overrides = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: estimate.submission.submission_id,
            decisions: vec![
                DecisionInput {
                    line_id: wheel_line,
                    source: String::from("human"),
                    confidence: None,
                    verdict: String::from("reject"),
                    responsibility: String::from("customer"),
                    basis_type: String::from("inspection_report"),
                    basis_reference: String::from("IR-2026-114"),
                    notes: Some(String::from("damage predates lease")),
                },
                DecisionInput {
                    line_id: paint_line,
                    source: String::from("human"),
                    confidence: None,
                    verdict: String::from("approve"),
                    responsibility: String::from("lessor"),
                    basis_type: String::from("inspection_report"),
                    basis_reference: String::from("IR-2026-114"),
                    notes: None,
                },
            ],
        },
        &reviewer(),
    )
    .expect("human decisions record");
    assert!(overrides.decisions[0].is_override);
    assert!(!overrides.decisions[1].is_override);

    // Both rows survive on the overridden line; the human one is
    // effective.
    let wheel_decisions = crate::list_decisions(&mut p, wheel_line).expect("decisions load");
    assert_eq!(wheel_decisions.decisions.len(), 2);
    assert!(wheel_decisions.is_override);

    // Packet-level approval on the paint line opens the gate.
    approve_submission(&mut p, estimate.submission.submission_id, vec![paint_line]);
    advance(&mut p, event.event_id, "estimate_approved");
    let authorized = try_advance(&mut p, event.event_id, "work_authorized")
        .expect("gate passes after packet approval");
    assert_eq!(authorized.response.side_effects.len(), 1);
    assert_eq!(authorized.response.side_effects[0].kind, "estimate_gate_passed");

    advance(&mut p, event.event_id, "in_repair");
    advance(&mut p, event.event_id, "qa_complete");

    // The post-QA estimate is the final one, and it gates the release
    // path until approved.
    let final_estimate = submit(&mut p, event.event_id);
    assert!(final_estimate.submission.is_final);
    advance(&mut p, event.event_id, "final_estimate_submitted");
    let err = try_advance(&mut p, event.event_id, "final_estimate_approved").unwrap_err();
    assert!(matches!(err, ApiError::GateNotSatisfied { .. }));

    let line_ids: Vec<i64> = final_estimate
        .submission
        .lines
        .iter()
        .map(|l| l.line_id)
        .collect();
    approve_submission(&mut p, final_estimate.submission.submission_id, line_ids);
    let approved = try_advance(&mut p, event.event_id, "final_estimate_approved")
        .expect("final gate passes");
    assert_eq!(
        approved.response.side_effects[0].kind,
        "final_estimate_gate_passed"
    );

    advance(&mut p, event.event_id, "ready_for_release");
    advance(&mut p, event.event_id, "released");

    // Terminal: nothing moves a released event, not even cancellation.
    let err = try_advance(&mut p, event.event_id, "ready_for_release").unwrap_err();
    assert!(matches!(err, ApiError::InvalidTransition { .. }));
    let err = crate::cancel_event(
        &mut p,
        crate::CancelEventRequest {
            event_id: event.event_id,
            reason: String::from("too late"),
            expected_version: 14,
        },
        &operator(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidTransition { .. }));

    // The ledger tells the whole story, creation entry included.
    let history = crate::list_history(&mut p, event.event_id).expect("history loads");
    assert_eq!(history.entries.len(), 14);
    assert!(history.entries[0].from_state.is_none());
    assert_eq!(
        history.entries.last().expect("non-empty").to_state,
        "released"
    );
}
