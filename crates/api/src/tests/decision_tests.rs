// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_event, persistence, reviewer, submit};
use crate::{ApiError, DecisionInput, RecordDecisionsRequest, SubmissionInfo};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shop_event_persistence::Persistence;

fn submission_with_lines(p: &mut Persistence) -> SubmissionInfo {
    let event = create_test_event(p);
    submit(p, event.event_id).submission
}

fn automated_input(line_id: i64, verdict: &str, confidence: Decimal) -> DecisionInput {
    DecisionInput {
        line_id,
        source: String::from("automated"),
        confidence: Some(confidence),
        verdict: verdict.to_string(),
        responsibility: String::from("lessor"),
        basis_type: String::from("rule"),
        basis_reference: String::from("rule-7"),
        notes: None,
    }
}

fn human_input(line_id: i64, verdict: &str, responsibility: &str) -> DecisionInput {
    DecisionInput {
        line_id,
        source: String::from("human"),
        confidence: None,
        verdict: verdict.to_string(),
        responsibility: responsibility.to_string(),
        basis_type: String::from("inspection_report"),
        basis_reference: String::from("IR-2026-114"),
        notes: Some(String::from("damage predates lease")),
    }
}

#[test]
fn test_decisions_are_returned_in_input_order() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);
    let first_line: i64 = submission.lines[0].line_id;
    let second_line: i64 = submission.lines[1].line_id;

    let response = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![
                automated_input(second_line, "approve", dec!(0.95)),
                automated_input(first_line, "review", dec!(0.55)),
            ],
        },
        &reviewer(),
    )
    .expect("decisions record");

    assert_eq!(response.decisions.len(), 2);
    assert_eq!(response.decisions[0].line_id, second_line);
    assert_eq!(response.decisions[0].verdict, "approve");
    assert_eq!(response.decisions[0].confidence, Some(dec!(0.95)));
    assert_eq!(response.decisions[1].line_id, first_line);
    assert_eq!(response.decisions[1].verdict, "review");
    assert!(!response.decisions[0].is_override);
}

#[test]
fn test_human_reject_overrides_automated_approve() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);
    let line_id: i64 = submission.lines[0].line_id;

    crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![automated_input(line_id, "approve", dec!(0.92))],
        },
        &reviewer(),
    )
    .expect("automated decision records");

    let response = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![human_input(line_id, "reject", "customer")],
        },
        &reviewer(),
    )
    .expect("human decision records");
    assert!(response.decisions[0].is_override);

    // The human row is effective; the automated row remains a fact.
    let decisions = crate::list_decisions(&mut p, line_id).expect("decisions load");
    assert_eq!(decisions.decisions.len(), 2);
    assert!(decisions.is_override);
    let effective_id: i64 = decisions.effective_decision_id.expect("line is decided");
    let effective = decisions
        .decisions
        .iter()
        .find(|d| d.decision_id == effective_id)
        .expect("effective row present");
    assert_eq!(effective.source, "human");
    assert_eq!(effective.verdict, "reject");
    assert_eq!(decisions.decisions[0].source, "automated");
    assert_eq!(decisions.decisions[0].verdict, "approve");
}

#[test]
fn test_automated_decision_requires_confidence() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);

    let mut input: DecisionInput =
        automated_input(submission.lines[0].line_id, "approve", dec!(0.9));
    input.confidence = None;

    let err = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![input],
        },
        &reviewer(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "confidence"
    ));
}

#[test]
fn test_human_decision_rejects_confidence() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);

    let mut input: DecisionInput = human_input(submission.lines[0].line_id, "approve", "lessor");
    input.confidence = Some(dec!(0.5));

    let err = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![input],
        },
        &reviewer(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "confidence"
    ));
}

#[test]
fn test_unknown_verdict_is_rejected() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);

    let err = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![human_input(submission.lines[0].line_id, "maybe", "lessor")],
        },
        &reviewer(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "verdict"
    ));
}

#[test]
fn test_decision_must_name_a_line_of_the_submission() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);
    // A second event's lines are not part of this submission.
    let other: SubmissionInfo = submission_with_lines(&mut p);

    let err = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![human_input(other.lines[0].line_id, "approve", "lessor")],
        },
        &reviewer(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "line_id"
    ));
}

#[test]
fn test_record_decisions_for_missing_submission() {
    let mut p = persistence();
    let err = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: 404,
            decisions: vec![human_input(1, "approve", "lessor")],
        },
        &reviewer(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_list_decisions_for_missing_line() {
    let mut p = persistence();
    let err = crate::list_decisions(&mut p, 404).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}
