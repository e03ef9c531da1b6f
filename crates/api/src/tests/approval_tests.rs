// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_event, persistence, reviewer, submit};
use crate::{
    ApiError, DecisionInput, FinalizeApprovalRequest, RecordDecisionsRequest, SubmissionInfo,
};
use rust_decimal_macros::dec;
use shop_event_persistence::Persistence;

fn submission_with_lines(p: &mut Persistence) -> SubmissionInfo {
    let event = create_test_event(p);
    submit(p, event.event_id).submission
}

fn finalize(
    p: &mut Persistence,
    submission_id: i64,
    decision: &str,
    approved_line_ids: Vec<i64>,
) -> Result<crate::FinalizeApprovalResponse, ApiError> {
    crate::finalize_approval(
        p,
        FinalizeApprovalRequest {
            submission_id,
            decision: decision.to_string(),
            approved_line_ids,
            notes: None,
        },
        &reviewer(),
    )
    .map(|outcome| outcome.response)
}

#[test]
fn test_approval_updates_submission_status() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);
    let line_ids: Vec<i64> = submission.lines.iter().map(|l| l.line_id).collect();

    let response = finalize(&mut p, submission.submission_id, "approved", line_ids.clone())
        .expect("approval finalizes");

    assert_eq!(response.decision, "approved");
    assert_eq!(response.submission_status, "approved");
    assert_eq!(response.approved_line_ids, line_ids);

    let latest = crate::get_latest_submission(&mut p, submission.event_id)
        .expect("query")
        .expect("latest exists");
    assert_eq!(latest.status, "approved");
}

#[test]
fn test_changes_required_and_rejected_statuses() {
    let mut p = persistence();

    let first: SubmissionInfo = submission_with_lines(&mut p);
    let response = finalize(&mut p, first.submission_id, "changes_required", Vec::new())
        .expect("finalizes");
    assert_eq!(response.submission_status, "changes_required");

    let second: SubmissionInfo = submission_with_lines(&mut p);
    let response =
        finalize(&mut p, second.submission_id, "rejected", Vec::new()).expect("finalizes");
    assert_eq!(response.submission_status, "rejected");
}

#[test]
fn test_unknown_decision_is_rejected() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);

    let err = finalize(&mut p, submission.submission_id, "maybe", Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "decision"
    ));
}

#[test]
fn test_second_finalization_is_rejected() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);

    finalize(&mut p, submission.submission_id, "changes_required", Vec::new())
        .expect("first packet finalizes");

    let err = finalize(&mut p, submission.submission_id, "approved", Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "single_approval_packet"
    ));
}

#[test]
fn test_finalize_for_missing_submission() {
    let mut p = persistence();
    let err = finalize(&mut p, 404, "approved", Vec::new()).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_omitted_human_approvals_do_not_block_the_packet() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);
    let line_id: i64 = submission.lines[0].line_id;

    crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![DecisionInput {
                line_id,
                source: String::from("human"),
                confidence: None,
                verdict: String::from("approve"),
                responsibility: String::from("lessor"),
                basis_type: String::from("inspection_report"),
                basis_reference: String::from("IR-2026-114"),
                notes: None,
            }],
        },
        &reviewer(),
    )
    .expect("decision records");

    // The packet omits the human-approved line; the aggregate decision
    // still governs, and the finalization succeeds (warning only).
    let response = finalize(&mut p, submission.submission_id, "approved", Vec::new())
        .expect("approval finalizes despite omission");
    assert_eq!(response.submission_status, "approved");
}

#[test]
fn test_confidence_out_of_range_is_rejected() {
    let mut p = persistence();
    let submission: SubmissionInfo = submission_with_lines(&mut p);

    let err = crate::record_decisions(
        &mut p,
        RecordDecisionsRequest {
            submission_id: submission.submission_id,
            decisions: vec![DecisionInput {
                line_id: submission.lines[0].line_id,
                source: String::from("automated"),
                confidence: Some(dec!(1.5)),
                verdict: String::from("approve"),
                responsibility: String::from("lessor"),
                basis_type: String::from("rule"),
                basis_reference: String::from("rule-7"),
                notes: None,
            }],
        },
        &reviewer(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "confidence"
    ));
}
