// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers are transport-neutral: they take a persistence adapter, the
//! collaborators they consult, a request DTO, and the acting operator,
//! and return a response DTO or an [`ApiError`]. State-changing
//! handlers also return the notifications produced by the committed
//! operation; the server dispatches those after the fact,
//! fire-and-forget.

use std::str::FromStr;

use shop_event::{
    Command, GateContext, SubmissionSummary, TransitionResult, apply, creation_entry,
    omitted_human_approvals, submission_status_for,
};
use shop_event_audit::Actor;
use shop_event_domain::{
    ApprovalPacket, CarNumber, DecisionSource, EstimateSubmission, EventState, LineDecision,
    NewEstimateLine, OverallDecision, Responsibility, ShopCode, ShoppingEvent, SubmissionStatus,
    Verdict, effective_decision, is_override, now_rfc3339, validate_car_number,
    validate_estimate_lines, validate_shop_code, validate_type_code,
};
use shop_event_persistence::Persistence;

use crate::collaborators::{CarRegistry, ShopDirectory};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::notify::Notification;
use crate::request_response::{
    CancelEventRequest, CancelEventResponse, CreateEventRequest, CreateEventResponse, DecisionInfo,
    EventInfo, FinalizeApprovalRequest, FinalizeApprovalResponse, HistoryEntryInfo,
    ListDecisionsResponse, ListHistoryResponse, RecordDecisionsRequest, RecordDecisionsResponse,
    RecordedDecisionInfo, SideEffectInfo, SubmissionInfo, SubmitEstimateRequest,
    SubmitEstimateResponse, TransitionRequest, TransitionResponse,
};

/// The result of a state-changing API operation.
///
/// Notifications describe what was committed; they are produced only on
/// success and dispatched by the caller after this function returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOutcome<T> {
    /// The API response.
    pub response: T,
    /// Notifications to dispatch, fire-and-forget.
    pub notifications: Vec<Notification>,
}

/// Builds the gate context for an event from its stored submissions.
fn gate_context(persistence: &mut Persistence, event_id: i64) -> Result<GateContext, ApiError> {
    let latest_submission: Option<SubmissionSummary> = persistence
        .latest_submission(event_id)
        .map_err(translate_persistence_error)?
        .map(|s| SubmissionSummary {
            version: s.version,
            status: s.status,
            is_final: s.is_final,
        });
    let latest_final_submission: Option<SubmissionSummary> = persistence
        .latest_final_submission(event_id)
        .map_err(translate_persistence_error)?
        .map(|s| SubmissionSummary {
            version: s.version,
            status: s.status,
            is_final: s.is_final,
        });

    Ok(GateContext {
        latest_submission,
        latest_final_submission,
    })
}

/// Loads an event and checks the caller's read version against it.
///
/// A stale read is reported as `ConcurrentModification` before any work
/// happens; the commit-time compare-and-swap still guards the race
/// window between this check and the write.
fn load_event_at_version(
    persistence: &mut Persistence,
    event_id: i64,
    expected_version: i64,
) -> Result<ShoppingEvent, ApiError> {
    let event: ShoppingEvent = persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?;

    if event.version != expected_version {
        return Err(ApiError::ConcurrentModification {
            event_id,
            expected_version,
        });
    }

    Ok(event)
}

/// Creates a new shopping event in `Requested` state.
///
/// The car and shop are validated structurally, then checked against
/// the external master-data collaborators. The event number
/// (`SE-<zero-padded id>`) is assigned by persistence from the row id.
///
/// # Errors
///
/// Returns an error if:
/// - The car number, shop code, or type code is malformed
/// - The car or shop is unknown to its collaborator
/// - Persistence fails
pub fn create_event(
    persistence: &mut Persistence,
    cars: &dyn CarRegistry,
    shops: &dyn ShopDirectory,
    request: CreateEventRequest,
    actor: &Actor,
) -> Result<ApiOutcome<CreateEventResponse>, ApiError> {
    validate_car_number(&request.car_number).map_err(translate_domain_error)?;
    validate_shop_code(&request.shop_code).map_err(translate_domain_error)?;
    validate_type_code(&request.type_code).map_err(translate_domain_error)?;

    let car_number: CarNumber = CarNumber::new(&request.car_number);
    let shop_code: ShopCode = ShopCode::new(&request.shop_code);

    if !cars.car_exists(car_number.value()) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Car"),
            message: format!("Car '{car_number}' is not known to the car registry"),
        });
    }
    if !shops.shop_exists(shop_code.value()) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Shop"),
            message: format!("Shop '{shop_code}' is not known to the shop directory"),
        });
    }

    let now: String = now_rfc3339();
    let entry = creation_entry(actor.clone(), &now);
    let event: ShoppingEvent = persistence
        .create_event(
            &car_number,
            &shop_code,
            request.type_code.trim(),
            request.reason_code.as_deref(),
            &actor.id,
            &entry,
        )
        .map_err(translate_persistence_error)?;

    tracing::info!(
        event_id = event.event_id,
        event_number = %event.event_number,
        car_number = %event.car_number,
        shop_code = %event.shop_code,
        "Shopping event created"
    );

    let notification: Notification = Notification::new(
        event.event_id,
        String::from("event_created"),
        serde_json::json!({
            "event_number": event.event_number.value(),
            "car_number": event.car_number.value(),
            "shop_code": event.shop_code.value(),
        }),
    );

    Ok(ApiOutcome {
        response: CreateEventResponse {
            event_id: event.event_id,
            event_number: event.event_number.value().to_string(),
            state: event.state.to_string(),
            version: event.version,
            message: format!("Shopping event {} created", event.event_number),
        },
        notifications: vec![notification],
    })
}

/// Moves an event to a new workflow state.
///
/// Evaluation order: terminal check, gate predicate, structural
/// adjacency; then the state change, version increment, and ledger
/// append commit in one transaction guarded by the version
/// compare-and-swap.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist or the read version is stale
/// - The target state string is not a workflow state
/// - A gate predicate is unmet or the transition is not adjacent
pub fn request_transition(
    persistence: &mut Persistence,
    request: TransitionRequest,
    actor: &Actor,
) -> Result<ApiOutcome<TransitionResponse>, ApiError> {
    let target: EventState =
        EventState::from_str(&request.target_state).map_err(translate_domain_error)?;

    let event: ShoppingEvent =
        load_event_at_version(persistence, request.event_id, request.expected_version)?;
    let ctx: GateContext = gate_context(persistence, request.event_id)?;

    let now: String = now_rfc3339();
    let result: TransitionResult = apply(
        &event,
        Command::Transition {
            to: target,
            notes: request.notes,
        },
        &ctx,
        actor.clone(),
        &now,
    )
    .map_err(translate_core_error)?;

    persistence
        .commit_transition(&result)
        .map_err(translate_persistence_error)?;

    tracing::info!(
        event_id = event.event_id,
        from = %event.state,
        to = %target,
        version = result.new_event.version,
        "Shopping event transitioned"
    );

    let notification: Notification = Notification::new(
        event.event_id,
        String::from("state_changed"),
        serde_json::json!({
            "from_state": event.state.as_str(),
            "to_state": target.as_str(),
            "version": result.new_event.version,
        }),
    );

    Ok(ApiOutcome {
        response: TransitionResponse {
            event_id: event.event_id,
            from_state: event.state.to_string(),
            to_state: target.to_string(),
            version: result.new_event.version,
            side_effects: result
                .entry
                .side_effects
                .iter()
                .map(SideEffectInfo::from)
                .collect(),
            message: format!(
                "Event {} moved from '{}' to '{}'",
                event.event_number, event.state, target
            ),
        },
        notifications: vec![notification],
    })
}

/// Cancels an event from any non-terminal state.
///
/// Irreversible. Records the cancellation metadata and a ledger entry
/// carrying the `event_cancelled` side-effect marker in one
/// transaction. A second cancellation fails with `InvalidTransition`.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist or the read version is stale
/// - The reason is empty
/// - The event is already terminal
pub fn cancel_event(
    persistence: &mut Persistence,
    request: CancelEventRequest,
    actor: &Actor,
) -> Result<ApiOutcome<CancelEventResponse>, ApiError> {
    let event: ShoppingEvent =
        load_event_at_version(persistence, request.event_id, request.expected_version)?;

    let now: String = now_rfc3339();
    let result: TransitionResult = apply(
        &event,
        Command::Cancel {
            reason: request.reason,
        },
        &GateContext::empty(),
        actor.clone(),
        &now,
    )
    .map_err(translate_core_error)?;

    persistence
        .commit_transition(&result)
        .map_err(translate_persistence_error)?;

    let cancelled_at: String = result
        .new_event
        .cancellation
        .as_ref()
        .map_or(now, |c| c.cancelled_at.clone());

    tracing::info!(
        event_id = event.event_id,
        from = %event.state,
        "Shopping event cancelled"
    );

    let notification: Notification = Notification::new(
        event.event_id,
        String::from("event_cancelled"),
        serde_json::json!({
            "from_state": event.state.as_str(),
            "cancelled_at": cancelled_at,
        }),
    );

    Ok(ApiOutcome {
        response: CancelEventResponse {
            event_id: event.event_id,
            state: result.new_event.state.to_string(),
            version: result.new_event.version,
            cancelled_at,
            message: format!("Event {} cancelled", event.event_number),
        },
        notifications: vec![notification],
    })
}

/// Submits a new estimate version for an event.
///
/// Lines are validated structurally; the supplied per-line totals are
/// authoritative and never recomputed. The submission is tagged final
/// when the event has already reached `qa_complete` in its ledger.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist
/// - The line set is empty or a line is malformed
pub fn submit_estimate(
    persistence: &mut Persistence,
    request: SubmitEstimateRequest,
    actor: &Actor,
) -> Result<ApiOutcome<SubmitEstimateResponse>, ApiError> {
    let lines: Vec<NewEstimateLine> = request
        .lines
        .into_iter()
        .map(|line| NewEstimateLine {
            task_code: line.task_code,
            description: line.description,
            labor_hours: line.labor_hours,
            material_cost: line.material_cost,
            total_cost: line.total_cost,
        })
        .collect();
    validate_estimate_lines(&lines).map_err(translate_domain_error)?;

    let event: ShoppingEvent = persistence
        .get_event(request.event_id)
        .map_err(translate_persistence_error)?;

    // Final-estimate tagging follows the ledger, not the current state:
    // once QA has signed off, every later submission is a final estimate.
    let is_final: bool = persistence
        .history_for_event(event.event_id)
        .map_err(translate_persistence_error)?
        .iter()
        .any(|entry| entry.to_state == EventState::QaComplete);

    let now: String = now_rfc3339();
    let submission: EstimateSubmission = persistence
        .insert_submission(event.event_id, is_final, &lines, &actor.id, &now)
        .map_err(translate_persistence_error)?;

    tracing::info!(
        event_id = event.event_id,
        submission_id = submission.submission_id,
        version = submission.version,
        is_final = submission.is_final,
        total_cost = %submission.total_cost,
        "Estimate submitted"
    );

    let notification: Notification = Notification::new(
        event.event_id,
        String::from("estimate_submitted"),
        serde_json::json!({
            "submission_id": submission.submission_id,
            "version": submission.version,
            "is_final": submission.is_final,
        }),
    );

    Ok(ApiOutcome {
        response: SubmitEstimateResponse {
            message: format!(
                "Estimate version {} submitted for event {}",
                submission.version, event.event_number
            ),
            submission: SubmissionInfo::from(&submission),
        },
        notifications: vec![notification],
    })
}

/// Records a batch of line decisions against a submission.
///
/// Decisions are append-only; a repeated decision by the same source
/// supersedes the prior one at read time while every row remains in
/// history. The recorded rows are returned in input order, each with
/// its derived override flag.
///
/// # Errors
///
/// Returns an error if:
/// - The submission does not exist
/// - A decision names a line outside the submission
/// - A source/confidence pairing, verdict, or responsibility is invalid
pub fn record_decisions(
    persistence: &mut Persistence,
    request: RecordDecisionsRequest,
    actor: &Actor,
) -> Result<RecordDecisionsResponse, ApiError> {
    let submission: EstimateSubmission = persistence
        .get_submission(request.submission_id)
        .map_err(translate_persistence_error)?;

    let now: String = now_rfc3339();
    let mut recorded: Vec<LineDecision> = Vec::with_capacity(request.decisions.len());

    for input in request.decisions {
        if !submission.lines.iter().any(|l| l.line_id == input.line_id) {
            return Err(ApiError::InvalidInput {
                field: String::from("line_id"),
                message: format!(
                    "Line {} does not belong to submission {}",
                    input.line_id, request.submission_id
                ),
            });
        }

        let source: DecisionSource = DecisionSource::from_parts(&input.source, input.confidence)
            .map_err(translate_domain_error)?;
        let verdict: Verdict = Verdict::from_str(&input.verdict).map_err(translate_domain_error)?;
        let responsibility: Responsibility =
            Responsibility::from_str(&input.responsibility).map_err(translate_domain_error)?;

        let decision: LineDecision = persistence
            .insert_decision(
                input.line_id,
                source,
                verdict,
                responsibility,
                &input.basis_type,
                &input.basis_reference,
                input.notes.as_deref(),
                &actor.id,
                &now,
            )
            .map_err(translate_persistence_error)?;
        recorded.push(decision);
    }

    // Override flags are derived from the full per-line history after
    // all rows of this batch are in.
    let mut infos: Vec<RecordedDecisionInfo> = Vec::with_capacity(recorded.len());
    for decision in &recorded {
        let line_history: Vec<LineDecision> = persistence
            .decisions_for_line(decision.line_id)
            .map_err(translate_persistence_error)?;
        infos.push(RecordedDecisionInfo {
            decision_id: decision.decision_id,
            line_id: decision.line_id,
            source: decision.source.as_str().to_string(),
            confidence: decision.source.confidence(),
            verdict: decision.verdict.to_string(),
            responsibility: decision.responsibility.to_string(),
            is_override: is_override(&line_history),
            decided_at: decision.decided_at.clone(),
        });
    }

    tracing::info!(
        submission_id = request.submission_id,
        count = infos.len(),
        "Line decisions recorded"
    );

    Ok(RecordDecisionsResponse {
        submission_id: request.submission_id,
        message: format!(
            "{} decision(s) recorded for submission {}",
            infos.len(),
            request.submission_id
        ),
        decisions: infos,
    })
}

/// Finalizes the approval packet for a submission.
///
/// Writes the packet and moves the submission to the status the
/// decision imposes in one transaction. When the decision is
/// `approved`, the approved line-id set is checked against the lines
/// whose effective decision is a human approve; a mismatch is logged as
/// a warning, never rejected — the aggregate packet governs the
/// workflow gate.
///
/// # Errors
///
/// Returns an error if:
/// - The submission does not exist
/// - The decision string is invalid
/// - A packet was already finalized for the submission
pub fn finalize_approval(
    persistence: &mut Persistence,
    request: FinalizeApprovalRequest,
    actor: &Actor,
) -> Result<ApiOutcome<FinalizeApprovalResponse>, ApiError> {
    let decision: OverallDecision =
        OverallDecision::from_str(&request.decision).map_err(translate_domain_error)?;
    let new_status: SubmissionStatus = submission_status_for(decision);

    let submission: EstimateSubmission = persistence
        .get_submission(request.submission_id)
        .map_err(translate_persistence_error)?;

    if decision == OverallDecision::Approved {
        let grouped: Vec<(i64, Vec<LineDecision>)> = persistence
            .decisions_for_submission(submission.submission_id)
            .map_err(translate_persistence_error)?;
        let omitted: Vec<i64> = omitted_human_approvals(&grouped, &request.approved_line_ids);
        if !omitted.is_empty() {
            tracing::warn!(
                submission_id = submission.submission_id,
                omitted_line_ids = ?omitted,
                "Approval packet omits lines with a human approve decision"
            );
        }
    }

    let now: String = now_rfc3339();
    let packet: ApprovalPacket = persistence
        .insert_packet(
            submission.submission_id,
            decision,
            &request.approved_line_ids,
            request.notes.as_deref(),
            &actor.id,
            &now,
            new_status,
        )
        .map_err(translate_persistence_error)?;

    tracing::info!(
        submission_id = submission.submission_id,
        packet_id = packet.packet_id,
        decision = %decision,
        "Approval packet finalized"
    );

    let notification: Notification = Notification::new(
        submission.event_id,
        String::from("approval_finalized"),
        serde_json::json!({
            "submission_id": submission.submission_id,
            "packet_id": packet.packet_id,
            "decision": decision.as_str(),
        }),
    );

    Ok(ApiOutcome {
        response: FinalizeApprovalResponse {
            packet_id: packet.packet_id,
            submission_id: submission.submission_id,
            decision: decision.to_string(),
            submission_status: new_status.to_string(),
            approved_line_ids: packet.approved_line_ids,
            message: format!(
                "Submission {} finalized as '{}'",
                submission.submission_id, decision
            ),
        },
        notifications: vec![notification],
    })
}

/// Returns an event's complete ledger in chronological order.
///
/// # Errors
///
/// Returns an error if the event does not exist.
pub fn list_history(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<ListHistoryResponse, ApiError> {
    let entries = persistence
        .history_for_event(event_id)
        .map_err(translate_persistence_error)?;

    Ok(ListHistoryResponse {
        event_id,
        entries: entries.iter().map(HistoryEntryInfo::from).collect(),
    })
}

/// Retrieves a shopping event by internal id.
///
/// # Errors
///
/// Returns an error if the event does not exist.
pub fn get_event(persistence: &mut Persistence, event_id: i64) -> Result<EventInfo, ApiError> {
    let event: ShoppingEvent = persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?;
    Ok(EventInfo::from(&event))
}

/// Retrieves the highest-version estimate submission for an event.
///
/// Returns `None` when no estimate has been submitted yet.
///
/// # Errors
///
/// Returns an error if the event does not exist or the query fails.
pub fn get_latest_submission(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<Option<SubmissionInfo>, ApiError> {
    // Distinguish "no submissions" from "no such event".
    persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?;

    let latest: Option<EstimateSubmission> = persistence
        .latest_submission(event_id)
        .map_err(translate_persistence_error)?;
    Ok(latest.as_ref().map(SubmissionInfo::from))
}

/// Retrieves a line's full decision history plus its derived effective
/// decision and override flag.
///
/// # Errors
///
/// Returns an error if the line does not exist.
pub fn list_decisions(
    persistence: &mut Persistence,
    line_id: i64,
) -> Result<ListDecisionsResponse, ApiError> {
    let decisions: Vec<LineDecision> = persistence
        .decisions_for_line(line_id)
        .map_err(translate_persistence_error)?;

    Ok(ListDecisionsResponse {
        line_id,
        effective_decision_id: effective_decision(&decisions).map(|d| d.decision_id),
        is_override: is_override(&decisions),
        decisions: decisions.iter().map(DecisionInfo::from).collect(),
    })
}
