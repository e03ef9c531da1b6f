// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These DTOs are distinct from domain types and represent the API
//! contract. Enum-valued fields travel as their snake_case string forms
//! and are parsed at the boundary.

use rust_decimal::Decimal;
use shop_event_audit::{HistoryEntry, SideEffect};
use shop_event_domain::{EstimateLine, EstimateSubmission, LineDecision, ShoppingEvent};

/// API request to create a new shopping event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateEventRequest {
    /// The car to shop (reporting mark plus number).
    pub car_number: String,
    /// The shop handling the repair.
    pub shop_code: String,
    /// Event type classification code.
    pub type_code: String,
    /// Optional reason code.
    pub reason_code: Option<String>,
}

/// API response for a successful event creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateEventResponse {
    /// The internal event identifier.
    pub event_id: i64,
    /// The assigned human-readable event number.
    pub event_number: String,
    /// The initial workflow state (`requested`).
    pub state: String,
    /// The initial version counter.
    pub version: i64,
    /// A success message.
    pub message: String,
}

/// API request to move an event to a new workflow state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionRequest {
    /// The event to transition.
    pub event_id: i64,
    /// The requested state, in string form.
    pub target_state: String,
    /// The version the caller read before deciding to transition.
    pub expected_version: i64,
    /// Free-text notes recorded in the ledger.
    pub notes: Option<String>,
}

/// API response for a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionResponse {
    /// The transitioned event.
    pub event_id: i64,
    /// The state before the transition.
    pub from_state: String,
    /// The state after the transition.
    pub to_state: String,
    /// The new version counter.
    pub version: i64,
    /// Side-effect markers recorded alongside the transition.
    pub side_effects: Vec<SideEffectInfo>,
    /// A success message.
    pub message: String,
}

/// API request to cancel an event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelEventRequest {
    /// The event to cancel.
    pub event_id: i64,
    /// The stated reason. Must be non-empty.
    pub reason: String,
    /// The version the caller read before deciding to cancel.
    pub expected_version: i64,
}

/// API response for a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelEventResponse {
    /// The cancelled event.
    pub event_id: i64,
    /// The terminal state (`cancelled`).
    pub state: String,
    /// The new version counter.
    pub version: i64,
    /// When the cancellation was recorded (RFC 3339).
    pub cancelled_at: String,
    /// A success message.
    pub message: String,
}

/// Input form of one estimate line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EstimateLineInput {
    /// Task classification code.
    pub task_code: String,
    /// Free-text description of the repair task.
    pub description: String,
    /// Estimated labor hours.
    pub labor_hours: Decimal,
    /// Estimated material cost.
    pub material_cost: Decimal,
    /// Total line cost as supplied by the estimation source.
    pub total_cost: Decimal,
}

/// API request to submit a new estimate version for an event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitEstimateRequest {
    /// The owning event.
    pub event_id: i64,
    /// Estimate lines in submission order.
    pub lines: Vec<EstimateLineInput>,
}

/// API response for a successful estimate submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitEstimateResponse {
    /// The stored submission.
    pub submission: SubmissionInfo,
    /// A success message.
    pub message: String,
}

/// Input form of one line decision.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecisionInput {
    /// The estimate line being decided.
    pub line_id: i64,
    /// The decision source (`automated` or `human`).
    pub source: String,
    /// Confidence in [0, 1]; required for `automated`, rejected for
    /// `human`.
    pub confidence: Option<Decimal>,
    /// The verdict (`approve`, `review`, `reject`).
    pub verdict: String,
    /// The cost responsibility (`lessor`, `customer`, `unknown`).
    pub responsibility: String,
    /// Classification of the justification.
    pub basis_type: String,
    /// Pointer to the justification.
    pub basis_reference: String,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// API request to record decisions on the lines of a submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordDecisionsRequest {
    /// The submission the decided lines belong to.
    pub submission_id: i64,
    /// Decisions in input order.
    pub decisions: Vec<DecisionInput>,
}

/// One recorded decision, with its derived override flag.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordedDecisionInfo {
    /// The assigned decision identifier.
    pub decision_id: i64,
    /// The decided line.
    pub line_id: i64,
    /// The decision source.
    pub source: String,
    /// Confidence score, for automated decisions.
    pub confidence: Option<Decimal>,
    /// The verdict.
    pub verdict: String,
    /// The cost responsibility.
    pub responsibility: String,
    /// True when the line's latest human and automated decisions
    /// disagree on verdict or responsibility.
    pub is_override: bool,
    /// When the decision was recorded (RFC 3339).
    pub decided_at: String,
}

/// API response for recorded decisions, in input order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordDecisionsResponse {
    /// The submission the decisions were recorded against.
    pub submission_id: i64,
    /// The recorded decisions, in input order.
    pub decisions: Vec<RecordedDecisionInfo>,
    /// A success message.
    pub message: String,
}

/// API request to finalize the approval packet for a submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FinalizeApprovalRequest {
    /// The submission under review.
    pub submission_id: i64,
    /// The overall decision (`approved`, `changes_required`,
    /// `rejected`).
    pub decision: String,
    /// Line ids the reviewer explicitly approved.
    pub approved_line_ids: Vec<i64>,
    /// Free-text reviewer notes.
    pub notes: Option<String>,
}

/// API response for a finalized approval packet.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FinalizeApprovalResponse {
    /// The assigned packet identifier.
    pub packet_id: i64,
    /// The finalized submission.
    pub submission_id: i64,
    /// The overall decision.
    pub decision: String,
    /// The submission status the packet imposed.
    pub submission_status: String,
    /// Line ids the reviewer explicitly approved.
    pub approved_line_ids: Vec<i64>,
    /// A success message.
    pub message: String,
}

/// A side-effect marker in wire form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SideEffectInfo {
    /// Machine-readable side-effect kind.
    pub kind: String,
    /// Human-readable detail.
    pub detail: String,
}

impl From<&SideEffect> for SideEffectInfo {
    fn from(effect: &SideEffect) -> Self {
        Self {
            kind: effect.kind.clone(),
            detail: effect.detail.clone(),
        }
    }
}

/// One ledger entry in wire form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntryInfo {
    /// The state before the transition; absent for the creation entry.
    pub from_state: Option<String>,
    /// The state after the transition.
    pub to_state: String,
    /// The acting operator's identifier.
    pub actor_id: String,
    /// The acting operator's display name.
    pub actor_display_name: String,
    /// When the transition occurred (RFC 3339).
    pub occurred_at: String,
    /// Free-text notes supplied with the transition.
    pub notes: Option<String>,
    /// Side-effect markers recorded alongside the transition.
    pub side_effects: Vec<SideEffectInfo>,
}

impl From<&HistoryEntry> for HistoryEntryInfo {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            from_state: entry.from_state.map(|s| s.to_string()),
            to_state: entry.to_state.to_string(),
            actor_id: entry.actor.id.clone(),
            actor_display_name: entry.actor.display_name.clone(),
            occurred_at: entry.occurred_at.clone(),
            notes: entry.notes.clone(),
            side_effects: entry.side_effects.iter().map(SideEffectInfo::from).collect(),
        }
    }
}

/// API response for an event's complete history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListHistoryResponse {
    /// The event the history belongs to.
    pub event_id: i64,
    /// The ledger entries in chronological order.
    pub entries: Vec<HistoryEntryInfo>,
}

/// A shopping event in wire form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventInfo {
    /// Internal identifier.
    pub event_id: i64,
    /// Human-readable event number.
    pub event_number: String,
    /// The car being shopped.
    pub car_number: String,
    /// The shop handling the repair.
    pub shop_code: String,
    /// Event type classification code.
    pub type_code: String,
    /// Optional reason code.
    pub reason_code: Option<String>,
    /// Current workflow state.
    pub state: String,
    /// Optimistic-concurrency version counter.
    pub version: i64,
    /// The actor who created the event.
    pub created_by: String,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// When the event was cancelled, if it was.
    pub cancelled_at: Option<String>,
    /// Who cancelled the event, if it was.
    pub cancelled_by: Option<String>,
    /// Why the event was cancelled, if it was.
    pub cancellation_reason: Option<String>,
}

impl From<&ShoppingEvent> for EventInfo {
    fn from(event: &ShoppingEvent) -> Self {
        Self {
            event_id: event.event_id,
            event_number: event.event_number.value().to_string(),
            car_number: event.car_number.value().to_string(),
            shop_code: event.shop_code.value().to_string(),
            type_code: event.type_code.clone(),
            reason_code: event.reason_code.clone(),
            state: event.state.to_string(),
            version: event.version,
            created_by: event.created_by.clone(),
            created_at: event.created_at.clone(),
            cancelled_at: event.cancellation.as_ref().map(|c| c.cancelled_at.clone()),
            cancelled_by: event.cancellation.as_ref().map(|c| c.cancelled_by.clone()),
            cancellation_reason: event.cancellation.as_ref().map(|c| c.reason.clone()),
        }
    }
}

/// One estimate line in wire form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EstimateLineInfo {
    /// Internal identifier.
    pub line_id: i64,
    /// 1-based position within the submission.
    pub line_number: i32,
    /// Task classification code.
    pub task_code: String,
    /// Free-text description.
    pub description: String,
    /// Estimated labor hours.
    pub labor_hours: Decimal,
    /// Estimated material cost.
    pub material_cost: Decimal,
    /// Total line cost.
    pub total_cost: Decimal,
}

impl From<&EstimateLine> for EstimateLineInfo {
    fn from(line: &EstimateLine) -> Self {
        Self {
            line_id: line.line_id,
            line_number: line.line_number,
            task_code: line.task_code.clone(),
            description: line.description.clone(),
            labor_hours: line.labor_hours,
            material_cost: line.material_cost,
            total_cost: line.total_cost,
        }
    }
}

/// An estimate submission in wire form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmissionInfo {
    /// Internal identifier.
    pub submission_id: i64,
    /// The owning event.
    pub event_id: i64,
    /// Submission version (1, 2, …).
    pub version: i32,
    /// Current review status.
    pub status: String,
    /// True for final-tagged submissions.
    pub is_final: bool,
    /// Sum of line labor hours.
    pub labor_hours_total: Decimal,
    /// Sum of line material costs.
    pub material_cost_total: Decimal,
    /// Sum of line total costs.
    pub total_cost: Decimal,
    /// The actor who submitted the estimate.
    pub submitted_by: String,
    /// Submission time (RFC 3339).
    pub submitted_at: String,
    /// Lines in line-number order.
    pub lines: Vec<EstimateLineInfo>,
}

impl From<&EstimateSubmission> for SubmissionInfo {
    fn from(submission: &EstimateSubmission) -> Self {
        Self {
            submission_id: submission.submission_id,
            event_id: submission.event_id,
            version: submission.version,
            status: submission.status.to_string(),
            is_final: submission.is_final,
            labor_hours_total: submission.labor_hours_total,
            material_cost_total: submission.material_cost_total,
            total_cost: submission.total_cost,
            submitted_by: submission.submitted_by.clone(),
            submitted_at: submission.submitted_at.clone(),
            lines: submission.lines.iter().map(EstimateLineInfo::from).collect(),
        }
    }
}

/// One stored line decision in wire form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecisionInfo {
    /// Internal identifier.
    pub decision_id: i64,
    /// The decided line.
    pub line_id: i64,
    /// The decision source.
    pub source: String,
    /// Confidence score, for automated decisions.
    pub confidence: Option<Decimal>,
    /// The verdict.
    pub verdict: String,
    /// The cost responsibility.
    pub responsibility: String,
    /// Classification of the justification.
    pub basis_type: String,
    /// Pointer to the justification.
    pub basis_reference: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// The deciding actor.
    pub decided_by: String,
    /// Decision time (RFC 3339).
    pub decided_at: String,
}

impl From<&LineDecision> for DecisionInfo {
    fn from(decision: &LineDecision) -> Self {
        Self {
            decision_id: decision.decision_id,
            line_id: decision.line_id,
            source: decision.source.as_str().to_string(),
            confidence: decision.source.confidence(),
            verdict: decision.verdict.to_string(),
            responsibility: decision.responsibility.to_string(),
            basis_type: decision.basis_type.clone(),
            basis_reference: decision.basis_reference.clone(),
            notes: decision.notes.clone(),
            decided_by: decision.decided_by.clone(),
            decided_at: decision.decided_at.clone(),
        }
    }
}

/// API response for a line's decision history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListDecisionsResponse {
    /// The line the decisions belong to.
    pub line_id: i64,
    /// All recorded decisions, oldest first.
    pub decisions: Vec<DecisionInfo>,
    /// The id of the effective decision, if the line is decided.
    pub effective_decision_id: Option<i64>,
    /// True when the line is overridden.
    pub is_override: bool,
}

