// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shop_event::CoreError;
use shop_event_domain::DomainError;
use shop_event_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core/persistence errors and represent
/// the API contract. `ConcurrentModification` is the only class callers
/// should retry, after re-reading the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The requested state is not a valid successor of the current state.
    InvalidTransition {
        /// The event's current state.
        current: String,
        /// The requested state.
        requested: String,
    },
    /// The transition is structurally valid but a business precondition
    /// is unmet.
    GateNotSatisfied {
        /// The unmet condition, phrased for the caller.
        condition: String,
    },
    /// The event changed between the caller's read and this write.
    ConcurrentModification {
        /// The contended event.
        event_id: i64,
        /// The version the caller acted against.
        expected_version: i64,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidTransition { current, requested } => {
                write!(f, "Invalid transition from '{current}' to '{requested}'")
            }
            Self::GateNotSatisfied { condition } => {
                write!(f, "Gate not satisfied: {condition}")
            }
            Self::ConcurrentModification {
                event_id,
                expected_version,
            } => {
                write!(
                    f,
                    "Event {event_id} was modified concurrently (expected version {expected_version}); re-read and retry"
                )
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEventState { state } => ApiError::InvalidInput {
            field: String::from("state"),
            message: format!("'{state}' is not a workflow state"),
        },
        DomainError::InvalidStateTransition { from, to, .. } => ApiError::InvalidTransition {
            current: from,
            requested: to,
        },
        DomainError::InvalidSubmissionStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("'{status}' is not a submission status"),
        },
        DomainError::InvalidVerdict { verdict } => ApiError::InvalidInput {
            field: String::from("verdict"),
            message: format!("'{verdict}' is not a decision verdict"),
        },
        DomainError::InvalidResponsibility { responsibility } => ApiError::InvalidInput {
            field: String::from("responsibility"),
            message: format!("'{responsibility}' is not a cost responsibility"),
        },
        DomainError::InvalidDecisionSource { source } => ApiError::InvalidInput {
            field: String::from("source"),
            message: format!("'{source}' is not a decision source"),
        },
        DomainError::ConfidenceOutOfRange { value } => ApiError::InvalidInput {
            field: String::from("confidence"),
            message: format!("Confidence {value} is outside the range [0, 1]"),
        },
        DomainError::ConfidenceMissing => ApiError::InvalidInput {
            field: String::from("confidence"),
            message: String::from("Automated decisions require a confidence score"),
        },
        DomainError::ConfidenceNotAllowed => ApiError::InvalidInput {
            field: String::from("confidence"),
            message: String::from("Human decisions must not carry a confidence score"),
        },
        DomainError::InvalidOverallDecision { decision } => ApiError::InvalidInput {
            field: String::from("decision"),
            message: format!("'{decision}' is not an overall approval decision"),
        },
        DomainError::InvalidCarNumber(msg) => ApiError::InvalidInput {
            field: String::from("car_number"),
            message: msg,
        },
        DomainError::InvalidShopCode(msg) => ApiError::InvalidInput {
            field: String::from("shop_code"),
            message: msg,
        },
        DomainError::InvalidTypeCode(msg) => ApiError::InvalidInput {
            field: String::from("type_code"),
            message: msg,
        },
        DomainError::EmptyCancellationReason => ApiError::InvalidInput {
            field: String::from("reason"),
            message: String::from("Cancellation requires a non-empty reason"),
        },
        DomainError::EmptyEstimate => ApiError::InvalidInput {
            field: String::from("lines"),
            message: String::from("An estimate submission must contain at least one line"),
        },
        DomainError::EmptyTaskCode { line_number } => ApiError::InvalidInput {
            field: String::from("task_code"),
            message: format!("Estimate line {line_number} has an empty task code"),
        },
        DomainError::NegativeLineValue {
            line_number,
            field,
            value,
        } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Estimate line {line_number} has a negative {field}: {value}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::InvalidTransition { from, to } => ApiError::InvalidTransition {
            current: from.to_string(),
            requested: to.to_string(),
        },
        CoreError::GateNotSatisfied { condition } => ApiError::GateNotSatisfied { condition },
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Missing-row classes become `ResourceNotFound`; the compare-and-swap
/// failure becomes `ConcurrentModification`; everything else is
/// internal and never leaks storage detail to the caller.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Shopping event"),
            message: format!("Shopping event {event_id} does not exist"),
        },
        PersistenceError::EventNumberNotFound(event_number) => ApiError::ResourceNotFound {
            resource_type: String::from("Shopping event"),
            message: format!("No shopping event carries the number '{event_number}'"),
        },
        PersistenceError::SubmissionNotFound(submission_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Estimate submission"),
            message: format!("Estimate submission {submission_id} does not exist"),
        },
        PersistenceError::LineNotFound(line_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Estimate line"),
            message: format!("Estimate line {line_id} does not exist"),
        },
        PersistenceError::PacketAlreadyFinalized { submission_id } => {
            ApiError::DomainRuleViolation {
                rule: String::from("single_approval_packet"),
                message: format!(
                    "Submission {submission_id} already has a finalized approval packet"
                ),
            }
        }
        PersistenceError::ConcurrentModification {
            event_id,
            expected_version,
        } => ApiError::ConcurrentModification {
            event_id,
            expected_version,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
