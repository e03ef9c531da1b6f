// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The event state string is not a member of the workflow enum.
    InvalidEventState {
        /// The unrecognized state string.
        state: String,
    },
    /// The requested state is not a valid successor of the current state.
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// The submission status string is not recognized.
    InvalidSubmissionStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// The decision verdict string is not recognized.
    InvalidVerdict {
        /// The unrecognized verdict string.
        verdict: String,
    },
    /// The cost-responsibility string is not recognized.
    InvalidResponsibility {
        /// The unrecognized responsibility string.
        responsibility: String,
    },
    /// The decision source string is not recognized.
    InvalidDecisionSource {
        /// The unrecognized source string.
        source: String,
    },
    /// An automated decision's confidence is outside [0, 1].
    ConfidenceOutOfRange {
        /// The out-of-range value.
        value: Decimal,
    },
    /// An automated decision is missing its confidence score.
    ConfidenceMissing,
    /// A human decision carries a confidence score.
    ConfidenceNotAllowed,
    /// The overall approval decision string is not recognized.
    InvalidOverallDecision {
        /// The unrecognized decision string.
        decision: String,
    },
    /// Car number is empty or malformed.
    InvalidCarNumber(String),
    /// Shop code is empty or malformed.
    InvalidShopCode(String),
    /// Event type code is empty or malformed.
    InvalidTypeCode(String),
    /// Cancellation requires a non-empty reason.
    EmptyCancellationReason,
    /// An estimate submission must contain at least one line.
    EmptyEstimate,
    /// An estimate line has an empty task classification code.
    EmptyTaskCode {
        /// The 1-based line number.
        line_number: usize,
    },
    /// An estimate line carries a negative value.
    NegativeLineValue {
        /// The 1-based line number.
        line_number: usize,
        /// The offending field name.
        field: &'static str,
        /// The negative value supplied.
        value: Decimal,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEventState { state } => {
                write!(f, "Invalid event state: '{state}'")
            }
            Self::InvalidStateTransition { from, to, reason } => {
                write!(f, "Invalid transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidSubmissionStatus { status } => {
                write!(f, "Invalid submission status: '{status}'")
            }
            Self::InvalidVerdict { verdict } => {
                write!(f, "Invalid decision verdict: '{verdict}'")
            }
            Self::InvalidResponsibility { responsibility } => {
                write!(f, "Invalid cost responsibility: '{responsibility}'")
            }
            Self::InvalidDecisionSource { source } => {
                write!(f, "Invalid decision source: '{source}'")
            }
            Self::ConfidenceOutOfRange { value } => {
                write!(f, "Confidence {value} is outside the range [0, 1]")
            }
            Self::ConfidenceMissing => {
                write!(f, "Automated decisions require a confidence score")
            }
            Self::ConfidenceNotAllowed => {
                write!(f, "Human decisions must not carry a confidence score")
            }
            Self::InvalidOverallDecision { decision } => {
                write!(f, "Invalid overall approval decision: '{decision}'")
            }
            Self::InvalidCarNumber(msg) => write!(f, "Invalid car number: {msg}"),
            Self::InvalidShopCode(msg) => write!(f, "Invalid shop code: {msg}"),
            Self::InvalidTypeCode(msg) => write!(f, "Invalid event type code: {msg}"),
            Self::EmptyCancellationReason => {
                write!(f, "Cancellation requires a non-empty reason")
            }
            Self::EmptyEstimate => {
                write!(f, "An estimate submission must contain at least one line")
            }
            Self::EmptyTaskCode { line_number } => {
                write!(f, "Estimate line {line_number} has an empty task code")
            }
            Self::NegativeLineValue {
                line_number,
                field,
                value,
            } => {
                write!(
                    f,
                    "Estimate line {line_number} has a negative {field}: {value}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
