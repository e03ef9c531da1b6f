// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Estimate submissions, lines, and approval packets.
//!
//! An event accumulates versioned estimate submissions (1, 2, …); each
//! submission owns an ordered sequence of immutable lines. Corrections
//! happen through new submission versions, never through edits.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Review status of an estimate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Submitted, awaiting review.
    Submitted,
    /// A reviewer has picked it up.
    UnderReview,
    /// Approved by the reviewer.
    Approved,
    /// The reviewer requested changes; a new version is expected.
    ChangesRequired,
    /// Rejected outright.
    Rejected,
}

impl SubmissionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::ChangesRequired => "changes_required",
            Self::Rejected => "rejected",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "changes_required" => Ok(Self::ChangesRequired),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidSubmissionStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The aggregated verdict a reviewer records for a whole submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallDecision {
    /// The submission is approved as a whole.
    Approved,
    /// Changes are required; a new version is expected.
    ChangesRequired,
    /// The submission is rejected.
    Rejected,
}

impl OverallDecision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::ChangesRequired => "changes_required",
            Self::Rejected => "rejected",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "approved" => Ok(Self::Approved),
            "changes_required" => Ok(Self::ChangesRequired),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidOverallDecision {
                decision: s.to_string(),
            }),
        }
    }
}

impl FromStr for OverallDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for OverallDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One repair-task cost row within a submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateLine {
    /// Internal identifier.
    pub line_id: i64,
    /// 1-based position within the submission.
    pub line_number: i32,
    /// Task classification code (e.g. an AAR job code).
    pub task_code: String,
    /// Free-text description of the repair task.
    pub description: String,
    /// Estimated labor hours.
    pub labor_hours: Decimal,
    /// Estimated material cost.
    pub material_cost: Decimal,
    /// Total line cost as supplied by the estimation source.
    ///
    /// Treated as authoritative input; validated non-negative but never
    /// recomputed from labor and material.
    pub total_cost: Decimal,
}

/// Input form of an estimate line, before a line number is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEstimateLine {
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

/// A versioned cost proposal tied to one shopping event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateSubmission {
    /// Internal identifier.
    pub submission_id: i64,
    /// The owning shopping event.
    pub event_id: i64,
    /// Monotonically increasing version (1, 2, …), never reused.
    pub version: i32,
    /// Current review status.
    pub status: SubmissionStatus,
    /// True for submissions tagged as final estimates (submitted after
    /// QA completion by convention).
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
    pub lines: Vec<EstimateLine>,
}

/// The aggregated verdict for an entire estimate submission.
///
/// At most one packet exists per submission; repeated review rounds
/// create new submission versions, not new packets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalPacket {
    /// Internal identifier.
    pub packet_id: i64,
    /// The finalized submission.
    pub submission_id: i64,
    /// The overall decision.
    pub decision: OverallDecision,
    /// Line ids the reviewer explicitly approved.
    pub approved_line_ids: Vec<i64>,
    /// Free-text reviewer notes.
    pub notes: Option<String>,
    /// The reviewer who finalized the packet.
    pub decided_by: String,
    /// Finalization time (RFC 3339).
    pub decided_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_status_round_trip() {
        let statuses = vec![
            SubmissionStatus::Submitted,
            SubmissionStatus::UnderReview,
            SubmissionStatus::Approved,
            SubmissionStatus::ChangesRequired,
            SubmissionStatus::Rejected,
        ];

        for status in statuses {
            let s = status.as_str();
            match SubmissionStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_submission_status() {
        assert!(SubmissionStatus::parse_str("pending").is_err());
    }

    #[test]
    fn test_overall_decision_round_trip() {
        let decisions = vec![
            OverallDecision::Approved,
            OverallDecision::ChangesRequired,
            OverallDecision::Rejected,
        ];

        for decision in decisions {
            let s = decision.as_str();
            match OverallDecision::parse_str(s) {
                Ok(parsed) => assert_eq!(decision, parsed),
                Err(e) => panic!("Failed to parse decision string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_overall_decision() {
        assert!(OverallDecision::parse_str("maybe").is_err());
    }
}
