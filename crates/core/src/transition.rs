// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Gate predicates for business-rule-guarded transitions.
//!
//! Structural adjacency lives on the domain state enum; this module
//! holds the business-rule gates layered on top of it. Gates are
//! evaluated before adjacency so that a caller attempting to enter a
//! gated state early learns the unmet business condition, not a bare
//! adjacency error.

use crate::error::CoreError;
use shop_event_domain::{EventState, SubmissionStatus};

/// The slice of an estimate submission a gate needs to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    /// The submission version.
    pub version: i32,
    /// The current review status.
    pub status: SubmissionStatus,
    /// True for submissions tagged as final estimates.
    pub is_final: bool,
}

/// Read-only estimate state consulted by gate predicates.
///
/// Built by the caller from the estimate store before applying a
/// command; the core never performs I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateContext {
    /// The highest-version submission for the event, if any.
    pub latest_submission: Option<SubmissionSummary>,
    /// The highest-version submission tagged final, if any.
    pub latest_final_submission: Option<SubmissionSummary>,
}

impl GateContext {
    /// A context with no submissions; useful for early-lifecycle
    /// transitions and tests.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            latest_submission: None,
            latest_final_submission: None,
        }
    }
}

/// Evaluates the gate predicate for entering `target`, if one exists.
///
/// The two load-bearing gates:
/// - `WorkAuthorized` requires the latest estimate submission to be
///   approved;
/// - `FinalEstimateApproved` requires the latest final-tagged submission
///   to be approved.
///
/// All other states carry no gate.
///
/// # Errors
///
/// Returns `CoreError::GateNotSatisfied` with the unmet condition.
pub fn evaluate_gate(target: EventState, ctx: &GateContext) -> Result<(), CoreError> {
    match target {
        EventState::WorkAuthorized => match ctx.latest_submission {
            Some(submission) if submission.status == SubmissionStatus::Approved => Ok(()),
            Some(submission) => Err(CoreError::GateNotSatisfied {
                condition: format!(
                    "no approved estimate: latest submission (version {}) has status '{}'",
                    submission.version, submission.status
                ),
            }),
            None => Err(CoreError::GateNotSatisfied {
                condition: "no approved estimate: no estimate has been submitted".to_string(),
            }),
        },
        EventState::FinalEstimateApproved => match ctx.latest_final_submission {
            Some(submission) if submission.status == SubmissionStatus::Approved => Ok(()),
            Some(submission) => Err(CoreError::GateNotSatisfied {
                condition: format!(
                    "no approved final estimate: latest final submission (version {}) has status '{}'",
                    submission.version, submission.status
                ),
            }),
            None => Err(CoreError::GateNotSatisfied {
                condition: "no approved final estimate: no final estimate has been submitted"
                    .to_string(),
            }),
        },
        _ => Ok(()),
    }
}
