// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval packet finalization rules.
//!
//! The packet is the authoritative record for the estimate gates: its
//! overall decision drives the submission status, and the gates read
//! that status. Per-line decision state is advisory; a mismatch between
//! the packet and the line decisions is surfaced to the caller as a
//! warning, never an error.

use shop_event_domain::{LineDecision, OverallDecision, SubmissionStatus, effective_decision};

/// Maps a packet's overall decision to the submission status it imposes.
#[must_use]
pub const fn submission_status_for(decision: OverallDecision) -> SubmissionStatus {
    match decision {
        OverallDecision::Approved => SubmissionStatus::Approved,
        OverallDecision::ChangesRequired => SubmissionStatus::ChangesRequired,
        OverallDecision::Rejected => SubmissionStatus::Rejected,
    }
}

/// Returns the ids of lines whose effective decision is a human approval
/// but which the packet's approved-line list omits.
///
/// `line_decisions` pairs each line id with all decisions recorded for
/// it. The result preserves the input line order.
#[must_use]
pub fn omitted_human_approvals(
    line_decisions: &[(i64, Vec<LineDecision>)],
    approved_line_ids: &[i64],
) -> Vec<i64> {
    line_decisions
        .iter()
        .filter(|(line_id, decisions)| {
            if approved_line_ids.contains(line_id) {
                return false;
            }
            effective_decision(decisions).is_some_and(|decision| {
                decision.source.is_human()
                    && decision.verdict == shop_event_domain::Verdict::Approve
            })
        })
        .map(|(line_id, _)| *line_id)
        .collect()
}
