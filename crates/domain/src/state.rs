// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shopping event workflow states and structural transition rules.
//!
//! This module defines the workflow state enum and the strict adjacency
//! rules along the happy path. Business-rule gates (e.g. "an approved
//! estimate must exist") live in the core crate; this module only knows
//! which states border which.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Workflow states for a shopping event, from request to release.
///
/// The happy path runs in declaration order from `Requested` to
/// `Released`. `ChangesRequired` is a review loop back to
/// `EstimateSubmitted`; `Cancelled` is reachable from any non-terminal
/// state. `Released` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    /// A shop visit has been requested for the car.
    Requested,
    /// The event has been assigned to a repair shop.
    AssignedToShop,
    /// The car is en route to the shop.
    Inbound,
    /// The shop is inspecting the car.
    Inspection,
    /// An initial cost estimate has been submitted.
    EstimateSubmitted,
    /// The estimate is being reviewed.
    EstimateUnderReview,
    /// The estimate has been approved.
    EstimateApproved,
    /// Repair work has been authorized.
    WorkAuthorized,
    /// The car is being repaired.
    InRepair,
    /// Quality assurance has signed off on the repair.
    QaComplete,
    /// A final cost estimate has been submitted.
    FinalEstimateSubmitted,
    /// The final estimate has been approved.
    FinalEstimateApproved,
    /// The car is ready to leave the shop.
    ReadyForRelease,
    /// The car has been released. Terminal.
    Released,
    /// The reviewer requested changes to the estimate.
    ChangesRequired,
    /// The event was cancelled. Terminal.
    Cancelled,
}

impl EventState {
    /// Returns the string representation of the state.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::AssignedToShop => "assigned_to_shop",
            Self::Inbound => "inbound",
            Self::Inspection => "inspection",
            Self::EstimateSubmitted => "estimate_submitted",
            Self::EstimateUnderReview => "estimate_under_review",
            Self::EstimateApproved => "estimate_approved",
            Self::WorkAuthorized => "work_authorized",
            Self::InRepair => "in_repair",
            Self::QaComplete => "qa_complete",
            Self::FinalEstimateSubmitted => "final_estimate_submitted",
            Self::FinalEstimateApproved => "final_estimate_approved",
            Self::ReadyForRelease => "ready_for_release",
            Self::Released => "released",
            Self::ChangesRequired => "changes_required",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a state from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEventState` if the string is not a valid state.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "requested" => Ok(Self::Requested),
            "assigned_to_shop" => Ok(Self::AssignedToShop),
            "inbound" => Ok(Self::Inbound),
            "inspection" => Ok(Self::Inspection),
            "estimate_submitted" => Ok(Self::EstimateSubmitted),
            "estimate_under_review" => Ok(Self::EstimateUnderReview),
            "estimate_approved" => Ok(Self::EstimateApproved),
            "work_authorized" => Ok(Self::WorkAuthorized),
            "in_repair" => Ok(Self::InRepair),
            "qa_complete" => Ok(Self::QaComplete),
            "final_estimate_submitted" => Ok(Self::FinalEstimateSubmitted),
            "final_estimate_approved" => Ok(Self::FinalEstimateApproved),
            "ready_for_release" => Ok(Self::ReadyForRelease),
            "released" => Ok(Self::Released),
            "changes_required" => Ok(Self::ChangesRequired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidEventState {
                state: s.to_string(),
            }),
        }
    }

    /// Returns true if this state is terminal (no further transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Cancelled)
    }

    /// Returns the structurally valid successor states of this state.
    ///
    /// Cancellation is deliberately absent: `Cancelled` is reachable from
    /// every non-terminal state, but only through the dedicated cancel
    /// operation, never through a plain transition request.
    #[must_use]
    pub const fn successors(&self) -> &'static [Self] {
        match self {
            Self::Requested => &[Self::AssignedToShop],
            Self::AssignedToShop => &[Self::Inbound],
            Self::Inbound => &[Self::Inspection],
            Self::Inspection => &[Self::EstimateSubmitted],
            Self::EstimateSubmitted => &[Self::EstimateUnderReview],
            Self::EstimateUnderReview => &[Self::EstimateApproved, Self::ChangesRequired],
            Self::EstimateApproved => &[Self::WorkAuthorized],
            Self::WorkAuthorized => &[Self::InRepair],
            Self::InRepair => &[Self::QaComplete],
            Self::QaComplete => &[Self::FinalEstimateSubmitted],
            Self::FinalEstimateSubmitted => &[Self::FinalEstimateApproved],
            Self::FinalEstimateApproved => &[Self::ReadyForRelease],
            Self::ReadyForRelease => &[Self::Released],
            Self::ChangesRequired => &[Self::EstimateSubmitted],
            Self::Released | Self::Cancelled => &[],
        }
    }

    /// Validates that a transition from this state to another is
    /// structurally permitted.
    ///
    /// Skipping ahead or moving backward (other than the
    /// `ChangesRequired` → `EstimateSubmitted` loop) is rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the transition is
    /// not allowed.
    pub fn validate_transition(&self, new_state: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: new_state.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if self.successors().contains(&new_state) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: new_state.as_str().to_string(),
                reason: "transition not permitted by workflow adjacency rules".to_string(),
            })
        }
    }
}

impl FromStr for EventState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All workflow states in declaration order.
///
/// Used by tests to enumerate the state space.
pub const ALL_STATES: [EventState; 16] = [
    EventState::Requested,
    EventState::AssignedToShop,
    EventState::Inbound,
    EventState::Inspection,
    EventState::EstimateSubmitted,
    EventState::EstimateUnderReview,
    EventState::EstimateApproved,
    EventState::WorkAuthorized,
    EventState::InRepair,
    EventState::QaComplete,
    EventState::FinalEstimateSubmitted,
    EventState::FinalEstimateApproved,
    EventState::ReadyForRelease,
    EventState::Released,
    EventState::ChangesRequired,
    EventState::Cancelled,
];
