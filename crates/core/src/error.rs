// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shop_event_domain::{DomainError, EventState};

/// Errors that can occur while applying a workflow command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The requested state is not a valid successor of the current state.
    InvalidTransition {
        /// The current state.
        from: EventState,
        /// The requested state.
        to: EventState,
    },
    /// The transition is structurally valid but a business precondition
    /// is unmet.
    GateNotSatisfied {
        /// The unmet condition, phrased for the caller.
        condition: String,
    },
    /// A domain validation rule was violated.
    DomainViolation(DomainError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { from, to } => {
                write!(f, "Invalid transition from '{from}' to '{to}'")
            }
            Self::GateNotSatisfied { condition } => {
                write!(f, "Gate not satisfied: {condition}")
            }
            Self::DomainViolation(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
