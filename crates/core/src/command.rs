// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shop_event_domain::EventState;

/// A workflow command against one shopping event.
///
/// Commands are applied through [`crate::apply`]; each successful
/// application yields a new event value and exactly one ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request a transition to a target state.
    Transition {
        /// The requested state.
        to: EventState,
        /// Free-text notes recorded in the ledger.
        notes: Option<String>,
    },
    /// Cancel the event. Irreversible, allowed from any non-terminal
    /// state, requires a non-empty reason.
    Cancel {
        /// The stated cancellation reason.
        reason: String,
    },
}
