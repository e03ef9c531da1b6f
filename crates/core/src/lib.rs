// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure workflow logic for the Shopping Event Workflow Engine.
//!
//! This crate performs no I/O. Callers load the current event and the
//! estimate state the gates need, call [`apply`], and commit the
//! resulting event and ledger entry atomically.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod packet;
mod transition;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{TransitionResult, apply, creation_entry};
pub use command::Command;
pub use error::CoreError;
pub use packet::{omitted_human_approvals, submission_status_for};
pub use transition::{GateContext, SubmissionSummary, evaluate_gate};
