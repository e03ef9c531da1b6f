// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for the Shopping Event Workflow
//! Engine.
//!
//! This crate is pure: no I/O, no persistence, no transport. It defines
//! the workflow state enum, estimate and decision types, identifier
//! newtypes, and the validation rules the rest of the system builds on.

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

mod clock;
mod decision;
mod error;
mod estimate;
mod state;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use clock::now_rfc3339;
pub use decision::{
    DecisionSource, LineDecision, Responsibility, Verdict, effective_decision, is_override,
    latest_by_source,
};
pub use error::DomainError;
pub use estimate::{
    ApprovalPacket, EstimateLine, EstimateSubmission, NewEstimateLine, OverallDecision,
    SubmissionStatus,
};
pub use state::{ALL_STATES, EventState};
pub use types::{Cancellation, CarNumber, EventNumber, ShopCode, ShoppingEvent};
pub use validation::{
    aggregate_totals, validate_cancellation_reason, validate_car_number, validate_estimate_lines,
    validate_shop_code, validate_type_code,
};
