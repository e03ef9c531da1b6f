// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Shopping Event Workflow Engine.
//!
//! Handlers translate request DTOs into core commands, apply them
//! against persistence, and translate every lower-layer error into the
//! [`ApiError`] contract. External systems are reached only through the
//! collaborator traits in [`collaborators`] and [`notify`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod collaborators;
mod error;
mod handlers;
mod notify;
mod request_response;

#[cfg(test)]
mod tests;

pub use collaborators::{
    AcceptAllCars, AcceptAllShops, CarRegistry, ShopDirectory, StaticCarRegistry,
    StaticShopDirectory,
};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    ApiOutcome, cancel_event, create_event, finalize_approval, get_event, get_latest_submission,
    list_decisions, list_history, record_decisions, request_transition, submit_estimate,
};
pub use notify::{
    Notification, NotificationSink, NotifyError, NullNotificationSink, dispatch_notifications,
};
pub use request_response::{
    CancelEventRequest, CancelEventResponse, CreateEventRequest, CreateEventResponse,
    DecisionInfo, DecisionInput, EstimateLineInfo, EstimateLineInput, EventInfo,
    FinalizeApprovalRequest, FinalizeApprovalResponse, HistoryEntryInfo, ListDecisionsResponse,
    ListHistoryResponse, RecordDecisionsRequest, RecordDecisionsResponse,
    RecordedDecisionInfo, SideEffectInfo, SubmissionInfo, SubmitEstimateRequest,
    SubmitEstimateResponse, TransitionRequest, TransitionResponse,
};
