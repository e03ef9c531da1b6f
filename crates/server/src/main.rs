// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use shop_event_api::{
    AcceptAllCars, AcceptAllShops, ApiError, ApiOutcome, CancelEventRequest, CancelEventResponse,
    CarRegistry, CreateEventRequest, CreateEventResponse, DecisionInput, EstimateLineInput,
    EventInfo, FinalizeApprovalRequest, FinalizeApprovalResponse, ListDecisionsResponse,
    ListHistoryResponse, Notification, NotificationSink, NullNotificationSink,
    RecordDecisionsRequest, RecordDecisionsResponse, ShopDirectory, SubmissionInfo,
    SubmitEstimateRequest, SubmitEstimateResponse, TransitionRequest, TransitionResponse,
    dispatch_notifications,
};
use shop_event_audit::Actor;
use shop_event_persistence::Persistence;

/// Shop Event Server - HTTP server for the shopping event workflow engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex for safe concurrent
/// access; the collaborators are stateless trait objects.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for events, estimates, and decisions.
    persistence: Arc<Mutex<Persistence>>,
    /// The external car registry.
    cars: Arc<dyn CarRegistry + Send + Sync>,
    /// The external shop directory.
    shops: Arc<dyn ShopDirectory + Send + Sync>,
    /// The notification sink for committed operations.
    notifications: Arc<dyn NotificationSink + Send + Sync>,
}

/// API request for creating a shopping event.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateEventApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's display name.
    actor_name: String,
    /// The railcar reporting mark and number.
    car_number: String,
    /// The repair shop code.
    shop_code: String,
    /// The event type code (e.g., "repair").
    type_code: String,
    /// Optional reason code.
    reason_code: Option<String>,
}

/// API request for a workflow state transition.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TransitionApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's display name.
    actor_name: String,
    /// The target workflow state.
    target_state: String,
    /// The event version the caller last read.
    expected_version: i64,
    /// Optional free-text notes for the ledger entry.
    notes: Option<String>,
}

/// API request for cancelling a shopping event.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CancelEventApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's display name.
    actor_name: String,
    /// The cancellation reason.
    reason: String,
    /// The event version the caller last read.
    expected_version: i64,
}

/// API request for submitting an estimate.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SubmitEstimateApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's display name.
    actor_name: String,
    /// The estimate lines.
    lines: Vec<EstimateLineInput>,
}

/// API request for recording a batch of line decisions.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RecordDecisionsApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's display name.
    actor_name: String,
    /// The decisions to record.
    decisions: Vec<DecisionInput>,
}

/// API request for finalizing an approval packet.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct FinalizeApprovalApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The actor's display name.
    actor_name: String,
    /// The overall decision: approved, changes_required, or rejected.
    decision: String,
    /// The line ids covered by an approval.
    approved_line_ids: Vec<i64>,
    /// Optional reviewer notes.
    notes: Option<String>,
}

/// API response for the latest-estimate query.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LatestEstimateApiResponse {
    /// The event ID.
    event_id: i64,
    /// The highest-version submission, if any exists.
    submission: Option<SubmissionInfo>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::InvalidTransition { .. }
            | ApiError::GateNotSatisfied { .. }
            | ApiError::DomainRuleViolation { .. }
            | ApiError::ConcurrentModification { .. } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Builds an `Actor` from the request's identity fields.
fn parse_actor(actor_id: &str, actor_name: &str) -> Result<Actor, HttpError> {
    if actor_id.trim().is_empty() {
        return Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: String::from("actor_id must not be empty"),
        });
    }
    Ok(Actor::new(
        actor_id.trim().to_string(),
        actor_name.trim().to_string(),
    ))
}

/// Dispatches notifications after a committed operation, fire-and-forget.
///
/// Delivery failures are logged by the dispatcher and never affect the
/// HTTP response.
fn spawn_notifications(app_state: &AppState, notifications: Vec<Notification>) {
    if notifications.is_empty() {
        return;
    }
    let sink: Arc<dyn NotificationSink + Send + Sync> = Arc::clone(&app_state.notifications);
    tokio::spawn(async move {
        dispatch_notifications(sink.as_ref(), &notifications);
    });
}

/// Handler for POST `/events` endpoint.
///
/// Creates a new shopping event in the `requested` state.
async fn handle_create_event(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateEventApiRequest>,
) -> Result<Json<CreateEventResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        car_number = %req.car_number,
        shop_code = %req.shop_code,
        "Handling create_event request"
    );

    let actor: Actor = parse_actor(&req.actor_id, &req.actor_name)?;

    let mut persistence = app_state.persistence.lock().await;
    let outcome: ApiOutcome<CreateEventResponse> = shop_event_api::create_event(
        &mut persistence,
        app_state.cars.as_ref(),
        app_state.shops.as_ref(),
        CreateEventRequest {
            car_number: req.car_number,
            shop_code: req.shop_code,
            type_code: req.type_code,
            reason_code: req.reason_code,
        },
        &actor,
    )?;
    drop(persistence);

    spawn_notifications(&app_state, outcome.notifications);

    Ok(Json(outcome.response))
}

/// Handler for GET `/events/{event_id}` endpoint.
async fn handle_get_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventInfo>, HttpError> {
    info!(event_id, "Handling get_event request");

    let mut persistence = app_state.persistence.lock().await;
    let event: EventInfo = shop_event_api::get_event(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(event))
}

/// Handler for POST `/events/{event_id}/transition` endpoint.
///
/// Moves the event to an adjacent workflow state, subject to gates.
async fn handle_transition(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<TransitionApiRequest>,
) -> Result<Json<TransitionResponse>, HttpError> {
    info!(
        event_id,
        actor_id = %req.actor_id,
        target_state = %req.target_state,
        expected_version = req.expected_version,
        "Handling transition request"
    );

    let actor: Actor = parse_actor(&req.actor_id, &req.actor_name)?;

    let mut persistence = app_state.persistence.lock().await;
    let outcome: ApiOutcome<TransitionResponse> = shop_event_api::request_transition(
        &mut persistence,
        TransitionRequest {
            event_id,
            target_state: req.target_state,
            expected_version: req.expected_version,
            notes: req.notes,
        },
        &actor,
    )?;
    drop(persistence);

    spawn_notifications(&app_state, outcome.notifications);

    Ok(Json(outcome.response))
}

/// Handler for POST `/events/{event_id}/cancel` endpoint.
async fn handle_cancel_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<CancelEventApiRequest>,
) -> Result<Json<CancelEventResponse>, HttpError> {
    info!(
        event_id,
        actor_id = %req.actor_id,
        "Handling cancel_event request"
    );

    let actor: Actor = parse_actor(&req.actor_id, &req.actor_name)?;

    let mut persistence = app_state.persistence.lock().await;
    let outcome: ApiOutcome<CancelEventResponse> = shop_event_api::cancel_event(
        &mut persistence,
        CancelEventRequest {
            event_id,
            reason: req.reason,
            expected_version: req.expected_version,
        },
        &actor,
    )?;
    drop(persistence);

    spawn_notifications(&app_state, outcome.notifications);

    Ok(Json(outcome.response))
}

/// Handler for POST `/events/{event_id}/estimates` endpoint.
///
/// Submits a new estimate version for the event.
async fn handle_submit_estimate(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<SubmitEstimateApiRequest>,
) -> Result<Json<SubmitEstimateResponse>, HttpError> {
    info!(
        event_id,
        actor_id = %req.actor_id,
        line_count = req.lines.len(),
        "Handling submit_estimate request"
    );

    let actor: Actor = parse_actor(&req.actor_id, &req.actor_name)?;

    let mut persistence = app_state.persistence.lock().await;
    let outcome: ApiOutcome<SubmitEstimateResponse> = shop_event_api::submit_estimate(
        &mut persistence,
        SubmitEstimateRequest {
            event_id,
            lines: req.lines,
        },
        &actor,
    )?;
    drop(persistence);

    spawn_notifications(&app_state, outcome.notifications);

    Ok(Json(outcome.response))
}

/// Handler for GET `/events/{event_id}/estimates/latest` endpoint.
async fn handle_latest_estimate(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<LatestEstimateApiResponse>, HttpError> {
    info!(event_id, "Handling latest_estimate request");

    let mut persistence = app_state.persistence.lock().await;
    let submission: Option<SubmissionInfo> =
        shop_event_api::get_latest_submission(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(LatestEstimateApiResponse {
        event_id,
        submission,
    }))
}

/// Handler for GET `/events/{event_id}/history` endpoint.
///
/// Returns the event's complete ledger in chronological order.
async fn handle_history(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<ListHistoryResponse>, HttpError> {
    info!(event_id, "Handling history request");

    let mut persistence = app_state.persistence.lock().await;
    let history: ListHistoryResponse = shop_event_api::list_history(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(history))
}

/// Handler for POST `/submissions/{submission_id}/decisions` endpoint.
async fn handle_record_decisions(
    AxumState(app_state): AxumState<AppState>,
    Path(submission_id): Path<i64>,
    Json(req): Json<RecordDecisionsApiRequest>,
) -> Result<Json<RecordDecisionsResponse>, HttpError> {
    info!(
        submission_id,
        actor_id = %req.actor_id,
        count = req.decisions.len(),
        "Handling record_decisions request"
    );

    let actor: Actor = parse_actor(&req.actor_id, &req.actor_name)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RecordDecisionsResponse = shop_event_api::record_decisions(
        &mut persistence,
        RecordDecisionsRequest {
            submission_id,
            decisions: req.decisions,
        },
        &actor,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/submissions/{submission_id}/approval` endpoint.
///
/// Finalizes the single approval packet for a submission.
async fn handle_finalize_approval(
    AxumState(app_state): AxumState<AppState>,
    Path(submission_id): Path<i64>,
    Json(req): Json<FinalizeApprovalApiRequest>,
) -> Result<Json<FinalizeApprovalResponse>, HttpError> {
    info!(
        submission_id,
        actor_id = %req.actor_id,
        decision = %req.decision,
        "Handling finalize_approval request"
    );

    let actor: Actor = parse_actor(&req.actor_id, &req.actor_name)?;

    let mut persistence = app_state.persistence.lock().await;
    let outcome: ApiOutcome<FinalizeApprovalResponse> = shop_event_api::finalize_approval(
        &mut persistence,
        FinalizeApprovalRequest {
            submission_id,
            decision: req.decision,
            approved_line_ids: req.approved_line_ids,
            notes: req.notes,
        },
        &actor,
    )?;
    drop(persistence);

    spawn_notifications(&app_state, outcome.notifications);

    Ok(Json(outcome.response))
}

/// Handler for GET `/lines/{line_id}/decisions` endpoint.
///
/// Returns a line's full decision history plus its derived effective
/// decision and override flag.
async fn handle_list_decisions(
    AxumState(app_state): AxumState<AppState>,
    Path(line_id): Path<i64>,
) -> Result<Json<ListDecisionsResponse>, HttpError> {
    info!(line_id, "Handling list_decisions request");

    let mut persistence = app_state.persistence.lock().await;
    let decisions: ListDecisionsResponse =
        shop_event_api::list_decisions(&mut persistence, line_id)?;
    drop(persistence);

    Ok(Json(decisions))
}

/// Builds the application router with all routes.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/events", post(handle_create_event))
        .route("/events/{event_id}", get(handle_get_event))
        .route("/events/{event_id}/transition", post(handle_transition))
        .route("/events/{event_id}/cancel", post(handle_cancel_event))
        .route("/events/{event_id}/estimates", post(handle_submit_estimate))
        .route(
            "/events/{event_id}/estimates/latest",
            get(handle_latest_estimate),
        )
        .route("/events/{event_id}/history", get(handle_history))
        .route(
            "/submissions/{submission_id}/decisions",
            post(handle_record_decisions),
        )
        .route(
            "/submissions/{submission_id}/approval",
            post(handle_finalize_approval),
        )
        .route("/lines/{line_id}/decisions", get(handle_list_decisions))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let persistence: Persistence = match args.database {
        Some(ref path) => {
            info!(path = %path, "Opening database file");
            Persistence::new_with_file(path)?
        }
        None => {
            info!("Using in-memory database");
            Persistence::new_in_memory()?
        }
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        cars: Arc::new(AcceptAllCars),
        shops: Arc::new(AcceptAllShops),
        notifications: Arc::new(NullNotificationSink),
    };

    let app: Router = build_router(app_state);

    let addr: String = format!("0.0.0.0:{}", args.port);
    info!(addr = %addr, "Starting shop-event-server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
