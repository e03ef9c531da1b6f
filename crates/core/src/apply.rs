// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::transition::{GateContext, evaluate_gate};
use shop_event_audit::{Actor, HistoryEntry, SideEffect};
use shop_event_domain::{
    Cancellation, EventState, ShoppingEvent, validate_cancellation_reason,
};

/// The result of a successfully applied command.
///
/// Application is pure: the caller commits `new_event` and `entry`
/// together in one atomic unit of work, guarded by the event's version
/// counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The event after the transition, with its version incremented.
    pub new_event: ShoppingEvent,
    /// The ledger entry recording this transition.
    pub entry: HistoryEntry,
}

/// Builds the creation ledger entry for a newly created event.
///
/// The creation entry has no from-state and records `Requested` as the
/// to-state.
#[must_use]
pub fn creation_entry(actor: Actor, now: &str) -> HistoryEntry {
    HistoryEntry::new(
        None,
        EventState::Requested,
        actor,
        now.to_string(),
        None,
        Vec::new(),
    )
}

/// Applies a command to an event, producing the new event value and the
/// ledger entry to commit alongside it.
///
/// Evaluation order for transitions: terminal check, gate predicate,
/// structural adjacency. Gates run first so that a premature request to
/// enter a gated state surfaces the unmet business condition.
///
/// # Arguments
///
/// * `event` - The current event (immutable)
/// * `command` - The command to apply
/// * `ctx` - Estimate state consulted by gate predicates
/// * `actor` - The actor performing this action
/// * `now` - The current time (RFC 3339)
///
/// # Errors
///
/// Returns an error if:
/// - The event is in a terminal state
/// - A gate predicate is unmet
/// - The requested state is not a valid successor
/// - The command violates domain rules (e.g. empty cancellation reason)
pub fn apply(
    event: &ShoppingEvent,
    command: Command,
    ctx: &GateContext,
    actor: Actor,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::Transition { to, notes } => apply_transition(event, to, notes, ctx, actor, now),
        Command::Cancel { reason } => apply_cancel(event, reason, actor, now),
    }
}

fn apply_transition(
    event: &ShoppingEvent,
    to: EventState,
    notes: Option<String>,
    ctx: &GateContext,
    actor: Actor,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    if event.is_terminal() {
        return Err(CoreError::InvalidTransition {
            from: event.state,
            to,
        });
    }

    // Gates before adjacency: a premature jump to a gated state reports
    // the unmet condition.
    evaluate_gate(to, ctx)?;

    if event.state.validate_transition(to).is_err() {
        return Err(CoreError::InvalidTransition {
            from: event.state,
            to,
        });
    }

    let side_effects: Vec<SideEffect> = gate_side_effects(to, ctx);

    let mut new_event: ShoppingEvent = event.clone();
    new_event.state = to;
    new_event.version = event.version + 1;

    let entry: HistoryEntry = HistoryEntry::new(
        Some(event.state),
        to,
        actor,
        now.to_string(),
        notes,
        side_effects,
    );

    Ok(TransitionResult { new_event, entry })
}

fn apply_cancel(
    event: &ShoppingEvent,
    reason: String,
    actor: Actor,
    now: &str,
) -> Result<TransitionResult, CoreError> {
    validate_cancellation_reason(&reason)?;

    if event.is_terminal() {
        return Err(CoreError::InvalidTransition {
            from: event.state,
            to: EventState::Cancelled,
        });
    }

    let mut new_event: ShoppingEvent = event.clone();
    new_event.state = EventState::Cancelled;
    new_event.version = event.version + 1;
    new_event.cancellation = Some(Cancellation {
        cancelled_at: now.to_string(),
        cancelled_by: actor.id.clone(),
        reason: reason.clone(),
    });

    let entry: HistoryEntry = HistoryEntry::new(
        Some(event.state),
        EventState::Cancelled,
        actor,
        now.to_string(),
        Some(reason.clone()),
        vec![SideEffect::new(
            String::from("event_cancelled"),
            format!("Event cancelled: {reason}"),
        )],
    );

    Ok(TransitionResult { new_event, entry })
}

/// Side-effect markers recorded when a gated transition passes.
fn gate_side_effects(to: EventState, ctx: &GateContext) -> Vec<SideEffect> {
    match to {
        EventState::WorkAuthorized => ctx
            .latest_submission
            .map(|submission| {
                vec![SideEffect::new(
                    String::from("estimate_gate_passed"),
                    format!(
                        "Work authorized against approved estimate version {}",
                        submission.version
                    ),
                )]
            })
            .unwrap_or_default(),
        EventState::FinalEstimateApproved => ctx
            .latest_final_submission
            .map(|submission| {
                vec![SideEffect::new(
                    String::from("final_estimate_gate_passed"),
                    format!(
                        "Final estimate version {} approved for release path",
                        submission.version
                    ),
                )]
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
