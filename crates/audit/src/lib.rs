// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State history ledger types for the Shopping Event Workflow Engine.
//!
//! The ledger is the compliance record of an event's entire life: one
//! append-only entry per successful transition, never updated or
//! deleted. Replaying the entries in order reconstructs exactly the
//! event's current state. These are pure value types; persistence and
//! ordering guarantees live in the persistence crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};
use shop_event_domain::EventState;

/// The entity performing an action.
///
/// Actors arrive from an external identity collaborator as an opaque id
/// plus a display name; this system never authenticates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The opaque identifier for this actor.
    pub id: String,
    /// The human-readable display name.
    pub display_name: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The opaque identifier for this actor
    /// * `display_name` - The human-readable display name
    #[must_use]
    pub const fn new(id: String, display_name: String) -> Self {
        Self { id, display_name }
    }
}

/// A structured marker for a side effect that accompanied a transition
/// (e.g. "the event was cancelled", "a final estimate gate passed").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffect {
    /// Machine-readable side-effect kind (e.g. `event_cancelled`).
    pub kind: String,
    /// Human-readable detail.
    pub detail: String,
}

impl SideEffect {
    /// Creates a new `SideEffect`.
    ///
    /// # Arguments
    ///
    /// * `kind` - Machine-readable side-effect kind
    /// * `detail` - Human-readable detail
    #[must_use]
    pub const fn new(kind: String, detail: String) -> Self {
        Self { kind, detail }
    }
}

/// One append-only ledger row recording a successful transition.
///
/// `from_state` is `None` only for the creation entry. Entries capture
/// who decided, what changed, why, and when; once written they are
/// immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The state before the transition; `None` for the creation entry.
    pub from_state: Option<EventState>,
    /// The state after the transition.
    pub to_state: EventState,
    /// The actor who initiated the transition.
    pub actor: Actor,
    /// When the transition occurred (RFC 3339).
    pub occurred_at: String,
    /// Free-text notes supplied with the transition.
    pub notes: Option<String>,
    /// Structured side-effect markers.
    pub side_effects: Vec<SideEffect>,
}

impl HistoryEntry {
    /// Creates a new `HistoryEntry`.
    ///
    /// Once created, a history entry is immutable.
    ///
    /// # Arguments
    ///
    /// * `from_state` - The state before the transition (`None` at creation)
    /// * `to_state` - The state after the transition
    /// * `actor` - The actor who initiated the transition
    /// * `occurred_at` - When the transition occurred (RFC 3339)
    /// * `notes` - Free-text notes
    /// * `side_effects` - Structured side-effect markers
    #[must_use]
    pub const fn new(
        from_state: Option<EventState>,
        to_state: EventState,
        actor: Actor,
        occurred_at: String,
        notes: Option<String>,
        side_effects: Vec<SideEffect>,
    ) -> Self {
        Self {
            from_state,
            to_state,
            actor,
            occurred_at,
            notes,
            side_effects,
        }
    }
}

/// Replays a sequence of history entries, returning the resulting state.
///
/// This is the ordering invariant of the ledger: folding the entries of
/// a complete history must yield the event's current state. Returns
/// `None` for an empty history.
#[must_use]
pub fn replay(entries: &[HistoryEntry]) -> Option<EventState> {
    entries.last().map(|entry| entry.to_state)
}

/// Checks that a history is gap-free: each entry's `from_state` equals
/// the previous entry's `to_state`, and the first entry has no
/// `from_state`.
#[must_use]
pub fn is_contiguous(entries: &[HistoryEntry]) -> bool {
    let mut previous: Option<EventState> = None;
    for entry in entries {
        if entry.from_state != previous {
            return false;
        }
        previous = Some(entry.to_state);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor::new(String::from("op-17"), String::from("J. Smith"))
    }

    fn entry(from: Option<EventState>, to: EventState) -> HistoryEntry {
        HistoryEntry::new(
            from,
            to,
            actor(),
            String::from("2026-03-01T10:00:00Z"),
            None,
            Vec::new(),
        )
    }

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let a: Actor = actor();
        assert_eq!(a.id, "op-17");
        assert_eq!(a.display_name, "J. Smith");
    }

    #[test]
    fn test_entry_is_immutable_once_created() {
        let e: HistoryEntry = entry(None, EventState::Requested);
        let cloned: HistoryEntry = e.clone();
        assert_eq!(e, cloned);
        assert_eq!(e.to_state, EventState::Requested);
        assert!(e.from_state.is_none());
    }

    #[test]
    fn test_side_effect_markers() {
        let effect: SideEffect = SideEffect::new(
            String::from("event_cancelled"),
            String::from("Cancelled: owner recalled the car"),
        );
        let e: HistoryEntry = HistoryEntry::new(
            Some(EventState::Inbound),
            EventState::Cancelled,
            actor(),
            String::from("2026-03-01T10:00:00Z"),
            Some(String::from("owner recalled the car")),
            vec![effect.clone()],
        );
        assert_eq!(e.side_effects, vec![effect]);
    }

    #[test]
    fn test_replay_returns_last_state() {
        let entries = vec![
            entry(None, EventState::Requested),
            entry(Some(EventState::Requested), EventState::AssignedToShop),
            entry(Some(EventState::AssignedToShop), EventState::Inbound),
        ];
        assert_eq!(replay(&entries), Some(EventState::Inbound));
    }

    #[test]
    fn test_replay_of_empty_history() {
        assert_eq!(replay(&[]), None);
    }

    #[test]
    fn test_contiguous_history() {
        let entries = vec![
            entry(None, EventState::Requested),
            entry(Some(EventState::Requested), EventState::AssignedToShop),
        ];
        assert!(is_contiguous(&entries));
    }

    #[test]
    fn test_gap_in_history_is_detected() {
        let entries = vec![
            entry(None, EventState::Requested),
            entry(Some(EventState::AssignedToShop), EventState::Inbound),
        ];
        assert!(!is_contiguous(&entries));
    }

    #[test]
    fn test_history_must_start_at_creation() {
        let entries = vec![entry(
            Some(EventState::Requested),
            EventState::AssignedToShop,
        )];
        assert!(!is_contiguous(&entries));
    }
}
