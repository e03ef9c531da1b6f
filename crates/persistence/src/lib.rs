// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Shopping Event Workflow Engine.
//!
//! This crate stores shopping events, versioned estimate submissions
//! with their lines, append-only line decisions, approval packets, and
//! the append-only state history ledger. It is built on Diesel with a
//! `SQLite` backend.
//!
//! Two properties the rest of the system leans on:
//!
//! - **Atomic commits.** A transition commit updates the event row and
//!   appends its ledger entry in one transaction; the estimate tables
//!   follow the same pattern. Partial writes cannot be observed.
//! - **Optimistic concurrency.** The event row carries a version
//!   counter; transition commits are compare-and-swap updates guarded
//!   by the version the transition was applied against.
//!
//! Tests use unique shared in-memory databases so they are isolated and
//! need no external infrastructure.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use shop_event::TransitionResult;
use shop_event_audit::HistoryEntry;
use shop_event_domain::{
    ApprovalPacket, CarNumber, DecisionSource, EstimateSubmission, LineDecision, NewEstimateLine,
    OverallDecision, Responsibility, ShopCode, ShoppingEvent, SubmissionStatus, Verdict,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Persistence adapter for the workflow engine.
///
/// Owns a single `SQLite` connection; callers serialize access (the
/// server wraps the adapter in a mutex).
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Unique shared in-memory database name per call so tests are isolated.
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// This is a startup-time check required to ensure referential
    /// integrity constraints are enforced.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Shopping Events
    // ========================================================================

    /// Creates a shopping event in `Requested` state together with its
    /// creation ledger entry.
    ///
    /// The event number is derived from the assigned row id.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_event(
        &mut self,
        car_number: &CarNumber,
        shop_code: &ShopCode,
        type_code: &str,
        reason_code: Option<&str>,
        created_by: &str,
        entry: &HistoryEntry,
    ) -> Result<ShoppingEvent, PersistenceError> {
        mutations::events::create_event(
            &mut self.conn,
            car_number,
            shop_code,
            type_code,
            reason_code,
            created_by,
            entry,
        )
    }

    /// Commits an applied transition with optimistic concurrency.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` if another writer committed
    /// against the same version first.
    pub fn commit_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<(), PersistenceError> {
        mutations::events::commit_transition(&mut self.conn, result)
    }

    /// Retrieves a shopping event by internal id.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found.
    pub fn get_event(&mut self, event_id: i64) -> Result<ShoppingEvent, PersistenceError> {
        queries::events::get_event(&mut self.conn, event_id)
    }

    /// Retrieves a shopping event by its human-readable event number.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found.
    pub fn get_event_by_number(
        &mut self,
        event_number: &str,
    ) -> Result<ShoppingEvent, PersistenceError> {
        queries::events::get_event_by_number(&mut self.conn, event_number)
    }

    /// Lists all shopping events for a car, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_events_for_car(
        &mut self,
        car_number: &str,
    ) -> Result<Vec<ShoppingEvent>, PersistenceError> {
        queries::events::list_events_for_car(&mut self.conn, car_number)
    }

    // ========================================================================
    // Estimate Submissions
    // ========================================================================

    /// Inserts a new estimate submission with its lines, assigning the
    /// next version for the event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or persistence fails.
    pub fn insert_submission(
        &mut self,
        event_id: i64,
        is_final: bool,
        lines: &[NewEstimateLine],
        submitted_by: &str,
        submitted_at: &str,
    ) -> Result<EstimateSubmission, PersistenceError> {
        mutations::estimates::insert_submission(
            &mut self.conn,
            event_id,
            is_final,
            lines,
            submitted_by,
            submitted_at,
        )
    }

    /// Updates the review status of a submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission does not exist.
    pub fn update_submission_status(
        &mut self,
        submission_id: i64,
        status: SubmissionStatus,
    ) -> Result<(), PersistenceError> {
        mutations::estimates::update_submission_status(&mut self.conn, submission_id, status)
    }

    /// Retrieves a submission by id, with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission is not found.
    pub fn get_submission(
        &mut self,
        submission_id: i64,
    ) -> Result<EstimateSubmission, PersistenceError> {
        queries::estimates::get_submission(&mut self.conn, submission_id)
    }

    /// Lists all submissions for an event in version order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_submissions(
        &mut self,
        event_id: i64,
    ) -> Result<Vec<EstimateSubmission>, PersistenceError> {
        queries::estimates::list_submissions(&mut self.conn, event_id)
    }

    /// Retrieves the highest-version submission for an event, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn latest_submission(
        &mut self,
        event_id: i64,
    ) -> Result<Option<EstimateSubmission>, PersistenceError> {
        queries::estimates::latest_submission(&mut self.conn, event_id)
    }

    /// Retrieves the highest-version final-tagged submission for an
    /// event, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn latest_final_submission(
        &mut self,
        event_id: i64,
    ) -> Result<Option<EstimateSubmission>, PersistenceError> {
        queries::estimates::latest_final_submission(&mut self.conn, event_id)
    }

    // ========================================================================
    // Line Decisions
    // ========================================================================

    /// Appends a decision for an estimate line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_decision(
        &mut self,
        line_id: i64,
        source: DecisionSource,
        verdict: Verdict,
        responsibility: Responsibility,
        basis_type: &str,
        basis_reference: &str,
        notes: Option<&str>,
        decided_by: &str,
        decided_at: &str,
    ) -> Result<LineDecision, PersistenceError> {
        mutations::decisions::insert_decision(
            &mut self.conn,
            line_id,
            source,
            verdict,
            responsibility,
            basis_type,
            basis_reference,
            notes,
            decided_by,
            decided_at,
        )
    }

    /// Retrieves all decisions for one line, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist.
    pub fn decisions_for_line(
        &mut self,
        line_id: i64,
    ) -> Result<Vec<LineDecision>, PersistenceError> {
        queries::decisions::decisions_for_line(&mut self.conn, line_id)
    }

    /// Retrieves the decisions for every line of a submission, grouped
    /// per line in line-number order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn decisions_for_submission(
        &mut self,
        submission_id: i64,
    ) -> Result<Vec<(i64, Vec<LineDecision>)>, PersistenceError> {
        queries::decisions::decisions_for_submission(&mut self.conn, submission_id)
    }

    // ========================================================================
    // Approval Packets
    // ========================================================================

    /// Finalizes an approval packet and moves the submission to the
    /// status the packet's decision imposes.
    ///
    /// # Errors
    ///
    /// Returns an error if a packet already exists for the submission.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_packet(
        &mut self,
        submission_id: i64,
        decision: OverallDecision,
        approved_line_ids: &[i64],
        notes: Option<&str>,
        decided_by: &str,
        decided_at: &str,
        new_status: SubmissionStatus,
    ) -> Result<ApprovalPacket, PersistenceError> {
        mutations::approvals::insert_packet(
            &mut self.conn,
            submission_id,
            decision,
            approved_line_ids,
            notes,
            decided_by,
            decided_at,
            new_status,
        )
    }

    /// Retrieves the approval packet for a submission, if one was
    /// finalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_packet(
        &mut self,
        submission_id: i64,
    ) -> Result<Option<ApprovalPacket>, PersistenceError> {
        queries::estimates::get_packet(&mut self.conn, submission_id)
    }

    // ========================================================================
    // State History Ledger
    // ========================================================================

    /// Retrieves the complete ledger for an event in chronological order.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist.
    pub fn history_for_event(
        &mut self,
        event_id: i64,
    ) -> Result<Vec<HistoryEntry>, PersistenceError> {
        queries::history::history_for_event(&mut self.conn, event_id)
    }
}
