// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Estimate submission and approval packet queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shop_event_domain::{ApprovalPacket, EstimateLine, EstimateSubmission};

use crate::data_models::{LineRow, PacketRow, SubmissionRow};
use crate::diesel_schema::{approval_packets, estimate_lines, estimate_submissions};
use crate::error::PersistenceError;

/// Retrieves the lines of a submission in line-number order.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn lines_for_submission(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<Vec<EstimateLine>, PersistenceError> {
    let rows: Vec<LineRow> = estimate_lines::table
        .filter(estimate_lines::submission_id.eq(submission_id))
        .order(estimate_lines::line_number.asc())
        .select(LineRow::as_select())
        .load(conn)?;

    rows.into_iter().map(LineRow::into_domain).collect()
}

fn attach_lines(
    conn: &mut SqliteConnection,
    row: SubmissionRow,
) -> Result<EstimateSubmission, PersistenceError> {
    let lines: Vec<EstimateLine> = lines_for_submission(conn, row.submission_id)?;
    row.into_domain(lines)
}

/// Retrieves a submission by id, with its lines.
///
/// # Errors
///
/// Returns an error if the submission is not found or cannot be
/// reconstructed.
pub fn get_submission(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<EstimateSubmission, PersistenceError> {
    let result = estimate_submissions::table
        .filter(estimate_submissions::submission_id.eq(submission_id))
        .select(SubmissionRow::as_select())
        .first::<SubmissionRow>(conn);

    match result {
        Ok(row) => attach_lines(conn, row),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::SubmissionNotFound(submission_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists all submissions for an event in version order, with lines.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_submissions(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<EstimateSubmission>, PersistenceError> {
    let rows: Vec<SubmissionRow> = estimate_submissions::table
        .filter(estimate_submissions::event_id.eq(event_id))
        .order(estimate_submissions::version.asc())
        .select(SubmissionRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| attach_lines(conn, row))
        .collect()
}

/// Retrieves the highest-version submission for an event, if any.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn latest_submission(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Option<EstimateSubmission>, PersistenceError> {
    let result = estimate_submissions::table
        .filter(estimate_submissions::event_id.eq(event_id))
        .order(estimate_submissions::version.desc())
        .select(SubmissionRow::as_select())
        .first::<SubmissionRow>(conn);

    match result {
        Ok(row) => Ok(Some(attach_lines(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the highest-version final-tagged submission for an event,
/// if any.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn latest_final_submission(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Option<EstimateSubmission>, PersistenceError> {
    let result = estimate_submissions::table
        .filter(estimate_submissions::event_id.eq(event_id))
        .filter(estimate_submissions::is_final.eq(1))
        .order(estimate_submissions::version.desc())
        .select(SubmissionRow::as_select())
        .first::<SubmissionRow>(conn);

    match result {
        Ok(row) => Ok(Some(attach_lines(conn, row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the approval packet for a submission, if one was finalized.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_packet(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<Option<ApprovalPacket>, PersistenceError> {
    let result = approval_packets::table
        .filter(approval_packets::submission_id.eq(submission_id))
        .select(PacketRow::as_select())
        .first::<PacketRow>(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
