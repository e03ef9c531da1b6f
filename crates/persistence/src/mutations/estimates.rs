// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Estimate submission mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use shop_event_domain::{
    EstimateLine, EstimateSubmission, NewEstimateLine, SubmissionStatus, aggregate_totals,
};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewLineRow, NewSubmissionRow};
use crate::diesel_schema::{estimate_lines, estimate_submissions, shopping_events};
use crate::error::PersistenceError;

/// Inserts a new estimate submission with its lines, assigning the next
/// version for the event, in one transaction.
///
/// Versions are assigned from the stored maximum, so gaps never occur
/// and versions are never reused even across rejected submissions.
///
/// # Errors
///
/// Returns an error if the event does not exist or the insert fails.
pub fn insert_submission(
    conn: &mut SqliteConnection,
    event_id: i64,
    is_final: bool,
    lines: &[NewEstimateLine],
    submitted_by: &str,
    submitted_at: &str,
) -> Result<EstimateSubmission, PersistenceError> {
    conn.transaction::<EstimateSubmission, PersistenceError, _>(|conn| {
        let event_exists: i64 = shopping_events::table
            .filter(shopping_events::event_id.eq(event_id))
            .count()
            .get_result(conn)?;
        if event_exists == 0 {
            return Err(PersistenceError::EventNotFound(event_id));
        }

        let max_version: Option<i32> = estimate_submissions::table
            .filter(estimate_submissions::event_id.eq(event_id))
            .select(diesel::dsl::max(estimate_submissions::version))
            .first(conn)?;
        let version: i32 = max_version.unwrap_or(0) + 1;

        let (labor_hours_total, material_cost_total, total_cost): (Decimal, Decimal, Decimal) =
            aggregate_totals(lines);

        let row = NewSubmissionRow {
            event_id,
            version,
            status: SubmissionStatus::Submitted.as_str().to_string(),
            is_final: i32::from(is_final),
            labor_hours_total: labor_hours_total.to_string(),
            material_cost_total: material_cost_total.to_string(),
            total_cost: total_cost.to_string(),
            submitted_by: submitted_by.to_string(),
            submitted_at: submitted_at.to_string(),
        };

        diesel::insert_into(estimate_submissions::table)
            .values(&row)
            .execute(conn)?;
        let submission_id: i64 = get_last_insert_rowid(conn)?;

        let mut stored_lines: Vec<EstimateLine> = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let line_number: i32 = i32::try_from(index + 1).map_err(|_| {
                PersistenceError::ReconstructionError("Line number out of range".to_string())
            })?;
            let line_row = NewLineRow {
                submission_id,
                line_number,
                task_code: line.task_code.clone(),
                description: line.description.clone(),
                labor_hours: line.labor_hours.to_string(),
                material_cost: line.material_cost.to_string(),
                total_cost: line.total_cost.to_string(),
            };
            diesel::insert_into(estimate_lines::table)
                .values(&line_row)
                .execute(conn)?;
            let line_id: i64 = get_last_insert_rowid(conn)?;

            stored_lines.push(EstimateLine {
                line_id,
                line_number,
                task_code: line.task_code.clone(),
                description: line.description.clone(),
                labor_hours: line.labor_hours,
                material_cost: line.material_cost,
                total_cost: line.total_cost,
            });
        }

        Ok(EstimateSubmission {
            submission_id,
            event_id,
            version,
            status: SubmissionStatus::Submitted,
            is_final,
            labor_hours_total,
            material_cost_total,
            total_cost,
            submitted_by: submitted_by.to_string(),
            submitted_at: submitted_at.to_string(),
            lines: stored_lines,
        })
    })
}

/// Updates the review status of a submission.
///
/// # Errors
///
/// Returns an error if the submission does not exist or the update fails.
pub fn update_submission_status(
    conn: &mut SqliteConnection,
    submission_id: i64,
    status: SubmissionStatus,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(
        estimate_submissions::table.filter(estimate_submissions::submission_id.eq(submission_id)),
    )
    .set(estimate_submissions::status.eq(status.as_str()))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::SubmissionNotFound(submission_id));
    }
    Ok(())
}
