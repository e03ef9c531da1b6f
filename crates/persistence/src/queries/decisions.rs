// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Line decision queries.
//!
//! Decisions are returned in `(decided_at, decision_id)` order so that
//! "latest" semantics are stable even when timestamps collide within a
//! transaction.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shop_event_domain::LineDecision;

use crate::data_models::DecisionRow;
use crate::diesel_schema::{estimate_lines, line_decisions};
use crate::error::PersistenceError;

/// Retrieves all decisions for one line, oldest first.
///
/// # Errors
///
/// Returns an error if the line does not exist or the database cannot
/// be queried.
pub fn decisions_for_line(
    conn: &mut SqliteConnection,
    line_id: i64,
) -> Result<Vec<LineDecision>, PersistenceError> {
    let line_exists: i64 = estimate_lines::table
        .filter(estimate_lines::line_id.eq(line_id))
        .count()
        .get_result(conn)?;
    if line_exists == 0 {
        return Err(PersistenceError::LineNotFound(line_id));
    }

    let rows: Vec<DecisionRow> = line_decisions::table
        .filter(line_decisions::line_id.eq(line_id))
        .order((
            line_decisions::decided_at.asc(),
            line_decisions::decision_id.asc(),
        ))
        .select(DecisionRow::as_select())
        .load(conn)?;

    rows.into_iter().map(DecisionRow::into_domain).collect()
}

/// Retrieves the decisions for every line of a submission, grouped per
/// line in line-number order.
///
/// Lines with no decisions yet are included with an empty list, so the
/// caller sees the whole submission.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn decisions_for_submission(
    conn: &mut SqliteConnection,
    submission_id: i64,
) -> Result<Vec<(i64, Vec<LineDecision>)>, PersistenceError> {
    let line_ids: Vec<i64> = estimate_lines::table
        .filter(estimate_lines::submission_id.eq(submission_id))
        .order(estimate_lines::line_number.asc())
        .select(estimate_lines::line_id)
        .load(conn)?;

    let mut grouped: Vec<(i64, Vec<LineDecision>)> = Vec::with_capacity(line_ids.len());
    for line_id in line_ids {
        let rows: Vec<DecisionRow> = line_decisions::table
            .filter(line_decisions::line_id.eq(line_id))
            .order((
                line_decisions::decided_at.asc(),
                line_decisions::decision_id.asc(),
            ))
            .select(DecisionRow::as_select())
            .load(conn)?;
        let decisions: Vec<LineDecision> = rows
            .into_iter()
            .map(DecisionRow::into_domain)
            .collect::<Result<Vec<LineDecision>, PersistenceError>>()?;
        grouped.push((line_id, decisions));
    }

    Ok(grouped)
}
