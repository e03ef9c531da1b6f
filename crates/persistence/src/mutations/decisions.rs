// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Line decision mutations.
//!
//! Decisions are append-only. A new decision never updates or deletes a
//! prior one; superseding and overriding are derived at read time.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shop_event_domain::{DecisionSource, LineDecision, Responsibility, Verdict};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewDecisionRow;
use crate::diesel_schema::{estimate_lines, line_decisions};
use crate::error::PersistenceError;

/// Appends a decision for an estimate line.
///
/// # Errors
///
/// Returns an error if the line does not exist or the insert fails.
#[allow(clippy::too_many_arguments)]
pub fn insert_decision(
    conn: &mut SqliteConnection,
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
    let line_exists: i64 = estimate_lines::table
        .filter(estimate_lines::line_id.eq(line_id))
        .count()
        .get_result(conn)?;
    if line_exists == 0 {
        return Err(PersistenceError::LineNotFound(line_id));
    }

    let row = NewDecisionRow {
        line_id,
        source: source.as_str().to_string(),
        confidence: source.confidence().map(|c| c.to_string()),
        verdict: verdict.as_str().to_string(),
        responsibility: responsibility.as_str().to_string(),
        basis_type: basis_type.to_string(),
        basis_reference: basis_reference.to_string(),
        notes: notes.map(ToString::to_string),
        decided_by: decided_by.to_string(),
        decided_at: decided_at.to_string(),
    };

    diesel::insert_into(line_decisions::table)
        .values(&row)
        .execute(conn)?;
    let decision_id: i64 = get_last_insert_rowid(conn)?;

    Ok(LineDecision {
        decision_id,
        line_id,
        source,
        verdict,
        responsibility,
        basis_type: basis_type.to_string(),
        basis_reference: basis_reference.to_string(),
        notes: notes.map(ToString::to_string),
        decided_by: decided_by.to_string(),
        decided_at: decided_at.to_string(),
    })
}
