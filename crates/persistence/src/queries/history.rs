// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State history ledger queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shop_event_audit::HistoryEntry;

use crate::data_models::HistoryRow;
use crate::diesel_schema::{shopping_events, state_history};
use crate::error::PersistenceError;

/// Retrieves the complete ledger for an event in chronological order.
///
/// Ordered by timestamp with the row id as tiebreaker; the ledger is
/// append-only, so row ids are monotone within an event.
///
/// # Errors
///
/// Returns an error if the event does not exist or the database cannot
/// be queried.
pub fn history_for_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<HistoryEntry>, PersistenceError> {
    let event_exists: i64 = shopping_events::table
        .filter(shopping_events::event_id.eq(event_id))
        .count()
        .get_result(conn)?;
    if event_exists == 0 {
        return Err(PersistenceError::EventNotFound(event_id));
    }

    let rows: Vec<HistoryRow> = state_history::table
        .filter(state_history::event_id.eq(event_id))
        .order((
            state_history::occurred_at.asc(),
            state_history::history_id.asc(),
        ))
        .select(HistoryRow::as_select())
        .load(conn)?;

    rows.into_iter().map(HistoryRow::into_domain).collect()
}
