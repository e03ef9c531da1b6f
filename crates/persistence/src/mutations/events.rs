// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shopping event mutations: creation and transition commit.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shop_event::TransitionResult;
use shop_event_audit::HistoryEntry;
use shop_event_domain::{CarNumber, EventNumber, EventState, ShopCode, ShoppingEvent};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewHistoryRow, NewShoppingEventRow, ShoppingEventRow};
use crate::diesel_schema::{shopping_events, state_history};
use crate::error::PersistenceError;

/// Creates a shopping event in `Requested` state, together with its
/// creation ledger entry, in one transaction.
///
/// The event number is derived from the assigned row id, so the row is
/// inserted with a placeholder and updated once the id is known.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_event(
    conn: &mut SqliteConnection,
    car_number: &CarNumber,
    shop_code: &ShopCode,
    type_code: &str,
    reason_code: Option<&str>,
    created_by: &str,
    entry: &HistoryEntry,
) -> Result<ShoppingEvent, PersistenceError> {
    conn.transaction::<ShoppingEvent, PersistenceError, _>(|conn| {
        let row = NewShoppingEventRow {
            event_number: String::new(),
            car_number: car_number.value().to_string(),
            shop_code: shop_code.value().to_string(),
            type_code: type_code.to_string(),
            reason_code: reason_code.map(ToString::to_string),
            state: EventState::Requested.as_str().to_string(),
            version: 1,
            created_by: created_by.to_string(),
            created_at: entry.occurred_at.clone(),
        };

        diesel::insert_into(shopping_events::table)
            .values(&row)
            .execute(conn)?;

        let event_id: i64 = get_last_insert_rowid(conn)?;
        let event_number: EventNumber = EventNumber::from_event_id(event_id);

        diesel::update(shopping_events::table.filter(shopping_events::event_id.eq(event_id)))
            .set(shopping_events::event_number.eq(event_number.value()))
            .execute(conn)?;

        let history_row: NewHistoryRow = NewHistoryRow::from_entry(event_id, entry)?;
        diesel::insert_into(state_history::table)
            .values(&history_row)
            .execute(conn)?;

        let stored: ShoppingEventRow = shopping_events::table
            .filter(shopping_events::event_id.eq(event_id))
            .select(ShoppingEventRow::as_select())
            .first(conn)?;

        stored.into_domain()
    })
}

/// Commits an applied transition: a compare-and-swap update on the event
/// row plus the ledger append, in one transaction.
///
/// The update is guarded by the version the transition was applied
/// against. If another writer committed first, zero rows match and the
/// commit fails with `ConcurrentModification`.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist
/// - The event was modified concurrently
/// - The database operation fails
pub fn commit_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<(), PersistenceError> {
    let event: &ShoppingEvent = &result.new_event;
    let expected_version: i64 = event.version - 1;

    conn.transaction::<(), PersistenceError, _>(|conn| {
        let cancellation = event.cancellation.as_ref();
        let affected: usize = diesel::update(
            shopping_events::table
                .filter(shopping_events::event_id.eq(event.event_id))
                .filter(shopping_events::version.eq(expected_version)),
        )
        .set((
            shopping_events::state.eq(event.state.as_str()),
            shopping_events::version.eq(event.version),
            shopping_events::cancelled_at.eq(cancellation.map(|c| c.cancelled_at.clone())),
            shopping_events::cancelled_by.eq(cancellation.map(|c| c.cancelled_by.clone())),
            shopping_events::cancellation_reason.eq(cancellation.map(|c| c.reason.clone())),
        ))
        .execute(conn)?;

        if affected == 0 {
            let exists: i64 = shopping_events::table
                .filter(shopping_events::event_id.eq(event.event_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(PersistenceError::EventNotFound(event.event_id));
            }
            return Err(PersistenceError::ConcurrentModification {
                event_id: event.event_id,
                expected_version,
            });
        }

        let history_row: NewHistoryRow = NewHistoryRow::from_entry(event.event_id, &result.entry)?;
        diesel::insert_into(state_history::table)
            .values(&history_row)
            .execute(conn)?;

        Ok(())
    })
}
