// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shopping event queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shop_event_domain::ShoppingEvent;

use crate::data_models::ShoppingEventRow;
use crate::diesel_schema::shopping_events;
use crate::error::PersistenceError;

/// Retrieves a shopping event by internal id.
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be reconstructed.
pub fn get_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<ShoppingEvent, PersistenceError> {
    let result = shopping_events::table
        .filter(shopping_events::event_id.eq(event_id))
        .select(ShoppingEventRow::as_select())
        .first::<ShoppingEventRow>(conn);

    match result {
        Ok(row) => row.into_domain(),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::EventNotFound(event_id)),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a shopping event by its human-readable event number.
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be reconstructed.
pub fn get_event_by_number(
    conn: &mut SqliteConnection,
    event_number: &str,
) -> Result<ShoppingEvent, PersistenceError> {
    let result = shopping_events::table
        .filter(shopping_events::event_number.eq(event_number))
        .select(ShoppingEventRow::as_select())
        .first::<ShoppingEventRow>(conn);

    match result {
        Ok(row) => row.into_domain(),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::EventNumberNotFound(event_number.to_string()))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists all shopping events for a car, newest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_events_for_car(
    conn: &mut SqliteConnection,
    car_number: &str,
) -> Result<Vec<ShoppingEvent>, PersistenceError> {
    let rows: Vec<ShoppingEventRow> = shopping_events::table
        .filter(shopping_events::car_number.eq(car_number))
        .order(shopping_events::event_id.desc())
        .select(ShoppingEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ShoppingEventRow::into_domain).collect()
}
