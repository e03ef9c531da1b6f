// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core identifier and entity types for shopping events.

use crate::state::EventState;
use serde::{Deserialize, Serialize};

/// A rail car reporting mark plus number (e.g. `GATX12345`).
///
/// Car master data lives in an external collaborator; this type only
/// carries the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarNumber(String);

impl CarNumber {
    /// Creates a new car number.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }

    /// Returns the car number as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CarNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A repair shop code (e.g. `UP001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShopCode(String);

impl ShopCode {
    /// Creates a new shop code.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }

    /// Returns the shop code as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShopCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The immutable human-readable identifier of a shopping event
/// (e.g. `SE-000042`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventNumber(String);

impl EventNumber {
    /// Creates an event number from its stored string form.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Derives the canonical event number for a database row id.
    #[must_use]
    pub fn from_event_id(event_id: i64) -> Self {
        Self(format!("SE-{event_id:06}"))
    }

    /// Returns the event number as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cancellation metadata recorded when an event is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    /// When the cancellation was recorded (RFC 3339).
    pub cancelled_at: String,
    /// The actor who cancelled the event.
    pub cancelled_by: String,
    /// The stated reason. Never empty.
    pub reason: String,
}

/// One car-to-shop repair cycle.
///
/// Created in `Requested` state and mutated only through validated
/// transitions. `version` is the optimistic-concurrency counter; every
/// committed transition increments it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingEvent {
    /// Internal identifier.
    pub event_id: i64,
    /// Immutable human-readable event number.
    pub event_number: EventNumber,
    /// The car being shopped.
    pub car_number: CarNumber,
    /// The shop handling the repair.
    pub shop_code: ShopCode,
    /// Event type classification code.
    pub type_code: String,
    /// Optional reason code supplied at creation.
    pub reason_code: Option<String>,
    /// Current workflow state.
    pub state: EventState,
    /// Optimistic-concurrency version counter.
    pub version: i64,
    /// The actor who created the event.
    pub created_by: String,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Cancellation metadata, present only for cancelled events.
    pub cancellation: Option<Cancellation>,
}

impl ShoppingEvent {
    /// Returns true if no further transitions are permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_number_normalizes_case_and_whitespace() {
        let car: CarNumber = CarNumber::new("  gatx12345 ");
        assert_eq!(car.value(), "GATX12345");
    }

    #[test]
    fn test_shop_code_normalizes() {
        let shop: ShopCode = ShopCode::new("up001");
        assert_eq!(shop.value(), "UP001");
    }

    #[test]
    fn test_event_number_from_id_is_zero_padded() {
        assert_eq!(EventNumber::from_event_id(42).value(), "SE-000042");
        assert_eq!(EventNumber::from_event_id(1_234_567).value(), "SE-1234567");
    }
}
