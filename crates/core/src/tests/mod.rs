// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use shop_event_audit::Actor;
use shop_event_domain::{CarNumber, EventNumber, EventState, ShopCode, ShoppingEvent};

pub fn test_actor() -> Actor {
    Actor::new(String::from("op-17"), String::from("J. Smith"))
}

pub fn test_event(state: EventState) -> ShoppingEvent {
    ShoppingEvent {
        event_id: 42,
        event_number: EventNumber::from_event_id(42),
        car_number: CarNumber::new("GATX12345"),
        shop_code: ShopCode::new("UP001"),
        type_code: String::from("repair"),
        reason_code: Some(String::from("wheel_defect")),
        state,
        version: 3,
        created_by: String::from("op-17"),
        created_at: String::from("2026-03-01T09:00:00Z"),
        cancellation: None,
    }
}

pub const TEST_NOW: &str = "2026-03-02T14:30:00Z";
