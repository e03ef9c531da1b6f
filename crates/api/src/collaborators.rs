// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! External collaborator boundaries.
//!
//! Car master data and shop master data live in other systems. This
//! module defines the seams the API consults at event creation, plus
//! stub implementations for tests and default server wiring. The "one
//! non-terminal event per car" rule is likewise enforced upstream, not
//! here.

use std::collections::HashSet;

/// Lookup into the external car master data system.
pub trait CarRegistry {
    /// Returns true if the car number is known.
    fn car_exists(&self, car_number: &str) -> bool;
}

/// Lookup into the external shop directory.
pub trait ShopDirectory {
    /// Returns true if the shop code is known.
    fn shop_exists(&self, shop_code: &str) -> bool;
}

/// A registry that accepts every car number. Default server wiring
/// until a real master-data integration is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllCars;

impl CarRegistry for AcceptAllCars {
    fn car_exists(&self, _car_number: &str) -> bool {
        true
    }
}

/// A directory that accepts every shop code.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllShops;

impl ShopDirectory for AcceptAllShops {
    fn shop_exists(&self, _shop_code: &str) -> bool {
        true
    }
}

/// A registry backed by an explicit set of car numbers.
#[derive(Debug, Clone, Default)]
pub struct StaticCarRegistry {
    cars: HashSet<String>,
}

impl StaticCarRegistry {
    /// Creates a registry knowing exactly the given car numbers.
    #[must_use]
    pub fn new<I, S>(cars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cars: cars.into_iter().map(Into::into).collect(),
        }
    }
}

impl CarRegistry for StaticCarRegistry {
    fn car_exists(&self, car_number: &str) -> bool {
        self.cars.contains(car_number)
    }
}

/// A directory backed by an explicit set of shop codes.
#[derive(Debug, Clone, Default)]
pub struct StaticShopDirectory {
    shops: HashSet<String>,
}

impl StaticShopDirectory {
    /// Creates a directory knowing exactly the given shop codes.
    #[must_use]
    pub fn new<I, S>(shops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shops: shops.into_iter().map(Into::into).collect(),
        }
    }
}

impl ShopDirectory for StaticShopDirectory {
    fn shop_exists(&self, shop_code: &str) -> bool {
        self.shops.contains(shop_code)
    }
}
