// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side query operations.

pub mod decisions;
pub mod estimates;
pub mod events;
pub mod history;
