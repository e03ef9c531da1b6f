// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation operations.
//!
//! Every mutation that spans more than one table runs inside a single
//! Diesel transaction so the event row, its ledger, and the estimate
//! tables can never drift apart.

pub mod approvals;
pub mod decisions;
pub mod estimates;
pub mod events;
