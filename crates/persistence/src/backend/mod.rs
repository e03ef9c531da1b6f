// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend utilities.
//!
//! `SQLite` is the only supported backend: in-memory databases for tests
//! and file-based databases (with WAL) for deployments.

pub mod sqlite;
