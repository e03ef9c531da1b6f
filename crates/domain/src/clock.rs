// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp helpers.
//!
//! All timestamps in the system are RFC 3339 UTC strings; SQLite stores
//! them as TEXT and lexicographic order matches chronological order.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Returns the current UTC time as an RFC 3339 string.
///
/// Falls back to a fixed epoch string if formatting fails, which cannot
/// happen for `Rfc3339` with a valid `OffsetDateTime`.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
