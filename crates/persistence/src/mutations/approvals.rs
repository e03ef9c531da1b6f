// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval packet mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shop_event_domain::{ApprovalPacket, OverallDecision, SubmissionStatus};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewPacketRow;
use crate::diesel_schema::{approval_packets, estimate_submissions};
use crate::error::PersistenceError;

/// Finalizes an approval packet for a submission and moves the
/// submission to the status the packet's decision imposes, in one
/// transaction.
///
/// At most one packet may exist per submission; a second finalization
/// attempt fails.
///
/// # Errors
///
/// Returns an error if:
/// - The submission does not exist
/// - A packet was already finalized for the submission
/// - The database operation fails
#[allow(clippy::too_many_arguments)]
pub fn insert_packet(
    conn: &mut SqliteConnection,
    submission_id: i64,
    decision: OverallDecision,
    approved_line_ids: &[i64],
    notes: Option<&str>,
    decided_by: &str,
    decided_at: &str,
    new_status: SubmissionStatus,
) -> Result<ApprovalPacket, PersistenceError> {
    conn.transaction::<ApprovalPacket, PersistenceError, _>(|conn| {
        let submission_exists: i64 = estimate_submissions::table
            .filter(estimate_submissions::submission_id.eq(submission_id))
            .count()
            .get_result(conn)?;
        if submission_exists == 0 {
            return Err(PersistenceError::SubmissionNotFound(submission_id));
        }

        let packet_exists: i64 = approval_packets::table
            .filter(approval_packets::submission_id.eq(submission_id))
            .count()
            .get_result(conn)?;
        if packet_exists > 0 {
            return Err(PersistenceError::PacketAlreadyFinalized { submission_id });
        }

        let approved_line_ids_json: String = serde_json::to_string(approved_line_ids)?;
        let row = NewPacketRow {
            submission_id,
            decision: decision.as_str().to_string(),
            approved_line_ids_json,
            notes: notes.map(ToString::to_string),
            decided_by: decided_by.to_string(),
            decided_at: decided_at.to_string(),
        };

        diesel::insert_into(approval_packets::table)
            .values(&row)
            .execute(conn)?;
        let packet_id: i64 = get_last_insert_rowid(conn)?;

        diesel::update(
            estimate_submissions::table
                .filter(estimate_submissions::submission_id.eq(submission_id)),
        )
        .set(estimate_submissions::status.eq(new_status.as_str()))
        .execute(conn)?;

        Ok(ApprovalPacket {
            packet_id,
            submission_id,
            decision,
            approved_line_ids: approved_line_ids.to_vec(),
            notes: notes.map(ToString::to_string),
            decided_by: decided_by.to_string(),
            decided_at: decided_at.to_string(),
        })
    })
}
