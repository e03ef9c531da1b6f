// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested shopping event was not found.
    EventNotFound(i64),
    /// No shopping event carries the given event number.
    EventNumberNotFound(String),
    /// The requested estimate submission was not found.
    SubmissionNotFound(i64),
    /// The requested estimate line was not found.
    LineNotFound(i64),
    /// An approval packet already exists for the submission.
    PacketAlreadyFinalized { submission_id: i64 },
    /// The event was modified concurrently; the expected version no
    /// longer matches the stored row.
    ConcurrentModification { event_id: i64, expected_version: i64 },
    /// A stored value could not be reconstructed into its domain type.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::EventNotFound(id) => write!(f, "Shopping event not found: {id}"),
            Self::EventNumberNotFound(number) => {
                write!(f, "Shopping event not found: {number}")
            }
            Self::SubmissionNotFound(id) => write!(f, "Estimate submission not found: {id}"),
            Self::LineNotFound(id) => write!(f, "Estimate line not found: {id}"),
            Self::PacketAlreadyFinalized { submission_id } => {
                write!(
                    f,
                    "Submission {submission_id} already has a finalized approval packet"
                )
            }
            Self::ConcurrentModification {
                event_id,
                expected_version,
            } => {
                write!(
                    f,
                    "Event {event_id} was modified concurrently (expected version {expected_version})"
                )
            }
            Self::ReconstructionError(msg) => write!(f, "Reconstruction error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
