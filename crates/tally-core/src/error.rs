//! Shared error type across tally crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed request body or path.
    BadRequest,
    /// Year or month out of range.
    InvalidPeriod,
    /// Department not in the catalog.
    UnknownDepartment,
    /// Issue type not in the catalog.
    UnknownIssueType,
    /// No such resource.
    NotFound,
    /// Persistence failure.
    Store,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidPeriod => "INVALID_PERIOD",
            ClientCode::UnknownDepartment => "UNKNOWN_DEPARTMENT",
            ClientCode::UnknownIssueType => "UNKNOWN_ISSUE_TYPE",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Store => "STORE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Unified error type used by core, store and server.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("unknown department: {0}")]
    UnknownDepartment(String),
    #[error("unknown issue type: {0}")]
    UnknownIssueType(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store: {0}")]
    Store(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TallyError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TallyError::BadRequest(_) => ClientCode::BadRequest,
            TallyError::InvalidPeriod(_) => ClientCode::InvalidPeriod,
            TallyError::UnknownDepartment(_) => ClientCode::UnknownDepartment,
            TallyError::UnknownIssueType(_) => ClientCode::UnknownIssueType,
            TallyError::NotFound(_) => ClientCode::NotFound,
            TallyError::Store(_) => ClientCode::Store,
            TallyError::Internal(_) => ClientCode::Internal,
        }
    }
}
