// src/core/errors.rs

//! Defines the primary error type for the entire crate and the numeric
//! error-code space carried in batch replies.

use std::num::{ParseFloatError, ParseIntError};
use std::sync::Arc;
use strum_macros::FromRepr;
use thiserror::Error;

/// Numeric error codes shared by both ends of the batch protocol.
///
/// Replies carry these on the wire; the client also produces them locally
/// (pre-flight verification, stale handles, protocol failures). The space is
/// anchored at 15000 so that codes never collide with errno values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr)]
#[repr(i32)]
pub enum ErrCode {
    /// No error.
    #[default]
    None = 0,
    /// Unknown job identifier.
    UnkJobId = 15001,
    /// Undefined attribute for this object class.
    NoAttr = 15002,
    /// Attempt to set a read-only attribute.
    AttrRo = 15003,
    /// Invalid request.
    IvalReq = 15004,
    /// Unknown request type.
    UnkReq = 15005,
    /// Too many submit retries.
    TooMany = 15006,
    /// No permission.
    Perm = 15007,
    /// Access from host not allowed.
    BadHost = 15008,
    /// Job already exists.
    JobExist = 15009,
    /// System error.
    System = 15010,
    /// Internal server error.
    Internal = 15011,
    /// Unknown signal name.
    UnkSig = 15012,
    /// Illegal attribute or resource value.
    BadAtVal = 15013,
    /// Attribute cannot be modified while the job runs.
    ModAtrRun = 15014,
    /// Request invalid for the object's current state.
    BadState = 15015,
    /// Unknown queue.
    UnkQue = 15016,
    /// Queue already exists.
    QueExist = 15017,
    /// Illegal object name.
    BadName = 15018,
    /// Unknown resource.
    UnkResc = 15019,
    /// Connection table is full.
    NoConnects = 15020,
    /// No server to connect to.
    NoServer = 15021,
    /// Wire protocol failure.
    Protocol = 15022,
    /// Stale or unknown connection handle.
    NoConnection = 15023,
    /// Unknown node.
    UnkNode = 15024,
    /// Duplicate entry in an entity-limit list.
    DupList = 15025,
    /// Hook error reported by the server.
    HookError = 15026,
    /// Job finished; only historical information remains.
    HistJobId = 15027,
    /// Unknown reservation.
    UnkResv = 15028,
    /// Resource entry on a non-resource attribute.
    AttrType = 15029,
}

impl ErrCode {
    /// Maps a raw reply code onto the known space, keeping unknown values
    /// visible as `Internal` rather than silently zeroing them.
    pub fn from_wire(raw: i32) -> ErrCode {
        ErrCode::from_repr(raw).unwrap_or(ErrCode::Internal)
    }
}

/// The main error enum, representing all possible failures in the protocol
/// core and the clients built on it.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Frame exceeds protocol limits")]
    FrameTooLarge,

    #[error("Connection unusable after earlier protocol error")]
    ConnectionPoisoned,

    #[error("No free connection slots")]
    NoConnects,

    #[error("Unknown or stale connection handle")]
    NoConnection,

    #[error("No server to connect to")]
    NoServer,

    #[error("Cannot resolve server host '{0}'")]
    BadHost(String),

    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("Cannot modify read-only attribute '{0}'")]
    ReadOnlyAttribute(String),

    #[error("Illegal value for attribute '{attr}': {reason}")]
    BadAttributeValue { attr: String, reason: String },

    #[error("{message}")]
    VerificationFailed { index: usize, message: String },

    #[error("Request rejected by server: {}", text.as_deref().unwrap_or("no text"))]
    Rejected { code: ErrCode, text: Option<String> },

    #[error("Unknown Job Id {0}")]
    UnknownJobId(String),

    #[error("Job {0} has finished")]
    HistoryJobId(String),

    #[error("hook error returned from server")]
    HookError,

    #[error("Server disconnected due to idle connection timeout")]
    IdleTimeout,

    #[error("illegally formed job identifier: {0}")]
    InvalidJobId(String),

    #[error("illegally formed destination: {0}")]
    InvalidDestination(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BatchError {
    /// The numeric code this error surfaces as on a connection's error slot.
    pub fn code(&self) -> ErrCode {
        match self {
            BatchError::Io(_) | BatchError::IncompleteData => ErrCode::Protocol,
            BatchError::Protocol(_) | BatchError::FrameTooLarge => ErrCode::Protocol,
            BatchError::ConnectionPoisoned => ErrCode::Protocol,
            BatchError::NoConnects => ErrCode::NoConnects,
            BatchError::NoConnection => ErrCode::NoConnection,
            BatchError::NoServer => ErrCode::NoServer,
            BatchError::BadHost(_) => ErrCode::BadHost,
            BatchError::UnknownAttribute(_) => ErrCode::NoAttr,
            BatchError::ReadOnlyAttribute(_) => ErrCode::AttrRo,
            BatchError::BadAttributeValue { .. } => ErrCode::BadAtVal,
            BatchError::VerificationFailed { .. } => ErrCode::BadAtVal,
            BatchError::Rejected { code, .. } => *code,
            BatchError::UnknownJobId(_) => ErrCode::UnkJobId,
            BatchError::HistoryJobId(_) => ErrCode::HistJobId,
            BatchError::HookError => ErrCode::HookError,
            BatchError::IdleTimeout => ErrCode::Protocol,
            BatchError::InvalidJobId(_) | BatchError::InvalidDestination(_) => ErrCode::IvalReq,
            BatchError::Internal(_) => ErrCode::Internal,
        }
    }

    /// Builds the error for a non-zero reply code, special-casing the codes
    /// clients branch on.
    pub fn from_reply(code: ErrCode, text: Option<String>, id: &str) -> BatchError {
        match code {
            ErrCode::UnkJobId => BatchError::UnknownJobId(id.to_string()),
            ErrCode::HistJobId => BatchError::HistoryJobId(id.to_string()),
            ErrCode::HookError => BatchError::HookError,
            _ => BatchError::Rejected { code, text },
        }
    }
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
impl Clone for BatchError {
    fn clone(&self) -> Self {
        match self {
            BatchError::Io(e) => BatchError::Io(Arc::clone(e)),
            BatchError::IncompleteData => BatchError::IncompleteData,
            BatchError::Protocol(s) => BatchError::Protocol(s.clone()),
            BatchError::FrameTooLarge => BatchError::FrameTooLarge,
            BatchError::ConnectionPoisoned => BatchError::ConnectionPoisoned,
            BatchError::NoConnects => BatchError::NoConnects,
            BatchError::NoConnection => BatchError::NoConnection,
            BatchError::NoServer => BatchError::NoServer,
            BatchError::BadHost(s) => BatchError::BadHost(s.clone()),
            BatchError::UnknownAttribute(s) => BatchError::UnknownAttribute(s.clone()),
            BatchError::ReadOnlyAttribute(s) => BatchError::ReadOnlyAttribute(s.clone()),
            BatchError::BadAttributeValue { attr, reason } => BatchError::BadAttributeValue {
                attr: attr.clone(),
                reason: reason.clone(),
            },
            BatchError::VerificationFailed { index, message } => BatchError::VerificationFailed {
                index: *index,
                message: message.clone(),
            },
            BatchError::Rejected { code, text } => BatchError::Rejected {
                code: *code,
                text: text.clone(),
            },
            BatchError::UnknownJobId(s) => BatchError::UnknownJobId(s.clone()),
            BatchError::HistoryJobId(s) => BatchError::HistoryJobId(s.clone()),
            BatchError::HookError => BatchError::HookError,
            BatchError::IdleTimeout => BatchError::IdleTimeout,
            BatchError::InvalidJobId(s) => BatchError::InvalidJobId(s.clone()),
            BatchError::InvalidDestination(s) => BatchError::InvalidDestination(s.clone()),
            BatchError::Internal(s) => BatchError::Internal(s.clone()),
        }
    }
}

impl PartialEq for BatchError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BatchError::Io(e1), BatchError::Io(e2)) => e1.to_string() == e2.to_string(),
            (BatchError::Protocol(s1), BatchError::Protocol(s2)) => s1 == s2,
            (
                BatchError::Rejected { code: c1, text: t1 },
                BatchError::Rejected { code: c2, text: t2 },
            ) => c1 == c2 && t1 == t2,
            (BatchError::UnknownJobId(s1), BatchError::UnknownJobId(s2)) => s1 == s2,
            (BatchError::HistoryJobId(s1), BatchError::HistoryJobId(s2)) => s1 == s2,
            (BatchError::Internal(s1), BatchError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for BatchError {
    fn from(e: std::io::Error) -> Self {
        BatchError::Io(Arc::new(e))
    }
}

impl From<std::str::Utf8Error> for BatchError {
    fn from(e: std::str::Utf8Error) -> Self {
        BatchError::Protocol(format!("non-UTF-8 field on the wire: {e}"))
    }
}

impl From<std::string::FromUtf8Error> for BatchError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        BatchError::Protocol(format!("non-UTF-8 field on the wire: {e}"))
    }
}

impl From<ParseIntError> for BatchError {
    fn from(e: ParseIntError) -> Self {
        BatchError::Internal(format!("integer parse failure: {e}"))
    }
}

impl From<ParseFloatError> for BatchError {
    fn from(e: ParseFloatError) -> Self {
        BatchError::Internal(format!("float parse failure: {e}"))
    }
}
