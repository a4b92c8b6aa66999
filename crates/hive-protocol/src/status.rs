//! Status codes and the error envelope.
//!
//! Registries report arbitrary errors. Before an error crosses the wire it
//! is rendered into an [`Envelope`] carrying a [`Code`] and a message; the
//! original error type never leaves the node that produced it.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::messages::{self, Envelope, envelope};

/// Canonical status codes, numbered as in gRPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Code {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl Code {
    /// Maps a wire value back to a code. Unassigned values are `Unknown`.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::Ok,
            1 => Self::Cancelled,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
            Self::InvalidArgument => "invalid_argument",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::ResourceExhausted => "resource_exhausted",
            Self::FailedPrecondition => "failed_precondition",
            Self::Aborted => "aborted",
            Self::OutOfRange => "out_of_range",
            Self::Unimplemented => "unimplemented",
            Self::Internal => "internal",
            Self::Unavailable => "unavailable",
            Self::DataLoss => "data_loss",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error with a canonical code.
///
/// Registries may return a `Status` to choose the code their error is
/// rendered with; any other error type renders as [`Code::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Status {
    pub code: Code,
    pub message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(Code::Aborted, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }
}

impl Envelope {
    /// Renders any error into an error envelope.
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        let (code, message) = match err.downcast_ref::<Status>() {
            Some(status) => (status.code, status.message.clone()),
            None => (Code::Unknown, err.to_string()),
        };
        Self {
            cid: String::new(),
            message: Some(envelope::Message::Error(messages::Error {
                code: code as i32,
                message,
                context: HashMap::new(),
            })),
        }
    }

    /// Wraps an opaque application payload.
    pub fn payload(data: impl Into<Vec<u8>>) -> Self {
        Self {
            cid: String::new(),
            message: Some(envelope::Message::Payload(data.into())),
        }
    }

    /// Returns the carried error as a [`Status`], if this is an error envelope.
    pub fn as_status(&self) -> Option<Status> {
        match &self.message {
            Some(envelope::Message::Error(error)) => {
                Some(Status::new(Code::from_i32(error.code), error.message.clone()))
            }
            _ => None,
        }
    }
}
