//! Error types for the Takeout client.
//!
//! # Design
//! One flat enum covers every failure a client operation can surface. Remote
//! failures keep the raw HTTP status so callers can decide whether to retry;
//! precondition failures are raised before any request is built, so they
//! never cost a round-trip. `kind()` groups variants into the coarse
//! categories callers usually branch on.

use std::path::PathBuf;

use thiserror::Error;

/// Which `send` precondition was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendPrecondition {
    /// No token was stored, or the stored token is blank.
    #[error("token was either never provided or is blank; call login with your token first")]
    MissingToken,
    /// One of `to`, `from` or `subject` is missing.
    #[error("one of the required fields was not provided; check that to, from and subject are set")]
    MissingRequiredField,
}

/// Coarse category of a `TakeoutError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Environment,
    FileSystem,
    CloudTemplate,
    SendPrecondition,
    SendRemote,
    Verify,
    Transport,
    Serialization,
    Deserialization,
}

/// Errors returned by Takeout client operations.
#[derive(Debug, Error)]
pub enum TakeoutError {
    /// The auth endpoint rejected the token.
    #[error("takeout login error: HTTP {status}")]
    Auth { status: u16 },

    /// Local template reads are not available on this target.
    #[error("takeout environment error: {0}")]
    Environment(&'static str),

    /// Reading a local template failed. The I/O error is kept untouched.
    #[error("takeout file error: could not read {}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `get_cloud_template` was called without a template name.
    #[error("takeout cloud template error: a template name wasn't provided")]
    MissingTemplateName,

    /// The template store answered with a non-success status.
    #[error("takeout cloud template error: HTTP {status}")]
    CloudTemplate { status: u16 },

    /// `send` was refused locally, before any request was built.
    #[error("takeout send error: {0}")]
    SendPrecondition(SendPrecondition),

    /// The send endpoint answered with a non-success status.
    #[error("takeout send error: HTTP {status}: {detail}")]
    SendRemote { status: u16, detail: String },

    /// `verify_email` was called without an address.
    #[error("takeout verify error: an email wasn't provided")]
    MissingEmail,

    /// The verification endpoint answered with a non-success status.
    #[error("takeout verify error: HTTP {status}")]
    Verify { status: u16 },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A success response body did not have the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl TakeoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TakeoutError::Auth { .. } => ErrorKind::Auth,
            TakeoutError::Environment(_) => ErrorKind::Environment,
            TakeoutError::FileSystem { .. } => ErrorKind::FileSystem,
            TakeoutError::MissingTemplateName | TakeoutError::CloudTemplate { .. } => {
                ErrorKind::CloudTemplate
            }
            TakeoutError::SendPrecondition(_) => ErrorKind::SendPrecondition,
            TakeoutError::SendRemote { .. } => ErrorKind::SendRemote,
            TakeoutError::MissingEmail | TakeoutError::Verify { .. } => ErrorKind::Verify,
            TakeoutError::Transport(_) => ErrorKind::Transport,
            TakeoutError::Serialization(_) => ErrorKind::Serialization,
            TakeoutError::Deserialization(_) => ErrorKind::Deserialization,
        }
    }

    /// HTTP status reported by the remote service, if this is a remote failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            TakeoutError::Auth { status }
            | TakeoutError::CloudTemplate { status }
            | TakeoutError::SendRemote { status, .. }
            | TakeoutError::Verify { status } => Some(*status),
            _ => None,
        }
    }
}
