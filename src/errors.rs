//! Error definitions
//!
//! This module defines all error types and error handling utilities for the client.
//! Errors are categorized into lifecycle, protocol, network, and server-reported errors.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, FastDFSError>;

/// Base error type for all client operations
#[derive(Error, Debug)]
pub enum FastDFSError {
    /// Client (or the pool backing it) has been closed
    #[error("client is closed")]
    ClientClosed,

    /// Requested file does not exist (server status 2, ENOENT)
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// No storage server is available for the requested operation
    #[error("no storage server available")]
    NoStorageServer,

    /// Establishing a new transport did not complete within connect_timeout
    #[error("connection timeout to {0}")]
    ConnectionTimeout(String),

    /// A read or write did not complete within network_timeout
    #[error("network timeout during {0}")]
    NetworkTimeout(String),

    /// File ID is not of the form "group/remote_filename"
    #[error("invalid file ID: {0}")]
    InvalidFileId(String),

    /// Server response was malformed or internally inconsistent
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Insufficient storage space (server status 28, ENOSPC)
    #[error("insufficient storage space")]
    InsufficientSpace,

    /// File already exists (server status 6, EEXIST)
    #[error("file already exists: {0}")]
    FileAlreadyExists(String),

    /// Invalid metadata format
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Invalid argument was provided by the caller
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Non-zero server status not covered by a more specific variant
    #[error("server error (status {0})")]
    ServerError(u8),

    /// Transport-level (connect/read/write) failure
    #[error("transport error during {operation} to {addr}: {source}")]
    Transport {
        operation: &'static str,
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Cancellation signal observed before the operation completed
    #[error("operation cancelled")]
    Cancelled,

    /// I/O error not otherwise classified (e.g. local filesystem access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl FastDFSError {
    /// Whether a transport carrying this error should be discarded rather than pooled.
    pub fn poisons_transport(&self) -> bool {
        matches!(
            self,
            FastDFSError::Transport { .. }
                | FastDFSError::ConnectionTimeout(_)
                | FastDFSError::NetworkTimeout(_)
                | FastDFSError::Protocol(_)
                | FastDFSError::Cancelled
                | FastDFSError::ServerError(_)
        )
    }

    /// Whether the orchestrator should retry the attempt that produced this error.
    ///
    /// Logical failures (not-found, already-exists, invalid input) are never retried;
    /// transport-level failures and timeouts are, up to `retry_count`.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FastDFSError::Transport { .. }
                | FastDFSError::ConnectionTimeout(_)
                | FastDFSError::NetworkTimeout(_)
                | FastDFSError::NoStorageServer
        )
    }
}

/// Maps protocol status codes to client errors.
///
/// Status code 0 indicates success (no error). Other status codes are mapped to
/// predefined errors where the protocol gives them specific meaning, or to
/// `ServerError` otherwise.
///
/// Known status codes:
///   - 0: success
///   - 2: file not found (ENOENT)
///   - 6: file already exists (EEXIST)
///   - 22: invalid argument (EINVAL)
///   - 28: insufficient space (ENOSPC)
pub fn map_status_to_error(status: u8, file_id: &str) -> Option<FastDFSError> {
    match status {
        0 => None,
        2 => Some(FastDFSError::FileNotFound(file_id.to_string())),
        6 => Some(FastDFSError::FileAlreadyExists(file_id.to_string())),
        22 => Some(FastDFSError::InvalidArgument(file_id.to_string())),
        28 => Some(FastDFSError::InsufficientSpace),
        other => Some(FastDFSError::ServerError(other)),
    }
}
