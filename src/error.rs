//! Transport error types

use crate::codec::CodecError;

/// Transport error types
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Baud rate outside the supported table
    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),

    /// Frame could not be serialized; no bytes were written
    #[error("Encode error: {0}")]
    Encode(#[source] CodecError),

    /// Fewer bytes were physically written than encoded
    #[error("Short write: {written} of {expected} bytes written")]
    ShortWrite {
        /// Bytes the device accepted
        written: usize,
        /// Bytes the encoded frame required
        expected: usize,
    },

    /// The underlying read failed mid-frame
    #[error("Read failed after {accumulated} bytes: {source}")]
    Read {
        /// Bytes already accumulated for the current frame
        accumulated: usize,
        /// The OS-level read error
        #[source]
        source: std::io::Error,
    },

    /// The line stayed silent past the idle-read budget
    #[error("Read timed out after {accumulated} of {needed} bytes")]
    ReadTimeout {
        /// Bytes already accumulated for the current frame
        accumulated: usize,
        /// Bytes the current frame requires in total
        needed: usize,
    },

    /// Received bytes do not decode into a valid frame
    #[error("Frame parse error: {0}")]
    FrameParse(#[source] CodecError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
