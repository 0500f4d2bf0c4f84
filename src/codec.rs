//! Boundary with the external wire-format codec
//!
//! The transport never interprets frame contents beyond the fixed header; it
//! hands raw bytes to an implementation of [`FrameCodec`] and carries whatever
//! frame type that codec produces. CRC computation and field validation live
//! entirely behind this seam.

/// The fixed RTU header fields extracted by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Station (slave) address
    pub address: u8,
    /// Raw function code byte
    pub function: u8,
}

/// Codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Encode target buffer cannot hold the serialized frame
    #[error("Buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall {
        /// Bytes the serialized frame requires
        needed: usize,
        /// Capacity of the target buffer
        capacity: usize,
    },

    /// CRC trailer does not match the frame contents
    #[error("CRC mismatch: expected {expected:#06X}, received {received:#06X}")]
    CrcMismatch {
        /// CRC computed over the received bytes
        expected: u16,
        /// CRC carried in the frame trailer
        received: u16,
    },

    /// Frame bytes do not form a structurally valid frame
    #[error("Malformed frame: {0}")]
    Malformed(String),
}

/// Wire-format codec for Modbus RTU frames.
///
/// `encode` must be a deterministic, pure function of the frame and must not
/// write past the buffer it is given. `decode_frame` is expected to verify
/// the trailer (CRC) and reject structurally invalid input.
pub trait FrameCodec {
    /// The decoded frame type this codec produces and consumes.
    type Frame;

    /// Serialize `frame` into `buf`, returning the number of bytes written.
    fn encode(&self, frame: &Self::Frame, buf: &mut [u8]) -> Result<usize, CodecError>;

    /// Extract the fixed header fields from the first
    /// [`RTU_HEADER_LEN`](crate::RTU_HEADER_LEN) bytes of a frame.
    fn decode_header(&self, buf: &[u8]) -> Result<FrameHeader, CodecError>;

    /// Validate and fully decode a complete frame, trailer included.
    fn decode_frame(&self, buf: &[u8]) -> Result<Self::Frame, CodecError>;
}
