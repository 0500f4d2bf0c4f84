//! # Serbus
//!
//! A Modbus RTU frame transport for asynchronous serial lines
//! (RS-232/RS-485). The crate owns the serial device lifecycle and the
//! byte-accurate framing logic:
//!
//! - Device connect/configure/disconnect with a closed baud rate table
//! - Frame transmission with output drain and short-write detection
//! - Two-phase variable-length frame reception: a fixed header read, then a
//!   body read whose length is computed from the function code, tolerant of
//!   arbitrarily chunked partial reads
//!
//! The wire-format codec (encode, header decode, full decode with CRC
//! verification) is an external collaborator supplied through the
//! [`FrameCodec`] trait; the transport carries whatever frame type the codec
//! defines. Higher-level request/response orchestration, retries, and Modbus
//! TCP are out of scope.
//!
//! ## Example
//!
//! ```rust,no_run
//! use serbus::{RtuTransport, SerialSettings};
//! # use serbus::{CodecError, FrameCodec, FrameHeader};
//! # struct MyCodec;
//! # impl FrameCodec for MyCodec {
//! #     type Frame = Vec<u8>;
//! #     fn encode(&self, f: &Vec<u8>, b: &mut [u8]) -> Result<usize, CodecError> { unimplemented!() }
//! #     fn decode_header(&self, b: &[u8]) -> Result<FrameHeader, CodecError> { unimplemented!() }
//! #     fn decode_frame(&self, b: &[u8]) -> Result<Vec<u8>, CodecError> { unimplemented!() }
//! # }
//! # fn request() -> Vec<u8> { Vec::new() }
//!
//! fn main() -> Result<(), serbus::TransportError> {
//!     let settings = SerialSettings::new("/dev/ttyUSB0", 19200).trace(true);
//!     let mut transport = RtuTransport::connect(&settings, MyCodec)?;
//!
//!     transport.send(&request())?;
//!     let reply = transport.receive()?;
//!     # let _ = reply;
//!     Ok(())
//! }
//! ```
//!
//! All operations are synchronous and blocking; a transport takes `&mut self`
//! everywhere and is not safe for concurrent use without external
//! serialization.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod config;
pub mod error;
pub mod function;
pub mod port;
pub mod transport;

// Re-exports for convenience
pub use crate::codec::{CodecError, FrameCodec, FrameHeader};
pub use crate::config::{
    SerialParity, SerialSettings, DEFAULT_BAUD_RATE, DEFAULT_MAX_IDLE_READS, DEFAULT_READ_TIMEOUT,
};
pub use crate::error::TransportError;
pub use crate::function::{
    reply_body_length, FunctionCode, LENGTH_PEEK_LEN, MAX_BODY_LEN, MAX_FRAME_LEN, RTU_HEADER_LEN,
};
pub use crate::port::{effective_baud_rate, list_ports, SerialLink, SUPPORTED_BAUD_RATES};
pub use crate::transport::{RtuTransport, TransportStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
