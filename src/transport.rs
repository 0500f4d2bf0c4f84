//! Frame transmitter and receiver
//!
//! [`RtuTransport`] writes fully framed requests and reconstructs exactly one
//! reply per [`receive`](RtuTransport::receive) call. Serial lines deliver
//! bytes in arbitrary-sized chunks with no message boundaries, so reception
//! runs in two phases: a fixed-length header read, then a body read whose
//! length is computed from the function code.

use crate::codec::FrameCodec;
use crate::config::{SerialSettings, DEFAULT_MAX_IDLE_READS};
use crate::error::TransportError;
use crate::function::{reply_body_length, FunctionCode, LENGTH_PEEK_LEN, MAX_FRAME_LEN, RTU_HEADER_LEN};
use crate::port::SerialLink;
use std::io::{Read, Write};
use tracing::{debug, trace};

/// Transport statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportStats {
    /// Bytes written to the line
    pub bytes_sent: u64,
    /// Bytes read from the line
    pub bytes_received: u64,
    /// Frames successfully transmitted
    pub frames_sent: u64,
    /// Frames successfully received and decoded
    pub frames_received: u64,
}

/// Reception phase of a frame in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Accumulating the fixed header plus the length-peek byte
    AwaitingHeader,
    /// Accumulating the computed body
    AwaitingBody,
    /// The full frame span is buffered
    Complete,
}

/// Accumulates one frame across arbitrarily chunked reads.
///
/// The buffer is sized for the largest frame the length rules can produce,
/// so the read window never extends past either the buffer capacity or the
/// computed frame boundary.
struct FrameAssembler {
    buf: [u8; MAX_FRAME_LEN],
    filled: usize,
    target: usize,
    phase: Phase,
}

impl FrameAssembler {
    fn new() -> Self {
        Self {
            buf: [0u8; MAX_FRAME_LEN],
            filled: 0,
            target: LENGTH_PEEK_LEN,
            phase: Phase::AwaitingHeader,
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn filled(&self) -> usize {
        self.filled
    }

    fn target(&self) -> usize {
        self.target
    }

    fn remaining(&self) -> usize {
        self.target - self.filled
    }

    /// Slot for the next read: from the fill point to the frame boundary.
    fn window(&mut self) -> &mut [u8] {
        &mut self.buf[self.filled..self.target]
    }

    fn advance(&mut self, n: usize) {
        self.filled += n;
        debug_assert!(self.filled <= self.target);
        if self.phase == Phase::AwaitingBody && self.filled == self.target {
            self.phase = Phase::Complete;
        }
    }

    /// Extend the frame boundary by the computed body length and move to the
    /// body phase. Must be called once, with the header bytes fully buffered.
    fn begin_body(&mut self, body_len: usize) {
        debug_assert_eq!(self.phase, Phase::AwaitingHeader);
        debug_assert_eq!(self.remaining(), 0);
        debug_assert!(self.target + body_len <= MAX_FRAME_LEN);
        self.target += body_len;
        self.phase = if body_len == 0 {
            Phase::Complete
        } else {
            Phase::AwaitingBody
        };
    }

    fn bytes(&self) -> &[u8] {
        &self.buf[..self.filled]
    }
}

/// Modbus RTU frame transport over a byte channel.
///
/// `P` is the serial channel ([`SerialLink`] in production, any
/// `Read + Write` in tests); `C` is the external wire-format codec. All
/// operations take `&mut self`: a transport is single-caller by construction
/// and callers that share one must serialize access themselves.
pub struct RtuTransport<P, C> {
    channel: P,
    codec: C,
    trace: bool,
    max_idle_reads: u32,
    stats: TransportStats,
}

impl<P, C> RtuTransport<P, C>
where
    P: Read + Write,
    C: FrameCodec,
{
    /// Create a transport over an already-open channel
    pub fn new(channel: P, codec: C) -> Self {
        Self {
            channel,
            codec,
            trace: false,
            max_idle_reads: DEFAULT_MAX_IDLE_READS,
            stats: TransportStats::default(),
        }
    }

    /// Enable hex-dump tracing of every byte sequence written and received
    #[must_use]
    pub fn trace(mut self, enable: bool) -> Self {
        self.trace = enable;
        self
    }

    /// Set how many consecutive empty reads a receive call tolerates.
    ///
    /// Each empty read costs one per-read timeout, so this bounds the total
    /// time a receive call can spend on a silent line.
    #[must_use]
    pub fn max_idle_reads(mut self, reads: u32) -> Self {
        self.max_idle_reads = reads;
        self
    }

    /// Encode `frame` and write it to the line as one logical write.
    ///
    /// Encoding failures perform no I/O. A write that accepts fewer bytes
    /// than encoded fails with [`TransportError::ShortWrite`] and no drain is
    /// attempted; on a full write the call blocks until the bytes have
    /// physically left the device.
    pub fn send(&mut self, frame: &C::Frame) -> Result<(), TransportError> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let len = self
            .codec
            .encode(frame, &mut buf)
            .map_err(TransportError::Encode)?;

        let written = self.channel.write(&buf[..len])?;
        if written != len {
            return Err(TransportError::ShortWrite {
                written,
                expected: len,
            });
        }
        self.channel.flush()?;

        if self.trace {
            debug!(target: "serbus::wire", "Wrote {} bytes: {}", len, hex::encode(&buf[..len]));
        }
        self.stats.bytes_sent += len as u64;
        self.stats.frames_sent += 1;
        Ok(())
    }

    /// Read exactly one frame from the line and decode it.
    ///
    /// Phase one accumulates the fixed header plus the length-peek byte;
    /// phase two accumulates the body length computed from the function
    /// code. Both phases tolerate partial reads and never consume past the
    /// frame boundary. A hard read error aborts immediately without
    /// invoking the frame parser.
    pub fn receive(&mut self) -> Result<C::Frame, TransportError> {
        let mut asm = FrameAssembler::new();

        self.fill(&mut asm)?;
        let header = self
            .codec
            .decode_header(&asm.bytes()[..RTU_HEADER_LEN])
            .map_err(TransportError::FrameParse)?;
        if let Some(fc) = FunctionCode::from_u8(header.function) {
            trace!("Reply header: station {}, {}", header.address, fc.name());
        }

        let body_len = reply_body_length(header.function, asm.bytes()[RTU_HEADER_LEN]);
        asm.begin_body(body_len);
        self.fill(&mut asm)?;
        debug_assert_eq!(asm.phase(), Phase::Complete);

        let raw = asm.bytes();
        self.stats.bytes_received += raw.len() as u64;
        if self.trace {
            debug!(target: "serbus::wire", "Read {} bytes: {}", raw.len(), hex::encode(raw));
        }

        let frame = self
            .codec
            .decode_frame(raw)
            .map_err(TransportError::FrameParse)?;
        self.stats.frames_received += 1;
        Ok(frame)
    }

    /// Accumulate bytes until the assembler's current boundary is reached.
    ///
    /// Empty reads and per-read timeouts are "no progress" and consume one
    /// unit of the idle budget each; any actual progress resets the budget.
    /// A hard read error is not retried.
    fn fill(&mut self, asm: &mut FrameAssembler) -> Result<(), TransportError> {
        let mut idle = 0u32;
        while asm.remaining() > 0 {
            match self.channel.read(asm.window()) {
                Ok(0) => {
                    idle += 1;
                    if idle >= self.max_idle_reads {
                        return Err(TransportError::ReadTimeout {
                            accumulated: asm.filled(),
                            needed: asm.target(),
                        });
                    }
                }
                Ok(n) => {
                    asm.advance(n);
                    idle = 0;
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    idle += 1;
                    if idle >= self.max_idle_reads {
                        return Err(TransportError::ReadTimeout {
                            accumulated: asm.filled(),
                            needed: asm.target(),
                        });
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(TransportError::Read {
                        accumulated: asm.filled(),
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    /// Get statistics
    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    /// Shared access to the underlying channel
    pub fn get_ref(&self) -> &P {
        &self.channel
    }

    /// Mutable access to the underlying channel
    pub fn get_mut(&mut self) -> &mut P {
        &mut self.channel
    }

    /// Shared access to the codec
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Consume the transport, returning the channel
    pub fn into_inner(self) -> P {
        self.channel
    }
}

impl<C: FrameCodec> RtuTransport<SerialLink, C> {
    /// Open the serial device described by `settings` and build a transport
    /// over it, carrying the settings' trace flag and idle-read budget.
    pub fn connect(settings: &SerialSettings, codec: C) -> Result<Self, TransportError> {
        let link = SerialLink::open(settings)?;
        Ok(Self::new(link, codec)
            .trace(settings.trace)
            .max_idle_reads(settings.max_idle_reads))
    }
}
