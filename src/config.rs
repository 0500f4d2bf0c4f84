//! Serial line settings
//!
//! Modbus RTU lines conventionally run 8 data bits, even parity, one stop
//! bit, so that is the default here. The read timeout doubles as the
//! inter-byte timeout for the frame receiver.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Baud rate selected when the configured rate is the 0 sentinel.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default per-read timeout (one second of line silence).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default number of consecutive empty reads tolerated before a receive
/// call gives up. At the default read timeout this is roughly ten seconds
/// of silence.
pub const DEFAULT_MAX_IDLE_READS: u32 = 10;

/// Serial port parity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerialParity {
    /// No parity
    None,
    /// Odd parity
    Odd,
    /// Even parity
    #[default]
    Even,
}

impl std::str::FromStr for SerialParity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "n" => Ok(Self::None),
            "odd" | "o" => Ok(Self::Odd),
            "even" | "e" => Ok(Self::Even),
            _ => Ok(Self::Even),
        }
    }
}

/// Serial line configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Device path (e.g., /dev/ttyUSB0, COM3)
    pub path: String,
    /// Baud rate; 0 selects [`DEFAULT_BAUD_RATE`]
    pub baud_rate: u32,
    /// Data bits (5, 6, 7, 8)
    pub data_bits: u8,
    /// Stop bits (1, 2)
    pub stop_bits: u8,
    /// Parity
    pub parity: SerialParity,
    /// Per-read timeout; a read returns empty after this much silence
    pub read_timeout: Duration,
    /// Emit hex dumps of every byte sequence written and received
    pub trace: bool,
    /// Consecutive empty reads tolerated before a receive call fails
    pub max_idle_reads: u32,
}

impl SerialSettings {
    /// Create settings for a device path and baud rate with RTU defaults
    pub fn new(path: &str, baud_rate: u32) -> Self {
        Self {
            path: path.to_string(),
            baud_rate,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::Even,
            read_timeout: DEFAULT_READ_TIMEOUT,
            trace: false,
            max_idle_reads: DEFAULT_MAX_IDLE_READS,
        }
    }

    /// Set data bits
    #[must_use]
    pub fn data_bits(mut self, bits: u8) -> Self {
        self.data_bits = bits;
        self
    }

    /// Set stop bits
    #[must_use]
    pub fn stop_bits(mut self, bits: u8) -> Self {
        self.stop_bits = bits;
        self
    }

    /// Set parity
    #[must_use]
    pub fn parity(mut self, parity: SerialParity) -> Self {
        self.parity = parity;
        self
    }

    /// Set the per-read timeout
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Enable wire tracing
    #[must_use]
    pub fn trace(mut self, enable: bool) -> Self {
        self.trace = enable;
        self
    }

    /// Set the idle-read budget
    #[must_use]
    pub fn max_idle_reads(mut self, reads: u32) -> Self {
        self.max_idle_reads = reads;
        self
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self::new("/dev/ttyUSB0", DEFAULT_BAUD_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtu_defaults() {
        let settings = SerialSettings::new("/dev/ttyS0", 19200);
        assert_eq!(settings.data_bits, 8);
        assert_eq!(settings.stop_bits, 1);
        assert_eq!(settings.parity, SerialParity::Even);
        assert_eq!(settings.read_timeout, Duration::from_secs(1));
        assert!(!settings.trace);
    }

    #[test]
    fn test_builder_chain() {
        let settings = SerialSettings::new("COM3", 38400)
            .parity(SerialParity::None)
            .stop_bits(2)
            .trace(true)
            .max_idle_reads(3);
        assert_eq!(settings.parity, SerialParity::None);
        assert_eq!(settings.stop_bits, 2);
        assert!(settings.trace);
        assert_eq!(settings.max_idle_reads, 3);
    }

    #[test]
    fn test_parity_from_str() {
        assert_eq!("none".parse::<SerialParity>(), Ok(SerialParity::None));
        assert_eq!("E".parse::<SerialParity>(), Ok(SerialParity::Even));
        assert_eq!("odd".parse::<SerialParity>(), Ok(SerialParity::Odd));
    }
}
