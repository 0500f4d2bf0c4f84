//! Serial channel handle
//!
//! [`SerialLink`] owns the open device and its line configuration. It is
//! either fully constructed (device open, configuration applied) or never
//! returned at all; dropping it releases the descriptor together with the
//! owned path, so disconnect cannot be forgotten or doubled.

use crate::config::{SerialParity, SerialSettings, DEFAULT_BAUD_RATE};
use crate::error::TransportError;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use tracing::debug;

/// The discrete baud rates the line accepts.
pub const SUPPORTED_BAUD_RATES: [u32; 7] = [300, 1200, 2400, 9600, 19200, 38400, 57600];

/// Resolve a requested baud rate against the supported table.
///
/// 0 is the "use the default" sentinel and resolves to
/// [`DEFAULT_BAUD_RATE`]; any other rate must appear in
/// [`SUPPORTED_BAUD_RATES`].
pub fn effective_baud_rate(requested: u32) -> Result<u32, TransportError> {
    if requested == 0 {
        return Ok(DEFAULT_BAUD_RATE);
    }
    if SUPPORTED_BAUD_RATES.contains(&requested) {
        Ok(requested)
    } else {
        Err(TransportError::UnsupportedBaudRate(requested))
    }
}

/// An open serial channel
pub struct SerialLink {
    path: String,
    baud_rate: u32,
    data_bits: u8,
    stop_bits: u8,
    parity: SerialParity,
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open and configure the serial device described by `settings`.
    ///
    /// The line is configured before the handle is returned: data bits,
    /// parity, stop bits, no flow control, and the per-read timeout from
    /// the settings. A baud rate of 0 selects the 9600 default; any other
    /// rate is validated against the supported table before the device is
    /// touched.
    pub fn open(settings: &SerialSettings) -> Result<Self, TransportError> {
        let baud_rate = effective_baud_rate(settings.baud_rate)?;

        // Out-of-range settings fall back to the RTU conventions; the
        // stored values describe the line as actually configured.
        let data_bits = match settings.data_bits {
            5..=7 => settings.data_bits,
            _ => 8,
        };
        let stop_bits = if settings.stop_bits == 2 { 2 } else { 1 };

        let line_data_bits = match data_bits {
            5 => DataBits::Five,
            6 => DataBits::Six,
            7 => DataBits::Seven,
            _ => DataBits::Eight,
        };

        let line_stop_bits = match stop_bits {
            2 => StopBits::Two,
            _ => StopBits::One,
        };

        let parity = match settings.parity {
            SerialParity::None => Parity::None,
            SerialParity::Odd => Parity::Odd,
            SerialParity::Even => Parity::Even,
        };

        let port = serialport::new(&settings.path, baud_rate)
            .data_bits(line_data_bits)
            .stop_bits(line_stop_bits)
            .parity(parity)
            .flow_control(FlowControl::None)
            .timeout(settings.read_timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => {
                    TransportError::PortNotFound(settings.path.clone())
                }
                serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                    TransportError::PermissionDenied(settings.path.clone())
                }
                _ => TransportError::ConnectionFailed(e.to_string()),
            })?;

        debug!("Opened {} at {} baud", settings.path, baud_rate);

        Ok(Self {
            path: settings.path.clone(),
            baud_rate,
            data_bits,
            stop_bits,
            parity: settings.parity,
            port,
        })
    }

    /// Change the line speed on the open device.
    ///
    /// Unlike [`SerialLink::open`], the 0 sentinel is not accepted here;
    /// the rate must be one of [`SUPPORTED_BAUD_RATES`]. On rejection the
    /// device is left untouched.
    pub fn set_baud_rate(&mut self, rate: u32) -> Result<(), TransportError> {
        if !SUPPORTED_BAUD_RATES.contains(&rate) {
            return Err(TransportError::UnsupportedBaudRate(rate));
        }
        self.port
            .set_baud_rate(rate)
            .map_err(std::io::Error::from)?;
        self.baud_rate = rate;
        debug!("Reconfigured {} to {} baud", self.path, rate);
        Ok(())
    }

    /// Device path this link was opened on
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Currently configured baud rate
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Get connection info string
    pub fn connection_info(&self) -> String {
        line_summary(
            &self.path,
            self.baud_rate,
            self.data_bits,
            self.parity,
            self.stop_bits,
        )
    }

    /// Close the device explicitly.
    ///
    /// Equivalent to dropping the link; provided for call sites that want
    /// the disconnect to be visible in the code.
    pub fn close(self) {
        drop(self);
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    /// Block until previously written bytes have physically left the device
    /// (tcdrain semantics).
    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate)
            .finish_non_exhaustive()
    }
}

/// List available serial ports
pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>, TransportError> {
    serialport::available_ports().map_err(|e| TransportError::Io(e.into()))
}

fn line_summary(path: &str, baud_rate: u32, data_bits: u8, parity: SerialParity, stop_bits: u8) -> String {
    format!(
        "{} @ {} baud ({}{}{})",
        path,
        baud_rate,
        data_bits,
        match parity {
            SerialParity::None => "N",
            SerialParity::Odd => "O",
            SerialParity::Even => "E",
        },
        stop_bits
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_rates_accepted() {
        for rate in SUPPORTED_BAUD_RATES {
            assert_eq!(effective_baud_rate(rate).unwrap(), rate);
        }
    }

    #[test]
    fn test_zero_selects_default() {
        assert_eq!(effective_baud_rate(0).unwrap(), 9600);
    }

    #[test]
    fn test_unsupported_rates_rejected() {
        for rate in [4800u32, 115_200, 9601, 1] {
            match effective_baud_rate(rate) {
                Err(TransportError::UnsupportedBaudRate(r)) => assert_eq!(r, rate),
                other => panic!("expected UnsupportedBaudRate, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_line_summary_reflects_configuration() {
        assert_eq!(
            line_summary("/dev/ttyS0", 9600, 8, SerialParity::Even, 1),
            "/dev/ttyS0 @ 9600 baud (8E1)"
        );
        assert_eq!(
            line_summary("COM3", 19200, 8, SerialParity::None, 1),
            "COM3 @ 19200 baud (8N1)"
        );
        assert_eq!(
            line_summary("/dev/ttyUSB0", 2400, 7, SerialParity::Odd, 2),
            "/dev/ttyUSB0 @ 2400 baud (7O2)"
        );
    }

    #[test]
    fn test_open_missing_device_fails_cleanly() {
        let settings = SerialSettings::new("/dev/does-not-exist-serbus", 9600);
        let result = SerialLink::open(&settings);
        assert!(matches!(
            result,
            Err(TransportError::PortNotFound(_) | TransportError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn test_open_rejects_bad_rate_before_touching_device() {
        // The rate check runs first, so even a nonexistent device reports
        // the rate problem.
        let settings = SerialSettings::new("/dev/does-not-exist-serbus", 4800);
        assert!(matches!(
            SerialLink::open(&settings),
            Err(TransportError::UnsupportedBaudRate(4800))
        ));
    }
}
