//! Modbus RTU function codes and reply geometry
//!
//! RTU frames carry no length prefix or delimiter; the only way to know how
//! long a reply is going to be is to look at its function code (and, for the
//! read replies, the self-declared byte count field).

/// Fixed RTU header length in bytes: station address + function code.
pub const RTU_HEADER_LEN: usize = 2;

/// Bytes consumed in the first reception phase: the fixed header plus one
/// more byte, which for read replies is the byte count field.
pub const LENGTH_PEEK_LEN: usize = RTU_HEADER_LEN + 1;

/// Largest reply body the length rules can produce: a byte count field of
/// 255 plus the two trailing CRC bytes.
pub const MAX_BODY_LEN: usize = 2 + u8::MAX as usize;

/// Frame buffer capacity: first-phase bytes plus the largest possible body.
pub const MAX_FRAME_LEN: usize = LENGTH_PEEK_LEN + MAX_BODY_LEN;

/// Modbus function codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FunctionCode {
    /// Read Coils (0x01)
    ReadCoils = 0x01,
    /// Read Discrete Inputs (0x02)
    ReadDiscreteInputs = 0x02,
    /// Read Holding Registers (0x03)
    ReadHoldingRegisters = 0x03,
    /// Read Input Registers (0x04)
    ReadInputRegisters = 0x04,
    /// Write Single Coil (0x05)
    WriteSingleCoil = 0x05,
    /// Write Single Register (0x06)
    WriteSingleRegister = 0x06,
    /// Write Multiple Coils (0x0F)
    WriteMultipleCoils = 0x0F,
    /// Write Multiple Registers (0x10)
    WriteMultipleRegisters = 0x10,
}

impl FunctionCode {
    /// Get function code from u8
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(FunctionCode::ReadCoils),
            0x02 => Some(FunctionCode::ReadDiscreteInputs),
            0x03 => Some(FunctionCode::ReadHoldingRegisters),
            0x04 => Some(FunctionCode::ReadInputRegisters),
            0x05 => Some(FunctionCode::WriteSingleCoil),
            0x06 => Some(FunctionCode::WriteSingleRegister),
            0x0F => Some(FunctionCode::WriteMultipleCoils),
            0x10 => Some(FunctionCode::WriteMultipleRegisters),
            _ => None,
        }
    }

    /// Get name of function code
    pub fn name(&self) -> &'static str {
        match self {
            FunctionCode::ReadCoils => "Read Coils",
            FunctionCode::ReadDiscreteInputs => "Read Discrete Inputs",
            FunctionCode::ReadHoldingRegisters => "Read Holding Registers",
            FunctionCode::ReadInputRegisters => "Read Input Registers",
            FunctionCode::WriteSingleCoil => "Write Single Coil",
            FunctionCode::WriteSingleRegister => "Write Single Register",
            FunctionCode::WriteMultipleCoils => "Write Multiple Coils",
            FunctionCode::WriteMultipleRegisters => "Write Multiple Registers",
        }
    }
}

/// Number of body bytes that follow the first [`LENGTH_PEEK_LEN`] bytes of a
/// reply with the given function code.
///
/// `byte_count` is the third buffered byte. For the read-class replies it is
/// the byte count field, so the remaining body is that many data bytes plus
/// the two CRC bytes. Single-coil and single-register echoes are a fixed five
/// bytes. Every other code, recognized or not, falls into the fixed
/// eight-byte default bucket; strict validation is the frame parser's job.
pub fn reply_body_length(function: u8, byte_count: u8) -> usize {
    use FunctionCode::*;

    match FunctionCode::from_u8(function) {
        Some(ReadCoils | ReadDiscreteInputs | ReadHoldingRegisters | ReadInputRegisters) => {
            2 + byte_count as usize
        }
        Some(WriteSingleCoil | WriteSingleRegister) => 5,
        _ => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_class_uses_byte_count() {
        assert_eq!(reply_body_length(0x03, 4), 6); // 4 data + 2 CRC
        assert_eq!(reply_body_length(0x01, 1), 3);
        assert_eq!(reply_body_length(0x02, 0), 2);
        assert_eq!(reply_body_length(0x04, 250), 252);
    }

    #[test]
    fn test_single_write_echo_is_fixed() {
        assert_eq!(reply_body_length(0x05, 0xAA), 5);
        assert_eq!(reply_body_length(0x06, 0x00), 5);
    }

    #[test]
    fn test_default_bucket() {
        // Recognized multi-write echoes and unknown codes both land in the
        // fixed eight-byte bucket; the byte count field is ignored there.
        assert_eq!(reply_body_length(0x10, 4), 8);
        assert_eq!(reply_body_length(0x0F, 0), 8);
        assert_eq!(reply_body_length(0x2B, 99), 8);
        assert_eq!(reply_body_length(0x00, 0), 8);
    }

    #[test]
    fn test_max_body_fits_buffer() {
        assert_eq!(reply_body_length(0x03, u8::MAX), MAX_BODY_LEN);
        assert!(LENGTH_PEEK_LEN + MAX_BODY_LEN <= MAX_FRAME_LEN);
    }

    #[test]
    fn test_function_code_roundtrip() {
        for code in [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x0F, 0x10] {
            let fc = FunctionCode::from_u8(code).unwrap();
            assert_eq!(fc as u8, code);
            assert!(!fc.name().is_empty());
        }
        assert!(FunctionCode::from_u8(0x2B).is_none());
    }
}
