//! Primitive decode half of the wire format.

use bytes::Buf;

use crate::error::{MarqueeError, Result};

/// Trait for reading primitive wire values.
///
/// Multi-byte integers arrive in big-endian order and are converted to host
/// order on read. Floating point values are carried in raw host byte order:
/// the protocol has never byte-swapped them, and every deployed peer runs on
/// a little-endian host, so converting here would break the wire format.
pub trait DataInput {
    /// Reads a single byte (i8).
    fn read_byte(&mut self) -> Result<i8>;

    /// Reads a boolean from a single byte. Any nonzero byte is `true`.
    fn read_bool(&mut self) -> Result<bool>;

    /// Reads a 16-bit signed integer in big-endian order.
    fn read_short(&mut self) -> Result<i16>;

    /// Reads a 32-bit signed integer in big-endian order.
    fn read_int(&mut self) -> Result<i32>;

    /// Reads a 64-bit signed integer in big-endian order.
    fn read_long(&mut self) -> Result<i64>;

    /// Reads a 32-bit floating point value in host byte order.
    fn read_float(&mut self) -> Result<f32>;

    /// Reads a 64-bit floating point value in host byte order.
    fn read_double(&mut self) -> Result<f64>;

    /// Reads the specified number of raw bytes.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Reads length-prefixed text: a 16-bit unsigned byte length followed
    /// by that many bytes of UTF-8.
    fn read_utf(&mut self) -> Result<String>;
}

pub(crate) fn ensure_remaining(remaining: usize, needed: usize) -> Result<()> {
    if remaining < needed {
        Err(MarqueeError::UnexpectedEof { needed, remaining })
    } else {
        Ok(())
    }
}

impl<B: Buf> DataInput for B {
    fn read_byte(&mut self) -> Result<i8> {
        ensure_remaining(self.remaining(), 1)?;
        Ok(self.get_i8())
    }

    fn read_bool(&mut self) -> Result<bool> {
        ensure_remaining(self.remaining(), 1)?;
        Ok(self.get_u8() != 0)
    }

    fn read_short(&mut self) -> Result<i16> {
        ensure_remaining(self.remaining(), 2)?;
        Ok(self.get_i16())
    }

    fn read_int(&mut self) -> Result<i32> {
        ensure_remaining(self.remaining(), 4)?;
        Ok(self.get_i32())
    }

    fn read_long(&mut self) -> Result<i64> {
        ensure_remaining(self.remaining(), 8)?;
        Ok(self.get_i64())
    }

    fn read_float(&mut self) -> Result<f32> {
        ensure_remaining(self.remaining(), 4)?;
        let mut raw = [0u8; 4];
        self.copy_to_slice(&mut raw);
        Ok(f32::from_ne_bytes(raw))
    }

    fn read_double(&mut self) -> Result<f64> {
        ensure_remaining(self.remaining(), 8)?;
        let mut raw = [0u8; 8];
        self.copy_to_slice(&mut raw);
        Ok(f64::from_ne_bytes(raw))
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        ensure_remaining(self.remaining(), len)?;
        let mut buf = vec![0u8; len];
        self.copy_to_slice(&mut buf);
        Ok(buf)
    }

    fn read_utf(&mut self) -> Result<String> {
        ensure_remaining(self.remaining(), 2)?;
        let len = self.get_u16() as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|e| MarqueeError::Protocol(format!("invalid UTF-8 text: {}", e)))
    }
}
