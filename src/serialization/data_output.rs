//! Primitive encode half of the wire format.

use bytes::BufMut;

use crate::error::{MarqueeError, Result};

/// Trait for writing primitive wire values.
///
/// The byte-order contract mirrors [`DataInput`](super::DataInput): integers
/// go out big-endian, floating point values go out in raw host byte order.
pub trait DataOutput {
    /// Writes a single byte (i8).
    fn write_byte(&mut self, v: i8) -> Result<()>;

    /// Writes a boolean as a single byte (0 for false, 1 for true).
    fn write_bool(&mut self, v: bool) -> Result<()>;

    /// Writes a 16-bit signed integer in big-endian order.
    fn write_short(&mut self, v: i16) -> Result<()>;

    /// Writes a 32-bit signed integer in big-endian order.
    fn write_int(&mut self, v: i32) -> Result<()>;

    /// Writes a 64-bit signed integer in big-endian order.
    fn write_long(&mut self, v: i64) -> Result<()>;

    /// Writes a 32-bit floating point value in host byte order.
    fn write_float(&mut self, v: f32) -> Result<()>;

    /// Writes a 64-bit floating point value in host byte order.
    fn write_double(&mut self, v: f64) -> Result<()>;

    /// Writes raw bytes without a length prefix.
    fn write_bytes(&mut self, v: &[u8]) -> Result<()>;

    /// Writes length-prefixed text: a 16-bit unsigned byte length followed
    /// by the UTF-8 bytes. Fails if the text exceeds 65,535 bytes.
    fn write_utf(&mut self, v: &str) -> Result<()>;
}

impl<B: BufMut> DataOutput for B {
    fn write_byte(&mut self, v: i8) -> Result<()> {
        self.put_i8(v);
        Ok(())
    }

    fn write_bool(&mut self, v: bool) -> Result<()> {
        self.put_u8(u8::from(v));
        Ok(())
    }

    fn write_short(&mut self, v: i16) -> Result<()> {
        self.put_i16(v);
        Ok(())
    }

    fn write_int(&mut self, v: i32) -> Result<()> {
        self.put_i32(v);
        Ok(())
    }

    fn write_long(&mut self, v: i64) -> Result<()> {
        self.put_i64(v);
        Ok(())
    }

    fn write_float(&mut self, v: f32) -> Result<()> {
        self.put_slice(&v.to_ne_bytes());
        Ok(())
    }

    fn write_double(&mut self, v: f64) -> Result<()> {
        self.put_slice(&v.to_ne_bytes());
        Ok(())
    }

    fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.put_slice(v);
        Ok(())
    }

    fn write_utf(&mut self, v: &str) -> Result<()> {
        let len = u16::try_from(v.len()).map_err(|_| {
            MarqueeError::Protocol(format!("text too long for wire: {} bytes", v.len()))
        })?;
        self.put_u16(len);
        self.put_slice(v.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::DataInput;
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_write_byte() {
        let mut out = BytesMut::new();
        out.write_byte(-1).unwrap();
        assert_eq!(&out[..], &[0xFF]);
    }

    #[test]
    fn test_write_bool() {
        let mut out = BytesMut::new();
        out.write_bool(true).unwrap();
        out.write_bool(false).unwrap();
        assert_eq!(&out[..], &[1, 0]);
    }

    #[test]
    fn test_write_short_big_endian() {
        let mut out = BytesMut::new();
        out.write_short(0x0102).unwrap();
        assert_eq!(&out[..], &[0x01, 0x02]);
    }

    #[test]
    fn test_write_int_big_endian() {
        let mut out = BytesMut::new();
        out.write_int(0x01020304).unwrap();
        assert_eq!(&out[..], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_write_long_big_endian() {
        let mut out = BytesMut::new();
        out.write_long(0x0102030405060708).unwrap();
        assert_eq!(&out[..], &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
    }

    #[test]
    fn test_write_float_host_order() {
        let mut out = BytesMut::new();
        out.write_float(1.5).unwrap();
        assert_eq!(&out[..], &1.5f32.to_ne_bytes());
    }

    #[test]
    fn test_write_double_host_order() {
        let mut out = BytesMut::new();
        out.write_double(-0.25).unwrap();
        assert_eq!(&out[..], &(-0.25f64).to_ne_bytes());
    }

    #[test]
    fn test_write_utf() {
        let mut out = BytesMut::new();
        out.write_utf("test").unwrap();
        assert_eq!(&out[..], &[0, 4, b't', b'e', b's', b't']);
    }

    #[test]
    fn test_write_utf_too_long() {
        let mut out = BytesMut::new();
        let text = "x".repeat(65_536);
        assert!(matches!(
            out.write_utf(&text),
            Err(MarqueeError::Protocol(_))
        ));
    }

    #[test]
    fn test_primitive_round_trips() {
        let mut out = BytesMut::new();
        out.write_byte(i8::MIN).unwrap();
        out.write_short(i16::MIN).unwrap();
        out.write_int(i32::MIN).unwrap();
        out.write_long(i64::MIN).unwrap();
        out.write_float(f32::MAX).unwrap();
        out.write_double(f64::MIN_POSITIVE).unwrap();
        out.write_bool(true).unwrap();
        out.write_utf("round trip").unwrap();

        let mut input = out.freeze();
        assert_eq!(input.read_byte().unwrap(), i8::MIN);
        assert_eq!(input.read_short().unwrap(), i16::MIN);
        assert_eq!(input.read_int().unwrap(), i32::MIN);
        assert_eq!(input.read_long().unwrap(), i64::MIN);
        assert_eq!(input.read_float().unwrap(), f32::MAX);
        assert_eq!(input.read_double().unwrap(), f64::MIN_POSITIVE);
        assert!(input.read_bool().unwrap());
        assert_eq!(input.read_utf().unwrap(), "round trip");
        assert!(input.is_empty());
    }

    #[test]
    fn test_float_bit_exact_round_trip() {
        for v in [0.0f32, -0.0, f32::MIN, f32::MAX, f32::EPSILON, f32::NAN] {
            let mut out = BytesMut::new();
            out.write_float(v).unwrap();
            let got = out.freeze().read_float().unwrap();
            assert_eq!(got.to_bits(), v.to_bits());
        }
    }
}
