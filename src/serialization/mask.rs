//! Presence bitmap for arrays with nullable entries.

use crate::error::{MarqueeError, Result};

use super::{DataInput, DataOutput};

/// A compact presence mask: one bit per array index, byte-packed with
/// padding up to a byte boundary.
///
/// On the wire the mask is itself length-prefixed as a 16-bit count of mask
/// bytes. Bit `i` lives at `(bytes[i / 8] >> (i % 8)) & 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMask {
    bytes: Vec<u8>,
}

impl ArrayMask {
    /// Creates an all-clear mask covering `count` array indices.
    pub fn new(count: usize) -> Self {
        Self {
            bytes: vec![0; count.div_ceil(8)],
        }
    }

    /// Marks the entry at `index` as present.
    ///
    /// # Panics
    ///
    /// Panics if `index` is beyond the extent the mask was created with.
    pub fn set(&mut self, index: usize) {
        self.bytes[index / 8] |= 1 << (index % 8);
    }

    /// Returns whether the entry at `index` is present. Indices beyond the
    /// mask's extent read as absent.
    pub fn is_set(&self, index: usize) -> bool {
        match self.bytes.get(index / 8) {
            Some(byte) => (byte >> (index % 8)) & 1 != 0,
            None => false,
        }
    }

    /// The packed mask bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Writes the mask: 16-bit byte count, then the mask bytes.
    pub fn write_to(&self, out: &mut impl DataOutput) -> Result<()> {
        let len = i16::try_from(self.bytes.len()).map_err(|_| {
            MarqueeError::Protocol(format!("presence mask too large: {} bytes", self.bytes.len()))
        })?;
        out.write_short(len)?;
        out.write_bytes(&self.bytes)
    }

    /// Reads a mask previously written with [`write_to`](Self::write_to).
    pub fn read_from(input: &mut impl DataInput) -> Result<Self> {
        let len = input.read_short()?;
        if len < 0 {
            return Err(MarqueeError::Protocol(format!(
                "negative presence mask length: {}",
                len
            )));
        }
        Ok(Self {
            bytes: input.read_bytes(len as usize)?,
        })
    }
}
