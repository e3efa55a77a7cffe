//! Length-prefixed framing over the transport byte stream.
//!
//! Each logical message travels in one frame: a 4-byte big-endian length
//! counting the entire frame including the length prefix itself, followed
//! by the payload. The object codec never sees partial data; a frame is
//! decoded only once it is fully buffered.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};
use tracing::trace;

use crate::error::{MarqueeError, Result};

/// Size of the frame length prefix.
pub const HEADER_LEN: usize = 4;

/// Largest frame this implementation will buffer. A length beyond this is
/// treated as stream corruption rather than an allocation request.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

fn check_frame_len(frame_len: usize) -> Result<()> {
    if frame_len < HEADER_LEN {
        return Err(MarqueeError::Protocol(format!(
            "frame length {} below the {}-byte minimum",
            frame_len, HEADER_LEN
        )));
    }
    if frame_len > MAX_FRAME_LEN {
        return Err(MarqueeError::Protocol(format!(
            "frame length {} exceeds the {} byte limit",
            frame_len, MAX_FRAME_LEN
        )));
    }
    Ok(())
}

/// Appends one frame wrapping `payload` to `dst`.
pub fn write_frame(dst: &mut BytesMut, payload: &[u8]) -> Result<()> {
    let frame_len = payload.len() + HEADER_LEN;
    check_frame_len(frame_len)?;
    dst.reserve(frame_len);
    dst.put_u32(frame_len as u32);
    dst.put_slice(payload);
    Ok(())
}

/// Incremental frame extraction from a stream of byte chunks.
///
/// Bytes arrive in whatever chunks the transport produces (short reads are
/// fine); [`next_frame`](Self::next_frame) hands back complete de-framed
/// payloads as they become available.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    /// Creates an empty frame buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw transport bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes buffered but not yet returned as frames.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Extracts the next complete frame's payload, or `None` if a whole
    /// frame is not yet buffered.
    pub fn next_frame(&mut self) -> Result<Option<BytesMut>> {
        if self.buf.len() < HEADER_LEN {
            return Ok(None);
        }
        let frame_len =
            u32::from_be_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]]) as usize;
        check_frame_len(frame_len)?;
        if self.buf.len() < frame_len {
            return Ok(None);
        }
        self.buf.advance(HEADER_LEN);
        let payload = self.buf.split_to(frame_len - HEADER_LEN);
        trace!(len = payload.len(), "extracted frame");
        Ok(Some(payload))
    }
}

/// Blocking frame source over any [`Read`] implementation.
pub struct FrameReader<R> {
    source: R,
}

impl<R: Read> FrameReader<R> {
    /// Wraps a byte source.
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Reads exactly one frame, blocking until it is complete. A source
    /// that ends mid-frame surfaces as an [`Io`](MarqueeError::Io) error.
    pub fn read_frame(&mut self) -> Result<BytesMut> {
        let mut header = [0u8; HEADER_LEN];
        self.source.read_exact(&mut header)?;
        let frame_len = u32::from_be_bytes(header) as usize;
        check_frame_len(frame_len)?;
        let mut payload = vec![0u8; frame_len - HEADER_LEN];
        self.source.read_exact(&mut payload)?;
        Ok(BytesMut::from(&payload[..]))
    }

    /// Unwraps the underlying byte source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Blocking frame sink over any [`Write`] implementation.
pub struct FrameWriter<W> {
    sink: W,
}

impl<W: Write> FrameWriter<W> {
    /// Wraps a byte sink.
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Writes one frame wrapping `payload`.
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
        let mut frame = BytesMut::with_capacity(payload.len() + HEADER_LEN);
        write_frame(&mut frame, payload)?;
        self.sink.write_all(&frame)?;
        Ok(())
    }

    /// Flushes the underlying byte sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Unwraps the underlying byte sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
