//! The decode half of the object stream protocol.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::BytesMut;
use tracing::trace;

use crate::error::{MarqueeError, Result};

use super::registry::StreamerRegistry;
use super::streamer::Streamer;
use super::value::{FieldValue, Value};
use super::DataInput;

/// Reconstructs polymorphic object graphs from a connection's incoming
/// frames.
///
/// One reader serves one logical connection: it owns the reader-side
/// class-code table, which both peers build up identically over the life of
/// the stream. Frame payloads are appended with [`feed`](Self::feed) as the
/// framing layer produces them; a decode call then consumes exactly one
/// object graph. The table must be discarded with [`reset`](Self::reset)
/// whenever the connection is torn down and re-established; carrying it
/// across reconnects corrupts the protocol.
pub struct ObjectReader {
    buf: BytesMut,
    registry: Arc<StreamerRegistry>,
    classmap: HashMap<i16, Arc<dyn Streamer>>,
}

impl ObjectReader {
    /// Creates a reader with an empty class-code table.
    pub fn new(registry: Arc<StreamerRegistry>) -> Self {
        Self {
            buf: BytesMut::new(),
            registry,
            classmap: HashMap::new(),
        }
    }

    /// Appends a de-framed payload to the decode buffer.
    pub fn feed(&mut self, payload: &[u8]) {
        self.buf.extend_from_slice(payload);
    }

    /// Bytes buffered but not yet decoded.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Discards buffered bytes and the class-code table. Required whenever
    /// the underlying connection is re-established.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.classmap.clear();
    }

    /// Reads one object from the stream, `None` for a null reference.
    ///
    /// A negative type code declares a class code for the first time: the
    /// code's magnitude is the new table index and the wire type name
    /// follows as text. A positive code is a repeat reference resolved
    /// through the table; one never declared here means the peers have
    /// desynced and fails with
    /// [`UnknownClassCode`](MarqueeError::UnknownClassCode).
    pub fn read_object(&mut self) -> Result<Option<Value>> {
        let code = self.read_short()?;
        if code == 0 {
            return Ok(None);
        }

        let streamer = if code < 0 {
            let code = code.checked_neg().ok_or_else(|| {
                MarqueeError::Protocol(format!("class code out of range: {}", code))
            })?;
            let name = self.read_utf()?;
            let streamer = self.registry.streamer(&name)?;
            trace!(code = i32::from(code), name = name.as_str(), "learned class code");
            self.classmap.insert(code, streamer.clone());
            streamer
        } else {
            self.classmap
                .get(&code)
                .cloned()
                .ok_or(MarqueeError::UnknownClassCode(code))?
        };

        streamer.decode(self).map(Some)
    }

    /// Reads an optional field whose concrete type is statically known: a
    /// presence flag, then the value with no type name on the wire.
    pub fn read_field<T: FieldValue>(&mut self) -> Result<Option<T>> {
        if !self.read_bool()? {
            return Ok(None);
        }
        let streamer = self.registry.streamer(T::wire_name())?;
        T::from_value(streamer.decode(self)?).map(Some)
    }

    /// Reads an object of a known type with no class code or type name,
    /// the mirror of [`ObjectWriter::write_bare`].
    ///
    /// [`ObjectWriter::write_bare`]: super::ObjectWriter::write_bare
    pub fn read_bare(&mut self, name: &str) -> Result<Value> {
        self.registry.streamer(name)?.decode(self)
    }
}

impl DataInput for ObjectReader {
    fn read_byte(&mut self) -> Result<i8> {
        self.buf.read_byte()
    }

    fn read_bool(&mut self) -> Result<bool> {
        self.buf.read_bool()
    }

    fn read_short(&mut self) -> Result<i16> {
        self.buf.read_short()
    }

    fn read_int(&mut self) -> Result<i32> {
        self.buf.read_int()
    }

    fn read_long(&mut self) -> Result<i64> {
        self.buf.read_long()
    }

    fn read_float(&mut self) -> Result<f32> {
        self.buf.read_float()
    }

    fn read_double(&mut self) -> Result<f64> {
        self.buf.read_double()
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.buf.read_bytes(len)
    }

    fn read_utf(&mut self) -> Result<String> {
        self.buf.read_utf()
    }
}
