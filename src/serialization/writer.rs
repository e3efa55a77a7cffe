//! The encode half of the object stream protocol.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::BytesMut;
use tracing::trace;

use crate::error::{MarqueeError, Result};

use super::registry::StreamerRegistry;
use super::streamer::Streamer;
use super::value::{FieldValue, Value};
use super::DataOutput;

/// The highest class code a writer will assign. Exhausting the code space
/// takes tens of thousands of distinct types on one connection and signals
/// a logic bug upstream.
pub const MAX_CLASS_CODE: i16 = i16::MAX;

struct ClassMapping {
    code: i16,
    streamer: Arc<dyn Streamer>,
}

/// Serializes polymorphic object graphs into a connection's outgoing
/// frames.
///
/// One writer serves one logical connection and owns the writer-side
/// class-code table. Codes are assigned sequentially from 1 in order of
/// first appearance, the same order the peer's reader learns them in, so
/// no table contents ever travel on the wire beyond each type's single
/// first-occurrence declaration. Encoded bytes accumulate internally and
/// are drained one frame at a time with [`take`](Self::take). The table
/// must be discarded with [`reset`](Self::reset) whenever the connection is
/// re-established.
pub struct ObjectWriter {
    buf: BytesMut,
    registry: Arc<StreamerRegistry>,
    classmap: HashMap<String, ClassMapping>,
    next_code: i16,
}

impl ObjectWriter {
    /// Creates a writer with an empty class-code table.
    pub fn new(registry: Arc<StreamerRegistry>) -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
            registry,
            classmap: HashMap::new(),
            next_code: 1,
        }
    }

    /// Encoded bytes not yet drained.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// The encoded bytes accumulated so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Drains and returns the accumulated bytes, typically one frame's
    /// payload.
    pub fn take(&mut self) -> BytesMut {
        self.buf.split()
    }

    /// Discards pending bytes, the class-code table, and the code counter.
    /// Required whenever the underlying connection is re-established.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.classmap.clear();
        self.next_code = 1;
    }

    /// Writes one object to the stream; `None` writes a null reference.
    ///
    /// The first time a wire type appears on this writer it is assigned the
    /// next sequential class code, announced as a negated code followed by
    /// the type name. Every later appearance writes just the positive code.
    pub fn write_object(&mut self, object: Option<&Value>) -> Result<()> {
        let Some(value) = object else {
            return self.write_short(0);
        };

        let name = value.wire_name();
        if let Some((code, streamer)) = self
            .classmap
            .get(name)
            .map(|m| (m.code, m.streamer.clone()))
        {
            self.write_short(code)?;
            return streamer.encode(self, value);
        }

        // resolve the streamer before assigning a code so that a failed
        // lookup does not burn a table slot
        let streamer = self.registry.streamer(name)?;
        let code = self.next_code;
        self.next_code = code.checked_add(1).ok_or(MarqueeError::TooManyTypes)?;
        trace!(code = i32::from(code), name, "assigned class code");

        self.write_short(-code)?;
        self.write_utf(name)?;
        self.classmap.insert(
            name.to_string(),
            ClassMapping {
                code,
                streamer: streamer.clone(),
            },
        );
        streamer.encode(self, value)
    }

    /// Writes an optional field whose concrete type is statically known: a
    /// presence flag, then the value with no type name on the wire.
    pub fn write_field<T: FieldValue>(&mut self, field: Option<&T>) -> Result<()> {
        let Some(field) = field else {
            return self.write_bool(false);
        };
        self.write_bool(true)?;
        let streamer = self.registry.streamer(T::wire_name())?;
        streamer.encode(self, &field.to_value())
    }

    /// Writes an object of a known type with no class code or type name,
    /// the mirror of [`ObjectReader::read_bare`].
    ///
    /// [`ObjectReader::read_bare`]: super::ObjectReader::read_bare
    pub fn write_bare(&mut self, value: &Value) -> Result<()> {
        self.registry.streamer(value.wire_name())?.encode(self, value)
    }
}

impl DataOutput for ObjectWriter {
    fn write_byte(&mut self, v: i8) -> Result<()> {
        self.buf.write_byte(v)
    }

    fn write_bool(&mut self, v: bool) -> Result<()> {
        self.buf.write_bool(v)
    }

    fn write_short(&mut self, v: i16) -> Result<()> {
        self.buf.write_short(v)
    }

    fn write_int(&mut self, v: i32) -> Result<()> {
        self.buf.write_int(v)
    }

    fn write_long(&mut self, v: i64) -> Result<()> {
        self.buf.write_long(v)
    }

    fn write_float(&mut self, v: f32) -> Result<()> {
        self.buf.write_float(v)
    }

    fn write_double(&mut self, v: f64) -> Result<()> {
        self.buf.write_double(v)
    }

    fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.buf.write_bytes(v)
    }

    fn write_utf(&mut self, v: &str) -> Result<()> {
        self.buf.write_utf(v)
    }
}
