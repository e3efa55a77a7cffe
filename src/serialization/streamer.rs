//! Streamers for the wire format's built-in types.

use std::marker::PhantomData;

use crate::error::{MarqueeError, Result};

use super::mask::ArrayMask;
use super::reader::ObjectReader;
use super::value::{Streamable, Value};
use super::writer::ObjectWriter;
use super::{DataInput, DataOutput};

/// The codec contract for exactly one wire type: decode a value from a
/// stream, or encode a value of that type onto one.
///
/// Streamers are stateless and shared read-only through the registry; all
/// per-stream state (class-code tables, buffers) lives in the reader and
/// writer that a streamer is handed.
pub trait Streamer: Send + Sync {
    /// Decodes one value of this streamer's type.
    fn decode(&self, reader: &mut ObjectReader) -> Result<Value>;

    /// Encodes `value`, which must be of this streamer's type.
    fn encode(&self, writer: &mut ObjectWriter, value: &Value) -> Result<()>;
}

fn wrong_kind(expected: &str, value: &Value) -> MarqueeError {
    MarqueeError::Protocol(format!(
        "streamer for {} handed a {} value",
        expected,
        value.wire_name()
    ))
}

fn read_count(reader: &mut ObjectReader) -> Result<usize> {
    let count = reader.read_int()?;
    if count < 0 {
        return Err(MarqueeError::Protocol(format!(
            "negative array length: {}",
            count
        )));
    }
    Ok(count as usize)
}

fn write_count(writer: &mut ObjectWriter, len: usize) -> Result<()> {
    let count = i32::try_from(len)
        .map_err(|_| MarqueeError::Protocol(format!("array too long for wire: {} elements", len)))?;
    writer.write_int(count)
}

/// Streamer for length-prefixed text.
#[derive(Debug, Default)]
pub struct StringStreamer;

impl Streamer for StringStreamer {
    fn decode(&self, reader: &mut ObjectReader) -> Result<Value> {
        Ok(Value::String(reader.read_utf()?))
    }

    fn encode(&self, writer: &mut ObjectWriter, value: &Value) -> Result<()> {
        match value {
            Value::String(s) => writer.write_utf(s),
            other => Err(wrong_kind("text", other)),
        }
    }
}

macro_rules! primitive_array_streamer {
    ($(#[$doc:meta])* $streamer:ident, $variant:ident, $width:expr, $read:ident, $write:ident) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $streamer;

        impl Streamer for $streamer {
            fn decode(&self, reader: &mut ObjectReader) -> Result<Value> {
                let count = read_count(reader)?;
                // reject sizes the frame cannot possibly hold before allocating
                let needed = count.saturating_mul($width);
                if reader.remaining() < needed {
                    return Err(MarqueeError::UnexpectedEof {
                        needed,
                        remaining: reader.remaining(),
                    });
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(reader.$read()?);
                }
                Ok(Value::$variant(items))
            }

            fn encode(&self, writer: &mut ObjectWriter, value: &Value) -> Result<()> {
                match value {
                    Value::$variant(items) => {
                        write_count(writer, items.len())?;
                        for item in items {
                            writer.$write(*item)?;
                        }
                        Ok(())
                    }
                    other => Err(wrong_kind(stringify!($variant), other)),
                }
            }
        }
    };
}

primitive_array_streamer!(
    /// Streamer for boolean arrays: element count followed by raw bytes.
    BoolArrayStreamer, BoolArray, 1, read_bool, write_bool
);
primitive_array_streamer!(
    /// Streamer for 8-bit integer arrays.
    ByteArrayStreamer, ByteArray, 1, read_byte, write_byte
);
primitive_array_streamer!(
    /// Streamer for 16-bit integer arrays.
    ShortArrayStreamer, ShortArray, 2, read_short, write_short
);
primitive_array_streamer!(
    /// Streamer for 32-bit integer arrays.
    IntArrayStreamer, IntArray, 4, read_int, write_int
);
primitive_array_streamer!(
    /// Streamer for 64-bit integer arrays.
    LongArrayStreamer, LongArray, 8, read_long, write_long
);
primitive_array_streamer!(
    /// Streamer for 32-bit float arrays.
    FloatArrayStreamer, FloatArray, 4, read_float, write_float
);
primitive_array_streamer!(
    /// Streamer for 64-bit float arrays.
    DoubleArrayStreamer, DoubleArray, 8, read_double, write_double
);

/// Streamer for text arrays with nullable entries: element count, presence
/// mask, then the text payloads for present indices only, in index order.
#[derive(Debug, Default)]
pub struct StringArrayStreamer;

impl Streamer for StringArrayStreamer {
    fn decode(&self, reader: &mut ObjectReader) -> Result<Value> {
        let count = read_count(reader)?;
        let mask = ArrayMask::read_from(reader)?;
        // a conforming writer emits exactly one mask bit per index; a
        // mismatch means the count or the mask is corrupt
        if mask.as_bytes().len() != count.div_ceil(8) {
            return Err(MarqueeError::Protocol(format!(
                "presence mask covers {} bytes, expected {} for {} elements",
                mask.as_bytes().len(),
                count.div_ceil(8),
                count
            )));
        }
        let mut items = Vec::with_capacity(count);
        for index in 0..count {
            if mask.is_set(index) {
                items.push(Some(reader.read_utf()?));
            } else {
                items.push(None);
            }
        }
        Ok(Value::StringArray(items))
    }

    fn encode(&self, writer: &mut ObjectWriter, value: &Value) -> Result<()> {
        let items = match value {
            Value::StringArray(items) => items,
            other => return Err(wrong_kind("text array", other)),
        };
        write_count(writer, items.len())?;
        let mut mask = ArrayMask::new(items.len());
        for (index, item) in items.iter().enumerate() {
            if item.is_some() {
                mask.set(index);
            }
        }
        mask.write_to(writer)?;
        for item in items.iter().flatten() {
            writer.write_utf(item)?;
        }
        Ok(())
    }
}

fn read_elements(reader: &mut ObjectReader) -> Result<Vec<Option<Value>>> {
    let count = read_count(reader)?;
    let mut items = Vec::new();
    for _ in 0..count {
        items.push(reader.read_object()?);
    }
    Ok(items)
}

fn write_elements(writer: &mut ObjectWriter, items: &[Option<Value>]) -> Result<()> {
    write_count(writer, items.len())?;
    for item in items {
        writer.write_object(item.as_ref())?;
    }
    Ok(())
}

/// Streamer for polymorphic object arrays: element count, then each element
/// through the full object protocol with its own type tag. Heterogeneous
/// arrays and null elements round-trip intact.
#[derive(Debug, Default)]
pub struct ObjectArrayStreamer;

impl Streamer for ObjectArrayStreamer {
    fn decode(&self, reader: &mut ObjectReader) -> Result<Value> {
        Ok(Value::ObjectArray(read_elements(reader)?))
    }

    fn encode(&self, writer: &mut ObjectWriter, value: &Value) -> Result<()> {
        match value {
            Value::ObjectArray(items) => write_elements(writer, items),
            other => Err(wrong_kind("object array", other)),
        }
    }
}

/// Streamer for the reserved generic list pseudo-type. Identical element
/// layout to [`ObjectArrayStreamer`]; only the wire name differs.
#[derive(Debug, Default)]
pub struct ListStreamer;

impl Streamer for ListStreamer {
    fn decode(&self, reader: &mut ObjectReader) -> Result<Value> {
        Ok(Value::List(read_elements(reader)?))
    }

    fn encode(&self, writer: &mut ObjectWriter, value: &Value) -> Result<()> {
        match value {
            Value::List(items) => write_elements(writer, items),
            other => Err(wrong_kind("list", other)),
        }
    }
}

/// Generic streamer for registered application object types.
///
/// Decoding constructs a default instance and delegates into the type's own
/// field-by-field [`read_fields`](Streamable::read_fields); encoding
/// downcasts the boxed object and delegates to
/// [`write_fields`](Streamable::write_fields).
pub struct StreamableStreamer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> StreamableStreamer<T> {
    /// Creates a streamer for `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for StreamableStreamer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Streamer for StreamableStreamer<T>
where
    T: Streamable + Clone + PartialEq + Default,
{
    fn decode(&self, reader: &mut ObjectReader) -> Result<Value> {
        let mut object = T::default();
        object.read_fields(reader)?;
        Ok(Value::Object(Box::new(object)))
    }

    fn encode(&self, writer: &mut ObjectWriter, value: &Value) -> Result<()> {
        let boxed = match value {
            Value::Object(boxed) => boxed,
            other => return Err(wrong_kind("object", other)),
        };
        let object = boxed.as_any().downcast_ref::<T>().ok_or_else(|| {
            MarqueeError::Protocol(format!(
                "streamer for {} handed a {} instance",
                std::any::type_name::<T>(),
                boxed.type_name()
            ))
        })?;
        object.write_fields(writer)
    }
}
