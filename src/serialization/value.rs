//! The polymorphic value model for streamed object graphs.

use std::any::Any;
use std::fmt;

use crate::error::{MarqueeError, Result};

use super::reader::ObjectReader;
use super::registry::wire_name;
use super::writer::ObjectWriter;

/// A type whose instances can be carried on an object stream.
///
/// Implementors describe how their fields are laid out on the wire; the
/// surrounding class-code and type-name bookkeeping is handled by
/// [`ObjectReader`] and [`ObjectWriter`]. Types with shared header fields
/// sequence an explicit header step before their own fields rather than
/// relying on any inheritance-like mechanism.
pub trait Streamable: fmt::Debug + Send + Sync + 'static {
    /// The wire type name carried when this object is streamed
    /// polymorphically. Usually a per-type constant; an instance method so
    /// that base-typed handles report their concrete type.
    fn type_name(&self) -> &str;

    /// Populates this instance's fields from the stream.
    fn read_fields(&mut self, reader: &mut ObjectReader) -> Result<()>;

    /// Writes this instance's fields to the stream.
    fn write_fields(&self, writer: &mut ObjectWriter) -> Result<()>;
}

/// Object-safe companion to [`Streamable`] providing the plumbing needed to
/// hold arbitrary streamed objects by value: downcasting, cloning, and
/// equality. Blanket-implemented for every `Streamable` that is also
/// `Clone + PartialEq`; implement those and this comes for free.
pub trait StreamObject: Streamable {
    /// Borrows this object for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Consumes this object for owned downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Clones this object behind a fresh box.
    fn clone_boxed(&self) -> Box<dyn StreamObject>;

    /// Compares against another streamed object of any concrete type.
    fn eq_object(&self, other: &dyn StreamObject) -> bool;
}

impl<T> StreamObject for T
where
    T: Streamable + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn StreamObject> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn StreamObject) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }
}

impl Clone for Box<dyn StreamObject> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl PartialEq for dyn StreamObject {
    fn eq(&self, other: &Self) -> bool {
        self.eq_object(other)
    }
}

/// One node of a polymorphic object graph.
///
/// The built-in variants cover the wire format's standard types; registered
/// application types travel in the [`Object`](Value::Object) variant. Null
/// references are represented as `Option<Value>` at the API boundary, never
/// as a variant, so a `Value` in hand is always a present value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Length-prefixed text.
    String(String),
    /// Monomorphic boolean array: no masks, no tags, no absent elements.
    BoolArray(Vec<bool>),
    /// Monomorphic 8-bit integer array.
    ByteArray(Vec<i8>),
    /// Monomorphic 16-bit integer array.
    ShortArray(Vec<i16>),
    /// Monomorphic 32-bit integer array.
    IntArray(Vec<i32>),
    /// Monomorphic 64-bit integer array.
    LongArray(Vec<i64>),
    /// Monomorphic 32-bit float array.
    FloatArray(Vec<f32>),
    /// Monomorphic 64-bit float array.
    DoubleArray(Vec<f64>),
    /// Text array with nullable entries, guarded by a presence mask.
    StringArray(Vec<Option<String>>),
    /// Polymorphic array: every element carries its own type tag.
    ObjectArray(Vec<Option<Value>>),
    /// The reserved generic list pseudo-type; element layout matches
    /// [`ObjectArray`](Value::ObjectArray).
    List(Vec<Option<Value>>),
    /// A registered application object.
    Object(Box<dyn StreamObject>),
}

impl Value {
    /// The wire type name this value streams under.
    pub fn wire_name(&self) -> &str {
        match self {
            Value::String(_) => wire_name::STRING,
            Value::BoolArray(_) => wire_name::BOOL_ARRAY,
            Value::ByteArray(_) => wire_name::BYTE_ARRAY,
            Value::ShortArray(_) => wire_name::SHORT_ARRAY,
            Value::IntArray(_) => wire_name::INT_ARRAY,
            Value::LongArray(_) => wire_name::LONG_ARRAY,
            Value::FloatArray(_) => wire_name::FLOAT_ARRAY,
            Value::DoubleArray(_) => wire_name::DOUBLE_ARRAY,
            Value::StringArray(_) => wire_name::STRING_ARRAY,
            Value::ObjectArray(_) => wire_name::OBJECT_ARRAY,
            Value::List(_) => wire_name::LIST,
            Value::Object(obj) => obj.type_name(),
        }
    }

    /// Wraps an application object as a polymorphic value.
    pub fn object(obj: impl StreamObject) -> Self {
        Value::Object(Box::new(obj))
    }

    /// Borrows the contained application object as its concrete type, if
    /// this is an [`Object`](Value::Object) of that type.
    pub fn downcast_ref<T: StreamObject>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.as_any().downcast_ref(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Conversion contract for fields whose concrete type is statically known.
///
/// Backs [`ObjectReader::read_field`] and [`ObjectWriter::write_field`]:
/// such fields carry only a presence flag on the wire, no type name, so the
/// streamer is located by this trait's name rather than by wire metadata.
pub trait FieldValue: Sized {
    /// Registry name used to locate this type's streamer.
    fn wire_name() -> &'static str;

    /// Wraps a copy of this field as a polymorphic value.
    fn to_value(&self) -> Value;

    /// Unwraps a decoded value, failing on a kind mismatch.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &str, value: &Value) -> MarqueeError {
    MarqueeError::Protocol(format!(
        "expected a {} value, decoded a {}",
        expected,
        value.wire_name()
    ))
}

impl FieldValue for String {
    fn wire_name() -> &'static str {
        wire_name::STRING
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch(wire_name::STRING, &other)),
        }
    }
}

macro_rules! array_field_value {
    ($elem:ty, $variant:ident, $name:path) => {
        impl FieldValue for Vec<$elem> {
            fn wire_name() -> &'static str {
                $name
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(items) => Ok(items),
                    other => Err(mismatch($name, &other)),
                }
            }
        }
    };
}

array_field_value!(bool, BoolArray, wire_name::BOOL_ARRAY);
array_field_value!(i8, ByteArray, wire_name::BYTE_ARRAY);
array_field_value!(i16, ShortArray, wire_name::SHORT_ARRAY);
array_field_value!(i32, IntArray, wire_name::INT_ARRAY);
array_field_value!(i64, LongArray, wire_name::LONG_ARRAY);
array_field_value!(f32, FloatArray, wire_name::FLOAT_ARRAY);
array_field_value!(f64, DoubleArray, wire_name::DOUBLE_ARRAY);
array_field_value!(Option<String>, StringArray, wire_name::STRING_ARRAY);

impl FieldValue for Vec<Option<Value>> {
    fn wire_name() -> &'static str {
        wire_name::LIST
    }

    fn to_value(&self) -> Value {
        Value::List(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) | Value::ObjectArray(items) => Ok(items),
            other => Err(mismatch(wire_name::LIST, &other)),
        }
    }
}
