//! The object serialization engine for the Marquee wire format.
//!
//! Polymorphic object graphs stream through an [`ObjectWriter`] /
//! [`ObjectReader`] pair, one pair per logical connection. Types are
//! identified on the wire by name exactly once (a per-stream class-code
//! table abbreviates every later reference) and resolved through a shared
//! [`StreamerRegistry`] built during an explicit registration phase at
//! startup.

mod data_input;
mod data_output;
mod mask;
mod reader;
mod registry;
mod streamer;
mod value;
mod writer;

pub use data_input::DataInput;
pub use data_output::DataOutput;
pub use mask::ArrayMask;
pub use reader::ObjectReader;
pub use registry::{wire_name, StreamerRegistry};
pub use streamer::{
    BoolArrayStreamer, ByteArrayStreamer, DoubleArrayStreamer, FloatArrayStreamer,
    IntArrayStreamer, ListStreamer, LongArrayStreamer, ObjectArrayStreamer, ShortArrayStreamer,
    StreamableStreamer, Streamer, StringArrayStreamer, StringStreamer,
};
pub use value::{FieldValue, StreamObject, Streamable, Value};
pub use writer::{ObjectWriter, MAX_CLASS_CODE};
