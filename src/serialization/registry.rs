//! The type registry mapping wire type names to streamers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{MarqueeError, Result};

use super::streamer::{
    BoolArrayStreamer, ByteArrayStreamer, DoubleArrayStreamer, FloatArrayStreamer,
    IntArrayStreamer, ListStreamer, LongArrayStreamer, ObjectArrayStreamer, ShortArrayStreamer,
    StreamableStreamer, Streamer, StringArrayStreamer, StringStreamer,
};
use super::value::{FieldValue, Streamable};

/// Wire type names for the built-in streamers.
///
/// These names are part of the wire format: a first-occurrence type
/// declaration carries one of them (or an application type's name) as
/// length-prefixed text, and both peers must resolve it identically.
pub mod wire_name {
    /// Length-prefixed text.
    pub const STRING: &str = "string";
    /// Text array with nullable entries.
    pub const STRING_ARRAY: &str = "string[]";
    /// Polymorphic object array.
    pub const OBJECT_ARRAY: &str = "object[]";
    /// The reserved generic list pseudo-type.
    pub const LIST: &str = "list";
    /// Boolean array.
    pub const BOOL_ARRAY: &str = "bool[]";
    /// 8-bit integer array.
    pub const BYTE_ARRAY: &str = "byte[]";
    /// 16-bit integer array.
    pub const SHORT_ARRAY: &str = "short[]";
    /// 32-bit integer array.
    pub const INT_ARRAY: &str = "int[]";
    /// 64-bit integer array.
    pub const LONG_ARRAY: &str = "long[]";
    /// 32-bit float array.
    pub const FLOAT_ARRAY: &str = "float[]";
    /// 64-bit float array.
    pub const DOUBLE_ARRAY: &str = "double[]";
}

/// Maps wire type names to the streamers that decode and encode them.
///
/// The registry is populated during an explicit registration phase at
/// startup and then frozen behind an `Arc` shared by every reader and
/// writer; it is never mutated per-connection. Re-registering a name is
/// allowed and replaces the previous entry, so repeated registration of the
/// same schema module is harmless.
pub struct StreamerRegistry {
    streamers: HashMap<String, Arc<dyn Streamer>>,
}

impl StreamerRegistry {
    /// Creates an empty registry with no streamers at all. Most callers
    /// want [`with_builtins`](Self::with_builtins).
    pub fn new() -> Self {
        Self {
            streamers: HashMap::new(),
        }
    }

    /// Creates a registry pre-populated with streamers for text, every
    /// primitive array specialization, nullable text arrays, object arrays,
    /// and the generic list pseudo-type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(wire_name::STRING, Arc::new(StringStreamer));
        registry.register(wire_name::STRING_ARRAY, Arc::new(StringArrayStreamer));
        registry.register(wire_name::OBJECT_ARRAY, Arc::new(ObjectArrayStreamer));
        registry.register(wire_name::LIST, Arc::new(ListStreamer));
        registry.register(wire_name::BOOL_ARRAY, Arc::new(BoolArrayStreamer));
        registry.register(wire_name::BYTE_ARRAY, Arc::new(ByteArrayStreamer));
        registry.register(wire_name::SHORT_ARRAY, Arc::new(ShortArrayStreamer));
        registry.register(wire_name::INT_ARRAY, Arc::new(IntArrayStreamer));
        registry.register(wire_name::LONG_ARRAY, Arc::new(LongArrayStreamer));
        registry.register(wire_name::FLOAT_ARRAY, Arc::new(FloatArrayStreamer));
        registry.register(wire_name::DOUBLE_ARRAY, Arc::new(DoubleArrayStreamer));
        registry
    }

    /// Registers a streamer under a wire type name, replacing any previous
    /// entry for that name.
    pub fn register(&mut self, name: impl Into<String>, streamer: Arc<dyn Streamer>) {
        self.streamers.insert(name.into(), streamer);
    }

    /// Registers the generic object streamer for an application type under
    /// its statically declared wire name.
    pub fn register_streamable<T>(&mut self)
    where
        T: Streamable + FieldValue + Clone + PartialEq + Default,
    {
        self.register(T::wire_name(), Arc::new(StreamableStreamer::<T>::new()));
    }

    /// Returns the streamer registered under `name`.
    pub fn streamer(&self, name: &str) -> Result<Arc<dyn Streamer>> {
        self.streamers
            .get(name)
            .cloned()
            .ok_or_else(|| MarqueeError::UnknownType(name.to_string()))
    }

    /// Returns `true` if a streamer is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.streamers.contains_key(name)
    }

    /// Returns the number of registered streamers.
    pub fn len(&self) -> usize {
        self.streamers.len()
    }

    /// Returns `true` if no streamers are registered.
    pub fn is_empty(&self) -> bool {
        self.streamers.is_empty()
    }
}

impl Default for StreamerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
