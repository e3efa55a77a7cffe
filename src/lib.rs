//! Client-side binding to the Marquee distributed-object wire protocol.
//!
//! Marquee serializes polymorphic object graphs (messages, object deltas,
//! events) over a length-framed byte stream. The heart of the crate is the
//! object serialization engine in [`serialization`]: a registry mapping
//! wire type names to streamers, and a reader/writer pair that memoizes
//! type names behind per-stream class codes so each type is spelled out
//! only once per connection.
//!
//! ```
//! use std::sync::Arc;
//! use marquee::net::{register_messages, AuthRequest};
//! use marquee::serialization::{ObjectReader, ObjectWriter, StreamerRegistry, Value};
//!
//! # fn main() -> marquee::Result<()> {
//! let mut registry = StreamerRegistry::with_builtins();
//! register_messages(&mut registry);
//! let registry = Arc::new(registry);
//!
//! let mut writer = ObjectWriter::new(registry.clone());
//! writer.write_object(Some(&Value::object(AuthRequest::new("1.0", "", &["client"]))))?;
//!
//! let mut reader = ObjectReader::new(registry);
//! reader.feed(&writer.take());
//! let decoded = reader.read_object()?.expect("not null");
//! assert!(decoded.downcast_ref::<AuthRequest>().is_some());
//! # Ok(())
//! # }
//! ```
//!
//! The codec layer is single-threaded and synchronous by design: one reader
//! and one writer per connection, driven by one processing loop. Transport,
//! reconnect policy, and the client state machine live above this crate.

#![warn(missing_docs)]

pub mod error;
pub mod net;
pub mod protocol;
pub mod serialization;

pub use error::{MarqueeError, Result};
pub use serialization::{
    DataInput, DataOutput, FieldValue, ObjectReader, ObjectWriter, StreamObject, Streamable,
    StreamerRegistry, Value,
};
