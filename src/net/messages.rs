//! Concrete message schemas carried over the object stream.
//!
//! Each message is a fixed ordered list of typed fields. Messages share a
//! common header which every type streams as an explicit first step before
//! its own fields: plain function composition, no base-class machinery.
//! Primitive fields stream bare; nullable reference fields go through the
//! presence-flagged field protocol.

use std::any::Any;

use crate::error::{MarqueeError, Result};
use crate::serialization::{
    DataInput, DataOutput, FieldValue, ObjectReader, ObjectWriter, Streamable, StreamerRegistry,
    Value,
};

/// Wire type name for [`AuthRequest`].
pub const AUTH_REQUEST: &str = "marquee.net.AuthRequest";
/// Wire type name for [`AuthResponse`].
pub const AUTH_RESPONSE: &str = "marquee.net.AuthResponse";
/// Wire type name for [`PingRequest`].
pub const PING_REQUEST: &str = "marquee.net.PingRequest";
/// Wire type name for [`PongResponse`].
pub const PONG_RESPONSE: &str = "marquee.net.PongResponse";

/// Registers streamers for every message type in this module. Call once
/// while assembling the registry, before any stream operation; registering
/// again is harmless.
pub fn register_messages(registry: &mut StreamerRegistry) {
    registry.register_streamable::<AuthRequest>();
    registry.register_streamable::<AuthResponse>();
    registry.register_streamable::<PingRequest>();
    registry.register_streamable::<PongResponse>();
}

macro_rules! message_field_value {
    ($msg:ident, $name:path) => {
        impl FieldValue for $msg {
            fn wire_name() -> &'static str {
                $name
            }

            fn to_value(&self) -> Value {
                Value::object(self.clone())
            }

            fn from_value(value: Value) -> Result<Self> {
                let name = value.wire_name().to_string();
                match value {
                    Value::Object(boxed) => {
                        let any: Box<dyn Any> = boxed.into_any();
                        any.downcast::<$msg>().map(|msg| *msg).map_err(|_| {
                            MarqueeError::Protocol(format!(
                                "expected a {} message, decoded a {}",
                                $name, name
                            ))
                        })
                    }
                    _ => Err(MarqueeError::Protocol(format!(
                        "expected a {} message, decoded a {}",
                        $name, name
                    ))),
                }
            }
        }
    };
}

/// Fields common to every message, streamed ahead of the message body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Correlates a response with the request that prompted it; zero for
    /// unsolicited messages.
    pub message_id: i16,
}

impl MessageHeader {
    /// Streams the header fields.
    pub fn write_to(&self, writer: &mut ObjectWriter) -> Result<()> {
        writer.write_short(self.message_id)
    }

    /// Populates the header fields from the stream.
    pub fn read_from(&mut self, reader: &mut ObjectReader) -> Result<()> {
        self.message_id = reader.read_short()?;
        Ok(())
    }
}

/// The first message a client sends: identifies its build and the services
/// it wants bootstrapped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthRequest {
    /// Shared message header.
    pub header: MessageHeader,
    /// Client build version, checked by the server for compatibility.
    pub version: Option<String>,
    /// Zone the client wants to join; empty selects the default zone.
    pub zone: Option<String>,
    /// Service groups to bootstrap, as a text list.
    pub boot_groups: Option<Vec<Option<Value>>>,
}

impl AuthRequest {
    /// Convenience constructor from plain strings.
    pub fn new(version: &str, zone: &str, boot_groups: &[&str]) -> Self {
        Self {
            header: MessageHeader::default(),
            version: Some(version.to_string()),
            zone: Some(zone.to_string()),
            boot_groups: Some(boot_groups.iter().map(|g| Some(Value::from(*g))).collect()),
        }
    }
}

impl Streamable for AuthRequest {
    fn type_name(&self) -> &str {
        AUTH_REQUEST
    }

    fn read_fields(&mut self, reader: &mut ObjectReader) -> Result<()> {
        self.header.read_from(reader)?;
        self.version = reader.read_field()?;
        self.zone = reader.read_field()?;
        self.boot_groups = reader.read_field()?;
        Ok(())
    }

    fn write_fields(&self, writer: &mut ObjectWriter) -> Result<()> {
        self.header.write_to(writer)?;
        writer.write_field(self.version.as_ref())?;
        writer.write_field(self.zone.as_ref())?;
        writer.write_field(self.boot_groups.as_ref())
    }
}

message_field_value!(AuthRequest, AUTH_REQUEST);

/// The server's verdict on an [`AuthRequest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthResponse {
    /// Shared message header.
    pub header: MessageHeader,
    /// Zero on success; a service-specific failure code otherwise.
    pub code: i32,
    /// Human-readable diagnostic accompanying a failure code.
    pub reason: Option<String>,
}

impl Streamable for AuthResponse {
    fn type_name(&self) -> &str {
        AUTH_RESPONSE
    }

    fn read_fields(&mut self, reader: &mut ObjectReader) -> Result<()> {
        self.header.read_from(reader)?;
        self.code = reader.read_int()?;
        self.reason = reader.read_field()?;
        Ok(())
    }

    fn write_fields(&self, writer: &mut ObjectWriter) -> Result<()> {
        self.header.write_to(writer)?;
        writer.write_int(self.code)?;
        writer.write_field(self.reason.as_ref())
    }
}

message_field_value!(AuthResponse, AUTH_RESPONSE);

/// Keepalive probe; carries no body beyond the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingRequest {
    /// Shared message header.
    pub header: MessageHeader,
}

impl Streamable for PingRequest {
    fn type_name(&self) -> &str {
        PING_REQUEST
    }

    fn read_fields(&mut self, reader: &mut ObjectReader) -> Result<()> {
        self.header.read_from(reader)
    }

    fn write_fields(&self, writer: &mut ObjectWriter) -> Result<()> {
        self.header.write_to(writer)
    }
}

message_field_value!(PingRequest, PING_REQUEST);

/// Keepalive acknowledgement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PongResponse {
    /// Shared message header.
    pub header: MessageHeader,
    /// Server clock at the moment the ping was handled, epoch millis.
    pub ping_time: i64,
}

impl Streamable for PongResponse {
    fn type_name(&self) -> &str {
        PONG_RESPONSE
    }

    fn read_fields(&mut self, reader: &mut ObjectReader) -> Result<()> {
        self.header.read_from(reader)?;
        self.ping_time = reader.read_long()?;
        Ok(())
    }

    fn write_fields(&self, writer: &mut ObjectWriter) -> Result<()> {
        self.header.write_to(writer)?;
        writer.write_long(self.ping_time)
    }
}

message_field_value!(PongResponse, PONG_RESPONSE);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn registry() -> Arc<StreamerRegistry> {
        let mut registry = StreamerRegistry::with_builtins();
        register_messages(&mut registry);
        Arc::new(registry)
    }

    fn round_trip(value: Value) -> Option<Value> {
        let registry = registry();
        let mut writer = ObjectWriter::new(registry.clone());
        writer.write_object(Some(&value)).unwrap();
        let mut reader = ObjectReader::new(registry);
        reader.feed(&writer.take());
        let decoded = reader.read_object().unwrap();
        assert_eq!(reader.remaining(), 0);
        decoded
    }

    #[test]
    fn test_auth_request_round_trip() {
        let request = AuthRequest::new("1.0", "", &["client"]);
        let decoded = round_trip(Value::object(request.clone())).unwrap();
        let got = decoded.downcast_ref::<AuthRequest>().unwrap();
        assert_eq!(got.version, Some("1.0".to_string()));
        assert_eq!(got.zone, Some("".to_string()));
        assert_eq!(
            got.boot_groups,
            Some(vec![Some(Value::from("client"))])
        );
        assert_eq!(got, &request);
    }

    #[test]
    fn test_auth_request_absent_fields() {
        let request = AuthRequest::default();
        let decoded = round_trip(Value::object(request.clone())).unwrap();
        assert_eq!(decoded.downcast_ref::<AuthRequest>(), Some(&request));
    }

    #[test]
    fn test_auth_response_round_trip() {
        let response = AuthResponse {
            header: MessageHeader { message_id: 3 },
            code: 7,
            reason: Some("version mismatch".to_string()),
        };
        let decoded = round_trip(Value::object(response.clone())).unwrap();
        assert_eq!(decoded.downcast_ref::<AuthResponse>(), Some(&response));
    }

    #[test]
    fn test_ping_pong_round_trip() {
        let ping = PingRequest {
            header: MessageHeader { message_id: 9 },
        };
        let decoded = round_trip(Value::object(ping)).unwrap();
        assert_eq!(decoded.downcast_ref::<PingRequest>(), Some(&ping));

        let pong = PongResponse {
            header: MessageHeader { message_id: 9 },
            ping_time: 1_234_567_890_123,
        };
        let decoded = round_trip(Value::object(pong)).unwrap();
        assert_eq!(decoded.downcast_ref::<PongResponse>(), Some(&pong));
    }

    #[test]
    fn test_message_as_field() {
        let registry = registry();
        let mut writer = ObjectWriter::new(registry.clone());
        let ping = PingRequest {
            header: MessageHeader { message_id: 4 },
        };
        writer.write_field(Some(&ping)).unwrap();

        let mut reader = ObjectReader::new(registry);
        reader.feed(&writer.take());
        assert_eq!(reader.read_field::<PingRequest>().unwrap(), Some(ping));
    }

    #[test]
    fn test_field_value_mismatch() {
        let err = AuthRequest::from_value(Value::from("not a message")).unwrap_err();
        assert!(matches!(err, MarqueeError::Protocol(_)));
    }

    #[test]
    fn test_register_messages_idempotent() {
        let mut registry = StreamerRegistry::with_builtins();
        register_messages(&mut registry);
        let count = registry.len();
        register_messages(&mut registry);
        assert_eq!(registry.len(), count);
    }
}
