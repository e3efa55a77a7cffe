//! End-to-end exercises of the framed object stream: one writer and one
//! reader playing both ends of a connection.

use std::sync::Arc;

use marquee::net::{register_messages, AuthRequest, MessageHeader, PingRequest, PongResponse};
use marquee::protocol::{write_frame, FrameBuffer};
use marquee::serialization::{ObjectReader, ObjectWriter, StreamerRegistry, Value};
use marquee::MarqueeError;
use bytes::BytesMut;

fn registry() -> Arc<StreamerRegistry> {
    let mut registry = StreamerRegistry::with_builtins();
    register_messages(&mut registry);
    Arc::new(registry)
}

#[test]
fn auth_request_over_framed_stream() {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry.clone());

    let request = AuthRequest::new("1.0", "", &["client"]);
    writer.write_object(Some(&Value::object(request.clone()))).unwrap();

    // wrap the payload in a transport frame and deliver it in small chunks
    let mut wire = BytesMut::new();
    write_frame(&mut wire, &writer.take()).unwrap();

    let mut frames = FrameBuffer::new();
    let mut reader = ObjectReader::new(registry);
    let mut decoded = None;
    for chunk in wire.chunks(3) {
        frames.extend(chunk);
        if let Some(payload) = frames.next_frame().unwrap() {
            reader.feed(&payload);
            decoded = reader.read_object().unwrap();
        }
    }

    let decoded = decoded.expect("no object decoded");
    let got = decoded.downcast_ref::<AuthRequest>().expect("wrong type");
    assert_eq!(got.version.as_deref(), Some("1.0"));
    assert_eq!(got.zone.as_deref(), Some(""));
    assert_eq!(got.boot_groups, Some(vec![Some(Value::from("client"))]));
    assert_eq!(got, &request);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn class_codes_memoize_across_frames() {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry.clone());
    let mut reader = ObjectReader::new(registry);

    let ping = PingRequest {
        header: MessageHeader { message_id: 1 },
    };

    // first frame carries the type name
    writer.write_object(Some(&Value::object(ping))).unwrap();
    let first = writer.take();

    // second frame must abbreviate it to a bare positive code
    writer.write_object(Some(&Value::object(ping))).unwrap();
    let second = writer.take();
    assert!(second.len() < first.len());
    assert_eq!(&second[..2], &1i16.to_be_bytes());

    for frame in [first, second] {
        reader.feed(&frame);
        let decoded = reader.read_object().unwrap().unwrap();
        assert_eq!(decoded.downcast_ref::<PingRequest>(), Some(&ping));
    }
}

#[test]
fn interleaved_message_types_get_sequential_codes() {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry.clone());
    let mut reader = ObjectReader::new(registry);

    let ping = PingRequest::default();
    let pong = PongResponse {
        header: MessageHeader { message_id: 2 },
        ping_time: 42,
    };

    writer.write_object(Some(&Value::object(ping))).unwrap();
    writer.write_object(Some(&Value::object(pong))).unwrap();
    writer.write_object(None).unwrap();
    writer.write_object(Some(&Value::object(ping))).unwrap();

    let wire = writer.take();
    assert_eq!(&wire[..2], &(-1i16).to_be_bytes());

    reader.feed(&wire);
    assert!(reader.read_object().unwrap().unwrap().downcast_ref::<PingRequest>().is_some());
    assert!(reader.read_object().unwrap().unwrap().downcast_ref::<PongResponse>().is_some());
    assert_eq!(reader.read_object().unwrap(), None);
    assert!(reader.read_object().unwrap().unwrap().downcast_ref::<PingRequest>().is_some());
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn reconnect_requires_fresh_tables() {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry.clone());
    let mut reader = ObjectReader::new(registry);

    let ping = PingRequest::default();
    writer.write_object(Some(&Value::object(ping))).unwrap();
    reader.feed(&writer.take());
    reader.read_object().unwrap();

    // simulate a reconnect on the writer only: the reader's stale table no
    // longer matches and the abbreviated reference must be rejected
    writer.reset();
    reader.reset();
    writer.write_object(Some(&Value::object(ping))).unwrap();
    writer.write_object(Some(&Value::object(ping))).unwrap();
    let wire = writer.take();

    reader.feed(&wire);
    assert!(reader.read_object().unwrap().is_some());
    assert!(reader.read_object().unwrap().is_some());

    // but replaying only the abbreviated half against a fresh reader desyncs
    let mut stale = ObjectReader::new(self::registry());
    let repeat_at = wire.len() - 4; // code + empty header
    stale.feed(&wire[repeat_at..]);
    assert!(matches!(
        stale.read_object(),
        Err(MarqueeError::UnknownClassCode(1))
    ));
}

#[test]
fn nullable_text_array_fidelity() {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry.clone());

    let value = Value::StringArray(vec![Some("a".into()), None, Some("c".into())]);
    writer.write_object(Some(&value)).unwrap();

    let mut reader = ObjectReader::new(registry);
    reader.feed(&writer.take());
    assert_eq!(reader.read_object().unwrap(), Some(value));
}
