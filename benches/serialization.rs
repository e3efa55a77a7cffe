use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use marquee::net::{register_messages, AuthRequest};
use marquee::serialization::{ObjectReader, ObjectWriter, StreamerRegistry, Value};

fn registry() -> Arc<StreamerRegistry> {
    let mut registry = StreamerRegistry::with_builtins();
    register_messages(&mut registry);
    Arc::new(registry)
}

fn bench_encode(c: &mut Criterion) {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry);
    let value = Value::object(AuthRequest::new("1.0", "default", &["client", "chat"]));

    c.bench_function("encode_auth_request", |b| {
        b.iter(|| {
            writer.write_object(Some(black_box(&value))).unwrap();
            black_box(writer.take());
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry.clone());
    let value = Value::object(AuthRequest::new("1.0", "default", &["client", "chat"]));
    writer.write_object(Some(&value)).unwrap();
    let frame = writer.take();

    c.bench_function("decode_auth_request", |b| {
        b.iter(|| {
            let mut reader = ObjectReader::new(registry.clone());
            reader.feed(black_box(&frame));
            black_box(reader.read_object().unwrap());
        })
    });
}

fn bench_string_array(c: &mut Criterion) {
    let registry = registry();
    let mut writer = ObjectWriter::new(registry);
    let items: Vec<Option<String>> = (0..64)
        .map(|n| (n % 3 != 0).then(|| format!("entry-{}", n)))
        .collect();
    let value = Value::StringArray(items);

    c.bench_function("encode_string_array_64", |b| {
        b.iter(|| {
            writer.write_object(Some(black_box(&value))).unwrap();
            black_box(writer.take());
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_string_array);
criterion_main!(benches);
