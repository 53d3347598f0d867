/// Benchmarks for parsing inbound real-time frames.
///
/// Every frame the dashboard receives passes through one of these parsers before it reaches
/// the UI, so they sit on the hot path of a busy leaderboard.
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use khwopacoder_client::realtime::{RealtimeMessage, parse_messages};
use khwopacoder_client::ws::{JsonParser, MessageParser as _};

const CONNECTION_ESTABLISHED: &str = r#"{
    "type": "connection_established",
    "client_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
    "user_id": "42",
    "topics": ["leaderboard", "activities", "challenge:17"]
}"#;

const LEADERBOARD_UPDATE: &str = r#"{
    "type": "leaderboard_update",
    "entries": [
        {"id": "u1", "rank": 1, "name": "Ram", "points": 940, "solved": 61},
        {"id": "u2", "rank": 2, "name": "Sita", "points": 915, "solved": 58},
        {"id": "u3", "rank": 3, "name": "Hari", "points": 880, "solved": 55}
    ]
}"#;

fn bench_realtime_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("realtime/parse_messages");

    group.throughput(Throughput::Bytes(CONNECTION_ESTABLISHED.len() as u64));
    group.bench_function("ConnectionEstablished", |b| {
        b.iter(|| {
            let messages = parse_messages(std::hint::black_box(CONNECTION_ESTABLISHED.as_bytes()))
                .expect("Deserialization should succeed");
            assert!(matches!(
                messages[0],
                RealtimeMessage::ConnectionEstablished(_)
            ));
        });
    });

    let ack = r#"{"type": "subscribed", "topic": "leaderboard"}"#;
    group.throughput(Throughput::Bytes(ack.len() as u64));
    group.bench_function("Subscribed", |b| {
        b.iter(|| {
            parse_messages(std::hint::black_box(ack.as_bytes()))
                .expect("Deserialization should succeed");
        });
    });

    group.throughput(Throughput::Bytes(LEADERBOARD_UPDATE.len() as u64));
    group.bench_function("Other", |b| {
        b.iter(|| {
            parse_messages(std::hint::black_box(LEADERBOARD_UPDATE.as_bytes()))
                .expect("Deserialization should succeed");
        });
    });

    let batch = format!("[{CONNECTION_ESTABLISHED},{ack},{LEADERBOARD_UPDATE}]");
    group.throughput(Throughput::Bytes(batch.len() as u64));
    group.bench_function("Array", |b| {
        b.iter(|| {
            parse_messages(std::hint::black_box(batch.as_bytes()))
                .expect("Deserialization should succeed");
        });
    });

    group.finish();
}

fn bench_json_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("realtime/json_parser");

    group.throughput(Throughput::Bytes(LEADERBOARD_UPDATE.len() as u64));
    group.bench_function("Value", |b| {
        b.iter(|| {
            JsonParser
                .parse(std::hint::black_box(LEADERBOARD_UPDATE.as_bytes()))
                .expect("Deserialization should succeed");
        });
    });

    group.finish();
}

criterion_group!(realtime_benches, bench_realtime_message, bench_json_parser);
criterion_main!(realtime_benches);
