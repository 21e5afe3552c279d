use criterion::{Criterion, Throughput};
use iotsuite::network::application::http::HttpRequest;
use iotsuite::network::application::mqtt::{Client, Message, Options, PROTOCOL_LEVEL, QoS};
use iotsuite::network::error::Error;
use iotsuite::network::{Close, Connection, Read, Write};
use std::hint::black_box;

/// Accepts every write and answers the CONNECT handshake once.
struct SinkConnection {
    connack: &'static [u8],
    written: usize,
}

impl Read for SinkConnection {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.connack.len());
        buf[..n].copy_from_slice(&self.connack[..n]);
        self.connack = &self.connack[n..];
        Ok(n)
    }
}

impl Write for SinkConnection {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for SinkConnection {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for SinkConnection {}

pub fn bench_post_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("post_request");
    let body: &[u8] = b"clientId=PRODX-sensor-a&deviceName=sensor-a&expire=86400&nonce=1&productId=PRODX&timestamp=1";
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("create_post_request", |b| {
        let mut storage = [0u8; 512];
        let mut request = HttpRequest::new(&mut storage).expect("Failed to create request");
        b.iter(|| {
            request
                .create_post_request("/auth/device", b"auth.example.com", Some(black_box(body)))
                .expect("Failed to build request")
        })
    });
    group.finish();
}

pub fn bench_mqtt_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("mqtt_publish");
    let payload: &[u8] = b"{\"temperature\":21.5,\"humidity\":40}";
    group.throughput(Throughput::Bytes(payload.len() as u64));

    let mut client = Client::new(SinkConnection {
        connack: &[0x20, 0x02, 0x00, 0x00],
        written: 0,
    });
    client
        .connect(&Options {
            client_id: "iotsuite-bench",
            username: None,
            password: None,
            keep_alive_seconds: 60,
            clean_session: true,
            protocol_level: PROTOCOL_LEVEL,
        })
        .expect("Failed to connect");

    group.bench_function("qos0", |b| {
        b.iter(|| {
            client
                .publish(
                    "PRODX/sensor-a/update",
                    &Message {
                        payload: black_box(payload),
                        qos: QoS::AtMostOnce,
                        retained: false,
                    },
                )
                .expect("Failed to publish")
        })
    });
    black_box(client.connection().written);
    group.finish();
}
