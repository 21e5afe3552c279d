use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    auth::bench_compute_signature,
    auth::bench_auth_request_form,
    network::bench_post_request,
    network::bench_mqtt_publish
);
criterion_main!(benches);
