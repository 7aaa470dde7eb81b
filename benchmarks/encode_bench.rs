//! MQCNO marshaling benchmarks
//!
//! Encode/decode cost per connect call, from a bare header up to a
//! version 8 block with every sub-block attached.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mqconn_core::{
    BalancingParms, Capabilities, ConnectionOptions, Decoder, Encoder, ForeignImage,
    SecurityParms, SystemAllocator,
};

// Sizes of the collaborator images (MQCD v11, MQSCO v6 on 64-bit)
const MQCD_LEN: usize = 1_984;
const MQSCO_LEN: usize = 632;

fn options_for(tier: i32) -> ConnectionOptions {
    let mut opts = ConnectionOptions::new();
    if tier >= 2 {
        opts = opts.with_client_conn(ForeignImage::zeroed(MQCD_LEN));
    }
    if tier >= 4 {
        opts = opts.with_ssl_config(ForeignImage::zeroed(MQSCO_LEN));
    }
    if tier >= 5 {
        opts = opts.with_security_parms(SecurityParms::user_password("app", "passw0rd"));
    }
    if tier >= 6 {
        opts = opts.with_ccdt_url("https://config.example.com/ccdt.json");
    }
    if tier >= 7 {
        opts = opts.with_appl_name("payments-gateway");
    }
    if tier >= 8 {
        opts = opts.with_balance_parms(BalancingParms::new());
    }
    opts
}

/// Encode only; the block drop releases everything
fn bench_encode(c: &mut Criterion) {
    let encoder = Encoder::with_capabilities(Capabilities::for_level(8));

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    for tier in [1, 2, 5, 8] {
        let opts = options_for(tier);
        group.bench_with_input(BenchmarkId::from_parameter(tier), &opts, |b, opts| {
            b.iter(|| black_box(encoder.encode(opts)))
        });
    }

    group.finish();
}

/// Full bracket: encode, hand off the header, decode and release
fn bench_round_trip(c: &mut Criterion) {
    let encoder = Encoder::with_capabilities(Capabilities::for_level(8));
    let decoder = Decoder::new();

    let mut group = c.benchmark_group("round_trip");
    group.throughput(Throughput::Elements(1));

    for tier in [1, 5, 8] {
        let mut opts = options_for(tier);
        group.bench_function(BenchmarkId::from_parameter(tier), |b| {
            b.iter(|| {
                let mut block = encoder.encode_with(&opts, SystemAllocator);
                black_box(block.as_mut_ptr());
                decoder.decode_and_release(block, &mut opts);
            })
        });
    }

    group.finish();
}

/// Same options against an older library: dropped features cost nothing
fn bench_capability_gating(c: &mut Criterion) {
    let opts = options_for(8);

    let mut group = c.benchmark_group("capability_gating");
    for level in [5, 6, 7, 8] {
        let encoder = Encoder::with_capabilities(Capabilities::for_level(level));
        group.bench_with_input(BenchmarkId::new("level", level), &opts, |b, opts| {
            b.iter(|| black_box(encoder.encode(opts)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_round_trip, bench_capability_gating);
criterion_main!(benches);
