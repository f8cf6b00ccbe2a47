//! Performance benchmarks for signature alignment

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::Duration;
use tracksync_dsp::signature::codec;
use tracksync_dsp::{align_signatures, AlignmentConfig, Signature};

fn track(len: usize, seed: u64) -> Vec<u16> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(1000..20000)).collect()
}

fn bench_align_edited(c: &mut Criterion) {
    // 10 minutes at 120 samples/s, with 30 s removed and 8 s inserted
    let samples_a = track(120 * 600, 1);
    let mut samples_b = samples_a[..120 * 100].to_vec();
    samples_b.extend_from_slice(&samples_a[120 * 130..120 * 400]);
    samples_b.extend(std::iter::repeat(0u16).take(120 * 8));
    samples_b.extend_from_slice(&samples_a[120 * 400..]);

    let a = Signature::from_samples(120, &samples_a).unwrap();
    let b = Signature::from_samples(120, &samples_b).unwrap();
    let config = AlignmentConfig {
        minimum_match_duration: Duration::seconds(5),
        ..Default::default()
    };

    c.bench_function("align_10min_edited", |bench| {
        bench.iter(|| {
            let _ = align_signatures(black_box(&a), black_box(&b), black_box(&config));
        });
    });
}

fn bench_codec(c: &mut Criterion) {
    let samples = track(120 * 600, 2);
    let bytes = codec::encode(&samples).unwrap();

    c.bench_function("encode_10min", |bench| {
        bench.iter(|| codec::encode(black_box(&samples)));
    });
    c.bench_function("decode_10min", |bench| {
        bench.iter(|| codec::decode(black_box(&bytes)));
    });
}

criterion_group!(benches, bench_align_edited, bench_codec);
criterion_main!(benches);
