use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seedx_extend::xdrop_extend;
use seedx_matrix::blosum62;
use seedx_types::LocalHit;

fn synthetic_sequence(len: usize) -> Vec<u8> {
    const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
    (0..len).map(|i| AMINO_ACIDS[i % AMINO_ACIDS.len()]).collect()
}

fn bench_xdrop_extend(c: &mut Criterion) {
    let mut group = c.benchmark_group("xdrop_extend");
    for len in [64usize, 256, 1024] {
        let seq = synthetic_sequence(len);
        let seed = LocalHit {
            i: len as i32 / 2,
            j: len as i32 / 2,
            score: 10,
            frame: 0,
        };
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| xdrop_extend(&seq, &seq, &seed, 15, blosum62::raw_score));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_xdrop_extend);
criterion_main!(benches);
