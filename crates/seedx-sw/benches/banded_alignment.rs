use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seedx_matrix::blosum62;
use seedx_sw::banded_sw;
use seedx_types::HspTraits;

fn synthetic_sequence(len: usize) -> Vec<u8> {
    const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
    (0..len).map(|i| AMINO_ACIDS[i % AMINO_ACIDS.len()]).collect()
}

fn bench_banded_sw(c: &mut Criterion) {
    let mut group = c.benchmark_group("banded_sw");
    for len in [64usize, 256, 1024] {
        let seq = synthetic_sequence(len);
        let anchor = HspTraits {
            query_begin: 0,
            query_end: len as i32,
            subject_begin: 0,
            subject_end: len as i32,
            score: 0,
            frame: 0,
        };
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| banded_sw(&seq, &seq, &anchor, 32, blosum62::raw_score, 11, 1, false));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_banded_sw);
criterion_main!(benches);
