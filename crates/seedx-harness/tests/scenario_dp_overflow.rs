//! Scenario: a long, strongly self-similar query/target pair whose
//! cumulative alignment score exceeds the 8-bit DP cell budget,
//! forcing a 16-bit rerun. Verifies the overflow counter increments
//! and the rerun still produces a full-length, full-identity match.

use seedx_core::{run_search, InMemoryDatabase, QueryRecord, TabularFormat};
use seedx_dispatch::OutputSink;
use seedx_harness::{exact_kmer_seed_hits, synthetic_protein, FixedHitSource};
use seedx_types::{Config, Statistics};

#[test]
fn long_perfect_match_overflows_eight_bit_dp_and_recovers() {
    let seq = synthetic_protein(200, 5);
    let db = InMemoryDatabase::new(vec![("target0".to_string(), seq.clone())]);
    let queries = vec![QueryRecord::protein(0, "q0", &seq)];

    let hits = exact_kmer_seed_hits(&seq, &seq, 0, 12);
    assert!(!hits.is_empty());
    let mut source = FixedHitSource::single(hits, 0, 1);

    let config = Config::default();
    let format = TabularFormat::new(seedx_matrix::ScoringMatrix::gapped_default().karlin());
    let sink = OutputSink::new(0);
    let stats = Statistics::new();

    run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

    assert!(
        stats.dp_overflow_count() >= 1,
        "a 200-residue perfect self-match should exceed the i8 cell budget"
    );

    let ready = sink.drain_ready();
    assert_eq!(ready.len(), 1);
    let text = String::from_utf8(ready[0].1.clone()).unwrap();
    let fields: Vec<&str> = text.trim_end().split('\t').collect();
    assert_eq!(fields[4], "200");
    assert!((fields[5].parse::<f64>().unwrap() - 100.0).abs() < 1e-6);
}
