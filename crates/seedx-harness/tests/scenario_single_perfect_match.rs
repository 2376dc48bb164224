//! Scenario: a 100-residue query matches itself exactly in the
//! database. Expected: one reported row with length 100, 100% identity.

use seedx_core::{run_search, InMemoryDatabase, QueryRecord, TabularFormat};
use seedx_dispatch::OutputSink;
use seedx_harness::{exact_kmer_seed_hits, synthetic_protein, FixedHitSource};
use seedx_types::{Config, Statistics};

#[test]
fn single_perfect_match_reports_one_full_length_row() {
    let seq = synthetic_protein(100, 1);
    let db = InMemoryDatabase::new(vec![("target0".to_string(), seq.clone())]);
    let queries = vec![QueryRecord::protein(0, "q0", &seq)];

    let hits = exact_kmer_seed_hits(&seq, &seq, 0, 12);
    assert!(!hits.is_empty(), "identical sequences must share k-mers");
    let mut source = FixedHitSource::single(hits, 0, 1);

    let config = Config::default();
    let format = TabularFormat::new(seedx_matrix::ScoringMatrix::gapped_default().karlin());
    let sink = OutputSink::new(0);
    let stats = Statistics::new();

    run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

    let ready = sink.drain_ready();
    assert_eq!(ready.len(), 1);
    let text = String::from_utf8(ready[0].1.clone()).unwrap();
    assert_eq!(text.lines().count(), 1);
    let fields: Vec<&str> = text.trim_end().split('\t').collect();
    assert_eq!(fields[0], "q0");
    assert_eq!(fields[1], "target0");
    assert_eq!(fields[4], "100");
    assert!((fields[5].parse::<f64>().unwrap() - 100.0).abs() < 1e-6);
}
