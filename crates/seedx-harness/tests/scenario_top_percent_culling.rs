//! Scenario: two targets, one a full-length match and one only a
//! partial match, `toppercent=15`. Expected: only the full-length
//! target's row survives (its score is well under 85% of the best).

use seedx_core::{run_search, InMemoryDatabase, QueryRecord, TabularFormat};
use seedx_dispatch::OutputSink;
use seedx_harness::{exact_kmer_seed_hits, synthetic_protein, FixedHitSource};
use seedx_types::{Config, SeedHit, Statistics};

#[test]
fn weak_target_is_culled_by_top_percent_threshold() {
    let query = synthetic_protein(60, 20);
    let full_target = query.clone();
    let mut partial_target = query[..20].to_vec();
    partial_target.extend(synthetic_protein(40, 999));

    let db = InMemoryDatabase::new(vec![
        ("full".to_string(), full_target.clone()),
        ("partial".to_string(), partial_target.clone()),
    ]);
    let queries = vec![QueryRecord::protein(0, "q0", &query)];

    let mut hits: Vec<SeedHit> = exact_kmer_seed_hits(&query, &full_target, 0, 10);
    hits.extend(exact_kmer_seed_hits(
        &query,
        &partial_target,
        full_target.len() as u64,
        10,
    ));
    let mut source = FixedHitSource::single(hits, 0, 1);

    let mut config = Config::default();
    config.toppercent = 15.0;
    let format = TabularFormat::new(seedx_matrix::ScoringMatrix::gapped_default().karlin());
    let sink = OutputSink::new(0);
    let stats = Statistics::new();

    run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

    let ready = sink.drain_ready();
    assert_eq!(ready.len(), 1);
    let text = String::from_utf8(ready[0].1.clone()).unwrap();
    assert!(text.contains("full"));
    assert!(!text.contains("partial"));
}
