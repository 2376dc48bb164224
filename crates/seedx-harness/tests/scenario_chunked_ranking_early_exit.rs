//! Scenario: 10,000 targets with exponentially decaying ranking
//! scores, `ext_chunk_size=128`. The true match is hidden behind a
//! seed score of zero so it only ever appears deep in the ranking
//! order; once the first chunk yields no reported hit and the decay
//! drops the next chunk's top score ratio below
//! `ranking_score_drop_factor`, the adaptive ranker must stop before
//! ever reaching it. Disabling ranking (`no_ranking`) is the control:
//! it proves the hidden target was reachable all along.

use seedx_core::{run_search, InMemoryDatabase, QueryRecord, TabularFormat};
use seedx_dispatch::OutputSink;
use seedx_harness::{synthetic_protein, FixedHitSource};
use seedx_types::{Config, SeedHit, Statistics};

const NOISE_TARGETS: usize = 9_999;

fn build_database_and_hits() -> (InMemoryDatabase, Vec<u8>, Vec<SeedHit>) {
    let query = synthetic_protein(60, 42);

    let mut entries = Vec::with_capacity(NOISE_TARGETS + 1);
    let mut offsets = Vec::with_capacity(NOISE_TARGETS + 1);
    let mut acc = 0u64;
    for i in 0..NOISE_TARGETS {
        offsets.push(acc);
        entries.push((format!("noise{i}"), vec![b'A']));
        acc += 1;
    }
    offsets.push(acc);
    entries.push(("real".to_string(), query.clone()));

    let mut hits = Vec::with_capacity(NOISE_TARGETS + 1);
    for i in 0..NOISE_TARGETS {
        let score = (9_999.0 * 0.9f64.powi(i as i32)).round().max(1.0) as u16;
        hits.push(SeedHit {
            query_ctx: 0,
            subject_offset: offsets[i],
            seed_query_offset: 0,
            score,
        });
    }
    hits.push(SeedHit {
        query_ctx: 0,
        subject_offset: offsets[NOISE_TARGETS],
        seed_query_offset: 0,
        score: 0,
    });

    (InMemoryDatabase::new(entries), query, hits)
}

fn run_with(config: Config) -> bool {
    let (db, query, hits) = build_database_and_hits();
    let queries = vec![QueryRecord::protein(0, "q0", &query)];
    let mut source = FixedHitSource::single(hits, 0, 1);
    let format = TabularFormat::new(seedx_matrix::ScoringMatrix::gapped_default().karlin());
    let sink = OutputSink::new(0);
    let stats = Statistics::new();

    run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

    sink.drain_ready()
        .iter()
        .any(|(_, buf)| String::from_utf8_lossy(buf).contains("real"))
}

#[test]
fn adaptive_ranking_stops_before_reaching_the_buried_match() {
    let mut config = Config::default();
    config.ext_chunk_size = Some(128);
    config.min_bit_score = 20.0;
    config.no_ranking = false;

    assert!(
        !run_with(config),
        "the buried match must not surface once the ranker short-circuits"
    );
}

#[test]
fn disabling_ranking_finds_the_same_match_the_adaptive_ranker_missed() {
    let mut config = Config::default();
    config.min_bit_score = 20.0;
    config.no_ranking = true;

    assert!(
        run_with(config),
        "with no_ranking the buried target must still be reachable"
    );
}
