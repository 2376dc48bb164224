//! Scenario: one query with a hit range far larger than the others,
//! `query_parallel_limit` set low enough that it alone crosses into
//! target-parallel mode. Confirms the dispatcher's mode hint actually
//! routes through `seedx-extend`'s work-stealing pool without
//! disturbing the strictly ascending output order the other three
//! (query-parallel) queries rely on.
//!
//! Scaled down from the million-hit scenario this walkthrough
//! documents: the hit-count ratio that flips the `target_parallel`
//! hint is what's under test, not the literal magnitude.

use seedx_core::{run_search, InMemoryDatabase, QueryRecord, TabularFormat};
use seedx_dispatch::OutputSink;
use seedx_harness::{exact_kmer_seed_hits, synthetic_protein, FixedHitSource};
use seedx_types::{Config, SeedHit, Statistics};

fn hits_for(query_idx: u32, query: &[u8], target: &[u8], target_offset: u64) -> Vec<SeedHit> {
    exact_kmer_seed_hits(query, target, target_offset, 8)
        .into_iter()
        .map(|mut h| {
            h.query_ctx = query_idx;
            h
        })
        .collect()
}

#[test]
fn oversized_query_runs_target_parallel_while_order_stays_ascending() {
    let queries_seqs: Vec<Vec<u8>> = (0..4u64).map(|i| synthetic_protein(40, 10 + i)).collect();
    let mut entries = Vec::new();
    let mut offsets = Vec::new();
    let mut acc = 0u64;
    for seq in &queries_seqs {
        offsets.push(acc);
        entries.push((format!("target{}", offsets.len() - 1), seq.clone()));
        acc += seq.len() as u64;
    }
    let db = InMemoryDatabase::new(entries);

    let queries: Vec<QueryRecord<'_>> = queries_seqs
        .iter()
        .enumerate()
        .map(|(i, seq)| QueryRecord::protein(i as u32, format!("q{i}"), seq.as_slice()))
        .collect();

    let mut base_hits = hits_for(0, &queries_seqs[0], &queries_seqs[0], offsets[0]);
    assert!(!base_hits.is_empty());
    let mut q0_hits: Vec<SeedHit> = base_hits.iter().cloned().cycle().take(200).collect();
    base_hits.clear();

    let mut all_hits = Vec::new();
    all_hits.append(&mut q0_hits);
    for i in 1..4usize {
        all_hits.extend(hits_for(i as u32, &queries_seqs[i], &queries_seqs[i], offsets[i]));
    }

    let mut source = FixedHitSource::single(all_hits, 0, 4);
    let mut config = Config::default();
    config.query_parallel_limit = 50;
    config.threads_align = 4;
    let format = TabularFormat::new(seedx_matrix::ScoringMatrix::gapped_default().karlin());
    let sink = OutputSink::new(0);
    let stats = Statistics::new();

    run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

    let ready = sink.drain_ready();
    assert_eq!(ready.len(), 4);
    let ids: Vec<_> = ready.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3], "output must stay in strictly ascending query order");
    for (_, buf) in &ready {
        assert!(!String::from_utf8_lossy(buf).is_empty());
    }
}
