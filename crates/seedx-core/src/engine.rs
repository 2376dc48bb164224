//! `run_search`: wires the seven pipeline stages (hit loading, ranking,
//! ungapped extension, gapped filtering, banded alignment, and output
//! dispatch) into a single pass over one claimed query range.

use std::sync::Arc;

use parking_lot::Mutex;
use seedx_dispatch::{AlignFetcher, ClaimedRange, OutputSink};
use seedx_filter::{filter_targets, gapped_filter_enabled, FilterRound};
use seedx_hitbuf::{batch_max_bytes, HitSource};
use seedx_loader::{load_hits, TargetLengths};
use seedx_mask::{build_masker, MaskGuard, Masker};
use seedx_matrix::{Composition, MatrixPool, ScoringMatrix};
use seedx_rank::{
    ranking_chunk_size, should_short_circuit_query, ChunkIter, ChunkResult, EarlyExit, sort_targets_by_score_desc,
};
use seedx_sw::{align_target, build_match, cull_matches_across_query, AlignEnv};
use seedx_types::{
    Config, HspValues, LoadBalancing, Match, QueryId, QueryMemory, SeedHit, Statistics, TargetScore, WorkTarget,
    WorkerStats, MAX_CONTEXTS,
};

use crate::database::Database;
use crate::format::OutputFormat;

/// One query's inputs: its six reading-frame views (only frame 0 used
/// for untranslated protein queries) plus its name and source length.
pub struct QueryRecord<'a> {
    pub query_id: QueryId,
    pub name: String,
    pub frames: [&'a [u8]; MAX_CONTEXTS],
    pub len: i32,
    pub translated: bool,
}

impl<'a> QueryRecord<'a> {
    #[must_use]
    pub fn protein(query_id: QueryId, name: impl Into<String>, seq: &'a [u8]) -> Self {
        let mut frames: [&[u8]; MAX_CONTEXTS] = [&[]; MAX_CONTEXTS];
        frames[0] = seq;
        Self {
            query_id,
            name: name.into(),
            frames,
            len: seq.len() as i32,
            translated: false,
        }
    }
}

fn merge_worker_stats(into: &mut WorkerStats, from: &WorkerStats) {
    into.target_hits0 += from.target_hits0;
    into.target_hits1 += from.target_hits1;
    into.target_hits2 += from.target_hits2;
    into.target_hits3 += from.target_hits3;
    into.target_hits4 += from.target_hits4;
    into.target_hits5 += from.target_hits5;
    into.matrix_adjust_count += from.matrix_adjust_count;
    into.matrix_build_discarded += from.matrix_build_discarded;
    into.dp_overflow_count += from.dp_overflow_count;
    into.masked_lazy += from.masked_lazy;
    into.gapped_filter_rejected += from.gapped_filter_rejected;
    into.time_extend_nanos += from.time_extend_nanos;
    into.time_filter_nanos += from.time_filter_nanos;
    into.time_sw_nanos += from.time_sw_nanos;
}

/// Everything one claimed query range's processing needs that is
/// shared read-only (or internally synchronized) across every
/// query-parallel worker.
#[derive(Clone, Copy)]
struct SearchEnv<'a> {
    queries: &'a [QueryRecord<'a>],
    database: &'a dyn Database,
    config: &'a Config,
    format: &'a dyn OutputFormat,
    sink: &'a OutputSink,
    stats: &'a Statistics,
    lengths: &'a TargetLengths,
    mask_guard: &'a MaskGuard,
    masker: &'a (dyn Masker + Sync),
    matrix_pool: &'a MatrixPool,
    scoring: &'a ScoringMatrix,
    total_letters: f64,
    fetcher: &'a AlignFetcher,
}

/// Run the six stages on a single claimed query range, submitting its
/// formatted buffer to `env.sink` and folding per-worker counters into
/// `env.stats`. Safe to call concurrently from multiple threads sharing
/// the same `env.fetcher`, since every `ClaimedRange` is disjoint.
fn process_claim(claim: ClaimedRange, env: &SearchEnv<'_>, contexts: u32) -> seedx_error::Result<()> {
    let SearchEnv {
        queries,
        database,
        config,
        format,
        sink,
        stats,
        lengths,
        mask_guard,
        masker,
        matrix_pool,
        scoring,
        total_letters,
        fetcher,
    } = *env;

    let Some(query) = queries.iter().find(|q| q.query_id == claim.query_id) else {
        return Err(seedx_error::Error::invalid_input(format!(
            "no query record for claimed query id {}",
            claim.query_id
        )));
    };

    if claim.is_empty() {
        let mut buf = format.print_query_intro(claim.query_id, &query.name);
        if config.report_unaligned {
            buf.extend(format.print_unaligned(claim.query_id, &query.name));
        }
        buf.extend(format.print_query_epilog(claim.query_id));
        sink.submit(claim.query_id, buf);
        return Ok(());
    }

    let range_hits: Vec<SeedHit> = fetcher.hits()[claim.start..claim.end].to_vec();
    let loaded = load_hits(range_hits, lengths, contexts);

    let query_composition: Vec<Composition> = query.frames.iter().map(|f| Composition::of_sequence(f)).collect();

    let mut target_scores: Vec<TargetScore> = loaded.target_scores.clone();
    sort_targets_by_score_desc(&mut target_scores);

    let chunk_size = ranking_chunk_size(target_scores.len(), total_letters, config);
    let mut memory = QueryMemory::default();
    let mut all_matches: Vec<Match> = Vec::new();
    let mut worker_stats = WorkerStats::default();

    let initial_tail = target_scores.first().map_or(0, |t| t.score);
    let mut exit = EarlyExit::new(initial_tail);
    let chunks: Vec<&[TargetScore]> = ChunkIter::new(&target_scores, chunk_size).collect();

    for (idx, chunk) in chunks.iter().enumerate() {
        let chunk_top_score = chunk.first().map_or(0, |t| t.score);
        if should_short_circuit_query(&memory, chunk.len(), chunk_top_score, config) {
            break;
        }

        let mut work_targets: Vec<WorkTarget> = chunk
            .iter()
            .map(|ts| {
                let block_id = loaded.target_block_ids[ts.target as usize];
                WorkTarget::new(block_id, database.target_seq(block_id))
            })
            .collect();
        let chunk_hits: Vec<&[seedx_types::LocalHit]> =
            chunk.iter().map(|ts| loaded.hits_for(ts.target as usize)).collect();

        let extend_env = seedx_extend::ExtendEnv {
            query_seqs: &query.frames,
            query_composition: &query_composition,
            scoring,
            config,
            mask_guard,
            masker,
            matrix_pool,
        };
        let jobs: Vec<seedx_extend::TargetJob> = work_targets
            .iter_mut()
            .zip(chunk_hits.iter().copied())
            .map(|(target, hits)| seedx_extend::TargetJob { target, hits })
            .collect();
        let extend_stats = seedx_extend::extend_targets(
            jobs,
            &extend_env,
            claim.target_parallel,
            config.threads_align.max(1),
        );
        merge_worker_stats(&mut worker_stats, &extend_stats);

        if gapped_filter_enabled(config, i64::from(query.len), query.translated) {
            let mut ids: Vec<seedx_types::BlockId> = work_targets.iter().map(|t| t.block_id).collect();
            let first_threshold = FilterRound::First.threshold(config);
            filter_targets(&mut ids, &mut work_targets, i64::from(query.len), scoring, first_threshold);

            // Stricter pass right before the expensive banded
            // alignment: the looser first round only rules out
            // targets with no realistic chance at all.
            let mut ids: Vec<seedx_types::BlockId> = work_targets.iter().map(|t| t.block_id).collect();
            let final_threshold = FilterRound::Final.threshold(config);
            filter_targets(&mut ids, &mut work_targets, i64::from(query.len), scoring, final_threshold);
        }

        let mut chunk_min_score: Option<i32> = None;
        let align_env = AlignEnv {
            query_frames: &query.frames,
            scoring,
            config,
            query_len: query.len,
            hsp_values: HspValues::TRANSCRIPT
                | HspValues::IDENT
                | HspValues::LENGTH
                | HspValues::MISMATCHES
                | HspValues::GAPS,
        };
        for target in &work_targets {
            if let Some(aligned) = align_target(target, &align_env, &mut worker_stats) {
                if let Some(m) = build_match(aligned, query.len) {
                    let best = m.best_score();
                    chunk_min_score = Some(chunk_min_score.map_or(best, |s| s.min(best)));
                    all_matches.push(m);
                }
            }
        }

        let new_hits_added = chunk_min_score.is_some();
        let tail_score = chunk.last().map_or(0, |t| t.score);
        let outcome = ChunkResult {
            new_hits_added,
            min_score_in_chunk: chunk_min_score.map_or(tail_score, |s| s as u16),
        };
        if new_hits_added {
            memory.record_low_score(outcome.min_score_in_chunk);
        } else {
            memory.record_chunk_failure(chunk.len() as u32, tail_score);
        }

        let next_top = chunks.get(idx + 1).and_then(|c| c.first()).map(|t| t.score);
        if exit.observe_chunk(next_top, outcome, config, &scoring.karlin()) {
            break;
        }
    }

    stats.merge(&worker_stats);

    let culled = cull_matches_across_query(all_matches, config);
    let mut buf = format.print_query_intro(claim.query_id, &query.name);
    if culled.is_empty() {
        if config.report_unaligned {
            buf.extend(format.print_unaligned(claim.query_id, &query.name));
        }
    } else {
        for m in &culled {
            let target_id = database.target_id(m.block_id);
            buf.extend(format.print_match(claim.query_id, &query.name, target_id, m));
        }
    }
    buf.extend(format.print_query_epilog(claim.query_id));
    sink.submit(claim.query_id, buf);
    Ok(())
}

/// Query-parallel worker count for one batch: `config.threads` workers
/// race `fetcher.next()` when load-balancing favors spreading across
/// queries, otherwise a single thread walks the claims serially and
/// `config.threads_align` does the parallel work inside each large
/// query instead.
fn query_worker_count(config: &Config) -> usize {
    match config.load_balancing {
        LoadBalancing::QueryParallel => config.threads.max(1),
        LoadBalancing::TargetParallel => 1,
    }
}

/// Run the six stages on every claimed query range from `hit_source`
/// against `database`, submitting each query's formatted buffer to
/// `sink` and folding per-worker counters into `stats`. Returns once the
/// hit source is exhausted.
pub fn run_search(
    hit_source: &mut dyn HitSource,
    queries: &[QueryRecord<'_>],
    database: &dyn Database,
    config: &Config,
    format: &dyn OutputFormat,
    sink: &OutputSink,
    stats: &Statistics,
    contexts: u32,
) -> seedx_error::Result<()> {
    let scoring = ScoringMatrix::gapped_default();
    let lengths = TargetLengths::new(database.lengths());
    let mask_guard = MaskGuard::new();
    let masker = build_masker(config.masking, config.tantan_min_mask_prob);
    let matrix_pool = MatrixPool::new();
    let total_letters = database.total_letters();
    let max_batch_bytes = batch_max_bytes(
        total_letters / 1e9,
        config.index_chunks,
        config.trace_pt_fetch_size,
        config.memory_limit_bytes,
    ) as usize;
    let num_workers = query_worker_count(config);

    loop {
        hit_source.load(max_batch_bytes);
        let Some(batch) = hit_source.retrieve() else {
            break;
        };
        let query_begin = batch.query_begin;
        let query_end = batch.query_end;
        let hits: Arc<[SeedHit]> = Arc::from(batch.hits);
        let fetcher = AlignFetcher::new(hits.clone(), contexts, config);
        let claimed_ids: Mutex<Vec<QueryId>> = Mutex::new(Vec::new());
        let errors: Mutex<Vec<seedx_error::Error>> = Mutex::new(Vec::new());

        let env = SearchEnv {
            queries,
            database,
            config,
            format,
            sink,
            stats,
            lengths: &lengths,
            mask_guard: &mask_guard,
            masker: masker.as_ref(),
            matrix_pool: &matrix_pool,
            scoring: &scoring,
            total_letters,
            fetcher: &fetcher,
        };

        std::thread::scope(|scope| {
            for _ in 0..num_workers {
                let env = &env;
                let claimed_ids = &claimed_ids;
                let errors = &errors;
                scope.spawn(move || {
                    while let Some(claim) = env.fetcher.next() {
                        claimed_ids.lock().push(claim.query_id);
                        if let Err(e) = process_claim(claim, env, contexts) {
                            errors.lock().push(e);
                            break;
                        }
                    }
                });
            }
        });

        if let Some(e) = errors.into_inner().into_iter().next() {
            return Err(e);
        }

        // Queries inside this batch's range with zero hits never get a
        // claim from the fetcher at all. Emit that record here, or nothing, per
        // `report_unaligned`.
        let claimed_ids = claimed_ids.into_inner();
        for query_id in query_begin..query_end {
            if claimed_ids.contains(&query_id) {
                continue;
            }
            let Some(query) = queries.iter().find(|q| q.query_id == query_id) else {
                continue;
            };
            if !config.report_unaligned {
                continue;
            }
            let mut buf = format.print_query_intro(query_id, &query.name);
            buf.extend(format.print_unaligned(query_id, &query.name));
            buf.extend(format.print_query_epilog(query_id));
            sink.submit(query_id, buf);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::format::TabularFormat;
    use seedx_hitbuf::HitBatch;

    struct OneShotHitSource {
        batch: Option<Vec<SeedHit>>,
    }

    impl HitSource for OneShotHitSource {
        fn load(&mut self, _max_bytes: usize) {}

        fn retrieve(&mut self) -> Option<HitBatch> {
            let hits = self.batch.take()?;
            Some(HitBatch {
                hits,
                query_begin: 0,
                query_end: 1,
            })
        }
    }

    #[test]
    fn single_perfect_match_produces_one_reported_row() {
        let query_seq = b"ACDEFGHIKLMNPQRSTVWY".to_vec();
        let db = InMemoryDatabase::new(vec![("target0".to_string(), query_seq.clone())]);

        let hit = SeedHit {
            query_ctx: 0,
            subject_offset: 0,
            seed_query_offset: 0,
            score: 40,
        };
        let mut source = OneShotHitSource { batch: Some(vec![hit]) };

        let queries = vec![QueryRecord::protein(0, "q0", &query_seq)];
        let mut config = Config::default();
        config.gapped_filter_evalue = -1.0;
        let format = TabularFormat::new(seedx_matrix::KarlinAltschul::BLOSUM62_GAP_11_1);
        let sink = OutputSink::new(0);
        let stats = Statistics::new();

        run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

        let ready = sink.drain_ready();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].0, 0);
        let text = String::from_utf8(ready[0].1.clone()).unwrap();
        assert!(text.contains("target0"));
    }

    #[test]
    fn empty_query_range_with_report_unaligned_emits_star_record() {
        let db = InMemoryDatabase::new(vec![("target0".to_string(), b"ACDEFG".to_vec())]);
        let mut source = OneShotHitSource { batch: Some(Vec::new()) };
        let query_seq = b"ACDEFG".to_vec();
        let queries = vec![QueryRecord::protein(0, "q0", &query_seq)];
        let mut config = Config::default();
        config.report_unaligned = true;
        let format = TabularFormat::new(seedx_matrix::KarlinAltschul::BLOSUM62_GAP_11_1);
        let sink = OutputSink::new(0);
        let stats = Statistics::new();

        run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

        let ready = sink.drain_ready();
        assert_eq!(ready.len(), 1);
        assert_eq!(String::from_utf8(ready[0].1.clone()).unwrap(), "q0\t*\n");
    }

    #[test]
    fn query_parallel_workers_still_emit_strictly_ascending_order() {
        // Enough independent, non-overlapping queries that four real
        // threads race `AlignFetcher::next()` against each other, not
        // just one worker running the whole claim loop alone.
        let query_seqs: Vec<Vec<u8>> = (0..16u32).map(|i| b"ACDEFGHIKLMNPQRSTVWY".to_vec().repeat((i % 3 + 1) as usize)).collect();
        let entries: Vec<(String, Vec<u8>)> = query_seqs
            .iter()
            .enumerate()
            .map(|(i, seq)| (format!("target{i}"), seq.clone()))
            .collect();
        let db = InMemoryDatabase::new(entries);

        let queries: Vec<QueryRecord<'_>> = query_seqs
            .iter()
            .enumerate()
            .map(|(i, seq)| QueryRecord::protein(i as u32, format!("q{i}"), seq.as_slice()))
            .collect();

        let mut hits = Vec::new();
        let mut global_offset = 0u64;
        for (i, seq) in query_seqs.iter().enumerate() {
            hits.push(SeedHit {
                query_ctx: i as u32,
                subject_offset: global_offset,
                seed_query_offset: 0,
                score: 20,
            });
            global_offset += seq.len() as u64;
        }
        let mut source = OneShotHitSourceMulti { batch: Some(hits), query_end: query_seqs.len() as u32 };

        let mut config = Config::default();
        config.gapped_filter_evalue = -1.0;
        config.threads = 4;
        let format = TabularFormat::new(seedx_matrix::KarlinAltschul::BLOSUM62_GAP_11_1);
        let sink = OutputSink::new(0);
        let stats = Statistics::new();

        run_search(&mut source, &queries, &db, &config, &format, &sink, &stats, 1).unwrap();

        let ready = sink.drain_ready();
        assert_eq!(ready.len(), query_seqs.len());
        let ids: Vec<_> = ready.iter().map(|(id, _)| *id).collect();
        let mut sorted_ids = ids.clone();
        sorted_ids.sort_unstable();
        assert_eq!(ids, sorted_ids, "sink must deliver in strictly ascending query order");
        assert_eq!(ids, (0..query_seqs.len() as u32).collect::<Vec<_>>());
    }

    struct OneShotHitSourceMulti {
        batch: Option<Vec<SeedHit>>,
        query_end: u32,
    }

    impl HitSource for OneShotHitSourceMulti {
        fn load(&mut self, _max_bytes: usize) {}

        fn retrieve(&mut self) -> Option<HitBatch> {
            let hits = self.batch.take()?;
            Some(HitBatch {
                hits,
                query_begin: 0,
                query_end: self.query_end,
            })
        }
    }
}
