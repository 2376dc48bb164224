//! Fixture seed generator: the real indexer that emits seed hits from a
//! k-mer lookup table is an external collaborator. This is a
//! naive exact-k-mer scanner, just capable enough to drive the pipeline
//! end to end from two FASTA files on the command line.

use hashbrown::HashMap;
use seedx_matrix::blosum62;
use seedx_types::SeedHit;

/// Build a lookup of every `seed_len`-mer in `target` to its starting
/// offsets, then scan `query` for matches, emitting one [`SeedHit`] per
/// exact k-mer hit with its ungapped BLOSUM62 self-score.
fn exact_kmer_hits(query: &[u8], target: &[u8], seed_len: usize) -> Vec<(i32, i32, u16)> {
    if seed_len == 0 || target.len() < seed_len || query.len() < seed_len {
        return Vec::new();
    }

    let mut index: HashMap<&[u8], Vec<i32>> = HashMap::new();
    for (offset, window) in target.windows(seed_len).enumerate() {
        index.entry(window).or_default().push(offset as i32);
    }

    let mut hits = Vec::new();
    for (q_offset, window) in query.windows(seed_len).enumerate() {
        let Some(targets) = index.get(window) else { continue };
        let score: i32 = window.iter().map(|&r| blosum62::raw_score(r, r)).sum();
        for &t_offset in targets {
            hits.push((q_offset as i32, t_offset, score.max(0) as u16));
        }
    }
    hits
}

/// Emit seed hits for every `(query, target)` pair, with subject
/// offsets already translated into global database coordinates via
/// `target_global_offsets` (prefix sums matching the database's target
/// order, as [`seedx_loader::TargetLengths`] computes internally).
pub fn generate_seed_hits(
    queries: &[&[u8]],
    targets: &[&[u8]],
    target_global_offsets: &[u64],
    seed_len: usize,
    contexts: u32,
) -> Vec<SeedHit> {
    let mut hits = Vec::new();
    for (query_index, query) in queries.iter().enumerate() {
        for (target_index, target) in targets.iter().enumerate() {
            let base = target_global_offsets[target_index];
            for (q_offset, t_offset, score) in exact_kmer_hits(query, target, seed_len) {
                hits.push(SeedHit {
                    query_ctx: query_index as u32 * contexts,
                    subject_offset: base + t_offset as u64,
                    seed_query_offset: q_offset,
                    score,
                });
            }
        }
    }
    hits
}
