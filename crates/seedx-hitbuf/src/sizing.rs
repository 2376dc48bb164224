//! Batch byte-budget sizing.

/// `max_bytes = min(chunk_size * 1e10 * 2 / index_chunks / 3, trace_pt_fetch_size)`,
/// raised to `memory_limit * 1e9` when a memory ceiling is configured.
#[must_use]
pub fn batch_max_bytes(
    chunk_size: f64,
    index_chunks: f64,
    trace_pt_fetch_size: u64,
    memory_limit_bytes: Option<u64>,
) -> u64 {
    let derived = (chunk_size * 1e10 * 2.0 / index_chunks / 3.0).min(trace_pt_fetch_size as f64);
    let derived = derived.max(0.0) as u64;
    match memory_limit_bytes {
        Some(limit) => derived.max(limit),
        None => derived,
    }
}
