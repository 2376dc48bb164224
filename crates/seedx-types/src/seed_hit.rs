//! Raw seed hits (indexer output) and the per-target arrays the hit
//! loader builds from them.

use std::cmp::Ordering;

use crate::ids::{BlockId, Diagonal, Frame};

/// A short exact/near-exact sub-word match produced by the upstream
/// indexer: `(query-offset, subject-offset, ungapped-score)`.
///
/// `query_ctx` packs the query index and frame together the way the
/// indexer emits them: `query_ctx = query_index * contexts + frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHit {
    pub query_ctx: u32,
    pub subject_offset: u64,
    pub seed_query_offset: i32,
    pub score: u16,
}

impl SeedHit {
    #[must_use]
    pub const fn query_index(&self, contexts: u32) -> u32 {
        self.query_ctx / contexts
    }

    #[must_use]
    pub const fn frame(&self, contexts: u32) -> Frame {
        (self.query_ctx % contexts) as Frame
    }
}

/// Ordering key used by the hit loader to group hits by subject position
/// before translating to target-local coordinates. Ties may break on any
/// criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BySubjectOffset(pub SeedHit);

impl PartialOrd for BySubjectOffset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BySubjectOffset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.subject_offset.cmp(&other.0.subject_offset)
    }
}

/// A hit translated into target-local coordinates: seed-query-offset
/// (`i`), seed-subject-offset (`j`), score, frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalHit {
    pub i: i32,
    pub j: i32,
    pub score: u16,
    pub frame: Frame,
}

impl LocalHit {
    #[must_use]
    pub const fn diag(&self) -> Diagonal {
        self.j - self.i
    }
}

/// `(frame, diagonal, subject-offset)` ordering used before x-drop
/// ungapped extension.
pub fn cmp_frame_diag_subject(a: &LocalHit, b: &LocalHit) -> Ordering {
    a.frame
        .cmp(&b.frame)
        .then(a.diag().cmp(&b.diag()))
        .then(a.j.cmp(&b.j))
}

/// The ordered list of [`LocalHit`]s belonging to one target, plus the
/// cached maximum ungapped score across them.
#[derive(Debug, Clone, Default)]
pub struct TargetHits {
    pub block_id: BlockId,
    pub hits: Vec<LocalHit>,
    pub max_score: u16,
}

impl TargetHits {
    #[must_use]
    pub fn new(block_id: BlockId, hits: Vec<LocalHit>) -> Self {
        let max_score = hits.iter().map(|h| h.score).max().unwrap_or(0);
        Self {
            block_id,
            hits,
            max_score,
        }
    }
}

/// A `(target index, max score)` entry used to rank targets before
/// chunked expansion. Comparisons order by score descending, then by
/// target index ascending, so that sorting the natural way (ascending)
/// yields the ranking order the adaptive ranker expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetScore {
    /// Index into the `TargetHits` array produced by the loader.
    pub target: u32,
    pub score: u16,
}

impl PartialOrd for TargetScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TargetScore {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.target.cmp(&other.target))
    }
}
