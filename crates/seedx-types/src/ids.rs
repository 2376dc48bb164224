//! Small newtypes shared across every pipeline stage.

/// Maximum number of query contexts (six reading frames for a translated
/// nucleotide query; one for a protein query).
pub const MAX_CONTEXTS: usize = 6;

/// One of up to [`MAX_CONTEXTS`] reading frames of a query.
pub type Frame = u8;

/// Local integer identifier of a reference sequence within a database
/// chunk.
pub type BlockId = u32;

/// Diagonal index of an ungapped segment: `subject_offset - query_offset`.
pub type Diagonal = i32;

/// Index of a query within the current batch (frame already stripped).
pub type QueryId = u32;
