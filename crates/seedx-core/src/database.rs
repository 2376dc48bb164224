//! `Database` collaborator interface: the reference-sequence
//! store the pipeline treats as read-only and exclusively owning.

use std::sync::Arc;

use seedx_types::BlockId;

/// One loaded chunk of reference sequences the pipeline aligns against.
/// Real FASTA/index I/O is out of scope; implementations
/// here are in-memory fixtures built by the CLI or tests.
pub trait Database: Send + Sync {
    fn num_targets(&self) -> usize;
    fn target_len(&self, block_id: BlockId) -> usize;
    fn target_seq(&self, block_id: BlockId) -> Arc<[u8]>;
    fn target_id(&self, block_id: BlockId) -> &str;
    fn lengths(&self) -> &[u64];

    #[must_use]
    fn total_letters(&self) -> f64 {
        self.lengths().iter().sum::<u64>() as f64
    }
}

/// Simple in-memory `Database` built directly from sequences, enough to
/// drive `seedx-cli`'s synthetic fixtures and `seedx-harness`'s
/// scenario tests.
pub struct InMemoryDatabase {
    ids: Vec<String>,
    seqs: Vec<Arc<[u8]>>,
    lengths: Vec<u64>,
}

impl InMemoryDatabase {
    #[must_use]
    pub fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        let lengths = entries.iter().map(|(_, seq)| seq.len() as u64).collect();
        let (ids, seqs) = entries
            .into_iter()
            .map(|(id, seq)| (id, Arc::from(seq)))
            .unzip();
        Self { ids, seqs, lengths }
    }
}

impl Database for InMemoryDatabase {
    fn num_targets(&self) -> usize {
        self.seqs.len()
    }

    fn target_len(&self, block_id: BlockId) -> usize {
        self.seqs[block_id as usize].len()
    }

    fn target_seq(&self, block_id: BlockId) -> Arc<[u8]> {
        self.seqs[block_id as usize].clone()
    }

    fn target_id(&self, block_id: BlockId) -> &str {
        &self.ids[block_id as usize]
    }

    fn lengths(&self) -> &[u64] {
        &self.lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_database_reports_lengths_and_ids() {
        let db = InMemoryDatabase::new(vec![
            ("sp|P00001".to_string(), b"ACDEFG".to_vec()),
            ("sp|P00002".to_string(), b"GHIKLMN".to_vec()),
        ]);
        assert_eq!(db.num_targets(), 2);
        assert_eq!(db.target_len(1), 7);
        assert_eq!(db.target_id(0), "sp|P00001");
        assert!((db.total_letters() - 13.0).abs() < f64::EPSILON);
    }
}
