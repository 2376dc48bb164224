//! Output-format strategy: a uniform capability set, no dynamic dispatch tables.
//! The content format itself is opaque to the core; only
//! ordering and completeness are invariants it must uphold.

use seedx_types::{Match, QueryId};

pub trait OutputFormat: Send + Sync {
    fn print_query_intro(&self, query_id: QueryId, query_name: &str) -> Vec<u8>;
    fn print_match(&self, query_id: QueryId, query_name: &str, target_id: &str, m: &Match) -> Vec<u8>;
    fn print_unaligned(&self, query_id: QueryId, query_name: &str) -> Vec<u8>;
    fn print_query_epilog(&self, query_id: QueryId) -> Vec<u8>;
}

/// BLAST-tabular-like format with a fixed field set
/// (`qseqid sseqid bitscore evalue length pident`), enough to exercise
/// the pipeline end to end without a real output-serializer dependency.
#[derive(Debug, Clone, Copy)]
pub struct TabularFormat {
    pub karlin: seedx_matrix::KarlinAltschul,
}

impl TabularFormat {
    #[must_use]
    pub fn new(karlin: seedx_matrix::KarlinAltschul) -> Self {
        Self { karlin }
    }
}

impl OutputFormat for TabularFormat {
    fn print_query_intro(&self, _query_id: QueryId, _query_name: &str) -> Vec<u8> {
        Vec::new()
    }

    fn print_match(&self, _query_id: QueryId, query_name: &str, target_id: &str, m: &Match) -> Vec<u8> {
        let mut line = String::new();
        for hsp in &m.hsps {
            line.push_str(&format!(
                "{}\t{}\t{:.1}\t{:.2e}\t{}\t{:.1}\n",
                query_name,
                target_id,
                self.karlin.bitscore(hsp.score),
                hsp.evalue,
                hsp.length,
                hsp.identity_pct(),
            ));
        }
        line.into_bytes()
    }

    fn print_unaligned(&self, _query_id: QueryId, query_name: &str) -> Vec<u8> {
        format!("{query_name}\t*\n").into_bytes()
    }

    fn print_query_epilog(&self, _query_id: QueryId) -> Vec<u8> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedx_types::Hsp;

    fn sample_match() -> Match {
        let hsp = Hsp {
            score: 120,
            evalue: 1e-30,
            frame: 0,
            query_start: 0,
            query_end: 100,
            subject_start: 0,
            subject_end: 100,
            identities: 100,
            length: 100,
            mismatches: 0,
            gap_openings: 0,
            transcript: None,
        };
        Match {
            block_id: 0,
            hsps: vec![hsp],
            identity_pct: 100.0,
            coverage_pct: 100.0,
        }
    }

    #[test]
    fn print_match_formats_one_line_per_hsp() {
        let format = TabularFormat::new(seedx_matrix::KarlinAltschul::BLOSUM62_GAP_11_1);
        let out = format.print_match(0, "q0", "sp|P00001", &sample_match());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("q0\tsp|P00001\t"));
    }

    #[test]
    fn print_unaligned_emits_star_record() {
        let format = TabularFormat::new(seedx_matrix::KarlinAltschul::BLOSUM62_GAP_11_1);
        let out = format.print_unaligned(0, "q0");
        assert_eq!(String::from_utf8(out).unwrap(), "q0\t*\n");
    }
}
