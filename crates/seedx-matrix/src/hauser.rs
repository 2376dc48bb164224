//! Hauser-style compositional bias correction: a per-position score
//! adjustment compensating for a query's skewed amino-acid composition,
//! applied before x-drop extension.

use crate::blosum62::{self, residue_index};
use crate::composition::Composition;

/// Per-position bias correction for one query context. Index `i`
/// holds the correction to add to any raw substitution score scored
/// against `query[i]`.
#[derive(Debug, Clone)]
pub struct BiasCorrection(Vec<i32>);

impl BiasCorrection {
    #[must_use]
    pub fn compute(query: &[u8], background: &[f64; 20]) -> Self {
        let composition = Composition::of_sequence(query);
        let corrections = query
            .iter()
            .map(|&residue| {
                let r = residue_index(residue);
                if r >= 20 {
                    return 0;
                }
                let observed: f64 = (0..20)
                    .map(|b| composition.0[b] * f64::from(blosum62::raw_score(residue, blosum62::ALPHABET[b])))
                    .sum();
                let expected: f64 = (0..20)
                    .map(|b| background[b] * f64::from(blosum62::raw_score(residue, blosum62::ALPHABET[b])))
                    .sum();
                (observed - expected).round() as i32
            })
            .collect();
        Self(corrections)
    }

    #[must_use]
    pub fn at(&self, position: usize) -> i32 {
        self.0.get(position).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
