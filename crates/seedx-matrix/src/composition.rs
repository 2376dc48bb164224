//! Composition-based statistics.

use crate::blosum62::{self, residue_index};

/// Integer scale applied to the 16-bit adjusted matrix so fractional
/// log-odds corrections survive rounding.
pub const AVG_MATRIX_SCALE: i32 = 100;

/// Amino-acid composition of one sequence, over the 20 standard
/// residues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition(pub [f64; 20]);

impl Composition {
    #[must_use]
    pub fn of_sequence(seq: &[u8]) -> Self {
        let mut counts = [0u32; 20];
        let mut total = 0u32;
        for &b in seq {
            let idx = residue_index(b);
            if idx < 20 {
                counts[idx] += 1;
                total += 1;
            }
        }
        let mut freqs = [0.0; 20];
        if total > 0 {
            for (f, c) in freqs.iter_mut().zip(counts.iter()) {
                *f = f64::from(*c) / f64::from(total);
            }
        }
        Self(freqs)
    }

    /// Kullback-Leibler divergence against the matrix's background
    /// distribution; used to decide whether adjustment is worthwhile.
    #[must_use]
    pub fn relative_entropy(&self, background: &[f64; 20]) -> f64 {
        self.0
            .iter()
            .zip(background.iter())
            .filter(|(p, _)| **p > 0.0)
            .map(|(p, q)| p * (p / q).ln())
            .sum()
    }
}

/// Verdict of the composition test: whether the target's avg-matrix-adjust
/// should be built, or whether the unmodified matrix should be reused.
/// Simplified to a single relative-entropy threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionVerdict {
    UseAdjustedMatrix,
    UseOldMatrix,
}

const MIN_RELATIVE_ENTROPY: f64 = 0.05;

#[must_use]
pub fn test_to_apply_readjustment(
    query_comp: &Composition,
    target_comp: &Composition,
    background: &[f64; 20],
) -> CompositionVerdict {
    let re = query_comp.relative_entropy(background) + target_comp.relative_entropy(background);
    if re >= MIN_RELATIVE_ENTROPY {
        CompositionVerdict::UseAdjustedMatrix
    } else {
        CompositionVerdict::UseOldMatrix
    }
}

/// Build a composition-adjusted 16-bit scoring matrix from a query and
/// target composition, scaled by [`AVG_MATRIX_SCALE`]. The adjustment
/// nudges each substitution score by the average log-odds shift implied
/// by both sequences' deviation from the background distribution.
#[must_use]
pub fn make_adjusted_matrix(
    query_comp: &Composition,
    target_comp: &Composition,
    lambda: f64,
    background: &[f64; 20],
) -> Vec<i16> {
    let alphabet_len = blosum62::ALPHABET.len();
    let mut matrix = vec![0i16; alphabet_len * alphabet_len];
    for (i, &a) in blosum62::ALPHABET.iter().enumerate() {
        for (j, &b) in blosum62::ALPHABET.iter().enumerate() {
            let raw = blosum62::raw_score(a, b);
            let correction = if i < 20 && j < 20 {
                let qi = query_comp.0[i].max(1e-10);
                let tj = target_comp.0[j].max(1e-10);
                0.5 * ((qi / background[i]).ln() + (tj / background[j]).ln()) / lambda
            } else {
                0.0
            };
            let scaled = (f64::from(raw) + correction) * f64::from(AVG_MATRIX_SCALE);
            matrix[i * alphabet_len + j] = scaled.round().clamp(
                f64::from(i16::MIN),
                f64::from(i16::MAX),
            ) as i16;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_composition_has_low_relative_entropy() {
        let background = blosum62::background_freqs();
        let comp = Composition(background);
        assert!(comp.relative_entropy(&background) < 1e-9);
    }

    #[test]
    fn skewed_composition_triggers_adjustment() {
        let background = blosum62::background_freqs();
        let mut skewed = [0.0; 20];
        skewed[0] = 1.0;
        let comp = Composition(skewed);
        let verdict = test_to_apply_readjustment(&comp, &comp, &background);
        assert_eq!(verdict, CompositionVerdict::UseAdjustedMatrix);
    }

    #[test]
    fn adjusted_matrix_has_expected_dimension() {
        let background = blosum62::background_freqs();
        let comp = Composition(background);
        let m = make_adjusted_matrix(&comp, &comp, 0.267, &background);
        assert_eq!(m.len(), blosum62::ALPHABET.len() * blosum62::ALPHABET.len());
    }
}
