use crate::align::params::AlignmentParams;
use crate::alphabet::nuc::{CANONICAL_NUCS, NUC_N};

const NUM_CODES: usize = 256;

/// Dense substitution score table indexed by raw byte codes.
///
/// The full 0-255 range is allocated so that any byte pair can be looked up
/// without bounds concerns; cells that are never written stay at zero, which
/// makes unrecognized bases score neutrally instead of trapping. Constructed
/// once, immutable afterwards, shared read-only between alignments.
#[derive(Clone)]
pub struct ScoreMatrix {
  table: Vec<i32>,
}

impl ScoreMatrix {
  /// Builds the nucleotide table. Only ordered pairs over `{A, C, G, T, N}`
  /// (uppercase codes) are populated:
  /// identical canonical bases score `score_match`, different canonical bases
  /// `penalty_mismatch`, a canonical base against `N` (either order)
  /// `penalty_n_mismatch`, and `N` against `N` `penalty_n_match`.
  pub fn dna(score_match: i32, penalty_mismatch: i32, penalty_n_mismatch: i32, penalty_n_match: i32) -> Self {
    let mut table = vec![0_i32; NUM_CODES * NUM_CODES];

    for &a in &CANONICAL_NUCS {
      for &b in &CANONICAL_NUCS {
        table[index_of(a, b)] = if a == b { score_match } else { penalty_mismatch };
      }
      table[index_of(a, NUC_N)] = penalty_n_mismatch;
      table[index_of(NUC_N, a)] = penalty_n_mismatch;
    }
    table[index_of(NUC_N, NUC_N)] = penalty_n_match;

    Self { table }
  }

  pub fn from_params(params: &AlignmentParams) -> Self {
    Self::dna(
      params.score_match,
      params.penalty_mismatch,
      params.penalty_n_mismatch,
      params.penalty_n_match,
    )
  }

  #[inline]
  pub fn score(&self, a: u8, b: u8) -> i32 {
    self.table[index_of(a, b)]
  }
}

#[inline]
const fn index_of(a: u8, b: u8) -> usize {
  (a as usize) * NUM_CODES + (b as usize)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn default_matrix() -> ScoreMatrix {
    ScoreMatrix::from_params(&AlignmentParams::default())
  }

  #[rstest]
  #[case(b'A', b'A', 5)]
  #[case(b'T', b'T', 5)]
  #[case(b'A', b'C', -4)]
  #[case(b'G', b'T', -4)]
  #[case(b'A', b'N', -2)]
  #[case(b'N', b'G', -2)]
  #[case(b'N', b'N', -1)]
  fn scores_populated_pairs(#[case] a: u8, #[case] b: u8, #[case] expected: i32) {
    assert_eq!(default_matrix().score(a, b), expected);
  }

  #[test]
  fn scores_unknown_codes_as_zero() {
    let matrix = default_matrix();
    assert_eq!(matrix.score(b'X', b'A'), 0);
    assert_eq!(matrix.score(b'a', b'a'), 0); // lowercase is normalized before scoring
    assert_eq!(matrix.score(b'-', b'-'), 0);
    assert_eq!(matrix.score(0xFF, 0x00), 0);
  }

  #[test]
  fn honors_custom_costs() {
    let matrix = ScoreMatrix::dna(1, -1, -3, -5);
    assert_eq!(matrix.score(b'C', b'C'), 1);
    assert_eq!(matrix.score(b'C', b'G'), -1);
    assert_eq!(matrix.score(b'C', b'N'), -3);
    assert_eq!(matrix.score(b'N', b'N'), -5);
  }
}
