use crate::make_error;
use eyre::Report;

/// Gap character in aligned sequences
pub const GAP: u8 = b'-';

/// Canonical nucleotide codes. `N` is handled separately by the scoring matrix.
pub const CANONICAL_NUCS: [u8; 4] = [b'A', b'C', b'G', b'T'];

pub const NUC_N: u8 = b'N';

#[inline]
pub const fn is_gap(c: u8) -> bool {
  c == GAP
}

/// Uppercases a raw sequence. Scoring tables are populated for uppercase codes
/// only, so normalization happens once, at the aligner boundary. Unrecognized
/// bytes are passed through and score zero.
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
  seq.iter().map(u8::to_ascii_uppercase).collect()
}

/// Raw aligner inputs must not contain gaps. Gaps only appear in outputs.
pub fn ensure_no_gaps(seq: &[u8], name: &str) -> Result<(), Report> {
  if let Some(pos) = seq.iter().position(|&c| is_gap(c)) {
    return make_error!("Invalid input: {name} sequence contains gap character '-' at position {pos}");
  }
  Ok(())
}
