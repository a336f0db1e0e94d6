use crate::make_error;
use eyre::Report;
use itertools::izip;

/// Fraction of positions with identical characters, over the shorter of the
/// two lengths. A quick similarity check for sequences that are already in
/// the same frame; not defined for empty inputs.
pub fn homology(a: &[u8], b: &[u8]) -> Result<f64, Report> {
  let len = a.len().min(b.len());
  if len == 0 {
    return make_error!("Invalid input: homology is not defined for empty sequences");
  }
  let n_matches = izip!(&a[..len], &b[..len]).filter(|(x, y)| x == y).count();
  Ok((n_matches as f64) / (len as f64))
}
