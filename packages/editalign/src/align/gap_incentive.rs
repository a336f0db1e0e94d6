use crate::make_error;
use eyre::Report;

/// Neutral gap incentive vector: no reference column is favored.
///
/// The vector has one entry per reference column boundary, i.e. length
/// `ref_len + 1`. Entry `k` offsets the cost of gaps opened at reference
/// column `k`.
pub fn gap_incentive_flat(ref_len: usize) -> Vec<i32> {
  vec![0; ref_len + 1]
}

/// Incentive vector with `bonus` at each predicted cut site.
///
/// Nuclease-induced indels cluster at the cut site; the bonus makes the
/// aligner place otherwise-equivalent gaps there, so that downstream variant
/// calls localize consistently. The bonus is a tie-breaker, not a reward: it
/// is collected by every reference-gap column at the cut site, so a bonus
/// exceeding the cost of a gap-pair column plus a match attracts spurious
/// gap columns there instead of relocating an existing run.
pub fn gap_incentive_at_cut_sites(ref_len: usize, cut_sites: &[usize], bonus: i32) -> Result<Vec<i32>, Report> {
  let mut incentive = gap_incentive_flat(ref_len);
  for &cut_site in cut_sites {
    if cut_site > ref_len {
      return make_error!(
        "Invalid input: cut site {cut_site} is outside of the reference of length {ref_len} (valid range is 0..={ref_len})"
      );
    }
    incentive[cut_site] += bonus;
  }
  Ok(incentive)
}
