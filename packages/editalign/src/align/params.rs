use clap::Parser;
use serde::{Deserialize, Serialize};

/// Scoring parameters of the pairwise aligner.
///
/// Gap penalties are supplied as negative numbers and are added to scores, so a
/// "cheaper" gap is a penalty closer to zero.
#[derive(Parser, Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct AlignmentParams {
  /// Score for a pair of identical canonical bases.
  #[clap(long, default_value_t = 5)]
  pub score_match: i32,

  /// Penalty for a pair of different canonical bases.
  #[clap(long, default_value_t = -4, allow_hyphen_values = true)]
  pub penalty_mismatch: i32,

  /// Penalty for aligning a canonical base against `N`, in either order.
  #[clap(long, default_value_t = -2, allow_hyphen_values = true)]
  pub penalty_n_mismatch: i32,

  /// Score for aligning `N` against `N`.
  #[clap(long, default_value_t = -1, allow_hyphen_values = true)]
  pub penalty_n_match: i32,

  /// Penalty for opening a gap. A higher penalty (more negative) results in fewer gaps and more mismatches.
  /// Gaps at either end of the alignment open for the extension penalty instead.
  #[clap(long, default_value_t = -20, allow_hyphen_values = true)]
  pub penalty_gap_open: i32,

  /// Penalty for extending a gap by one column.
  #[clap(long, default_value_t = -2, allow_hyphen_values = true)]
  pub penalty_gap_extend: i32,

  /// Bonus added to the gap incentive vector at each predicted cut site.
  /// Biases the aligner so that gaps localize at the cut site when placements are otherwise equivalent.
  #[clap(long, default_value_t = 1)]
  pub incentive_bonus: i32,
}

impl Default for AlignmentParams {
  fn default() -> Self {
    Self {
      score_match: 5,
      penalty_mismatch: -4,
      penalty_n_mismatch: -2,
      penalty_n_match: -1,
      penalty_gap_open: -20,
      penalty_gap_extend: -2,
      incentive_bonus: 1,
    }
  }
}
