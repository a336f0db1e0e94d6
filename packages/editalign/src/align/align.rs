use crate::align::backtrace::backtrace;
use crate::align::grid_2d::Grid2d;
use crate::align::params::AlignmentParams;
use crate::align::score_matrix::ScoreMatrix;
use crate::alphabet::nuc::{ensure_no_gaps, normalize_seq, GAP};
use crate::make_error;
use eyre::Report;
use log::trace;

/// Predecessor plane recorded for every cell of every DP plane.
///
/// `RefGap` columns consume a query base against a gap in the reference,
/// `QryGap` columns consume a reference base against a gap in the query.
/// `Unset` marks cells no valid trace can reach; the traceback treats it as a
/// contract violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
  Match,
  RefGap,
  QryGap,
  Unset,
}

/// Score and pointer planes of one alignment, allocated per call and owned by
/// the caller for its duration.
pub struct DpPlanes {
  pub m: Grid2d<i32>,
  pub ref_gap: Grid2d<i32>,
  pub qry_gap: Grid2d<i32>,
  pub m_path: Grid2d<Plane>,
  pub ref_gap_path: Grid2d<Plane>,
  pub qry_gap_path: Grid2d<Plane>,
}

/// Result of a global pairwise alignment: two gap-padded sequences of equal
/// length, the fraction of matching columns and the raw score of the winning
/// path.
#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseAlignment {
  pub ref_aln: Vec<u8>,
  pub qry_aln: Vec<u8>,
  pub match_pct: f64,
  pub score: i32,
}

/// Aligns a query against a reference, globally, with affine gap penalties,
/// free terminal gaps and a position-specific gap incentive.
///
/// `gap_incentive` must have exactly `ref_seq.len() + 1` entries: entry `k`
/// offsets the cost of gaps opened at reference column `k` (and, for gaps in
/// the reference, of every gap column there). Inputs are case-insensitive and
/// must not contain the gap character. Deterministic; either sequence may be
/// empty.
pub fn align_seqs(
  qry_seq: &[u8],
  ref_seq: &[u8],
  score_matrix: &ScoreMatrix,
  gap_incentive: &[i32],
  params: &AlignmentParams,
) -> Result<PairwiseAlignment, Report> {
  ensure_no_gaps(qry_seq, "query")?;
  ensure_no_gaps(ref_seq, "reference")?;
  if gap_incentive.len() != ref_seq.len() + 1 {
    return make_error!(
      "Invalid input: gap incentive vector has {} entries, but a reference of length {} requires {}",
      gap_incentive.len(),
      ref_seq.len(),
      ref_seq.len() + 1
    );
  }

  let qry_seq = normalize_seq(qry_seq);
  let ref_seq = normalize_seq(ref_seq);

  if qry_seq.is_empty() || ref_seq.is_empty() {
    return Ok(align_with_empty(&qry_seq, &ref_seq, gap_incentive, params));
  }

  let planes = fill_planes(&qry_seq, &ref_seq, score_matrix, gap_incentive, params)?;
  backtrace(&qry_seq, &ref_seq, &planes)
}

/// A degenerate alignment where at least one side is empty: the other side
/// aligns against gaps only, at terminal-gap cost.
fn align_with_empty(
  qry_seq: &[u8],
  ref_seq: &[u8],
  gap_incentive: &[i32],
  params: &AlignmentParams,
) -> PairwiseAlignment {
  if qry_seq.is_empty() && ref_seq.is_empty() {
    return PairwiseAlignment {
      ref_aln: vec![],
      qry_aln: vec![],
      match_pct: 0.0,
      score: 0,
    };
  }

  let (ref_aln, qry_aln) = if qry_seq.is_empty() {
    (ref_seq.to_vec(), vec![GAP; ref_seq.len()])
  } else {
    (vec![GAP; qry_seq.len()], qry_seq.to_vec())
  };
  let gap_len = ref_aln.len() as i32;
  PairwiseAlignment {
    score: params.penalty_gap_extend * gap_len + gap_incentive[0],
    ref_aln,
    qry_aln,
    match_pct: 0.0,
  }
}

/// Match percentage over the aligned length, rounded to three decimal places
/// (multiply, round, divide).
pub(crate) fn calc_match_pct(n_matches: usize, aln_len: usize) -> f64 {
  if aln_len == 0 {
    return 0.0;
  }
  let pct = 100.0 * (n_matches as f64) / (aln_len as f64);
  (pct * 1000.0).round() / 1000.0
}

/// Chooses among the three predecessor planes of a match/mismatch cell (also
/// used for the traceback start at the corner). The preference order is
/// match, then gap-in-query, then gap-in-reference; comparisons are inclusive,
/// so the earlier plane keeps ties. This ordering decides which of several
/// equal-score alignments the traceback reproduces and is load-bearing for
/// gap placement (single runs instead of scattered ones).
pub(crate) const fn best_of_planes(m: i32, qry_gap: i32, ref_gap: i32) -> (i32, Plane) {
  if m >= qry_gap {
    if m >= ref_gap {
      (m, Plane::Match)
    } else {
      (ref_gap, Plane::RefGap)
    }
  } else if qry_gap >= ref_gap {
    (qry_gap, Plane::QryGap)
  } else {
    (ref_gap, Plane::RefGap)
  }
}

fn fill_planes(
  qry_seq: &[u8],
  ref_seq: &[u8],
  score_matrix: &ScoreMatrix,
  gap_incentive: &[i32],
  params: &AlignmentParams,
) -> Result<DpPlanes, Report> {
  let n_ref = ref_seq.len();
  let n_qry = qry_seq.len();
  let num_rows = n_ref + 1;
  let num_cols = n_qry + 1;
  trace!("alignment planes: {num_rows} rows x {num_cols} cols");

  let mut planes = DpPlanes {
    m: Grid2d::filled(num_rows, num_cols, 0_i32)?,
    ref_gap: Grid2d::filled(num_rows, num_cols, 0_i32)?,
    qry_gap: Grid2d::filled(num_rows, num_cols, 0_i32)?,
    m_path: Grid2d::filled(num_rows, num_cols, Plane::Unset)?,
    ref_gap_path: Grid2d::filled(num_rows, num_cols, Plane::Unset)?,
    qry_gap_path: Grid2d::filled(num_rows, num_cols, Plane::Unset)?,
  };

  let gap_open = params.penalty_gap_open;
  let gap_extend = params.penalty_gap_extend;

  // Score floor: must lose against any real path. The length product alone is
  // not enough once the incentive vector has positive entries (a floored
  // lead-in could win them back cell by cell along an incentive row), so the
  // maximal incentive harvest is folded in as well.
  let max_incentive = gap_incentive.iter().copied().max().unwrap_or(0).max(0);
  let harvest_span = (n_qry as i32).saturating_add(n_ref as i32).saturating_add(1);
  let score_min = gap_open
    .saturating_mul(n_qry as i32)
    .saturating_mul(n_ref as i32)
    .saturating_sub(max_incentive.saturating_mul(harvest_span));

  // Lead-in row and column. Terminal gaps cost extension only, plus the
  // incentive of reference column 0, applied once. Floored cells also get a
  // pointer toward the opposite gap plane: a traceback that ties onto them
  // must walk out along the boundary instead of stranding on an unset cell.
  for j in 1..=n_qry {
    planes.m[(0, j)] = score_min;
    planes.m_path[(0, j)] = Plane::RefGap;
    planes.ref_gap[(0, j)] = gap_extend * (j as i32) + gap_incentive[0];
    planes.ref_gap_path[(0, j)] = Plane::RefGap;
    planes.qry_gap[(0, j)] = score_min;
    planes.qry_gap_path[(0, j)] = Plane::RefGap;
  }
  for i in 1..=n_ref {
    planes.m[(i, 0)] = score_min;
    planes.m_path[(i, 0)] = Plane::QryGap;
    planes.qry_gap[(i, 0)] = gap_extend * (i as i32) + gap_incentive[0];
    planes.qry_gap_path[(i, 0)] = Plane::QryGap;
    planes.ref_gap[(i, 0)] = score_min;
    planes.ref_gap_path[(i, 0)] = Plane::QryGap;
  }

  // Interior cells.
  for i in 1..n_ref {
    for j in 1..n_qry {
      fill_cell(&mut planes, qry_seq, ref_seq, score_matrix, gap_incentive, i, j, gap_open, gap_extend);
    }
  }

  // Last column, then last row. Gaps opened against a fully consumed sequence
  // are terminal and open for the extension penalty; the match recurrence is
  // unchanged.
  for i in 1..n_ref {
    fill_cell(
      &mut planes,
      qry_seq,
      ref_seq,
      score_matrix,
      gap_incentive,
      i,
      n_qry,
      gap_extend,
      gap_extend,
    );
  }
  for j in 1..=n_qry {
    fill_cell(
      &mut planes,
      qry_seq,
      ref_seq,
      score_matrix,
      gap_incentive,
      n_ref,
      j,
      gap_extend,
      gap_extend,
    );
  }

  Ok(planes)
}

/// Fills cell `(i, j)` of all three planes. `gap_open` is the effective gap
/// opening score for this cell: the true opening penalty in the interior, the
/// extension penalty on the last row and column.
fn fill_cell(
  planes: &mut DpPlanes,
  qry_seq: &[u8],
  ref_seq: &[u8],
  score_matrix: &ScoreMatrix,
  gap_incentive: &[i32],
  i: usize,
  j: usize,
  gap_open: i32,
  gap_extend: i32,
) {
  // Gap in the reference: the column consumes a query base. The incentive of
  // reference column `i` applies to every cell of this plane. Opening must
  // win strictly, so runs keep extending on ties.
  let open = gap_open + planes.m[(i, j - 1)];
  let extend = gap_extend + planes.ref_gap[(i, j - 1)];
  if open > extend {
    planes.ref_gap[(i, j)] = open + gap_incentive[i];
    planes.ref_gap_path[(i, j)] = Plane::Match;
  } else {
    planes.ref_gap[(i, j)] = extend + gap_incentive[i];
    planes.ref_gap_path[(i, j)] = Plane::RefGap;
  }

  // Gap in the query: the column consumes a reference base. The incentive
  // applies on the opening transition only; a run crossing the incentive
  // column must not collect it once per extension.
  let open = gap_open + planes.m[(i - 1, j)] + gap_incentive[i - 1];
  let extend = gap_extend + planes.qry_gap[(i - 1, j)];
  if open > extend {
    planes.qry_gap[(i, j)] = open;
    planes.qry_gap_path[(i, j)] = Plane::Match;
  } else {
    planes.qry_gap[(i, j)] = extend;
    planes.qry_gap_path[(i, j)] = Plane::QryGap;
  }

  // Match/mismatch column.
  let (best, origin) = best_of_planes(
    planes.m[(i - 1, j - 1)],
    planes.qry_gap[(i - 1, j - 1)],
    planes.ref_gap[(i - 1, j - 1)],
  );
  planes.m[(i, j)] = best + score_matrix.score(ref_seq[i - 1], qry_seq[j - 1]);
  planes.m_path[(i, j)] = origin;
}
