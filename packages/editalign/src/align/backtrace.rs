use crate::align::align::{best_of_planes, calc_match_pct, DpPlanes, PairwiseAlignment, Plane};
use crate::alphabet::nuc::GAP;
use crate::make_internal_error;
use eyre::Report;

/// Walks the pointer planes from the corner back to the origin and rebuilds
/// the aligned pair.
///
/// The starting plane is the best of the three corner scores, preferring
/// match, then gap-in-query, then gap-in-reference. Each step reads the
/// pointer of the current cell, emits one column according to the current
/// plane, then moves. Decrements saturate at zero so boundary cells never
/// index before the start of a sequence.
pub fn backtrace(qry_seq: &[u8], ref_seq: &[u8], planes: &DpPlanes) -> Result<PairwiseAlignment, Report> {
  let n_ref = ref_seq.len();
  let n_qry = qry_seq.len();

  let mut ref_aln = Vec::with_capacity(n_ref + n_qry);
  let mut qry_aln = Vec::with_capacity(n_ref + n_qry);
  let mut n_matches = 0_usize;

  let mut i = n_ref;
  let mut j = n_qry;
  let (score, mut plane) = best_of_planes(planes.m[(i, j)], planes.qry_gap[(i, j)], planes.ref_gap[(i, j)]);

  while i > 0 || j > 0 {
    let next = match plane {
      Plane::Match => planes.m_path[(i, j)],
      Plane::RefGap => planes.ref_gap_path[(i, j)],
      Plane::QryGap => planes.qry_gap_path[(i, j)],
      Plane::Unset => {
        return make_internal_error!("Alignment traceback reached an unset pointer at cell ({i}, {j})");
      }
    };

    match plane {
      Plane::Match => {
        if i > 0 && j > 0 {
          ref_aln.push(ref_seq[i - 1]);
          qry_aln.push(qry_seq[j - 1]);
          if ref_seq[i - 1] == qry_seq[j - 1] {
            n_matches += 1;
          }
        }
        i = i.saturating_sub(1);
        j = j.saturating_sub(1);
      }
      Plane::QryGap => {
        if i > 0 {
          ref_aln.push(ref_seq[i - 1]);
          qry_aln.push(GAP);
        }
        i = i.saturating_sub(1);
      }
      Plane::RefGap => {
        if j > 0 {
          ref_aln.push(GAP);
          qry_aln.push(qry_seq[j - 1]);
        }
        j = j.saturating_sub(1);
      }
      Plane::Unset => unreachable!(),
    }

    plane = next;
  }

  ref_aln.reverse();
  qry_aln.reverse();

  let match_pct = calc_match_pct(n_matches, ref_aln.len());
  Ok(PairwiseAlignment {
    ref_aln,
    qry_aln,
    match_pct,
    score,
  })
}
