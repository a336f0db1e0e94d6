use crate::alphabet::nuc::{is_gap, NUC_N};
use crate::make_error;
use eyre::Report;
use itertools::izip;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Insertions, deletions and substitutions of an aligned pair, in reference
/// coordinates.
///
/// Every list comes in two flavors: `all_*` is unfiltered, the unprefixed
/// flavor keeps only events whose coordinates fall into the caller-supplied
/// inclusion window. Coordinate intervals are half-open `[start, end)`.
/// Insertion `start`/`end` are the reference coordinates flanking the gap
/// run; deletion coordinates are the reference coordinates the run covers.
/// The totals `insertion_n`/`deletion_n` sum the windowed sizes and
/// `substitution_n` counts the windowed substitutions.
///
/// A deletion run closed by an insertion column, or still open at the end of
/// the alignment, takes its `end` from that column's `ref_positions` entry
/// verbatim; coordinates and sizes are signed for this reason, and for a
/// trailing run the recorded width is one short of the run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantReport {
  /// For every alignment column, the reference coordinate it maps to.
  /// Insertion columns carry a negative sentinel: a column right after
  /// reference coordinate `k` maps to `-k`, with the leading edge stored as
  /// `-1`. Non-negative therefore means "maps to the reference".
  pub ref_positions: Vec<i64>,

  pub all_insertion_positions: Vec<i64>,
  pub all_insertion_left_positions: Vec<i64>,
  pub all_insertion_coordinates: Vec<(i64, i64)>,
  pub all_insertion_sizes: Vec<usize>,
  pub insertion_positions: Vec<i64>,
  pub insertion_coordinates: Vec<(i64, i64)>,
  pub insertion_sizes: Vec<usize>,
  pub insertion_n: usize,

  pub all_deletion_positions: Vec<i64>,
  pub all_deletion_coordinates: Vec<(i64, i64)>,
  pub all_deletion_sizes: Vec<i64>,
  pub deletion_positions: Vec<i64>,
  pub deletion_coordinates: Vec<(i64, i64)>,
  pub deletion_sizes: Vec<i64>,
  pub deletion_n: i64,

  pub all_substitution_positions: Vec<i64>,
  pub all_substitution_values: Vec<char>,
  pub substitution_positions: Vec<i64>,
  pub substitution_values: Vec<char>,
  pub substitution_n: usize,
}

/// Scans an aligned pair in one pass and collects indels and substitutions.
///
/// Expects the aligner's output conventions: equal lengths, uppercase bases,
/// no column that is a gap in both sequences. A substitution requires two
/// different real bases with a query base other than `N`. Insertion runs that
/// precede the first reference base share the "no insertion open" sentinel
/// and are not reported as events (their columns still appear in
/// `ref_positions` as `-1`).
pub fn find_variants(ref_aln: &[u8], qry_aln: &[u8], include_idx: &BTreeSet<i64>) -> Result<VariantReport, Report> {
  if ref_aln.len() != qry_aln.len() {
    return make_error!(
      "Invalid input: aligned sequences differ in length: {} vs {}",
      ref_aln.len(),
      qry_aln.len()
    );
  }

  let mut report = VariantReport::default();

  let mut idx: i64 = 0;
  let mut start_insertion: i64 = -1;
  let mut insertion_size: usize = 0;
  let mut start_deletion: i64 = -1;

  for (column, (&ref_nuc, &qry_nuc)) in izip!(ref_aln, qry_aln).enumerate() {
    if is_gap(ref_nuc) && is_gap(qry_nuc) {
      return make_error!("Invalid input: aligned column {column} is a gap in both sequences");
    }

    if !is_gap(ref_nuc) {
      report.ref_positions.push(idx);

      if ref_nuc != qry_nuc && !is_gap(qry_nuc) && qry_nuc != NUC_N {
        report.all_substitution_positions.push(idx);
        report.all_substitution_values.push(qry_nuc as char);
        if include_idx.contains(&idx) {
          report.substitution_positions.push(idx);
          report.substitution_values.push(qry_nuc as char);
        }
      }

      if start_insertion != -1 {
        close_insertion(&mut report, include_idx, start_insertion, idx, insertion_size);
        start_insertion = -1;
      }
      idx += 1;
      insertion_size = 0;
    } else {
      report.ref_positions.push(if idx > 0 { -idx } else { -1 });
      if start_insertion == -1 {
        start_insertion = idx - 1;
      }
      insertion_size += 1;
    }

    // Deletion runs are tracked per column, against this column's
    // `ref_positions` entry.
    if is_gap(qry_nuc) {
      if start_deletion == -1 {
        start_deletion = report.ref_positions[column];
      }
    } else if start_deletion != -1 {
      let end_deletion = report.ref_positions[column];
      close_deletion(&mut report, include_idx, start_deletion, end_deletion);
      start_deletion = -1;
    }
  }

  if start_deletion != -1 {
    let end_deletion = report.ref_positions[ref_aln.len() - 1];
    close_deletion(&mut report, include_idx, start_deletion, end_deletion);
  }

  report.insertion_n = report.insertion_sizes.iter().sum();
  report.deletion_n = report.deletion_sizes.iter().sum();
  report.substitution_n = report.substitution_positions.len();

  Ok(report)
}

/// An insertion is windowed only when both flanking coordinates are included.
fn close_insertion(report: &mut VariantReport, include_idx: &BTreeSet<i64>, start: i64, end: i64, size: usize) {
  report.all_insertion_left_positions.push(start);
  report.all_insertion_positions.push(start);
  report.all_insertion_positions.push(end);
  report.all_insertion_coordinates.push((start, end));
  report.all_insertion_sizes.push(size);
  if include_idx.contains(&start) && include_idx.contains(&end) {
    report.insertion_positions.push(start);
    report.insertion_positions.push(end);
    report.insertion_coordinates.push((start, end));
    report.insertion_sizes.push(size);
  }
}

/// A deletion is windowed when the covered interval intersects the window.
fn close_deletion(report: &mut VariantReport, include_idx: &BTreeSet<i64>, start: i64, end: i64) {
  report.all_deletion_positions.extend(start..end);
  report.all_deletion_coordinates.push((start, end));
  report.all_deletion_sizes.push(end - start);
  if start < end && include_idx.range(start..end).next().is_some() {
    report.deletion_positions.extend(start..end);
    report.deletion_coordinates.push((start, end));
    report.deletion_sizes.push(end - start);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use eyre::Report;
  use maplit::btreeset;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn full_window(ref_len: i64) -> BTreeSet<i64> {
    (0..ref_len).collect()
  }

  #[rstest]
  fn maps_columns_to_reference_coordinates() -> Result<(), Report> {
    // column       012345678
    let ref_aln = b"ATCG-ATCG";
    let qry_aln = b"ATCGAATCG";
    // ref coord    0123.4567

    let report = find_variants(ref_aln, qry_aln, &full_window(8))?;
    assert_eq!(report.ref_positions, vec![0, 1, 2, 3, -4, 4, 5, 6, 7]);
    Ok(())
  }

  #[rstest]
  fn reports_single_insertion() -> Result<(), Report> {
    let ref_aln = b"ATCG-ATCG";
    let qry_aln = b"ATCGAATCG";

    let report = find_variants(ref_aln, qry_aln, &full_window(8))?;
    assert_eq!(report.all_insertion_coordinates, vec![(3, 4)]);
    assert_eq!(report.all_insertion_left_positions, vec![3]);
    assert_eq!(report.all_insertion_positions, vec![3, 4]);
    assert_eq!(report.all_insertion_sizes, vec![1]);
    assert_eq!(report.insertion_coordinates, vec![(3, 4)]);
    assert_eq!(report.insertion_sizes, vec![1]);
    assert_eq!(report.insertion_n, 1);
    assert_eq!(report.deletion_n, 0);
    assert_eq!(report.substitution_n, 0);
    Ok(())
  }

  #[rstest]
  fn windows_insertion_on_both_endpoints() -> Result<(), Report> {
    let ref_aln = b"ATCG-ATCG";
    let qry_aln = b"ATCGAATCG";

    // 3 alone is not enough: the right flank 4 is outside.
    let report = find_variants(ref_aln, qry_aln, &btreeset! {3})?;
    assert_eq!(report.all_insertion_coordinates, vec![(3, 4)]);
    assert_eq!(report.insertion_coordinates, vec![]);
    assert_eq!(report.insertion_n, 0);

    let report = find_variants(ref_aln, qry_aln, &btreeset! {3, 4})?;
    assert_eq!(report.insertion_coordinates, vec![(3, 4)]);
    assert_eq!(report.insertion_n, 1);
    Ok(())
  }

  #[rstest]
  fn reports_single_deletion() -> Result<(), Report> {
    // column       01234567
    let ref_aln = b"ATCGATCG";
    let qry_aln = b"ATCG-TCG";

    let report = find_variants(ref_aln, qry_aln, &full_window(8))?;
    assert_eq!(report.all_deletion_coordinates, vec![(4, 5)]);
    assert_eq!(report.all_deletion_positions, vec![4]);
    assert_eq!(report.all_deletion_sizes, vec![1]);
    assert_eq!(report.deletion_coordinates, vec![(4, 5)]);
    assert_eq!(report.deletion_n, 1);
    assert_eq!(report.ref_positions, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    Ok(())
  }

  #[rstest]
  fn windows_deletion_by_interval_intersection() -> Result<(), Report> {
    // column       0123456789012345
    let ref_aln = b"AAAAAAAACCCCAAAA";
    let qry_aln = b"AAAAAAAA----AAAA";

    let report = find_variants(ref_aln, qry_aln, &btreeset! {9})?;
    assert_eq!(report.all_deletion_coordinates, vec![(8, 12)]);
    assert_eq!(report.all_deletion_positions, vec![8, 9, 10, 11]);
    assert_eq!(report.deletion_coordinates, vec![(8, 12)]);
    assert_eq!(report.deletion_positions, vec![8, 9, 10, 11]);
    assert_eq!(report.deletion_n, 4);

    let report = find_variants(ref_aln, qry_aln, &btreeset! {12})?;
    assert_eq!(report.all_deletion_coordinates, vec![(8, 12)]);
    assert_eq!(report.deletion_coordinates, vec![]);
    assert_eq!(report.deletion_n, 0);
    Ok(())
  }

  #[rstest]
  fn reports_substitutions_and_skips_n() -> Result<(), Report> {
    let report = find_variants(b"ATCGATCG", b"ATCTATCG", &full_window(8))?;
    assert_eq!(report.all_substitution_positions, vec![3]);
    assert_eq!(report.all_substitution_values, vec!['T']);
    assert_eq!(report.substitution_positions, vec![3]);
    assert_eq!(report.substitution_n, 1);

    // `N` in the query is sequencing uncertainty, not a substitution.
    let report = find_variants(b"ATCGATCG", b"ATCNATCG", &full_window(8))?;
    assert_eq!(report.all_substitution_positions, Vec::<i64>::new());
    assert_eq!(report.substitution_n, 0);
    Ok(())
  }

  #[rstest]
  fn windows_substitution_by_position() -> Result<(), Report> {
    let report = find_variants(b"ATCGATCG", b"ATCTATCG", &btreeset! {2})?;
    assert_eq!(report.all_substitution_positions, vec![3]);
    assert_eq!(report.substitution_positions, Vec::<i64>::new());
    assert_eq!(report.substitution_n, 0);
    Ok(())
  }

  #[rstest]
  fn reports_mixed_events() -> Result<(), Report> {
    // column       0123456
    let ref_aln = b"ATC-GAT";
    let qry_aln = b"A-CCGTT";
    // ref coord    012.345

    let report = find_variants(ref_aln, qry_aln, &full_window(6))?;
    assert_eq!(report.ref_positions, vec![0, 1, 2, -3, 3, 4, 5]);
    assert_eq!(report.all_deletion_coordinates, vec![(1, 2)]);
    assert_eq!(report.all_insertion_coordinates, vec![(2, 3)]);
    assert_eq!(report.all_substitution_positions, vec![4]);
    assert_eq!(report.all_substitution_values, vec!['T']);
    // A full window keeps every event.
    assert_eq!(report.deletion_coordinates, report.all_deletion_coordinates);
    assert_eq!(report.insertion_coordinates, report.all_insertion_coordinates);
    assert_eq!(report.substitution_positions, report.all_substitution_positions);
    assert_eq!((report.insertion_n, report.deletion_n, report.substitution_n), (1, 1, 1));
    Ok(())
  }

  #[rstest]
  fn drops_leading_insertion_run() -> Result<(), Report> {
    // Gap columns before the first reference base share the "no insertion
    // open" sentinel, so no event is recorded for them.
    let report = find_variants(b"--ATCG", b"GGATCG", &full_window(4))?;
    assert_eq!(report.ref_positions, vec![-1, -1, 0, 1, 2, 3]);
    assert_eq!(report.all_insertion_coordinates, vec![]);
    assert_eq!(report.insertion_n, 0);
    Ok(())
  }

  #[rstest]
  fn closes_trailing_deletion_at_the_last_column() -> Result<(), Report> {
    // A deletion reaching the end of the alignment closes at the final
    // column's reference coordinate, one short of the run width.
    let report = find_variants(b"ATCGAT", b"ATCG--", &full_window(6))?;
    assert_eq!(report.all_deletion_coordinates, vec![(4, 5)]);
    assert_eq!(report.all_deletion_sizes, vec![1]);
    assert_eq!(report.deletion_n, 1);
    Ok(())
  }

  #[rstest]
  fn closes_deletion_on_an_insertion_column_verbatim() -> Result<(), Report> {
    // column       0123
    let ref_aln = b"AT-G";
    let qry_aln = b"A-TG";
    // The deletion at coordinate 1 is closed by an insertion column, whose
    // `ref_positions` entry is negative; the raw coordinates are kept.
    let report = find_variants(ref_aln, qry_aln, &full_window(3))?;
    assert_eq!(report.ref_positions, vec![0, 1, -2, 2]);
    assert_eq!(report.all_deletion_coordinates, vec![(1, -2)]);
    assert_eq!(report.all_deletion_sizes, vec![-3]);
    assert_eq!(report.all_deletion_positions, Vec::<i64>::new());
    assert_eq!(report.deletion_coordinates, vec![]);
    assert_eq!(report.all_insertion_coordinates, vec![(1, 2)]);
    Ok(())
  }

  #[rstest]
  fn serializes_report_round_trip() -> Result<(), Report> {
    let report = find_variants(b"ATCG-ATCG", b"ATCTAATCG", &full_window(8))?;
    let json = serde_json::to_string_pretty(&report)?;
    let parsed: VariantReport = serde_json::from_str(&json)?;
    assert_eq!(parsed, report);
    Ok(())
  }

  #[test]
  fn rejects_unequal_lengths() {
    assert!(find_variants(b"ATCG", b"ATC", &BTreeSet::new()).is_err());
  }

  #[test]
  fn rejects_gap_in_both_column() {
    assert!(find_variants(b"AT-G", b"AT-G", &BTreeSet::new()).is_err());
  }
}
