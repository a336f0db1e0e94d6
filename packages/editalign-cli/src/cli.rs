use crate::io::{json_parse, json_write};
use clap::Parser;
use editalign::{
  align_seqs, find_variants, gap_incentive_at_cut_sites, AlignmentParams, PairwiseAlignment, ScoreMatrix,
  VariantReport,
};
use eyre::{bail, Report, WrapErr};
use itertools::izip;
use log::{info, LevelFilter};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "editalign")]
#[clap(author, version)]
/// Global pairwise alignment and indel/substitution calling for genome-editing amplicon reads.
///
/// Aligns a read against its reference amplicon with affine gap penalties, free terminal gaps
/// and a gap incentive at predicted cut sites, then reports insertions, deletions and
/// substitutions in reference coordinates.
pub struct EditalignArgs {
  /// Reference (amplicon) sequence. Whitespace is stripped before alignment.
  pub ref_seq: String,

  /// Read sequence to align against the reference. Whitespace is stripped before alignment.
  pub qry_seq: String,

  /// Reference position of a predicted nuclease cut site. May be given multiple times;
  /// each listed position receives the gap incentive bonus.
  #[clap(long, short = 'c')]
  pub cut_site: Vec<usize>,

  /// Quantification window: comma-separated reference coordinates and `start..end` ranges,
  /// e.g. `50..70,75`. Variants outside the window appear only in the `all*` lists of the
  /// report. Defaults to the whole reference.
  #[clap(long, short = 'w')]
  pub window: Option<String>,

  /// Path to a JSON file with alignment parameters. When given, it replaces the parameter flags.
  #[clap(long)]
  pub params_json: Option<PathBuf>,

  #[clap(flatten)]
  pub params: AlignmentParams,

  /// Write a JSON record (aligned pair, match percentage, score, variant report) to this file.
  /// Use "-" for stdout.
  #[clap(long, short = 'o')]
  pub output_json: Option<PathBuf>,

  /// Number of alignment columns per output line.
  #[clap(long, default_value_t = 60)]
  pub line_width: usize,

  /// Set verbosity level of console output
  #[clap(long, global = true)]
  pub verbosity: Option<LevelFilter>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct OutputRecord {
  ref_aln: String,
  qry_aln: String,
  match_pct: f64,
  score: i32,
  variants: VariantReport,
}

pub fn run() -> Result<(), Report> {
  let args = EditalignArgs::parse();

  env_logger::Builder::new()
    .filter_level(args.verbosity.unwrap_or(LevelFilter::Warn))
    .init();

  let params = match &args.params_json {
    Some(path) => {
      let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("When reading alignment parameters from {path:#?}"))?;
      json_parse::<AlignmentParams>(&text).wrap_err_with(|| format!("When parsing alignment parameters from {path:#?}"))?
    }
    None => args.params.clone(),
  };

  let ref_seq = strip_whitespace(&args.ref_seq);
  let qry_seq = strip_whitespace(&args.qry_seq);

  let score_matrix = ScoreMatrix::from_params(&params);
  let gap_incentive = gap_incentive_at_cut_sites(ref_seq.len(), &args.cut_site, params.incentive_bonus)?;

  let aln = align_seqs(&qry_seq, &ref_seq, &score_matrix, &gap_incentive, &params)?;
  info!(
    "aligned {} query bases against {} reference bases: {} columns",
    qry_seq.len(),
    ref_seq.len(),
    aln.ref_aln.len()
  );

  let include_idx = match &args.window {
    Some(spec) => parse_window(spec)?,
    None => (0..ref_seq.len() as i64).collect(),
  };
  let variants = find_variants(&aln.ref_aln, &aln.qry_aln, &include_idx)?;

  print!("{}", format_alignment(&aln, args.line_width));
  println!(
    "match: {:.3}%  score: {}  insertions: {}  deletions: {}  substitutions: {}",
    aln.match_pct, aln.score, variants.insertion_n, variants.deletion_n, variants.substitution_n
  );

  if let Some(output_json) = &args.output_json {
    let record = OutputRecord {
      ref_aln: String::from_utf8_lossy(&aln.ref_aln).into_owned(),
      qry_aln: String::from_utf8_lossy(&aln.qry_aln).into_owned(),
      match_pct: aln.match_pct,
      score: aln.score,
      variants,
    };
    json_write(output_json, &record)?;
  }

  Ok(())
}

fn strip_whitespace(seq: &str) -> Vec<u8> {
  seq.bytes().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Parses a window spec like `50..70,75,80..85` into a set of reference coordinates.
fn parse_window(spec: &str) -> Result<BTreeSet<i64>, Report> {
  let mut window = BTreeSet::new();
  for part in spec.split(',').map(str::trim).filter(|part| !part.is_empty()) {
    if let Some((begin, end)) = part.split_once("..") {
      let begin: i64 = begin
        .trim()
        .parse()
        .wrap_err_with(|| format!("When parsing start of window range '{part}'"))?;
      let end: i64 = end
        .trim()
        .parse()
        .wrap_err_with(|| format!("When parsing end of window range '{part}'"))?;
      if begin >= end {
        bail!("Invalid window range '{part}': start must be less than end");
      }
      window.extend(begin..end);
    } else {
      let idx: i64 = part
        .parse()
        .wrap_err_with(|| format!("When parsing window position '{part}'"))?;
      window.insert(idx);
    }
  }
  Ok(window)
}

/// Renders the aligned pair in blocks, with `|` under matches and `.` under mismatches.
fn format_alignment(aln: &PairwiseAlignment, line_width: usize) -> String {
  let markers: Vec<u8> = izip!(&aln.ref_aln, &aln.qry_aln)
    .map(|(&r, &q)| {
      if r == b'-' || q == b'-' {
        b' '
      } else if r == q {
        b'|'
      } else {
        b'.'
      }
    })
    .collect();

  let width = line_width.max(1);
  izip!(aln.ref_aln.chunks(width), markers.chunks(width), aln.qry_aln.chunks(width))
    .map(|(ref_chunk, marker_chunk, qry_chunk)| {
      format!(
        "REF  {}\n     {}\nQRY  {}\n\n",
        String::from_utf8_lossy(ref_chunk),
        String::from_utf8_lossy(marker_chunk),
        String::from_utf8_lossy(qry_chunk)
      )
    })
    .collect()
}
