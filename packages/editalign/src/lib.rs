//! Global pairwise alignment and variant calling for genome-editing amplicon reads.
//!
//! The core is a three-plane Needleman-Wunsch aligner with affine gap penalties,
//! free terminal gaps and a position-specific gap incentive vector, plus an
//! extractor that converts an aligned pair into lists of insertions, deletions
//! and substitutions in reference coordinates.

pub mod align;
pub mod alphabet;
pub mod analyze;
pub mod utils;

pub use crate::align::align::{align_seqs, PairwiseAlignment};
pub use crate::align::gap_incentive::{gap_incentive_at_cut_sites, gap_incentive_flat};
pub use crate::align::params::AlignmentParams;
pub use crate::align::score_matrix::ScoreMatrix;
pub use crate::analyze::homology::homology;
pub use crate::analyze::variants::{find_variants, VariantReport};
