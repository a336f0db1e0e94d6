pub mod homology;
pub mod variants;
