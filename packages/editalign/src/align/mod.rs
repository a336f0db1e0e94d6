pub mod align;
pub mod backtrace;
pub mod gap_incentive;
pub mod grid_2d;
pub mod params;
pub mod score_matrix;
