//! Feature extraction modules
//!
//! - Novelty transform (smoothed value + change from previous sample)
//! - Anchor picking (largest-novelty instants of a section)

pub mod novelty;
pub mod peak_picking;
