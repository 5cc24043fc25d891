//! Signal filtering for smoothing per-frame tilt angles.
//!
//! Pose landmarks jitter from frame to frame; the filters here absorb that
//! noise before the angle is classified.

/// Moving average over a bounded angle history
pub mod moving_average;

pub use moving_average::MovingAverageFilter;
