//! Trajectory Module: Ordered Frame Buffers
//!
//! A trajectory is an `n_frames × n_features` matrix of observations taken
//! at a fixed time interval. Row `i` is frame `i`; rows are never
//! reordered. Both decomposition models read the same buffer.

mod buffer;

pub use buffer::Trajectory;
