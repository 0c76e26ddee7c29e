//! Trajectory buffer backed by an `ndarray::Array2`.

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Ordered sequence of feature vectors sampled every `timestep`
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Frames [n_frames, n_features]
    frames: Array2<f64>,
    /// Time between consecutive frames
    timestep: f64,
}

impl Trajectory {
    /// Wrap an existing frame matrix
    pub fn new(frames: Array2<f64>, timestep: f64) -> Self {
        Self { frames, timestep }
    }

    /// Build a 3D trajectory from a list of positions
    pub fn from_positions(positions: &[[f64; 3]], timestep: f64) -> Self {
        let mut frames = Array2::zeros((positions.len(), 3));
        for (i, p) in positions.iter().enumerate() {
            for d in 0..3 {
                frames[[i, d]] = p[d];
            }
        }
        Self::new(frames, timestep)
    }

    /// Number of frames
    pub fn n_frames(&self) -> usize {
        self.frames.nrows()
    }

    /// Number of features per frame
    pub fn n_features(&self) -> usize {
        self.frames.ncols()
    }

    /// True when no frames were recorded
    pub fn is_empty(&self) -> bool {
        self.n_frames() == 0
    }

    /// Frame `i`
    pub fn frame(&self, i: usize) -> ArrayView1<'_, f64> {
        self.frames.row(i)
    }

    /// Full frame matrix
    pub fn frames(&self) -> &Array2<f64> {
        &self.frames
    }

    /// Time between frames
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Time spanned from the first to the last frame
    pub fn duration(&self) -> f64 {
        self.n_frames().saturating_sub(1) as f64 * self.timestep
    }

    /// Per-feature mean (zeros for an empty trajectory)
    pub fn means(&self) -> Array1<f64> {
        self.frames
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.n_features()))
    }

    /// Per-feature population variance
    pub fn variances(&self) -> Array1<f64> {
        if self.is_empty() {
            return Array1::zeros(self.n_features());
        }
        self.frames.var_axis(Axis(0), 0.0)
    }
}
