//! Decomposition Trait: Shared Fit/Transform Surface
//!
//! Both projectors follow the same lifecycle:
//!
//! ```text
//!   fit(sequences) ──► components() ──► transform(sequences)
//! ```
//!
//! `fit` discards any previously accumulated state, so the same model can be
//! refit on new data.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::trajectory::Trajectory;

/// Linear projector fitted on a collection of trajectories
pub trait Decomposition {
    /// Fit on all sequences, replacing any previous fit
    fn fit(&mut self, sequences: &[Trajectory]) -> Result<&mut Self>;

    /// Project every sequence onto the fitted components
    fn transform(&self, sequences: &[Trajectory]) -> Result<Vec<Array2<f64>>>;

    /// Fitted directions, one per row [n_components, n_features]
    fn components(&self) -> Result<Array2<f64>>;

    /// Number of components kept
    fn n_components(&self) -> Option<usize>;

    /// Short model name for reports
    fn name(&self) -> &'static str;

    /// Fit, then project the same sequences
    fn fit_transform(&mut self, sequences: &[Trajectory]) -> Result<Vec<Array2<f64>>> {
        self.fit(sequences)?;
        self.transform(sequences)
    }

    /// Leading fitted direction
    fn leading_component(&self) -> Result<Vec<f64>> {
        let components = self.components()?;
        if components.nrows() == 0 {
            return Err(Error::NotFitted);
        }
        Ok(components.row(0).to_vec())
    }
}

/// Check that every sequence shares the feature count of the first
/// non-empty one and return it
pub(crate) fn common_features(sequences: &[Trajectory]) -> Result<usize> {
    let mut expected: Option<usize> = None;
    for seq in sequences {
        match expected {
            None => expected = Some(seq.n_features()),
            Some(n) if n != seq.n_features() => {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: seq.n_features(),
                });
            }
            _ => {}
        }
    }
    match expected {
        Some(n) if n > 0 => Ok(n),
        _ => Err(Error::EmptyInput),
    }
}

/// Validate a requested component count against the feature count
pub(crate) fn resolve_components(requested: Option<usize>, n_features: usize) -> Result<usize> {
    match requested {
        None => Ok(n_features),
        Some(0) => Err(Error::invalid_parameter("n_components", "must be at least 1")),
        Some(k) if k > n_features => Err(Error::invalid_parameter(
            "n_components",
            format!("{} exceeds the number of features ({})", k, n_features),
        )),
        Some(k) => Ok(k),
    }
}
