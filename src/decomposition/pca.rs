//! Principal Component Analysis (PCA)
//!
//! PCA ignores time ordering: all frames are pooled, centred, and the
//! sample covariance
//!
//!   S = (1 / (N − 1)) · Σₜ (xₜ − μ)(xₜ − μ)ᵀ
//!
//! is diagonalized. The leading eigenvectors are the directions of largest
//! instantaneous variance.

use ndarray::{s, Array1, Array2, Axis};
use serde::Deserialize;

use super::linalg::symmetric_eigen;
use super::traits::{common_features, resolve_components, Decomposition};
use crate::error::{Error, Result};
use crate::trajectory::Trajectory;

/// PCA hyperparameters
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PcaConfig {
    /// Components to keep; `None` keeps all features
    pub n_components: Option<usize>,
}

/// Fitted PCA state
#[derive(Debug, Clone)]
struct PcaFit {
    mean: Array1<f64>,
    /// Eigenvectors as rows [n_components, n_features]
    components: Array2<f64>,
    /// Eigenvalues for every feature, decreasing
    variances: Array1<f64>,
    n_samples: usize,
}

/// Principal component analysis
#[derive(Debug, Clone)]
pub struct Pca {
    config: PcaConfig,
    fit: Option<PcaFit>,
}

impl Pca {
    /// Create an unfitted model
    pub fn new(config: PcaConfig) -> Result<Self> {
        if config.n_components == Some(0) {
            return Err(Error::invalid_parameter("n_components", "must be at least 1"));
        }
        Ok(Self { config, fit: None })
    }

    /// Model keeping `n_components`
    pub fn with_components(n_components: usize) -> Result<Self> {
        Self::new(PcaConfig {
            n_components: Some(n_components),
        })
    }

    fn fitted(&self) -> Result<&PcaFit> {
        self.fit.as_ref().ok_or(Error::NotFitted)
    }

    /// Per-feature mean of the training data
    pub fn mean(&self) -> Result<Array1<f64>> {
        Ok(self.fitted()?.mean.clone())
    }

    /// Variance captured by each kept component
    pub fn explained_variance(&self) -> Result<Array1<f64>> {
        let fit = self.fitted()?;
        let k = fit.components.nrows();
        Ok(fit.variances.slice(s![..k]).to_owned())
    }

    /// Fraction of total variance captured by each kept component
    pub fn explained_variance_ratio(&self) -> Result<Array1<f64>> {
        let fit = self.fitted()?;
        let total: f64 = fit.variances.sum();
        let explained = self.explained_variance()?;
        if total <= 0.0 {
            return Ok(Array1::zeros(explained.len()));
        }
        Ok(explained / total)
    }

    /// Frames used in the fit
    pub fn n_samples(&self) -> Result<usize> {
        Ok(self.fitted()?.n_samples)
    }
}

impl Decomposition for Pca {
    fn fit(&mut self, sequences: &[Trajectory]) -> Result<&mut Self> {
        self.fit = None;
        let n_features = common_features(sequences)?;
        let k = resolve_components(self.config.n_components, n_features)?;

        let n_samples: usize = sequences.iter().map(|s| s.n_frames()).sum();
        if n_samples == 0 {
            return Err(Error::EmptyInput);
        }

        let mut sum = Array1::<f64>::zeros(n_features);
        for seq in sequences {
            sum += &seq.frames().sum_axis(Axis(0));
        }
        let mean = sum / n_samples as f64;

        let mut scatter = Array2::<f64>::zeros((n_features, n_features));
        for seq in sequences {
            let centered = seq.frames() - &mean;
            scatter += &centered.t().dot(&centered);
        }
        let denom = (n_samples as f64 - 1.0).max(1.0);
        let covariance = scatter / denom;

        let pairs = symmetric_eigen(&covariance)?;
        log::debug!("PCA eigenvalues: {:?}", pairs.values.to_vec());

        let components = pairs.vectors.slice(s![.., ..k]).t().to_owned();
        // Round-off can leave tiny negative variances
        let variances = pairs.values.mapv(|v| v.max(0.0));

        self.fit = Some(PcaFit {
            mean,
            components,
            variances,
            n_samples,
        });

        log::info!("PCA fit: {} frames in {} sequence(s)", n_samples, sequences.len());
        Ok(self)
    }

    fn transform(&self, sequences: &[Trajectory]) -> Result<Vec<Array2<f64>>> {
        let fit = self.fitted()?;
        let n = fit.mean.len();

        sequences
            .iter()
            .map(|seq| {
                if seq.n_features() != n {
                    return Err(Error::DimensionMismatch {
                        expected: n,
                        found: seq.n_features(),
                    });
                }
                let centered = seq.frames() - &fit.mean;
                Ok(centered.dot(&fit.components.t()))
            })
            .collect()
    }

    fn components(&self) -> Result<Array2<f64>> {
        Ok(self.fitted()?.components.clone())
    }

    fn n_components(&self) -> Option<usize> {
        self.fit
            .as_ref()
            .map(|f| f.components.nrows())
            .or(self.config.n_components)
    }

    fn name(&self) -> &'static str {
        "PCA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    /// Gaussian cloud with standard deviations (0.5, 3.0, 1.0)
    fn anisotropic_cloud(n: usize, seed: u64) -> Trajectory {
        let mut rng = StdRng::seed_from_u64(seed);
        let scales = [0.5, 3.0, 1.0];
        let mut frames = Array2::zeros((n, 3));
        for i in 0..n {
            for d in 0..3 {
                let z: f64 = rng.sample(StandardNormal);
                frames[[i, d]] = 2.0 + scales[d] * z;
            }
        }
        Trajectory::new(frames, 1.0)
    }

    #[test]
    fn test_pca_dominant_axis() {
        let mut pca = Pca::with_components(1).unwrap();
        pca.fit(&[anisotropic_cloud(5000, 1)]).unwrap();

        let c = pca.leading_component().unwrap();
        assert!(c[1] > 0.99, "Expected y axis, got {:?}", c);

        let var = pca.explained_variance().unwrap();
        assert!((var[0] - 9.0).abs() < 0.8, "Variance {}", var[0]);
    }

    #[test]
    fn test_pca_mean_and_ratio() {
        let mut pca = Pca::new(PcaConfig::default()).unwrap();
        pca.fit(&[anisotropic_cloud(4000, 2)]).unwrap();

        let mean = pca.mean().unwrap();
        assert!(mean.iter().all(|m| (m - 2.0).abs() < 0.2));

        let ratio = pca.explained_variance_ratio().unwrap();
        assert_eq!(ratio.len(), 3);
        assert!((ratio.sum() - 1.0).abs() < 1e-10);
        assert!(ratio[0] >= ratio[1] && ratio[1] >= ratio[2]);
    }

    #[test]
    fn test_pca_exact_line() {
        // Points on the line y = x
        let traj = Trajectory::new(array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]], 1.0);
        let mut pca = Pca::with_components(1).unwrap();
        pca.fit(&[traj.clone()]).unwrap();

        let c = pca.leading_component().unwrap();
        let s = 1.0 / 2.0_f64.sqrt();
        assert!((c[0] - s).abs() < 1e-10 && (c[1] - s).abs() < 1e-10);

        let proj = pca.transform(&[traj]).unwrap();
        assert_eq!(proj[0].dim(), (4, 1));
        assert!((proj[0][[3, 0]] - 1.5 * 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_pca_pools_sequences() {
        let a = anisotropic_cloud(300, 3);
        let b = anisotropic_cloud(200, 4);
        let mut pca = Pca::with_components(2).unwrap();
        pca.fit(&[a, b]).unwrap();
        assert_eq!(pca.n_samples().unwrap(), 500);
        assert_eq!(pca.components().unwrap().dim(), (2, 3));
    }

    #[test]
    fn test_pca_errors() {
        let mut pca = Pca::with_components(1).unwrap();
        assert!(matches!(pca.components(), Err(Error::NotFitted)));
        assert!(matches!(pca.fit(&[]), Err(Error::EmptyInput)));

        let empty = Trajectory::new(Array2::zeros((0, 3)), 1.0);
        assert!(matches!(pca.fit(&[empty]), Err(Error::EmptyInput)));

        assert!(Pca::with_components(0).is_err());
    }
}
