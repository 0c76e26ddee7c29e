//! Time-Structure Independent Component Analysis (tICA)
//!
//! tICA finds the linear directions along which the data decorrelate
//! slowest. With the symmetrized time-lagged correlation matrix
//!
//!   C(τ) = ½·E[xₜᵀ·xₜ₊τ + xₜ₊τᵀ·xₜ] − μμᵀ
//!
//! and the covariance S, it solves the generalized eigenproblem
//!
//!   C(τ)·v = λ·(S + (γ/n)·tr(S)·I)·v
//!
//! keeping the eigenvectors with the largest λ. Each eigenvalue maps to an
//! implied timescale t = −τ / ln λ.
//!
//! ## Online Estimation
//!
//! Only sufficient statistics are stored (lagged outer products, head and
//! tail sums), so data can be streamed in with [`Tica::partial_fit`]. Both
//! C(τ) and S are estimated from the head X[:−τ] and tail X[τ:] of each
//! sequence, which keeps the estimator symmetric.
//!
//! ## References
//!
//! - Molgedey & Schuster, PRL 72, 3634 (1994)
//! - Schwantes & Pande, JCTC 9, 2000 (2013)
//! - Pérez-Hernández et al., JCP 139, 015102 (2013)
//! - McGibbon & Pande, JCP 142, 124105 (2015) - GMRQ score

use ndarray::{s, Array1, Array2, Axis};
use serde::Deserialize;

use super::linalg::{generalized_symmetric_eigen, spd_inverse, EigenPairs};
use super::traits::{common_features, resolve_components, Decomposition};
use crate::error::{Error, Result};
use crate::trajectory::Trajectory;

/// tICA hyperparameters
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TicaConfig {
    /// Components to keep; `None` keeps all features
    pub n_components: Option<usize>,
    /// Lag τ in frames
    pub lag_time: usize,
    /// Covariance regularization strength γ
    pub gamma: f64,
    /// Scale projections by implied timescales
    pub weighted_transform: bool,
}

impl Default for TicaConfig {
    fn default() -> Self {
        Self {
            n_components: None,
            lag_time: 1,
            gamma: 0.05,
            weighted_transform: false,
        }
    }
}

impl TicaConfig {
    /// Check hyperparameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.lag_time == 0 {
            return Err(Error::invalid_parameter("lag_time", "must be at least 1"));
        }
        if !(self.gamma >= 0.0) {
            return Err(Error::invalid_parameter(
                "gamma",
                format!("must be non-negative, got {}", self.gamma),
            ));
        }
        if self.n_components == Some(0) {
            return Err(Error::invalid_parameter("n_components", "must be at least 1"));
        }
        Ok(())
    }
}

/// Running sufficient statistics for one lag time
#[derive(Debug, Clone)]
struct LaggedMoments {
    /// Σ X[:-τ]ᵀ·X[τ:]
    outer_lagged: Array2<f64>,
    /// Σ X[:-τ]ᵀ·X[:-τ]
    outer_head: Array2<f64>,
    /// Σ X[τ:]ᵀ·X[τ:]
    outer_tail: Array2<f64>,
    /// Σ X[:-τ]
    sum_head: Array1<f64>,
    /// Σ X[τ:]
    sum_tail: Array1<f64>,
    /// Σ X
    sum_all: Array1<f64>,
}

impl LaggedMoments {
    fn zeros(n: usize) -> Self {
        Self {
            outer_lagged: Array2::zeros((n, n)),
            outer_head: Array2::zeros((n, n)),
            outer_tail: Array2::zeros((n, n)),
            sum_head: Array1::zeros(n),
            sum_tail: Array1::zeros(n),
            sum_all: Array1::zeros(n),
        }
    }

    fn accumulate(&mut self, x: &Array2<f64>, lag: usize) {
        let t = x.nrows();
        let head = x.slice(s![..t - lag, ..]);
        let tail = x.slice(s![lag.., ..]);

        self.outer_lagged += &head.t().dot(&tail);
        self.outer_head += &head.t().dot(&head);
        self.outer_tail += &tail.t().dot(&tail);
        self.sum_head += &head.sum_axis(Axis(0));
        self.sum_tail += &tail.sum_axis(Axis(0));
        self.sum_all += &x.sum_axis(Axis(0));
    }
}

/// Time-structure independent component analysis
#[derive(Debug, Clone)]
pub struct Tica {
    config: TicaConfig,
    /// Resolved component count (set on first data)
    n_components: Option<usize>,
    n_features: Option<usize>,
    n_observations: usize,
    n_sequences: usize,
    /// Longest sequence offered, accepted or not
    longest_seen: usize,
    moments: Option<LaggedMoments>,
    /// Cached eigensolution; cleared whenever new data arrives
    solution: Option<EigenPairs>,
}

impl Tica {
    /// Create an unfitted model
    pub fn new(config: TicaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            n_components: None,
            n_features: None,
            n_observations: 0,
            n_sequences: 0,
            longest_seen: 0,
            moments: None,
            solution: None,
        })
    }

    /// Model with `n_components` and `lag_time`, other settings default
    pub fn with_lag(n_components: usize, lag_time: usize) -> Result<Self> {
        Self::new(TicaConfig {
            n_components: Some(n_components),
            lag_time,
            ..TicaConfig::default()
        })
    }

    /// Hyperparameters
    pub fn config(&self) -> &TicaConfig {
        &self.config
    }

    /// Lag τ in frames
    pub fn lag_time(&self) -> usize {
        self.config.lag_time
    }

    /// Frames accepted so far
    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Sequences accepted so far
    pub fn n_sequences(&self) -> usize {
        self.n_sequences
    }

    fn reset(&mut self) {
        self.n_components = None;
        self.n_features = None;
        self.n_observations = 0;
        self.n_sequences = 0;
        self.longest_seen = 0;
        self.moments = None;
        self.solution = None;
    }

    /// Add one sequence to the running statistics.
    ///
    /// Sequences no longer than the lag are skipped with a warning.
    pub fn partial_fit(&mut self, sequence: &Trajectory) -> Result<&mut Self> {
        let n = sequence.n_features();
        match self.n_features {
            Some(expected) if expected != n => {
                return Err(Error::DimensionMismatch { expected, found: n });
            }
            Some(_) => {}
            None => {
                if n == 0 {
                    return Err(Error::EmptyInput);
                }
                self.n_components = Some(resolve_components(self.config.n_components, n)?);
                self.n_features = Some(n);
                self.moments = Some(LaggedMoments::zeros(n));
            }
        }

        let lag = self.config.lag_time;
        let t = sequence.n_frames();
        self.longest_seen = self.longest_seen.max(t);

        if t <= lag {
            log::warn!("length of data ({}) is too short for the lag time ({})", t, lag);
            return Ok(self);
        }

        if let Some(moments) = self.moments.as_mut() {
            moments.accumulate(sequence.frames(), lag);
        }
        self.n_observations += t;
        self.n_sequences += 1;
        self.solution = None;

        Ok(self)
    }

    /// Effective sample count 2·(N − τ·n_sequences)
    fn two_n(&self) -> Result<f64> {
        if self.n_sequences == 0 {
            return Err(Error::NotFitted);
        }
        Ok(2.0 * (self.n_observations - self.config.lag_time * self.n_sequences) as f64)
    }

    fn moments(&self) -> Result<&LaggedMoments> {
        self.moments.as_ref().ok_or(Error::NotFitted)
    }

    /// Mean of the data, estimated from the head and tail windows
    pub fn means(&self) -> Result<Array1<f64>> {
        let m = self.moments()?;
        let two_n = self.two_n()?;
        Ok((&m.sum_head + &m.sum_tail) / two_n)
    }

    /// Symmetrized time-lagged correlation C(τ)
    pub fn offset_correlation(&self) -> Result<Array2<f64>> {
        let m = self.moments()?;
        let two_n = self.two_n()?;
        let term = (&m.outer_lagged + &m.outer_lagged.t()) / two_n;
        Ok(term - outer(&self.means()?))
    }

    /// Instantaneous covariance S
    pub fn covariance(&self) -> Result<Array2<f64>> {
        let m = self.moments()?;
        let two_n = self.two_n()?;
        let term = (&m.outer_head + &m.outer_tail) / two_n;
        Ok(term - outer(&self.means()?))
    }

    /// Mean over every accepted frame (head and tail windows excluded)
    pub fn full_means(&self) -> Result<Array1<f64>> {
        let m = self.moments()?;
        if self.n_observations == 0 {
            return Err(Error::NotFitted);
        }
        Ok(&m.sum_all / self.n_observations as f64)
    }

    fn solve(&self) -> Result<EigenPairs> {
        if let Some(solution) = &self.solution {
            return Ok(solution.clone());
        }

        let cov = self.covariance()?;
        let n = cov.nrows();
        let trace: f64 = cov.diag().sum();
        let rhs = &cov + &(Array2::<f64>::eye(n) * (self.config.gamma / n as f64 * trace));

        let pairs = generalized_symmetric_eigen(&self.offset_correlation()?, &rhs)?;
        log::debug!("tICA eigenvalues (lag {}): {:?}", self.config.lag_time, pairs.values.to_vec());
        Ok(pairs)
    }

    fn k(&self) -> Result<usize> {
        self.n_components.ok_or(Error::NotFitted)
    }

    /// Leading eigenvalues, decreasing
    pub fn eigenvalues(&self) -> Result<Array1<f64>> {
        let k = self.k()?;
        Ok(self.solve()?.values.slice(s![..k]).to_owned())
    }

    /// Leading eigenvectors as columns [n_features, n_components]
    pub fn eigenvectors(&self) -> Result<Array2<f64>> {
        let k = self.k()?;
        Ok(self.solve()?.vectors.slice(s![.., ..k]).to_owned())
    }

    /// Implied timescales −τ / ln λ, in frames
    pub fn timescales(&self) -> Result<Array1<f64>> {
        let lag = self.config.lag_time as f64;
        Ok(self.eigenvalues()?.mapv(|l| -lag / l.ln()))
    }

    /// Sum of the leading eigenvalues (generalized Rayleigh quotient on the
    /// training data)
    pub fn training_score(&self) -> Result<f64> {
        Ok(self.eigenvalues()?.sum())
    }

    /// Project a single sequence
    pub fn partial_transform(&self, sequence: &Trajectory) -> Result<Array2<f64>> {
        let n = self.n_features.ok_or(Error::NotFitted)?;
        if sequence.n_features() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: sequence.n_features(),
            });
        }

        let centered = sequence.frames() - &self.means()?;
        let mut projected = centered.dot(&self.eigenvectors()?);

        if self.config.weighted_transform {
            projected *= &self.timescales()?;
        }

        Ok(projected)
    }

    /// Generalized matrix Rayleigh quotient of the fitted components on new
    /// data. NaN when the projected covariance is singular.
    pub fn score(&self, sequences: &[Trajectory]) -> Result<f64> {
        let v = self.eigenvectors()?;

        let mut held_out = Tica::new(TicaConfig {
            n_components: None,
            lag_time: self.config.lag_time,
            gamma: self.config.gamma,
            weighted_transform: false,
        })?;
        for seq in sequences {
            held_out.partial_fit(seq)?;
        }

        let numerator = v.t().dot(&held_out.offset_correlation()?).dot(&v);
        let denominator = v.t().dot(&held_out.covariance()?).dot(&v);

        match spd_inverse(&denominator) {
            Some(inv) => Ok(numerator.dot(&inv).diag().sum()),
            None => Ok(f64::NAN),
        }
    }

    /// Human-readable summary of the fit
    pub fn summarize(&self) -> Result<String> {
        let timescales = self.timescales()?;
        let eigenvalues = self.eigenvalues()?;
        let top = timescales.len().min(5);

        Ok(format!(
            "time-structure based Independent Components Analysis (tICA)\n\
             -----------------------------------------------------------\n\
             n_components        : {}\n\
             gamma               : {}\n\
             lag_time            : {}\n\
             weighted_transform  : {}\n\
             \n\
             Top 5 timescales :\n{}\n\
             \n\
             Top 5 eigenvalues :\n{}\n",
            self.k()?,
            self.config.gamma,
            self.config.lag_time,
            self.config.weighted_transform,
            format_row(&timescales.to_vec()[..top]),
            format_row(&eigenvalues.to_vec()[..top]),
        ))
    }
}

impl Decomposition for Tica {
    fn fit(&mut self, sequences: &[Trajectory]) -> Result<&mut Self> {
        self.reset();
        common_features(sequences)?;

        if sequences.iter().all(|s| s.is_empty()) {
            return Err(Error::EmptyInput);
        }

        for seq in sequences {
            self.partial_fit(seq)?;
        }

        if self.n_sequences == 0 {
            return Err(Error::LagTooLong {
                lag: self.config.lag_time,
                longest: self.longest_seen,
            });
        }

        self.solution = Some(self.solve()?);
        log::info!(
            "tICA fit: {} frames in {} sequence(s), lag {}",
            self.n_observations,
            self.n_sequences,
            self.config.lag_time
        );
        Ok(self)
    }

    fn transform(&self, sequences: &[Trajectory]) -> Result<Vec<Array2<f64>>> {
        sequences.iter().map(|s| self.partial_transform(s)).collect()
    }

    fn components(&self) -> Result<Array2<f64>> {
        Ok(self.eigenvectors()?.t().to_owned())
    }

    fn n_components(&self) -> Option<usize> {
        self.n_components.or(self.config.n_components)
    }

    fn name(&self) -> &'static str {
        "tICA"
    }
}

/// μ·μᵀ
fn outer(v: &Array1<f64>) -> Array2<f64> {
    let col = v.view().insert_axis(Axis(1));
    col.dot(&col.t())
}

fn format_row(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{:.6}", v)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    /// Feature 0: slow AR(1) with small variance.
    /// Feature 1: fast white noise with large variance.
    fn slow_fast(n: usize, seed: u64) -> Trajectory {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut frames = Array2::zeros((n, 2));
        let mut slow = 0.0;
        for i in 0..n {
            let a: f64 = rng.sample(StandardNormal);
            let b: f64 = rng.sample(StandardNormal);
            slow = 0.99 * slow + 0.05 * a;
            frames[[i, 0]] = slow;
            frames[[i, 1]] = 3.0 * b;
        }
        Trajectory::new(frames, 1.0)
    }

    #[test]
    fn test_means_use_head_and_tail() {
        let traj = Trajectory::new(array![[1.0], [2.0], [3.0], [4.0]], 1.0);
        let mut tica = Tica::with_lag(1, 1).unwrap();
        tica.partial_fit(&traj).unwrap();

        // (Σ[1,2,3] + Σ[2,3,4]) / (2·3)
        assert!((tica.means().unwrap()[0] - 2.5).abs() < 1e-12);
        assert!((tica.full_means().unwrap()[0] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_tica_finds_slow_direction() {
        let traj = slow_fast(20000, 1);
        let mut tica = Tica::with_lag(1, 10).unwrap();
        tica.fit(&[traj]).unwrap();

        let c = tica.leading_component().unwrap();
        let norm = (c[0] * c[0] + c[1] * c[1]).sqrt();
        assert!(c[0].abs() / norm > 0.95, "Expected slow axis, got {:?}", c);
    }

    #[test]
    fn test_eigenvalues_descending_and_timescales() {
        let traj = slow_fast(20000, 2);
        let mut tica = Tica::new(TicaConfig {
            lag_time: 5,
            ..TicaConfig::default()
        })
        .unwrap();
        tica.fit(&[traj]).unwrap();

        let ev = tica.eigenvalues().unwrap();
        assert_eq!(ev.len(), 2);
        assert!(ev[0] >= ev[1]);
        assert!(ev[0] > 0.0 && ev[0] < 1.0);

        let ts = tica.timescales().unwrap();
        assert!(ts[0] > 0.0);
    }

    #[test]
    fn test_lag_longer_than_data() {
        let traj = slow_fast(50, 3);
        let mut tica = Tica::with_lag(1, 100).unwrap();
        let err = tica.fit(&[traj]).unwrap_err();
        assert!(matches!(err, Error::LagTooLong { lag: 100, longest: 50 }));

        let traj = slow_fast(100, 3);
        assert!(matches!(
            tica.fit(&[traj]),
            Err(Error::LagTooLong { lag: 100, longest: 100 })
        ));
    }

    #[test]
    fn test_empty_input() {
        let mut tica = Tica::with_lag(1, 1).unwrap();
        assert!(matches!(tica.fit(&[]), Err(Error::EmptyInput)));

        let empty = Trajectory::new(Array2::zeros((0, 3)), 1.0);
        assert!(matches!(tica.fit(&[empty]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_short_sequences_skipped() {
        let mut tica = Tica::with_lag(1, 10).unwrap();
        tica.fit(&[slow_fast(5, 4), slow_fast(1000, 5)]).unwrap();
        assert_eq!(tica.n_sequences(), 1);
        assert_eq!(tica.n_observations(), 1000);
    }

    #[test]
    fn test_partial_fit_matches_fit() {
        let a = slow_fast(500, 6);
        let b = slow_fast(700, 7);

        let mut batch = Tica::with_lag(2, 3).unwrap();
        batch.fit(&[a.clone(), b.clone()]).unwrap();

        let mut online = Tica::with_lag(2, 3).unwrap();
        online.partial_fit(&a).unwrap();
        online.partial_fit(&b).unwrap();

        let cb = batch.covariance().unwrap();
        let co = online.covariance().unwrap();
        for (x, y) in cb.iter().zip(co.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
        let eb = batch.eigenvalues().unwrap();
        let eo = online.eigenvalues().unwrap();
        for (x, y) in eb.iter().zip(eo.iter()) {
            assert!((x - y).abs() < 1e-10);
        }
    }

    #[test]
    fn test_not_fitted() {
        let tica = Tica::with_lag(1, 1).unwrap();
        assert!(matches!(tica.components(), Err(Error::NotFitted)));
        assert!(matches!(tica.means(), Err(Error::NotFitted)));
    }

    #[test]
    fn test_invalid_config() {
        assert!(Tica::with_lag(1, 0).is_err());
        assert!(Tica::new(TicaConfig {
            gamma: -0.1,
            ..TicaConfig::default()
        })
        .is_err());

        let mut tica = Tica::with_lag(3, 1).unwrap();
        assert!(matches!(
            tica.fit(&[slow_fast(100, 8)]),
            Err(Error::InvalidParameter { name: "n_components", .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut tica = Tica::with_lag(1, 1).unwrap();
        let other = Trajectory::new(Array2::zeros((10, 3)), 1.0);
        assert!(matches!(
            tica.fit(&[slow_fast(100, 9), other]),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_score_on_training_data() {
        let traj = slow_fast(5000, 10);
        let mut tica = Tica::new(TicaConfig {
            lag_time: 2,
            gamma: 0.0,
            ..TicaConfig::default()
        })
        .unwrap();
        tica.fit(&[traj.clone()]).unwrap();

        let score = tica.score(&[traj]).unwrap();
        let expected = tica.training_score().unwrap();
        assert!((score - expected).abs() < 1e-8, "score {} vs {}", score, expected);
    }

    #[test]
    fn test_score_constant_data_is_nan() {
        let mut tica = Tica::with_lag(2, 2).unwrap();
        tica.fit(&[slow_fast(2000, 13)]).unwrap();

        // Zero held-out covariance: the projected denominator is singular
        let constant = Trajectory::new(Array2::from_elem((50, 2), 1.5), 1.0);
        let score = tica.score(&[constant]).unwrap();
        assert!(score.is_nan(), "Expected NaN, got {}", score);
    }

    #[test]
    fn test_transform_shapes_and_weighting() {
        let traj = slow_fast(2000, 11);
        let mut plain = Tica::with_lag(1, 5).unwrap();
        let out = plain.fit_transform(&[traj.clone()]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].dim(), (2000, 1));

        let mut weighted = Tica::new(TicaConfig {
            n_components: Some(1),
            lag_time: 5,
            weighted_transform: true,
            ..TicaConfig::default()
        })
        .unwrap();
        let w = weighted.fit_transform(&[traj]).unwrap();
        let ts = weighted.timescales().unwrap()[0];
        assert!((w[0][[10, 0]] - out[0][[10, 0]] * ts).abs() < 1e-8 * ts.abs().max(1.0));
    }

    #[test]
    fn test_summarize() {
        let mut tica = Tica::with_lag(1, 4).unwrap();
        tica.fit(&[slow_fast(1000, 12)]).unwrap();
        let text = tica.summarize().unwrap();
        assert!(text.contains("lag_time            : 4"));
        assert!(text.contains("Top 5 eigenvalues"));
    }
}
