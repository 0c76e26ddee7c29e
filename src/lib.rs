//! # tICA-Dynamics
//!
//! Slow Collective Variables from Langevin Trajectories: tICA vs PCA
//!
//! ## Setting
//!
//! A single particle moves in the potential
//!
//!   V(x, y, z) = 5·(x−1)²·(x+1)² + y² + z²
//!
//! at 500 K under Langevin dynamics. Along x it hops between two wells; along
//! y and z it vibrates in a soft harmonic trap.
//!
//! ### Central Point
//!
//! The direction of largest variance is not the direction of slowest
//! motion. The harmonic y/z coordinates spread wider than the bimodal x
//! coordinate, so PCA picks them; the rare barrier crossings make x the most
//! persistent coordinate, so tICA picks x.
//!
//! ### Methodology
//!
//! 1. **Simulation**: BAOAB Langevin integration of one particle, recording
//!    the position every step
//!
//! 2. **tICA**: generalized eigenproblem of the time-lagged correlation
//!    against the (regularized) covariance, lag τ = 100 frames
//!
//! 3. **PCA**: eigendecomposition of the instantaneous covariance
//!
//! 4. **Report**: leading directions as side-by-side bar charts and unit
//!    vectors
//!
//! ## References
//!
//! - Molgedey & Schuster, PRL 72, 3634 (1994)
//! - Schwantes & Pande, JCTC 9, 2000 (2013)
//! - Leimkuhler & Matthews, "Molecular Dynamics" (2015) - BAOAB

pub mod error;
pub mod config;
pub mod systems;
pub mod trajectory;
pub mod decomposition;
pub mod report;
pub mod pipeline;

pub use error::{Error, Result};
pub use config::{ConfigOverrides, PipelineConfig, ModelConfig, ReportConfig};

// Re-exports from systems
pub use systems::{
    // Traits
    DynamicalSystem,
    Simulator,
    Potential,
    // Double well + Langevin
    DoubleWellPotential,
    LangevinSystem,
    LangevinConfig,
    ParticleState,
};

// Re-exports from trajectory
pub use trajectory::Trajectory;

// Re-exports from decomposition
pub use decomposition::{
    Decomposition,
    Tica,
    TicaConfig,
    Pca,
    PcaConfig,
};

// Re-exports from report
pub use report::{
    ComparisonReport,
    bar_chart,
    side_by_side,
    normalize,
    cosine_similarity,
};

// Re-exports from pipeline
pub use pipeline::{Comparison, run_comparison, simulate_double_well, fit_models};
