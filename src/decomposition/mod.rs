//! Decomposition Module: Linear Projectors for Trajectory Data
//!
//! Two ways to pick a low-dimensional linear subspace:
//!
//! - **tICA**: directions of maximal autocorrelation at a lag τ
//!   (slow, persistent motion)
//! - **PCA**: directions of maximal instantaneous variance
//!   (wide, possibly fast motion)
//!
//! ## Module Structure
//!
//! - `traits.rs`: the shared [`Decomposition`] fit/transform surface
//! - `tica.rs`: online tICA with covariance regularization and GMRQ score
//! - `pca.rs`: batch PCA
//! - `linalg.rs`: symmetric and generalized eigensolvers (nalgebra)

mod traits;
mod linalg;
mod tica;
mod pca;

pub use traits::Decomposition;
pub use linalg::{EigenPairs, symmetric_eigen, generalized_symmetric_eigen};
pub use tica::{Tica, TicaConfig};
pub use pca::{Pca, PcaConfig};
