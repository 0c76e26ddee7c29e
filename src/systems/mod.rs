//! Physical Systems Module: Trajectory Generators
//!
//! - **Potential**: closed-form energy surfaces with analytic forces
//! - **Langevin**: one particle thermostatted by a BAOAB Langevin integrator
//!
//! Systems implement [`DynamicalSystem`], which gives them [`Simulator`]
//! for free: record the observable, advance, repeat.

mod traits;
mod potential;
mod langevin;

pub use traits::{DynamicalSystem, Simulator};
pub use potential::{Potential, DoubleWellPotential};
pub use langevin::{LangevinSystem, LangevinConfig, ParticleState, KB_KJ};
