//! Langevin Dynamics: One Particle in an External Potential
//!
//! The particle obeys the Langevin equation
//!
//!   m·dv = F(x)·dt − γ·m·v·dt + sqrt(2·γ·m·k_B·T)·dW
//!
//! integrated with the BAOAB splitting:
//!
//! - **B**: half kick from the force
//! - **A**: half drift of the position
//! - **O**: exact Ornstein-Uhlenbeck update of the velocity,
//!   v ← c₁·v + c₂·ξ with c₁ = e^(−γ·dt), c₂ = sqrt((1 − c₁²)·k_B·T/m)
//! - **A**: half drift
//! - **B**: half kick with the new force
//!
//! ## Units
//!
//! Molecular units throughout: nm, ps, amu, kJ/mol, K. In these units the
//! force/mass ratio is directly an acceleration in nm/ps², so no conversion
//! factor is needed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::Deserialize;

use super::potential::Potential;
use super::traits::DynamicalSystem;
use crate::error::{Error, Result};

/// Boltzmann constant in kJ/(mol·K)
pub const KB_KJ: f64 = 0.008_314_462_618;

/// Integrator and thermostat parameters
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LangevinConfig {
    /// Bath temperature in Kelvin
    pub temperature: f64,
    /// Friction coefficient γ (1/ps)
    pub friction: f64,
    /// Integration timestep (ps)
    pub timestep: f64,
    /// Particle mass (amu)
    pub mass: f64,
    /// Initial position (nm)
    pub initial_position: [f64; 3],
    /// RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for LangevinConfig {
    fn default() -> Self {
        Self {
            temperature: 500.0,
            friction: 1.0,
            timestep: 0.02,
            mass: 1.0,
            initial_position: [0.0; 3],
            seed: None,
        }
    }
}

impl LangevinConfig {
    /// Check physical ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.temperature >= 0.0) {
            return Err(Error::invalid_parameter(
                "temperature",
                format!("must be non-negative, got {}", self.temperature),
            ));
        }
        if !(self.friction >= 0.0) {
            return Err(Error::invalid_parameter(
                "friction",
                format!("must be non-negative, got {}", self.friction),
            ));
        }
        if !(self.timestep > 0.0) {
            return Err(Error::invalid_parameter(
                "timestep",
                format!("must be positive, got {}", self.timestep),
            ));
        }
        if !(self.mass > 0.0) {
            return Err(Error::invalid_parameter(
                "mass",
                format!("must be positive, got {}", self.mass),
            ));
        }
        Ok(())
    }

    /// Thermal energy k_B·T (kJ/mol)
    pub fn kt(&self) -> f64 {
        KB_KJ * self.temperature
    }
}

/// Snapshot of the particle
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleState {
    /// Position (nm)
    pub position: [f64; 3],
    /// Velocity (nm/ps)
    pub velocity: [f64; 3],
    /// Potential energy (kJ/mol)
    pub potential_energy: f64,
    /// Kinetic energy (kJ/mol)
    pub kinetic_energy: f64,
    /// Simulation time (ps)
    pub time: f64,
    /// Steps taken
    pub steps: usize,
}

/// Single particle under a fixed potential, thermostatted by Langevin noise
pub struct LangevinSystem<P: Potential> {
    potential: P,
    config: LangevinConfig,
    position: [f64; 3],
    velocity: [f64; 3],
    /// Force at the current position
    force: [f64; 3],
    rng: StdRng,
    time: f64,
    steps: usize,
}

impl<P: Potential> LangevinSystem<P> {
    /// Create a system at `config.initial_position` with Maxwell-Boltzmann
    /// velocities at the bath temperature
    pub fn new(potential: P, config: LangevinConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let velocity = maxwell_boltzmann(config.mass, config.temperature, &mut rng);
        let position = config.initial_position;
        let force = potential.force(&position);

        Ok(Self {
            potential,
            config,
            position,
            velocity,
            force,
            rng,
            time: 0.0,
            steps: 0,
        })
    }

    /// Current position
    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    /// Current velocity
    pub fn velocity(&self) -> [f64; 3] {
        self.velocity
    }

    /// Overwrite the velocity
    pub fn set_velocity(&mut self, velocity: [f64; 3]) {
        self.velocity = velocity;
    }

    /// Overwrite the position and refresh the cached force
    pub fn set_position(&mut self, position: [f64; 3]) {
        self.position = position;
        self.force = self.potential.force(&position);
    }

    /// Integrator parameters
    pub fn config(&self) -> &LangevinConfig {
        &self.config
    }

    /// The external potential
    pub fn potential(&self) -> &P {
        &self.potential
    }

    /// Potential energy at the current position
    pub fn energy(&self) -> f64 {
        self.potential.energy(&self.position)
    }

    /// ½·m·|v|²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.config.mass * self.velocity.iter().map(|v| v * v).sum::<f64>()
    }

    /// Instantaneous temperature from equipartition, 3 degrees of freedom
    pub fn instantaneous_temperature(&self) -> f64 {
        2.0 * self.kinetic_energy() / (3.0 * KB_KJ)
    }

    /// One BAOAB step
    fn baoab_step(&mut self) {
        let dt = self.config.timestep;
        let inv_m = 1.0 / self.config.mass;
        let c1 = (-self.config.friction * dt).exp();
        let c2 = ((1.0 - c1 * c1) * self.config.kt() * inv_m).sqrt();

        for d in 0..3 {
            // B
            self.velocity[d] += 0.5 * dt * self.force[d] * inv_m;
            // A
            self.position[d] += 0.5 * dt * self.velocity[d];
            // O
            let noise: f64 = self.rng.sample(StandardNormal);
            self.velocity[d] = c1 * self.velocity[d] + c2 * noise;
            // A
            self.position[d] += 0.5 * dt * self.velocity[d];
        }

        self.force = self.potential.force(&self.position);

        // B
        for d in 0..3 {
            self.velocity[d] += 0.5 * dt * self.force[d] * inv_m;
        }

        self.time += dt;
        self.steps += 1;
    }
}

impl<P: Potential> DynamicalSystem for LangevinSystem<P> {
    type State = ParticleState;

    fn step(&mut self) {
        self.baoab_step();
    }

    fn state(&self) -> ParticleState {
        ParticleState {
            position: self.position,
            velocity: self.velocity,
            potential_energy: self.energy(),
            kinetic_energy: self.kinetic_energy(),
            time: self.time,
            steps: self.steps,
        }
    }

    fn observe(&self) -> Vec<f64> {
        self.position.to_vec()
    }

    fn state_dimension(&self) -> usize {
        3
    }

    fn dt(&self) -> f64 {
        self.config.timestep
    }

    fn time(&self) -> f64 {
        self.time
    }
}

/// Maxwell-Boltzmann velocity for one particle: each component ~ N(0, kT/m)
fn maxwell_boltzmann<R: Rng>(mass: f64, temperature: f64, rng: &mut R) -> [f64; 3] {
    let sigma = (KB_KJ * temperature / mass).sqrt();
    let mut v = [0.0; 3];
    for c in v.iter_mut() {
        let z: f64 = rng.sample(StandardNormal);
        *c = sigma * z;
    }
    v
}
