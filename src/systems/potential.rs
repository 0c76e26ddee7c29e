//! External Potentials: Closed-Form Energy Surfaces
//!
//! A potential maps a 3D position to a scalar energy (kJ/mol) and supplies
//! the analytic force F = −∇V (kJ/mol/nm). Positions are in nm.
//!
//! ## Double Well
//!
//!   V(x, y, z) = h·(x−1)²·(x+1)² + k·(y² + z²)
//!
//! With h = 5 and k = 1 the x coordinate has two minima at x = ±1 separated
//! by a barrier of height h at x = 0, while y and z are plain harmonic
//! directions. At 500 K (kT ≈ 4.16 kJ/mol) barrier crossings are rare
//! compared to the harmonic relaxation, but the harmonic directions carry
//! more variance: x is slow, y and z are wide.

/// Scalar potential energy over three coordinates
pub trait Potential {
    /// Potential energy at `position`
    fn energy(&self, position: &[f64; 3]) -> f64;

    /// Force −∇V at `position`
    fn force(&self, position: &[f64; 3]) -> [f64; 3];
}

/// Double well along x, harmonic along y and z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleWellPotential {
    /// Barrier height h at x = 0 (kJ/mol)
    pub barrier: f64,
    /// Harmonic stiffness k for y and z (kJ/mol/nm²)
    pub stiffness: f64,
}

impl DoubleWellPotential {
    /// Create a double well with custom barrier and stiffness
    pub fn new(barrier: f64, stiffness: f64) -> Self {
        Self { barrier, stiffness }
    }

    /// Location of the two minima along x
    pub fn minima(&self) -> [f64; 2] {
        [-1.0, 1.0]
    }
}

impl Default for DoubleWellPotential {
    /// 5·(x−1)²·(x+1)² + y² + z²
    fn default() -> Self {
        Self {
            barrier: 5.0,
            stiffness: 1.0,
        }
    }
}

impl Potential for DoubleWellPotential {
    fn energy(&self, position: &[f64; 3]) -> f64 {
        let [x, y, z] = *position;
        self.barrier * (x - 1.0).powi(2) * (x + 1.0).powi(2) + self.stiffness * (y * y + z * z)
    }

    fn force(&self, position: &[f64; 3]) -> [f64; 3] {
        let [x, y, z] = *position;
        // d/dx (x² − 1)² = 4x(x² − 1)
        [
            -4.0 * self.barrier * x * (x * x - 1.0),
            -2.0 * self.stiffness * y,
            -2.0 * self.stiffness * z,
        ]
    }
}
