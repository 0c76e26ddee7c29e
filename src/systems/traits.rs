//! Dynamical System Traits: Standardized API for Trajectory Generation
//!
//! Every stepped system exposes the same small surface so the pipeline can
//! treat the integrator as a swappable capability:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DynamicalSystem Trait                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + step()              - Advance system by dt               │
//! │  + run(n)              - Run n steps                        │
//! │  + state()             - Snapshot of the current state      │
//! │  + observe()           - Observable recorded per frame      │
//! │  + state_dimension()   - Length of the observable           │
//! │  + time()              - Elapsed simulation time            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       Simulator Trait                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + simulate(n)         - Record n frames into a Trajectory  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::trajectory::Trajectory;

/// Trait for stepped systems that can be sampled into a trajectory
pub trait DynamicalSystem {
    /// State type for this system
    type State;

    /// Advance system by one timestep
    fn step(&mut self);

    /// Run multiple timesteps
    fn run(&mut self, n_steps: usize) {
        for _ in 0..n_steps {
            self.step();
        }
    }

    /// Get current state snapshot
    fn state(&self) -> Self::State;

    /// Observable written to the trajectory at each frame
    fn observe(&self) -> Vec<f64>;

    /// Length of the observable vector
    fn state_dimension(&self) -> usize;

    /// Integration timestep
    fn dt(&self) -> f64;

    /// Elapsed simulation time
    fn time(&self) -> f64;
}

/// Anything that can produce a trajectory of a requested length
pub trait Simulator {
    /// Produce exactly `n_steps` frames
    fn simulate(&mut self, n_steps: usize) -> Result<Trajectory>;
}

/// Record-then-advance sampling shared by every [`DynamicalSystem`].
///
/// Frame `i` holds the observable before step `i` is taken, so the first
/// frame is the initial condition. A non-finite observable aborts the run.
impl<S: DynamicalSystem> Simulator for S {
    fn simulate(&mut self, n_steps: usize) -> Result<Trajectory> {
        let dim = self.state_dimension();
        let mut frames = Array2::zeros((n_steps, dim));

        for i in 0..n_steps {
            let obs = self.observe();
            if obs.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: obs.len(),
                });
            }
            if obs.iter().any(|v| !v.is_finite()) {
                return Err(Error::NumericalInstability { step: i });
            }
            for (d, v) in obs.into_iter().enumerate() {
                frames[[i, d]] = v;
            }
            self.step();
        }

        Ok(Trajectory::new(frames, self.dt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts steps: x(t) = t
    struct Counter {
        ticks: usize,
    }

    impl DynamicalSystem for Counter {
        type State = usize;

        fn step(&mut self) {
            self.ticks += 1;
        }

        fn state(&self) -> usize {
            self.ticks
        }

        fn observe(&self) -> Vec<f64> {
            vec![self.ticks as f64, 2.0 * self.ticks as f64]
        }

        fn state_dimension(&self) -> usize {
            2
        }

        fn dt(&self) -> f64 {
            0.5
        }

        fn time(&self) -> f64 {
            self.ticks as f64 * 0.5
        }
    }

    #[test]
    fn test_simulate_records_before_step() {
        let mut sys = Counter { ticks: 0 };
        let traj = sys.simulate(5).unwrap();

        assert_eq!(traj.n_frames(), 5);
        assert_eq!(traj.n_features(), 2);
        for i in 0..5 {
            assert_eq!(traj.frames()[[i, 0]], i as f64);
        }
        assert_eq!(sys.state(), 5);
        assert_eq!(traj.timestep(), 0.5);
    }

    #[test]
    fn test_simulate_zero_steps() {
        let mut sys = Counter { ticks: 0 };
        let traj = sys.simulate(0).unwrap();
        assert_eq!(traj.n_frames(), 0);
        assert_eq!(sys.state(), 0);
    }

    struct Exploding;

    impl DynamicalSystem for Exploding {
        type State = ();
        fn step(&mut self) {}
        fn state(&self) {}
        fn observe(&self) -> Vec<f64> {
            vec![f64::NAN]
        }
        fn state_dimension(&self) -> usize {
            1
        }
        fn dt(&self) -> f64 {
            1.0
        }
        fn time(&self) -> f64 {
            0.0
        }
    }

    /// Observes more values than it declares
    struct Overfull;

    impl DynamicalSystem for Overfull {
        type State = ();
        fn step(&mut self) {}
        fn state(&self) {}
        fn observe(&self) -> Vec<f64> {
            vec![1.0, 2.0, 3.0]
        }
        fn state_dimension(&self) -> usize {
            2
        }
        fn dt(&self) -> f64 {
            1.0
        }
        fn time(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_simulate_rejects_wrong_observable_length() {
        let err = Overfull.simulate(4).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn test_simulate_reports_blow_up() {
        let err = Exploding.simulate(3).unwrap_err();
        assert!(matches!(err, Error::NumericalInstability { step: 0 }));
    }
}
