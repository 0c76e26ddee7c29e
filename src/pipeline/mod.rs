//! Pipeline Module: Simulate, Fit, Report
//!
//! ```text
//!   LangevinSystem ──simulate(steps)──► Trajectory ─┬─► tICA.fit ─┐
//!                                                   └─► PCA.fit  ─┴─► ComparisonReport
//! ```
//!
//! Both models see the same trajectory instance.

use crate::config::PipelineConfig;
use crate::decomposition::{Decomposition, Pca, Tica};
use crate::error::Result;
use crate::report::{ComparisonReport, XYZ};
use crate::systems::{DoubleWellPotential, LangevinSystem, Simulator};
use crate::trajectory::Trajectory;

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Recorded positions
    pub trajectory: Trajectory,
    /// Fitted tICA model
    pub tica: Tica,
    /// Fitted PCA model
    pub pca: Pca,
    /// Normalized leading directions
    pub report: ComparisonReport,
}

/// Simulate the double-well particle
pub fn simulate_double_well(config: &PipelineConfig) -> Result<Trajectory> {
    let mut system = LangevinSystem::new(DoubleWellPotential::default(), config.simulation.clone())?;
    log::info!(
        "simulating {} steps at {} K (friction {} /ps, dt {} ps)",
        config.steps,
        config.simulation.temperature,
        config.simulation.friction,
        config.simulation.timestep
    );
    system.simulate(config.steps)
}

/// Fit both projectors on `trajectory`
pub fn fit_models(config: &PipelineConfig, trajectory: &Trajectory) -> Result<(Tica, Pca)> {
    let sequences = std::slice::from_ref(trajectory);

    let mut tica = Tica::new(config.model.tica())?;
    tica.fit(sequences)?;

    let mut pca = Pca::new(config.model.pca())?;
    pca.fit(sequences)?;

    Ok((tica, pca))
}

/// Run the full comparison
pub fn run_comparison(config: &PipelineConfig) -> Result<Comparison> {
    config.validate()?;

    let trajectory = simulate_double_well(config)?;
    log::debug!("per-axis variance: {:?}", trajectory.variances().to_vec());

    let (tica, pca) = fit_models(config, &trajectory)?;

    let report = ComparisonReport::new(&XYZ, &tica.leading_component()?, &pca.leading_component()?)
        .with_width(config.report.width);

    let (t, p) = report.axis_alignment(0);
    log::info!("alignment with x axis: tICA {:.3}, PCA {:.3}", t, p);

    Ok(Comparison {
        trajectory,
        tica,
        pca,
        report,
    })
}
