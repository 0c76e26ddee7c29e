//! Report Module: Side-by-Side Component Comparison
//!
//! Renders the leading direction of each model as a text bar chart and as a
//! unit-normalized vector.

mod chart;

pub use chart::{bar_chart, side_by_side};

use std::fmt;

/// Axis labels for 3D positions
pub const XYZ: [&str; 3] = ["x", "y", "z"];

/// Unit-length copy of `v`; the zero vector is returned unchanged
pub fn normalize(v: &[f64]) -> Vec<f64> {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

/// cos θ between `a` and `b` (0 when either is zero)
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

/// Leading directions of the two models, normalized
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    /// Feature labels
    pub labels: Vec<String>,
    /// Normalized leading tICA direction
    pub tica: Vec<f64>,
    /// Normalized leading PCA direction
    pub pca: Vec<f64>,
    /// Chart width in cells
    pub width: usize,
}

impl ComparisonReport {
    /// Build from raw (unnormalized) directions
    pub fn new(labels: &[&str], tica: &[f64], pca: &[f64]) -> Self {
        Self {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            tica: normalize(tica),
            pca: normalize(pca),
            width: 30,
        }
    }

    /// Change the chart width
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// |cos θ| between each direction and feature axis `axis`
    pub fn axis_alignment(&self, axis: usize) -> (f64, f64) {
        let tica = self.tica.get(axis).map_or(0.0, |v| v.abs());
        let pca = self.pca.get(axis).map_or(0.0, |v| v.abs());
        (tica, pca)
    }

    /// Both bar charts next to each other
    pub fn render_charts(&self) -> String {
        let labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        let left = bar_chart("tICA", &labels, &self.tica, self.width);
        let right = bar_chart("PCA", &labels, &self.pca, self.width);
        side_by_side(&left, &right, 6)
    }

    /// Normalized vectors, one line per model
    pub fn render_vectors(&self) -> String {
        format!(
            "tICA:  {}\nPCA:   {}\n",
            format_vector(&self.tica),
            format_vector(&self.pca)
        )
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.render_charts(), self.render_vectors())
    }
}

fn format_vector(v: &[f64]) -> String {
    let items: Vec<String> = v.iter().map(|x| format!("{:>9.6}", x)).collect();
    format!("[{} ]", items.join(""))
}
