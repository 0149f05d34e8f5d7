//! Analysis types and options

use serde::{Deserialize, Serialize};

/// Type of pile analysis to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisType {
    /// Linear structural analysis without soil springs
    Beam,
    /// Incremental-iterative analysis on nonlinear Winkler springs
    Winkler,
}

impl Default for AnalysisType {
    fn default() -> Self {
        Self::Beam
    }
}

/// Options for the iterative Winkler analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Maximum number of iterations of the nonlinear loop
    pub max_iterations: usize,
    /// Relative residual tolerance (residual norm over the first external force norm)
    pub tolerance: f64,
    /// Report every iteration at `info` level instead of `debug`
    pub log: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-4,
            log: false,
        }
    }
}

impl AnalysisOptions {
    /// Create the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Log level used for per-iteration progress
    pub(crate) fn progress_level(&self) -> log::Level {
        if self.log {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = AnalysisOptions::default();
        assert_eq!(opts.max_iterations, 100);
        assert_eq!(opts.tolerance, 1e-4);
        assert!(!opts.log);
    }

    #[test]
    fn test_builder_chain() {
        let opts = AnalysisOptions::new()
            .with_max_iter(20)
            .with_tolerance(1e-6)
            .with_logging();
        assert_eq!(opts.max_iterations, 20);
        assert_eq!(opts.tolerance, 1e-6);
        assert_eq!(opts.progress_level(), log::Level::Info);
    }
}
