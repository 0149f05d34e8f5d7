//! Error types for the pile solver

use thiserror::Error;

/// Main error type for pile analysis operations
#[derive(Error, Debug)]
pub enum PileError {
    #[error("Invalid pile geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid soil profile: {0}")]
    InvalidSoilProfile(String),

    #[error("The pile ends deeper than the soil profile (pile bottom {pile_bottom} m, soil bottom {soil_bottom} m)")]
    PileDeeperThanSoil { pile_bottom: f64, soil_bottom: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Elevation {elevation} m is outside the model ({top} m to {bottom} m)")]
    OutsideModel { elevation: f64, top: f64, bottom: f64 },

    #[error("Elevation {0} m is not meshed as a node - add it to the extra mesh elevations")]
    NotMeshed(f64),

    #[error("Singular stiffness matrix - model may be unstable or have insufficient supports")]
    SingularMatrix,

    #[error("Failure of the pile-soil system at iteration {iteration}: stiffness matrix became singular")]
    SystemFailure { iteration: usize },

    #[error("A soil profile is required for a Winkler analysis")]
    MissingSoilProfile,

    #[error("Convergence failed after {0} iterations")]
    ConvergenceFailed(usize),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for pile analysis operations
pub type PileResult<T> = Result<T, PileError>;
