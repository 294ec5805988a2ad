//! Firing solution record and outcome classification

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A computed firing solution, immutable once constructed.
///
/// All angles are expressed in the vehicle frame.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct FiringSolution {
    /// Turret bearing relative to the vehicle forward axis, wrapped to
    /// `[-pi, pi]`.
    ///
    /// Units: radians
    pub yaw_rad: f64,

    /// Hood elevation above the horizontal plane.
    ///
    /// Units: radians
    pub pitch_rad: f64,

    /// Projectile exit speed.
    ///
    /// Units: meters/second
    pub speed_mps: f64,

    /// Equivalent flywheel angular rate (exit speed over wheel radius).
    ///
    /// Units: radians/second
    pub wheel_rate_rads: f64,

    /// Projectile flight time. Only produced by the intercept strategy.
    ///
    /// Units: seconds
    pub flight_time_s: Option<f64>,

    /// Full exit velocity vector in the vehicle frame. Only produced by the
    /// intercept strategy.
    ///
    /// Units: meters/second
    pub velocity_mps_vf: Option<Vector3<f64>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The mechanical limit a candidate solution violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RejectionReason {
    /// Exit speed outside the launcher's speed range
    SpeedOutOfRange,

    /// Bearing outside the symmetric turret yaw limit
    YawOutOfRange,

    /// Elevation outside the hood pitch range
    PitchOutOfRange,
}

/// Classified failure of a solve call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum SolveFailure {
    /// Input contained a non-finite component, or the sweep configuration was
    /// malformed. Fatal to this call; nothing was computed.
    #[error("Non-finite or malformed solver input")]
    InvalidInput,

    /// Every candidate flight time violated a mechanical limit. The status
    /// report retains the last specific rejection for diagnostics.
    #[error("No feasible flight time within the search window")]
    NoFeasibleTime,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FiringSolution {
    /// Flywheel speed in revolutions per minute.
    pub fn wheel_rpm(&self) -> f64 {
        self.wheel_rate_rads * 60.0 / std::f64::consts::TAU
    }
}
