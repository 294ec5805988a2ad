//! # Fire control module
//!
//! Fire control converts a target position and the vehicle's own motion into
//! setpoints for the launcher: a turret bearing (yaw), a hood elevation
//! (pitch) and a projectile exit speed. Two solver strategies are provided:
//!
//! - `DragCompensated`: iteratively estimates exit speed and elevation
//!   against quadratic aerodynamic drag. Always returns a best-effort
//!   solution, with yaw and pitch clamped into range.
//! - `MovingIntercept`: sweeps candidate flight times under a drag-free
//!   ballistic model, compensating for the vehicle's translation during the
//!   projectile's flight. Candidates outside the mechanical limits are
//!   rejected and the sweep can fail with `NoFeasibleTime`.
//!
//! The strategies deliberately differ in their limit policy (clamp vs
//! reject) and must not be unified. Callers select one per cycle via
//! [`InputData`].
//!
//! Each solve is a pure function of its inputs and the parameter snapshot
//! taken at the start of the cycle; no state is carried between cycles.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_drag;
mod calc_intercept;
mod frame;
mod params;
mod solution;
mod state;
mod tm;
mod validate;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use frame::*;
pub use params::*;
pub use solution::*;
pub use state::*;
pub use tm::*;
pub use validate::*;

use util::params as util_params;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Gravitational acceleration used by the intercept sweep.
///
/// Units: meters/second^2
pub const GRAVITY_MPS2: f64 = 9.81;

/// Standard gravity used by the drag estimator.
///
/// Units: meters/second^2
pub(crate) const STD_GRAVITY_MPS2: f64 = 9.80665;

/// Sea level air density.
///
/// Units: kilograms/meter^3
pub(crate) const AIR_DENSITY_KGPM3: f64 = 1.225;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during FireCtrl operation.
///
/// Expected physical infeasibility is not an error: it is reported through
/// [`SolveFailure`] in the module's status report.
#[derive(Debug, thiserror::Error)]
pub enum FireCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util_params::LoadError),
}
