//! # Telemetry for fire control
//!
//! Records written for the offline tuner: one row per successful solution
//! and one row per operator-reported shot result. Archiving is a side effect
//! only, a failure to write is logged and dropped and never changes solver
//! behaviour.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use log::{info, warn};
use serde::Serialize;

use super::state::FireCtrl;
use super::FiringSolution;
use util::session;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// One solution record for the tuner.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FireCtrlTm {
    /// Session elapsed time at solve.
    ///
    /// Units: seconds
    pub time_s: f64,

    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub speed_mps: f64,

    /// Horizontal distance to the target at solve time.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Drag coefficient in force at solve time, so the tuner can correlate
    /// misses with the coefficient that produced them.
    pub drag_coeff: f64,
}

/// One operator-reported shot outcome.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShotResultTm {
    /// Session elapsed time at report.
    ///
    /// Units: seconds
    pub time_s: f64,

    pub hit: bool,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl FireCtrl {
    /// Archive a solution record for the tuner.
    pub(crate) fn archive_solution(&mut self, solution: &FiringSolution, distance_m: f64) {
        let tm = FireCtrlTm {
            time_s: session::try_get_elapsed_seconds().unwrap_or(0.0),
            yaw_rad: solution.yaw_rad,
            pitch_rad: solution.pitch_rad,
            speed_mps: solution.speed_mps,
            distance_m,
            drag_coeff: self.params.drag_coeff,
        };

        if let Err(e) = self.arch_solution.serialise(tm) {
            warn!("Could not archive firing solution: {}", e);
        }
    }

    /// Record an operator-reported hit or miss.
    ///
    /// Feeds the offline tuner only, the solver never reads these back.
    pub fn record_shot_result(&mut self, hit: bool) {
        let tm = ShotResultTm {
            time_s: session::try_get_elapsed_seconds().unwrap_or(0.0),
            hit,
        };

        if let Err(e) = self.arch_shots.serialise(tm) {
            warn!("Could not archive shot result: {}", e);
        }

        info!("Shot result recorded: {}", if hit { "hit" } else { "miss" });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fire_ctrl::{SolverStrategy, VehicleMotion};
    use nalgebra::Vector3;

    #[test]
    fn test_archiving_never_changes_the_solution() {
        // Uninitialised archivers drop records; solving with and without a
        // telemetry write in between must give the same answer
        let mut fire_ctrl = FireCtrl::default();
        let vehicle = VehicleMotion::default();
        let target = Vector3::new(5.0, 0.0, 1.5);

        let first = fire_ctrl
            .solve(&target, &vehicle, SolverStrategy::MovingIntercept)
            .unwrap();

        fire_ctrl.record_shot_result(true);

        let second = fire_ctrl
            .solve(&target, &vehicle, SolverStrategy::MovingIntercept)
            .unwrap();

        assert_eq!(first.speed_mps, second.speed_mps);
        assert_eq!(first.yaw_rad, second.yaw_rad);
        assert_eq!(first.pitch_rad, second.pitch_rad);
        assert_eq!(first.flight_time_s, second.flight_time_s);
    }
}
