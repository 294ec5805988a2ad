//! Moving-target intercept solver
//!
//! Finds the projectile exit velocity vector which compensates for the
//! vehicle's own motion during flight, under a drag-free ballistic model.
//! Candidate flight times are swept across a configured window; each
//! candidate is checked against the mechanical limits and the best feasible
//! one is retained, lowest exit speed first with ties broken by shortest
//! flight time.
//!
//! The model assumes the vehicle continues at constant velocity through the
//! flight and that the target is stationary in the world frame.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::Vector3;

// Internal
use super::state::FireCtrl;
use super::{validate, FiringSolution, RejectionReason, SolveFailure, GRAVITY_MPS2};
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Exit speeds within this of each other are treated as tied, letting the
/// flight time break the tie.
///
/// Units: meters/second
const SPEED_TIE_EPS_MPS: f64 = 1e-6;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FireCtrl {
    /// Sweep candidate flight times and return the best feasible solution.
    ///
    /// The caller validates input finiteness; this function additionally
    /// rejects a malformed sweep configuration, a non-positive start or step
    /// would divide by zero below.
    pub(crate) fn calc_intercept(
        &mut self,
        target_m_vf: &Vector3<f64>,
        vehicle_vel_mps: &Vector3<f64>,
    ) -> Result<FiringSolution, SolveFailure> {
        let p = self.params;

        if !(p.min_time_s > 0.0) || !(p.time_step_s > 0.0) || !p.max_time_s.is_finite() {
            return Err(SolveFailure::InvalidInput);
        }

        let mut best: Option<FiringSolution> = None;

        let mut time_s = p.min_time_s;
        while time_s <= p.max_time_s {
            // Exit velocity needed to cover the displacement in this time
            // while the vehicle carries the launcher with it
            let vx = (target_m_vf.x - vehicle_vel_mps.x * time_s) / time_s;
            let vy = (target_m_vf.y - vehicle_vel_mps.y * time_s) / time_s;
            let vz = (target_m_vf.z - vehicle_vel_mps.z * time_s
                + 0.5 * GRAVITY_MPS2 * time_s * time_s)
                / time_s;

            let speed_mps = (vx * vx + vy * vy + vz * vz).sqrt();
            let yaw_rad = vy.atan2(vx);
            let pitch_rad = vz.atan2(vx.hypot(vy));

            if let Some(reason) = validate::classify(&p, speed_mps, yaw_rad, pitch_rad) {
                self.reject_candidate(reason, time_s, speed_mps, yaw_rad, pitch_rad);
                time_s += p.time_step_s;
                continue;
            }

            let candidate = FiringSolution {
                yaw_rad: wrap_pi(yaw_rad),
                pitch_rad,
                speed_mps,
                wheel_rate_rads: speed_mps / p.flywheel_radius_m,
                flight_time_s: Some(time_s),
                velocity_mps_vf: Some(Vector3::new(vx, vy, vz)),
            };

            let retain = match best {
                Some(ref b) => better_candidate(&candidate, b),
                None => true,
            };
            if retain {
                best = Some(candidate);
            }

            time_s += p.time_step_s;
        }

        best.ok_or(SolveFailure::NoFeasibleTime)
    }

    /// Record a rejected candidate, warning at most once per reason category
    /// per call so a full sweep cannot flood the log.
    fn reject_candidate(
        &mut self,
        reason: RejectionReason,
        time_s: f64,
        speed_mps: f64,
        yaw_rad: f64,
        pitch_rad: f64,
    ) {
        self.report.last_rejection = Some(reason);
        self.report.candidates_rejected += 1;

        if self.warned.insert(reason) {
            match reason {
                RejectionReason::SpeedOutOfRange => warn!(
                    "Candidate t = {:.3} s rejected: exit speed {:.2} m/s out of range",
                    time_s, speed_mps
                ),
                RejectionReason::YawOutOfRange => warn!(
                    "Candidate t = {:.3} s rejected: turret yaw {:.1} deg out of range",
                    time_s,
                    yaw_rad.to_degrees()
                ),
                RejectionReason::PitchOutOfRange => warn!(
                    "Candidate t = {:.3} s rejected: hood pitch {:.1} deg out of range",
                    time_s,
                    pitch_rad.to_degrees()
                ),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// True if `candidate` should replace `best`.
///
/// Strictly lower exit speed wins; speeds within the tie epsilon fall back to
/// the shorter flight time.
fn better_candidate(candidate: &FiringSolution, best: &FiringSolution) -> bool {
    candidate.speed_mps < best.speed_mps - SPEED_TIE_EPS_MPS
        || ((candidate.speed_mps - best.speed_mps).abs() < SPEED_TIE_EPS_MPS
            && candidate.flight_time_s < best.flight_time_s)
}

#[cfg(test)]
mod test {
    use super::*;

    /// Build a synthetic feasible candidate for comparator tests.
    fn candidate(speed_mps: f64, flight_time_s: f64) -> FiringSolution {
        FiringSolution {
            yaw_rad: 0.0,
            pitch_rad: 0.5,
            speed_mps,
            wheel_rate_rads: 0.0,
            flight_time_s: Some(flight_time_s),
            velocity_mps_vf: None,
        }
    }

    /// Exit speed the sweep model needs at flight time `t` for a stationary
    /// vehicle.
    fn required_speed(target: &Vector3<f64>, t: f64) -> f64 {
        let vx = target.x / t;
        let vy = target.y / t;
        let vz = (target.z + 0.5 * GRAVITY_MPS2 * t * t) / t;
        (vx * vx + vy * vy + vz * vz).sqrt()
    }

    #[test]
    fn test_stationary_vehicle_feasible() {
        let mut fire_ctrl = FireCtrl::default();

        // Target 5 m dead ahead and 1.5 m up, vehicle stationary: at least
        // one sweep time satisfies every limit, so a solution must come back
        let solution = fire_ctrl
            .calc_intercept(&Vector3::new(5.0, 0.0, 1.5), &Vector3::zeros())
            .unwrap();

        assert!(solution.yaw_rad.abs() < 1e-9);
        assert!(solution.pitch_rad > 0.0);
        assert!(solution.speed_mps >= fire_ctrl.params.min_speed_mps);
        assert!(solution.speed_mps <= fire_ctrl.params.max_speed_mps);
        assert!(solution.flight_time_s.is_some());
        assert!(solution.velocity_mps_vf.is_some());
    }

    #[test]
    fn test_selects_global_minimum_speed() {
        let mut fire_ctrl = FireCtrl::default();
        let target = Vector3::new(5.0, 0.0, 1.5);

        let solution = fire_ctrl
            .calc_intercept(&target, &Vector3::zeros())
            .unwrap();

        // The retained speed must not exceed the required speed at any other
        // sampled flight time, regardless of scan order
        for &t in &[0.2, 0.4, 0.6, 0.8, 1.0, 1.5, 2.0, 3.0] {
            assert!(solution.speed_mps <= required_speed(&target, t) + 1e-9);
        }
    }

    #[test]
    fn test_tie_breaks_on_shorter_time() {
        let slow_late = candidate(10.0, 2.0);
        let slow_early = candidate(10.0 + 2e-7, 1.0);
        let fast = candidate(8.0, 3.0);

        // Equal speeds within epsilon: earlier flight time wins
        assert!(better_candidate(&slow_early, &slow_late));
        assert!(!better_candidate(&slow_late, &slow_early));

        // Strictly lower speed beats an earlier time
        assert!(better_candidate(&fast, &slow_early));
        assert!(!better_candidate(&slow_early, &fast));
    }

    #[test]
    fn test_three_distinct_speeds_pick_minimum() {
        let a = candidate(12.0, 0.5);
        let b = candidate(9.0, 1.5);
        let c = candidate(15.0, 0.3);

        // Pairwise comparison finds the global minimum in any scan order
        let mut best = a;
        for next in [b, c].iter() {
            if better_candidate(next, &best) {
                best = *next;
            }
        }
        assert_eq!(best.speed_mps, 9.0);

        let mut best = c;
        for next in [a, b].iter() {
            if better_candidate(next, &best) {
                best = *next;
            }
        }
        assert_eq!(best.speed_mps, 9.0);
    }

    #[test]
    fn test_vertical_target_stays_finite() {
        let mut fire_ctrl = FireCtrl::default();

        // Target directly above the launcher: zero horizontal range must not
        // put a NaN in the output, whatever the outcome class
        match fire_ctrl.calc_intercept(&Vector3::new(0.0, 0.0, 1.5), &Vector3::zeros()) {
            Ok(solution) => {
                assert!(solution.yaw_rad.is_finite());
                assert!(solution.pitch_rad.is_finite());
                assert!(solution.speed_mps.is_finite());
            }
            Err(failure) => assert!(matches!(
                failure,
                SolveFailure::NoFeasibleTime | SolveFailure::InvalidInput
            )),
        }
    }

    #[test]
    fn test_kinematic_consistency_with_moving_vehicle() {
        let mut fire_ctrl = FireCtrl::default();

        let target = Vector3::new(3.0, 4.0, 0.0);
        let vehicle_vel = Vector3::new(1.0, 0.0, 0.0);

        let solution = fire_ctrl.calc_intercept(&target, &vehicle_vel).unwrap();

        let t = solution.flight_time_s.unwrap();
        let v = solution.velocity_mps_vf.unwrap();

        // Projectile drop plus the vehicle's own displacement over the flight
        // must land exactly on the commanded target
        let landing = Vector3::new(
            (v.x + vehicle_vel.x) * t,
            (v.y + vehicle_vel.y) * t,
            (v.z + vehicle_vel.z) * t - 0.5 * GRAVITY_MPS2 * t * t,
        );

        assert!((landing.x - target.x).abs() < 1e-9);
        assert!((landing.y - target.y).abs() < 1e-9);
        assert!((landing.z - target.z).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_target_fails_with_reason() {
        let mut fire_ctrl = FireCtrl::default();

        // 500 m is far outside what a 30 m/s launcher can reach in the sweep
        // window, every candidate is rejected on speed
        let result =
            fire_ctrl.calc_intercept(&Vector3::new(500.0, 0.0, 0.0), &Vector3::zeros());

        assert_eq!(result.unwrap_err(), SolveFailure::NoFeasibleTime);
        assert_eq!(
            fire_ctrl.report.last_rejection,
            Some(RejectionReason::SpeedOutOfRange)
        );
        assert!(fire_ctrl.report.candidates_rejected > 0);
    }

    #[test]
    fn test_rejection_warnings_deduplicated() {
        let mut fire_ctrl = FireCtrl::default();

        let _ = fire_ctrl.calc_intercept(&Vector3::new(500.0, 0.0, 0.0), &Vector3::zeros());

        // Hundreds of candidates rejected, one warned category
        assert!(fire_ctrl.report.candidates_rejected > 100);
        assert_eq!(fire_ctrl.warned.len(), 1);
    }

    #[test]
    fn test_malformed_sweep_is_invalid_input() {
        let mut fire_ctrl = FireCtrl::default();
        fire_ctrl.params.time_step_s = 0.0;

        let result = fire_ctrl.calc_intercept(&Vector3::new(5.0, 0.0, 1.5), &Vector3::zeros());

        assert_eq!(result.unwrap_err(), SolveFailure::InvalidInput);
    }
}
