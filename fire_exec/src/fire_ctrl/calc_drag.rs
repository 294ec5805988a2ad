//! Drag-compensated firing solution estimator
//!
//! Estimates the exit speed and hood elevation needed to hit a target at a
//! known horizontal range and height difference, modelling projectile
//! deceleration from quadratic drag. Both estimates are bounded heuristic
//! iterations: the exit speed by a damped fixed-point correction, the
//! elevation by a Newton step on the vertical miss. The damping factor and
//! the drag/time coupling are tuned engineering approximations, not analytic
//! results; changing either changes every converged setpoint.
//!
//! This strategy never rejects: yaw and pitch are clamped into range and the
//! best estimate is returned even when an iteration cap is hit.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};

// Internal
use super::state::FireCtrl;
use super::{FiringSolution, AIR_DENSITY_KGPM3, STD_GRAVITY_MPS2};
use util::maths::{clamp, wrap_pi};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Seed exit speed for the first estimator round.
///
/// Units: meters/second
const SPEED_SEED_MPS: f64 = 10.0;

/// Seed elevation for the first Newton round.
///
/// Units: radians
const ANGLE_SEED_RAD: f64 = 0.4;

/// Floor applied to the exit speed estimate between rounds.
///
/// Units: meters/second
const SPEED_FLOOR_MPS: f64 = 2.0;

/// Damping applied to the exit speed correction each round.
const SPEED_DAMPING: f64 = 0.5;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FireCtrl {
    /// Estimate a firing solution under quadratic drag.
    ///
    /// Always produces a solution; the caller validates input finiteness.
    pub(crate) fn calc_drag(&mut self, target_m_vf: &Vector3<f64>) -> FiringSolution {
        let p = self.params;

        let dx = target_m_vf.x;
        let dy = target_m_vf.y;

        // Real vertical difference plus the configured launcher and aim point
        // height offsets
        let dz = target_m_vf.z + (p.target_height_m - p.launch_height_m);

        let range_m = dx.hypot(dy);
        let yaw_rad = dy.atan2(dx);

        let speed_mps = self.estimate_exit_speed(range_m, dz);
        let pitch_est_rad = self.estimate_launch_angle(range_m, dz, speed_mps);

        // Clamp into the mechanical envelope rather than rejecting
        if pitch_est_rad < 0.0 || pitch_est_rad > FRAC_PI_2 {
            self.report.pitch_clamped = true;
        }
        let pitch_rad = clamp(&pitch_est_rad, &0.0, &FRAC_PI_2);
        let yaw_rad = clamp(&wrap_pi(yaw_rad), &-PI, &PI);

        FiringSolution {
            yaw_rad,
            pitch_rad,
            speed_mps,
            wheel_rate_rads: speed_mps / p.flywheel_radius_m,
            flight_time_s: None,
            velocity_mps_vf: None,
        }
    }

    /// Estimate the exit speed needed to cover `range_m` while dropping no
    /// more than `height_diff_m`.
    ///
    /// Damped fixed-point iteration: estimate the drop from a rough
    /// constant-speed flight time, correct the speed by half the signed drop
    /// error, and repeat until the error is inside tolerance or the iteration
    /// cap is hit. The estimate is clamped between the floor and the
    /// configured maximum each round.
    fn estimate_exit_speed(&mut self, range_m: f64, height_diff_m: f64) -> f64 {
        let p = self.params;

        let mut speed_mps = SPEED_SEED_MPS;
        self.report.speed_unconverged = true;

        for _ in 0..p.vel_iterations {
            let drag_accel_mps2 = 0.5 * AIR_DENSITY_KGPM3 * p.drag_coeff * p.projectile_area_m2
                * speed_mps
                * speed_mps
                / p.projectile_mass_kg;

            // Rough flight time at constant speed
            let time_s = range_m / speed_mps;

            let est_drop_m = 0.5 * STD_GRAVITY_MPS2 * time_s * time_s
                + 0.5 * drag_accel_mps2 * time_s * time_s;
            let error_m = est_drop_m - height_diff_m;

            speed_mps -= error_m * SPEED_DAMPING;
            speed_mps = clamp(&speed_mps, &SPEED_FLOOR_MPS, &p.max_speed_mps);

            if error_m.abs() < p.vel_tolerance {
                self.report.speed_unconverged = false;
                break;
            }
        }

        speed_mps
    }

    /// Estimate the launch elevation for the given exit speed.
    ///
    /// Newton iteration on the vertical miss of plain projectile motion at
    /// the rough flight time `range / (v cos angle)`. The derivative is
    /// padded by a small epsilon so a zero denominator cannot occur.
    fn estimate_launch_angle(
        &mut self,
        range_m: f64,
        height_diff_m: f64,
        speed_mps: f64,
    ) -> f64 {
        let p = self.params;

        let mut angle_rad = ANGLE_SEED_RAD;
        self.report.angle_unconverged = true;

        for _ in 0..p.angle_iterations {
            let (sin, cos) = angle_rad.sin_cos();

            let time_s = range_m / (speed_mps * cos);

            let miss_m =
                speed_mps * sin * time_s - 0.5 * STD_GRAVITY_MPS2 * time_s * time_s
                    - height_diff_m;
            let dmiss_dangle = speed_mps * cos * time_s + 1e-6;

            angle_rad -= miss_m / dmiss_dangle;

            if miss_m.abs() < p.angle_tolerance_rad {
                self.report.angle_unconverged = false;
                break;
            }
        }

        angle_rad
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_basic_solution() {
        let mut fire_ctrl = FireCtrl::default();

        // Target 5 m ahead and 1.5 m up: expect a dead ahead bearing, an
        // upward elevation and a speed inside the launcher envelope
        let solution = fire_ctrl.calc_drag(&Vector3::new(5.0, 0.0, 1.5));

        assert!(solution.yaw_rad.abs() < 1e-9);
        assert!(solution.pitch_rad > 0.0 && solution.pitch_rad <= FRAC_PI_2);
        assert!(solution.speed_mps >= SPEED_FLOOR_MPS);
        assert!(solution.speed_mps <= fire_ctrl.params.max_speed_mps);
        assert!(solution.flight_time_s.is_none());
    }

    #[test]
    fn test_idempotent() {
        let mut fire_ctrl = FireCtrl::default();
        let target = Vector3::new(4.2, -1.3, 0.9);

        let first = fire_ctrl.calc_drag(&target);
        let second = fire_ctrl.calc_drag(&target);

        // Identical inputs and parameters give bit-identical outputs
        assert_eq!(first.yaw_rad, second.yaw_rad);
        assert_eq!(first.pitch_rad, second.pitch_rad);
        assert_eq!(first.speed_mps, second.speed_mps);
        assert_eq!(first.wheel_rate_rads, second.wheel_rate_rads);
    }

    #[test]
    fn test_zero_range_stays_finite() {
        let mut fire_ctrl = FireCtrl::default();

        // Target directly above the launcher: the rough flight times go to
        // zero but no division may propagate a NaN into the output
        let solution = fire_ctrl.calc_drag(&Vector3::new(0.0, 0.0, 1.5));

        assert!(solution.yaw_rad.is_finite());
        assert!(solution.pitch_rad.is_finite());
        assert!(solution.speed_mps.is_finite());
        assert!(solution.pitch_rad >= 0.0 && solution.pitch_rad <= FRAC_PI_2);
    }

    #[test]
    fn test_behind_target_clamped_not_rejected() {
        let mut fire_ctrl = FireCtrl::default();

        // Target behind the vehicle: yaw stays wrapped inside [-pi, pi] and a
        // solution is still produced, this strategy never fails
        let solution = fire_ctrl.calc_drag(&Vector3::new(-6.0, 0.5, 1.0));

        assert!(solution.yaw_rad.abs() <= PI);
        assert!(solution.speed_mps.is_finite());
    }

    #[test]
    fn test_descending_target_floors_speed() {
        let mut fire_ctrl = FireCtrl::default();

        // A target well below the launcher drives the drop error positive on
        // every round, so the damped correction walks the estimate down onto
        // the floor clamp. The estimator is a heuristic, saturation is its
        // documented boundary behaviour rather than a failure.
        let solution = fire_ctrl.calc_drag(&Vector3::new(6.0, 0.0, -2.0));

        assert_eq!(solution.speed_mps, SPEED_FLOOR_MPS);
        assert!(fire_ctrl.report.speed_unconverged);
    }
}
