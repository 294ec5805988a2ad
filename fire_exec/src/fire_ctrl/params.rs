//! Parameters structure for FireCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::tuning;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for fire control.
///
/// Every value can be overridden at runtime through the tuning registry under
/// the key `fire_ctrl/<field_name>`. [`Params::from_tuning`] builds the
/// snapshot which is read fresh at the start of every cycle; each key is read
/// independently, so a coherent cross-parameter view is not guaranteed within
/// one cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Params {
    // ---- PROJECTILE ----
    /// Aerodynamic drag coefficient of the projectile.
    ///
    /// Units: dimensionless
    pub drag_coeff: f64,

    /// Projectile cross-sectional area.
    ///
    /// Units: meters^2
    pub projectile_area_m2: f64,

    /// Projectile mass.
    ///
    /// Units: kilograms
    pub projectile_mass_kg: f64,

    // ---- GEOMETRY ----
    /// Height of the launcher exit above the vehicle reference plane.
    ///
    /// Units: meters
    pub launch_height_m: f64,

    /// Height of the target aim point, applied as an offset on top of the
    /// target's reported vertical position.
    ///
    /// Units: meters
    pub target_height_m: f64,

    /// The radius of the launcher flywheel.
    ///
    /// Units: meters
    pub flywheel_radius_m: f64,

    // ---- CAPABILITIES ----
    /// Minimum projectile exit speed.
    ///
    /// Units: meters/second
    pub min_speed_mps: f64,

    /// Maximum projectile exit speed.
    ///
    /// Units: meters/second
    pub max_speed_mps: f64,

    /// Symmetric turret yaw limit, the bearing must lie in `[-limit, limit]`.
    ///
    /// Units: radians
    pub yaw_limit_rad: f64,

    /// Minimum hood pitch (lowest elevation).
    ///
    /// Units: radians
    pub pitch_min_rad: f64,

    /// Maximum hood pitch (highest elevation).
    ///
    /// Units: radians
    pub pitch_max_rad: f64,

    // ---- DRAG ESTIMATOR ----
    /// Iteration cap for the exit speed estimate.
    pub vel_iterations: u32,

    /// Iteration cap for the elevation estimate.
    pub angle_iterations: u32,

    /// Convergence tolerance for the exit speed estimate's drop error.
    pub vel_tolerance: f64,

    /// Convergence tolerance for the elevation estimate's vertical miss.
    ///
    /// Units: radians
    pub angle_tolerance_rad: f64,

    // ---- INTERCEPT SWEEP ----
    /// Shortest candidate flight time considered by the sweep.
    ///
    /// Units: seconds
    pub min_time_s: f64,

    /// Longest candidate flight time considered by the sweep.
    ///
    /// Units: seconds
    pub max_time_s: f64,

    /// Flight time sweep step.
    ///
    /// Units: seconds
    pub time_step_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Params {
            drag_coeff: 0.003,
            projectile_area_m2: 0.0015,
            projectile_mass_kg: 0.18,
            launch_height_m: 0.8,
            target_height_m: 2.3,
            flywheel_radius_m: 0.0762,
            min_speed_mps: 2.0,
            max_speed_mps: 30.0,
            yaw_limit_rad: 167.0_f64.to_radians(),
            pitch_min_rad: 0.0,
            pitch_max_rad: std::f64::consts::FRAC_PI_2,
            vel_iterations: 20,
            angle_iterations: 20,
            vel_tolerance: 0.01,
            angle_tolerance_rad: 1e-4,
            min_time_s: 0.05,
            max_time_s: 5.0,
            time_step_s: 0.01,
        }
    }
}

impl Params {
    /// Register every parameter with the tuning registry.
    ///
    /// Values already set by the operator are kept.
    pub fn register_tuning(&self) {
        tuning::register("fire_ctrl/drag_coeff", self.drag_coeff);
        tuning::register("fire_ctrl/projectile_area_m2", self.projectile_area_m2);
        tuning::register("fire_ctrl/projectile_mass_kg", self.projectile_mass_kg);
        tuning::register("fire_ctrl/launch_height_m", self.launch_height_m);
        tuning::register("fire_ctrl/target_height_m", self.target_height_m);
        tuning::register("fire_ctrl/flywheel_radius_m", self.flywheel_radius_m);
        tuning::register("fire_ctrl/min_speed_mps", self.min_speed_mps);
        tuning::register("fire_ctrl/max_speed_mps", self.max_speed_mps);
        tuning::register("fire_ctrl/yaw_limit_rad", self.yaw_limit_rad);
        tuning::register("fire_ctrl/pitch_min_rad", self.pitch_min_rad);
        tuning::register("fire_ctrl/pitch_max_rad", self.pitch_max_rad);
        tuning::register("fire_ctrl/vel_iterations", self.vel_iterations as f64);
        tuning::register("fire_ctrl/angle_iterations", self.angle_iterations as f64);
        tuning::register("fire_ctrl/vel_tolerance", self.vel_tolerance);
        tuning::register("fire_ctrl/angle_tolerance_rad", self.angle_tolerance_rad);
        tuning::register("fire_ctrl/min_time_s", self.min_time_s);
        tuning::register("fire_ctrl/max_time_s", self.max_time_s);
        tuning::register("fire_ctrl/time_step_s", self.time_step_s);
    }

    /// Build the parameter snapshot for one cycle from the tuning registry.
    ///
    /// Keys never registered fall back to the defaults.
    pub fn from_tuning() -> Self {
        let d = Params::default();

        Params {
            drag_coeff: tuning::get("fire_ctrl/drag_coeff", d.drag_coeff),
            projectile_area_m2: tuning::get("fire_ctrl/projectile_area_m2", d.projectile_area_m2),
            projectile_mass_kg: tuning::get("fire_ctrl/projectile_mass_kg", d.projectile_mass_kg),
            launch_height_m: tuning::get("fire_ctrl/launch_height_m", d.launch_height_m),
            target_height_m: tuning::get("fire_ctrl/target_height_m", d.target_height_m),
            flywheel_radius_m: tuning::get("fire_ctrl/flywheel_radius_m", d.flywheel_radius_m),
            min_speed_mps: tuning::get("fire_ctrl/min_speed_mps", d.min_speed_mps),
            max_speed_mps: tuning::get("fire_ctrl/max_speed_mps", d.max_speed_mps),
            yaw_limit_rad: tuning::get("fire_ctrl/yaw_limit_rad", d.yaw_limit_rad),
            pitch_min_rad: tuning::get("fire_ctrl/pitch_min_rad", d.pitch_min_rad),
            pitch_max_rad: tuning::get("fire_ctrl/pitch_max_rad", d.pitch_max_rad),
            vel_iterations: tuning::get("fire_ctrl/vel_iterations", d.vel_iterations as f64)
                as u32,
            angle_iterations: tuning::get("fire_ctrl/angle_iterations", d.angle_iterations as f64)
                as u32,
            vel_tolerance: tuning::get("fire_ctrl/vel_tolerance", d.vel_tolerance),
            angle_tolerance_rad: tuning::get(
                "fire_ctrl/angle_tolerance_rad",
                d.angle_tolerance_rad,
            ),
            min_time_s: tuning::get("fire_ctrl/min_time_s", d.min_time_s),
            max_time_s: tuning::get("fire_ctrl/max_time_s", d.max_time_s),
            time_step_s: tuning::get("fire_ctrl/time_step_s", d.time_step_s),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_tuning_picks_up_operator_set() {
        let d = Params::default();
        d.register_tuning();

        tuning::set("fire_ctrl/target_height_m", 1.9);
        let snapshot = Params::from_tuning();
        assert_eq!(snapshot.target_height_m, 1.9);

        // Other keys keep their registered values
        assert_eq!(snapshot.drag_coeff, d.drag_coeff);

        // Restore for other tests sharing the process-wide registry
        tuning::set("fire_ctrl/target_height_m", d.target_height_m);
    }
}
