//! Target frame transformations
//!
//! Converts a target designated in the world frame into the vehicle frame the
//! solvers work in: translate by the vehicle position, then rotate the
//! horizontal components by the negative heading. The vertical component is
//! frame invariant. Pure arithmetic, no iteration; the only failure mode is a
//! non-finite input.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Rotation2, Vector2, Vector3};

// Internal
use super::SolveFailure;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a world frame target position into a vehicle frame displacement
/// from the vehicle's reference point.
pub fn world_to_vehicle(
    target_pos_m_wf: &Vector3<f64>,
    vehicle_pos_m_wf: &Vector2<f64>,
    heading_rad: f64,
) -> Result<Vector3<f64>, SolveFailure> {
    if !finite3(target_pos_m_wf) || !finite2(vehicle_pos_m_wf) || !heading_rad.is_finite() {
        return Err(SolveFailure::InvalidInput);
    }

    let flat = Rotation2::new(-heading_rad)
        * Vector2::new(
            target_pos_m_wf.x - vehicle_pos_m_wf.x,
            target_pos_m_wf.y - vehicle_pos_m_wf.y,
        );

    Ok(Vector3::new(flat.x, flat.y, target_pos_m_wf.z))
}

/// Convert a vehicle frame displacement back into a world frame position.
///
/// Exact inverse of [`world_to_vehicle`] for the same pose.
pub fn vehicle_to_world(
    target_m_vf: &Vector3<f64>,
    vehicle_pos_m_wf: &Vector2<f64>,
    heading_rad: f64,
) -> Result<Vector3<f64>, SolveFailure> {
    if !finite3(target_m_vf) || !finite2(vehicle_pos_m_wf) || !heading_rad.is_finite() {
        return Err(SolveFailure::InvalidInput);
    }

    let flat = Rotation2::new(heading_rad) * Vector2::new(target_m_vf.x, target_m_vf.y);

    Ok(Vector3::new(
        flat.x + vehicle_pos_m_wf.x,
        flat.y + vehicle_pos_m_wf.y,
        target_m_vf.z,
    ))
}

/// True if all components of the vector are finite.
pub(crate) fn finite3(v: &Vector3<f64>) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

fn finite2(v: &Vector2<f64>) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translation_only() {
        let target = Vector3::new(5.0, 3.0, 1.5);
        let vehicle = Vector2::new(2.0, 1.0);

        let vf = world_to_vehicle(&target, &vehicle, 0.0).unwrap();

        assert!((vf.x - 3.0).abs() < 1e-12);
        assert!((vf.y - 2.0).abs() < 1e-12);
        assert!((vf.z - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_rotation() {
        // Vehicle at the origin facing +Y, target straight down the world +Y
        // axis, so the target sits dead ahead in the vehicle frame
        let target = Vector3::new(0.0, 4.0, 1.0);
        let vehicle = Vector2::new(0.0, 0.0);

        let vf = world_to_vehicle(&target, &vehicle, FRAC_PI_2).unwrap();

        assert!((vf.x - 4.0).abs() < 1e-12);
        assert!(vf.y.abs() < 1e-12);
        assert!((vf.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let target = Vector3::new(-3.2, 7.9, 2.1);
        let vehicle = Vector2::new(12.5, -4.0);
        let heading = 2.3;

        let vf = world_to_vehicle(&target, &vehicle, heading).unwrap();
        let wf = vehicle_to_world(&vf, &vehicle, heading).unwrap();

        assert!((wf.x - target.x).abs() < 1e-9);
        assert!((wf.y - target.y).abs() < 1e-9);
        assert!((wf.z - target.z).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let vehicle = Vector2::new(0.0, 0.0);

        let res = world_to_vehicle(&Vector3::new(f64::NAN, 0.0, 0.0), &vehicle, 0.0);
        assert_eq!(res, Err(SolveFailure::InvalidInput));

        let res = world_to_vehicle(&Vector3::new(1.0, 0.0, 0.0), &vehicle, f64::INFINITY);
        assert_eq!(res, Err(SolveFailure::InvalidInput));
    }
}
