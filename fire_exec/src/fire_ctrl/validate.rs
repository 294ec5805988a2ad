//! Mechanical limit predicates
//!
//! Both solver strategies enforce the same definition of "in range"; they
//! differ only in policy (the drag strategy clamps, the intercept sweep
//! rejects). The predicates never mutate configuration, they only classify.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{Params, RejectionReason};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Check an exit speed against the configured speed range.
pub fn speed_in_range(params: &Params, speed_mps: f64) -> bool {
    speed_mps >= params.min_speed_mps && speed_mps <= params.max_speed_mps
}

/// Check a bearing against the symmetric turret yaw limit.
pub fn yaw_in_range(params: &Params, yaw_rad: f64) -> bool {
    yaw_rad >= -params.yaw_limit_rad && yaw_rad <= params.yaw_limit_rad
}

/// Check an elevation against the asymmetric hood pitch range.
pub fn pitch_in_range(params: &Params, pitch_rad: f64) -> bool {
    pitch_rad >= params.pitch_min_rad && pitch_rad <= params.pitch_max_rad
}

/// Classify the first violated limit of a candidate, or `None` if the
/// candidate is feasible.
///
/// Checks run in the same order the sweep applies them: speed, yaw, pitch.
pub fn classify(
    params: &Params,
    speed_mps: f64,
    yaw_rad: f64,
    pitch_rad: f64,
) -> Option<RejectionReason> {
    if !speed_in_range(params, speed_mps) {
        return Some(RejectionReason::SpeedOutOfRange);
    }
    if !yaw_in_range(params, yaw_rad) {
        return Some(RejectionReason::YawOutOfRange);
    }
    if !pitch_in_range(params, pitch_rad) {
        return Some(RejectionReason::PitchOutOfRange);
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_speed_range() {
        let p = Params::default();

        assert!(speed_in_range(&p, p.min_speed_mps));
        assert!(speed_in_range(&p, p.max_speed_mps));
        assert!(!speed_in_range(&p, p.min_speed_mps - 0.01));
        assert!(!speed_in_range(&p, p.max_speed_mps + 0.01));
    }

    #[test]
    fn test_yaw_symmetric() {
        let p = Params::default();

        assert!(yaw_in_range(&p, 0.0));
        assert!(yaw_in_range(&p, p.yaw_limit_rad));
        assert!(yaw_in_range(&p, -p.yaw_limit_rad));
        assert!(!yaw_in_range(&p, p.yaw_limit_rad + 1e-6));
        assert!(!yaw_in_range(&p, -p.yaw_limit_rad - 1e-6));
    }

    #[test]
    fn test_pitch_asymmetric() {
        let mut p = Params::default();
        p.pitch_min_rad = 0.1;
        p.pitch_max_rad = 1.0;

        assert!(pitch_in_range(&p, 0.5));
        assert!(!pitch_in_range(&p, 0.0));
        assert!(!pitch_in_range(&p, 1.1));
    }

    #[test]
    fn test_classify_order() {
        let p = Params::default();

        // Speed violations are reported before yaw or pitch ones
        assert_eq!(
            classify(&p, 100.0, 10.0, 10.0),
            Some(RejectionReason::SpeedOutOfRange)
        );
        assert_eq!(
            classify(&p, 10.0, 10.0, 10.0),
            Some(RejectionReason::YawOutOfRange)
        );
        assert_eq!(
            classify(&p, 10.0, 0.0, -0.5),
            Some(RejectionReason::PitchOutOfRange)
        );
        assert_eq!(classify(&p, 10.0, 0.0, 0.5), None);
    }
}
