//! Implementations for the FireCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Internal
use super::{
    frame, FireCtrlError, FiringSolution, Params, RejectionReason, SolveFailure,
};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Fire control module state
#[derive(Default)]
pub struct FireCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,
    pub(crate) arch_report: Archiver,

    pub(crate) arch_solution: Archiver,
    pub(crate) arch_shots: Archiver,

    /// Rejection categories already warned about in the current sweep.
    pub(crate) warned: HashSet<RejectionReason>,

    pub(crate) output: Option<OutputData>,
}

/// The vehicle's pose and velocity at the instant of solving.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct VehicleMotion {
    /// Position of the vehicle reference point in the world frame.
    ///
    /// Units: meters
    pub position_m_wf: Vector2<f64>,

    /// Heading, the angle from the world +X axis to the vehicle's forward
    /// axis.
    ///
    /// Units: radians
    pub heading_rad: f64,

    /// Velocity in the vehicle frame.
    ///
    /// Units: meters/second
    pub velocity_mps_vf: Vector3<f64>,
}

/// Input data to fire control.
#[derive(Clone, Copy, Debug)]
pub struct InputData {
    /// Position of the target in the world frame, or `None` if no target is
    /// currently designated.
    pub target_pos_m_wf: Option<Vector3<f64>>,

    /// The vehicle's motion state at the instant of solving.
    pub vehicle: VehicleMotion,

    /// Which solver strategy to run this cycle.
    pub strategy: SolverStrategy,
}

/// Output data from one fire control cycle.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct OutputData {
    /// The solution for this cycle, or `None` if there is no target or no
    /// feasible solution. The status report carries the classified reason;
    /// the launcher must not be fired while this is `None`.
    pub solution: Option<FiringSolution>,
}

/// Status report for FireCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Classified failure for this cycle, `None` on success.
    pub failure: Option<SolveFailure>,

    /// The last candidate rejection seen during an intercept sweep.
    pub last_rejection: Option<RejectionReason>,

    /// Number of candidate flight times rejected during the sweep.
    pub candidates_rejected: u32,

    /// True if the drag strategy clamped the elevation estimate into range.
    pub pitch_clamped: bool,

    /// True if the exit speed estimate hit its iteration cap without meeting
    /// the tolerance.
    pub speed_unconverged: bool,

    /// True if the elevation estimate hit its iteration cap without meeting
    /// the tolerance.
    pub angle_unconverged: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Selectable solver strategies.
///
/// The two strategies intentionally differ in their limit policy:
/// `DragCompensated` clamps its answer into range and always succeeds, while
/// `MovingIntercept` rejects infeasible candidates and can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStrategy {
    /// Iterative exit speed and elevation estimate under quadratic drag
    DragCompensated,

    /// Flight time sweep compensating for vehicle motion, drag-free
    MovingIntercept,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for VehicleMotion {
    fn default() -> Self {
        VehicleMotion {
            position_m_wf: Vector2::zeros(),
            heading_rad: 0.0,
            velocity_mps_vf: Vector3::zeros(),
        }
    }
}

impl Default for InputData {
    fn default() -> Self {
        InputData {
            target_pos_m_wf: None,
            vehicle: VehicleMotion::default(),
            strategy: SolverStrategy::MovingIntercept,
        }
    }
}

impl State for FireCtrl {
    type InitData = &'static str;
    type InitError = FireCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = FireCtrlError;

    /// Initialise the FireCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        self.params = params::load(init_data).map_err(FireCtrlError::ParamLoadError)?;

        // Publish the loaded values to the tuning registry, keeping any
        // values the operator has already overridden
        self.params.register_tuning();

        // Create the arch folder for fire_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("fire_ctrl");
        std::fs::create_dir_all(arch_path).unwrap();

        // Initialise the archivers
        self.arch_report = Archiver::from_path(
            session, "fire_ctrl/status_report.csv"
        ).unwrap();
        self.arch_solution = Archiver::from_path(
            session, "fire_ctrl/solutions.csv"
        ).unwrap();
        self.arch_shots = Archiver::from_path(
            session, "fire_ctrl/shot_results.csv"
        ).unwrap();

        Ok(())
    }

    /// Perform cyclic processing of fire control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the per-cycle state
        self.report = StatusReport::default();
        self.warned.clear();

        // Refresh the parameter snapshot from the tuning registry so operator
        // changes made since the last cycle take effect
        self.params = Params::from_tuning();

        // With no designated target there is nothing to solve
        let target_pos_m_wf = match input_data.target_pos_m_wf {
            Some(t) => t,
            None => {
                let output = OutputData { solution: None };
                self.output = Some(output);
                return Ok((output, self.report));
            }
        };

        let solution =
            match self.solve(&target_pos_m_wf, &input_data.vehicle, input_data.strategy) {
                Ok(s) => Some(s),
                Err(failure) => {
                    self.report.failure = Some(failure);
                    None
                }
            };

        trace!("FireCtrl output: {:?}", solution);

        let output = OutputData { solution };
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for FireCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Solutions and shot results are archived as they occur, only the
        // report is written cyclically
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

impl FireCtrl {
    /// Run the selected strategy for a world frame target.
    ///
    /// All strategies work on vehicle frame displacements, so the target is
    /// first transformed using the vehicle's pose.
    pub(crate) fn solve(
        &mut self,
        target_pos_m_wf: &Vector3<f64>,
        vehicle: &VehicleMotion,
        strategy: SolverStrategy,
    ) -> Result<FiringSolution, SolveFailure> {
        let target_m_vf = frame::world_to_vehicle(
            target_pos_m_wf,
            &vehicle.position_m_wf,
            vehicle.heading_rad,
        )?;

        let solution = match strategy {
            SolverStrategy::DragCompensated => self.calc_drag(&target_m_vf),
            SolverStrategy::MovingIntercept => {
                if !frame::finite3(&vehicle.velocity_mps_vf) {
                    return Err(SolveFailure::InvalidInput);
                }

                self.calc_intercept(&target_m_vf, &vehicle.velocity_mps_vf)?
            }
        };

        // Telemetry for the offline tuner, a side effect only
        self.archive_solution(&solution, target_m_vf.x.hypot(target_m_vf.y));

        Ok(solution)
    }

    /// Get the parameter snapshot used by the last cycle.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_proc_without_target() {
        let mut fire_ctrl = FireCtrl::default();

        let (output, report) = fire_ctrl.proc(&InputData::default()).unwrap();

        assert!(output.solution.is_none());
        assert!(report.failure.is_none());
    }

    #[test]
    fn test_proc_non_finite_target_is_invalid_input() {
        let mut fire_ctrl = FireCtrl::default();

        let input = InputData {
            target_pos_m_wf: Some(Vector3::new(f64::NAN, 0.0, 1.5)),
            ..InputData::default()
        };

        let (output, report) = fire_ctrl.proc(&input).unwrap();

        assert!(output.solution.is_none());
        assert_eq!(report.failure, Some(SolveFailure::InvalidInput));
    }

    #[test]
    fn test_proc_non_finite_velocity_is_invalid_input() {
        let mut fire_ctrl = FireCtrl::default();

        let input = InputData {
            target_pos_m_wf: Some(Vector3::new(5.0, 0.0, 1.5)),
            vehicle: VehicleMotion {
                velocity_mps_vf: Vector3::new(f64::INFINITY, 0.0, 0.0),
                ..VehicleMotion::default()
            },
            ..InputData::default()
        };

        let (output, report) = fire_ctrl.proc(&input).unwrap();

        assert!(output.solution.is_none());
        assert_eq!(report.failure, Some(SolveFailure::InvalidInput));
    }

    #[test]
    fn test_proc_solves_in_vehicle_frame() {
        let mut fire_ctrl = FireCtrl::default();

        // Vehicle sits at (10, 10) facing +Y with the target a further 5 m
        // along world +Y: dead ahead in the vehicle frame
        let input = InputData {
            target_pos_m_wf: Some(Vector3::new(10.0, 15.0, 1.5)),
            vehicle: VehicleMotion {
                position_m_wf: Vector2::new(10.0, 10.0),
                heading_rad: std::f64::consts::FRAC_PI_2,
                velocity_mps_vf: Vector3::zeros(),
            },
            strategy: SolverStrategy::MovingIntercept,
        };

        let (output, report) = fire_ctrl.proc(&input).unwrap();

        let solution = output.solution.unwrap();
        assert!(report.failure.is_none());
        assert!(solution.yaw_rad.abs() < 1e-9);
    }

    #[test]
    fn test_report_cleared_between_cycles() {
        let mut fire_ctrl = FireCtrl::default();

        // First cycle fails on every candidate
        let unreachable = InputData {
            target_pos_m_wf: Some(Vector3::new(500.0, 0.0, 0.0)),
            ..InputData::default()
        };
        let (_, report) = fire_ctrl.proc(&unreachable).unwrap();
        assert_eq!(report.failure, Some(SolveFailure::NoFeasibleTime));
        assert!(report.candidates_rejected > 0);

        // Second cycle has no target and must not carry the stale diagnostics
        let (output, report) = fire_ctrl.proc(&InputData::default()).unwrap();
        assert!(output.solution.is_none());
        assert!(report.failure.is_none());
        assert!(report.last_rejection.is_none());
        assert_eq!(report.candidates_rejected, 0);
    }
}
