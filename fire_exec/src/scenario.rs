//! Bench scenario definitions
//!
//! A scenario stands in for the perception and drivetrain stack when running
//! the executable on the bench: it fixes the target's world position and the
//! vehicle's starting pose and velocity, which the main loop then propagates
//! at constant velocity for the scenario's duration.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Vector2, Vector3};
use serde::Deserialize;
use std::fs::read_to_string;
use thiserror::Error;

// Internal
use crate::fire_ctrl::SolverStrategy;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A bench scenario, loaded from a TOML file given on the command line.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Total scenario duration.
    ///
    /// Units: seconds
    pub duration_s: f64,

    /// Solver strategy to run for the whole scenario.
    pub strategy: SolverStrategy,

    /// Target position in the world frame.
    ///
    /// Units: meters
    pub target_pos_m_wf: [f64; 3],

    /// Vehicle start position in the world frame.
    ///
    /// Units: meters
    pub vehicle_start_m_wf: [f64; 2],

    /// Vehicle heading, fixed for the scenario.
    ///
    /// Units: radians
    pub vehicle_heading_rad: f64,

    /// Vehicle velocity in the vehicle frame.
    ///
    /// Units: meters/second
    pub vehicle_vel_mps_vf: [f64; 3],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs while loading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Cannot load the scenario file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the scenario file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scenario {
    /// Load a scenario from the given TOML file path.
    pub fn from_file(path: &str) -> Result<Self, ScenarioError> {
        let scenario_str = match read_to_string(path) {
            Ok(s) => s,
            Err(e) => return Err(ScenarioError::FileLoadError(e)),
        };

        match toml::from_str(scenario_str.as_str()) {
            Ok(s) => Ok(s),
            Err(e) => Err(ScenarioError::DeserialiseError(e)),
        }
    }

    pub fn target_pos(&self) -> Vector3<f64> {
        Vector3::from_row_slice(&self.target_pos_m_wf)
    }

    pub fn vehicle_start(&self) -> Vector2<f64> {
        Vector2::from_row_slice(&self.vehicle_start_m_wf)
    }

    pub fn vehicle_vel(&self) -> Vector3<f64> {
        Vector3::from_row_slice(&self.vehicle_vel_mps_vf)
    }
}
