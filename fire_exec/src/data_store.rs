//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, warn};

use crate::fire_ctrl;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Elapsed scenario time
    pub scenario_time_s: f64,

    /// True while no valid firing solution exists. The launcher must not be
    /// fired while this is set.
    pub fire_inhibited: bool,

    // FireCtrl
    pub fire_ctrl: fire_ctrl::FireCtrl,
    pub fire_ctrl_input: fire_ctrl::InputData,
    pub fire_ctrl_output: Option<fire_ctrl::OutputData>,
    pub fire_ctrl_status_rpt: fire_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Inhibit firing because no valid solution exists this cycle.
    ///
    /// The transition is logged once, with the classified cause if the solver
    /// produced one.
    pub fn inhibit_fire(&mut self, cause: Option<fire_ctrl::SolveFailure>) {
        if !self.fire_inhibited {
            match cause {
                Some(c) => warn!("Firing inhibited: {}", c),
                None => warn!("Firing inhibited: no target designated"),
            }
            self.fire_inhibited = true;
        }
    }

    /// Allow firing again once a valid solution exists.
    pub fn allow_fire(&mut self) {
        if self.fire_inhibited {
            info!("Valid firing solution recovered, firing allowed");
            self.fire_inhibited = false;
        }
    }
}
