//! Main fire control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and modules
//!     - Load the bench scenario given on the command line
//!     - Main loop (fixed 20 ms cycle):
//!         - Propagate the vehicle pose at the scenario velocity
//!         - Run fire control with a fresh tuning snapshot
//!         - Update the firing inhibit flag from the outcome
//!         - Write telemetry archives
//!
//! On the vehicle the scenario inputs are replaced by the perception and
//! drivetrain stacks; fire control itself is unchanged.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use fire_lib::{data_store::DataStore, fire_ctrl, scenario::Scenario};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use nalgebra::{Rotation2, Vector2};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
    tuning,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

/// Limit on the number of consecutive cycle overruns before the run is
/// aborted.
const MAX_CYCLE_OVERRUN_LIMIT: u64 = 50;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("fire_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Talos Fire Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD SCENARIO ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let scenario = match args.len() {
        2 => Scenario::from_file(&args[1]).wrap_err("Failed to load scenario")?,
        n => {
            return Err(eyre!(
                "Expected exactly one argument (the scenario file), found {}",
                n - 1
            ))
        }
    };

    info!(
        "Scenario loaded: {:?} strategy, {:.1} s duration\n",
        scenario.strategy, scenario.duration_s
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.fire_ctrl
        .init("fire_ctrl.toml", &session)
        .wrap_err("Failed to initialise FireCtrl")?;
    info!("FireCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- SETUP VEHICLE PROPAGATION ----

    let mut vehicle_pos_m_wf = scenario.vehicle_start();
    let heading_rad = scenario.vehicle_heading_rad;
    let vehicle_vel_mps_vf = scenario.vehicle_vel();

    // World frame horizontal velocity of the vehicle, used to propagate the
    // pose each cycle
    let vehicle_vel_mps_wf = Rotation2::new(heading_rad)
        * Vector2::new(vehicle_vel_mps_vf.x, vehicle_vel_mps_vf.y);

    // ---- MAIN LOOP ----

    info!("Begin cyclic processing\n");

    while ds.scenario_time_s < scenario.duration_s {
        let cycle_start = Instant::now();

        ds.is_1_hz_cycle = ds.num_cycles % (CYCLE_FREQUENCY_HZ as u128) == 0;

        // ---- FIRE CONTROL PROCESSING ----

        ds.fire_ctrl_input = fire_ctrl::InputData {
            target_pos_m_wf: Some(scenario.target_pos()),
            vehicle: fire_ctrl::VehicleMotion {
                position_m_wf: vehicle_pos_m_wf,
                heading_rad,
                velocity_mps_vf: vehicle_vel_mps_vf,
            },
            strategy: scenario.strategy,
        };

        let (output, report) = ds
            .fire_ctrl
            .proc(&ds.fire_ctrl_input)
            .wrap_err("FireCtrl processing failed")?;

        ds.fire_ctrl_output = Some(output);
        ds.fire_ctrl_status_rpt = report;

        // ---- OUTCOME HANDLING ----

        // The launcher must never fire on a missing solution, downstream this
        // flag gates the feed mechanism
        match output.solution {
            Some(solution) => {
                ds.allow_fire();

                if ds.is_1_hz_cycle {
                    info!(
                        "Solution: yaw {:6.2} deg, pitch {:5.2} deg, speed {:5.2} m/s \
                        ({:4.0} rpm)",
                        solution.yaw_rad.to_degrees(),
                        solution.pitch_rad.to_degrees(),
                        solution.speed_mps,
                        solution.wheel_rpm()
                    );
                }
            }
            None => ds.inhibit_fire(report.failure),
        }

        // ---- ARCHIVING ----

        if let Err(e) = ds.fire_ctrl.write() {
            warn!("Could not write FireCtrl archives: {}", e);
        }

        // ---- VEHICLE PROPAGATION ----

        vehicle_pos_m_wf += vehicle_vel_mps_wf * CYCLE_PERIOD_S;

        // ---- CYCLE MANAGEMENT ----

        ds.num_cycles += 1;
        ds.scenario_time_s += CYCLE_PERIOD_S;

        let cycle_elapsed_s = cycle_start.elapsed().as_secs_f64();

        if cycle_elapsed_s < CYCLE_PERIOD_S {
            ds.num_consec_cycle_overruns = 0;
            thread::sleep(Duration::from_secs_f64(CYCLE_PERIOD_S - cycle_elapsed_s));
        } else {
            warn!(
                "Cycle overran by {:.3} ms",
                (cycle_elapsed_s - CYCLE_PERIOD_S) * 1e3
            );
            ds.num_consec_cycle_overruns += 1;

            if ds.num_consec_cycle_overruns > MAX_CYCLE_OVERRUN_LIMIT {
                return Err(eyre!("Maximum number of consecutive cycle overruns exceeded"));
            }
        }
    }

    // ---- SHUTDOWN ----

    info!(
        "Scenario complete after {} cycles ({:.1} s)",
        ds.num_cycles, ds.scenario_time_s
    );

    // Save the final parameter and tuning state so the session can be
    // correlated with the archives offline
    session.save("fire_ctrl/params_final.json", *ds.fire_ctrl.params());
    session.save("fire_ctrl/tuning_final.json", tuning::snapshot());

    session.exit();

    Ok(())
}
