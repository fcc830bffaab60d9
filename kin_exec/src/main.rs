//! Kinematic chain executable entry point.
//!
//! # Architecture
//!
//! The executable replays an input script through the kinematic chain:
//!
//!     - Initialise the session, logger, parameters and data store
//!     - Connect archivers to the hook, pivot and tow point signals
//!     - Main loop, stepping simulated time by one cycle period:
//!         - Execute all input events which have become due
//!         - Stop at the end of the script
//!     - Summarise the final state
//!
//! Script time is simulated rather than waited out, so a long recording replays as fast as it can
//! be processed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::{cell::Cell, env, rc::Rc};

// Internal
use kin_lib::{
    data_store::{ChainState, DataStore},
    input::InputEvent,
    params::Params,
    pose::PoseUpdate,
    signal::Signal,
    tile::TileStore,
};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    script_interpreter::{Pending, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Simulated period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single row of a pose archive.
#[derive(Serialize)]
struct PoseRecord {
    time_s: f64,
    tile_x: i64,
    tile_y: i64,
    x_m: f64,
    y_m: f64,
    z_m: f64,
    heading_rad: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("kin_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger, the tile store is noisy at trace level
    logger_init(
        LevelFilter::Trace,
        &[("kin_lib::tile", LevelFilter::Debug)],
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    info!("Tow Assembly Kinematic Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: Params =
        util::params::load("kin_exec.toml").wrap_err("Could not load kin_exec params")?;

    info!("Exec parameters loaded");
    debug!("{:#?}", params);

    // ---- LOAD SCRIPT ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let script_path = script_path(&args)?;

    info!("Loading script from \"{}\"", script_path);

    let mut script: ScriptInterpreter<InputEvent> =
        ScriptInterpreter::new(script_path).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} inputs\n",
        script.get_duration(),
        script.get_num_cmds()
    );

    // ---- INITIALISE DATASTORE ----

    let mut ds = DataStore::new(&params).wrap_err("Failed to initialise the data store")?;

    // Shared with the archive slots so records carry script time
    let sim_time_s = Rc::new(Cell::new(0.0));

    {
        let mut chain = ds.chain.borrow_mut();

        connect_archive(
            &mut chain.kinematic.pose_hook_point_changed,
            &session,
            "hook_point.csv",
            &sim_time_s,
        )
        .wrap_err("Failed to create the hook point archive")?;
        connect_archive(
            &mut chain.kinematic.pose_pivot_point_changed,
            &session,
            "pivot_point.csv",
            &sim_time_s,
        )
        .wrap_err("Failed to create the pivot point archive")?;
        connect_archive(
            &mut chain.kinematic.pose_tow_point_changed,
            &session,
            "tow_point.csv",
            &sim_time_s,
        )
        .wrap_err("Failed to create the tow point archive")?;
    }

    ds.pose_sync
        .steering_angle_changed
        .connect(|angle_rad| info!("Steering angle: {:.4} rad", angle_rad));

    info!("Data store initialised");

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let mut num_cycles: u64 = 0;
    let mut num_inputs: usize = 0;

    loop {
        let time_s = num_cycles as f64 * CYCLE_PERIOD_S;
        sim_time_s.set(time_s);

        match script.get_pending(time_s) {
            Pending::None => (),
            Pending::Some(events) => {
                for event in events.iter() {
                    debug!("[{:.02} s] {:?}", time_s, event);
                    ds.exec(event);
                }
                num_inputs += events.len();
            }
            Pending::EndOfScript => {
                info!("End of script reached");
                break;
            }
        }

        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    summarise(&ds.chain.borrow(), num_cycles, num_inputs);

    info!("End of execution");

    Ok(())
}

/// Get the script path from the command line, which must be the only argument.
fn script_path(args: &[String]) -> Result<&str, Report> {
    match args {
        [_, path] => Ok(path.as_str()),
        _ => Err(eyre!(
            "Expected the path to an input script as the only argument, found {} arguments",
            args.len().saturating_sub(1)
        )),
    }
}

/// Connect an archive writing every pose emitted on `signal` to the given file in the session.
fn connect_archive(
    signal: &mut Signal<PoseUpdate>,
    session: &Session,
    path: &str,
    sim_time_s: &Rc<Cell<f64>>,
) -> Result<(), util::archive::ArchiveError> {
    let mut archiver = Archiver::from_path(session, path)?;
    let sim_time_s = sim_time_s.clone();
    let path = path.to_string();

    signal.connect(move |update| {
        let pose = &update.pose;
        let record = PoseRecord {
            time_s: sim_time_s.get(),
            tile_x: pose.tile.x,
            tile_y: pose.tile.y,
            x_m: pose.position_m.x,
            y_m: pose.position_m.y,
            z_m: pose.position_m.z,
            heading_rad: pose.get_heading(),
        };

        if let Err(e) = archiver.serialise(record) {
            warn!("Could not write to {}: {}", path, e);
        }
    });

    Ok(())
}

/// Log the final state of the chain.
fn summarise(chain: &ChainState, num_cycles: u64, num_inputs: usize) {
    info!(
        "Processed {} inputs over {} cycles ({:.02} s)",
        num_inputs,
        num_cycles,
        num_cycles as f64 * CYCLE_PERIOD_S
    );
    log_tiles(&chain.tiles);

    match chain.last_poses {
        Some(ref poses) => {
            let tow_m = chain.tiles.world_position(poses.tow.tile, &poses.tow.position_m);
            info!(
                "Final tow point: ({:.3}, {:.3}, {:.3}) m in the world, heading {:.4} rad",
                tow_m.x,
                tow_m.y,
                tow_m.z,
                poses.tow.get_heading()
            );
        }
        None => warn!("No poses were calculated, the script contained no positions"),
    }

    if let Some(nearest) = chain.last_nearest {
        match nearest.index {
            Some(i) => info!(
                "Final nearest primitive: {} at {:.3} m",
                i,
                nearest.distance_squared_m2.sqrt()
            ),
            None => info!("The plan contains no primitives"),
        }
    }
}

fn log_tiles(tiles: &TileStore) {
    info!("{} tiles of {} m in use", tiles.num_tiles(), tiles.size_m());
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_script_path() {
        let args = vec!["kin_exec".to_string(), "scripts/headland_turn.tks".to_string()];
        assert_eq!(script_path(&args).unwrap(), "scripts/headland_turn.tks");

        assert!(script_path(&args[..1]).is_err());
        assert!(script_path(&[]).is_err());
    }
}
