//! # Data store
//!
//! Owns the tiles, synchroniser, kinematic chain and plan, and moves data between them. Input
//! events go into the synchroniser, every pose it broadcasts is localised into a tile and run
//! through the kinematic chain, and the resulting tow point is used to query the plan.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use nalgebra::{Point2, UnitQuaternion, Vector3};
use std::{cell::RefCell, rc::Rc};

// Internal
use crate::{
    input::{pose_options, InputEvent},
    kinematic::{FixedKinematic, KinematicPoses},
    params::Params,
    plan::{NearestPrimitive, Plan},
    pose::{Pose, PoseOptions},
    pose_sync::{PoseSynchroniser, SyncedPose},
    tile::{TileError, TileStore},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct DataStore {
    pub pose_sync: PoseSynchroniser,

    /// State driven by the synchroniser's `pose_changed` signal.
    ///
    /// The signal's slot borrows this mutably while the pose runs through the chain, so slots
    /// connected to the kinematic signals must not borrow it again.
    pub chain: Rc<RefCell<ChainState>>,
}

/// Everything downstream of the synchroniser.
pub struct ChainState {
    pub tiles: TileStore,
    pub kinematic: FixedKinematic,

    /// The plan to query with the tow point, if one is loaded
    pub plan: Option<Plan>,

    /// Options used for every kinematic calculation
    pub pose_options: PoseOptions,

    /// Poses from the most recent kinematic calculation
    pub last_poses: Option<KinematicPoses>,

    /// The most recent plan query result
    pub last_nearest: Option<NearestPrimitive>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DataStore {
    pub fn new(params: &Params) -> Result<Self, TileError> {
        let chain = Rc::new(RefCell::new(ChainState::new(params)?));

        // Each synchronised pose runs through the chain before the synchroniser carries on, so
        // the kinematic signals fire ahead of anything it emits afterwards
        let mut pose_sync = PoseSynchroniser::new();
        let slot_chain = chain.clone();
        pose_sync
            .pose_changed
            .connect(move |pose| slot_chain.borrow_mut().process(pose));

        Ok(Self { pose_sync, chain })
    }

    /// Execute an input event.
    pub fn exec(&mut self, event: &InputEvent) {
        match event {
            InputEvent::OffsetHookPoint(offset_m) => {
                debug!("Hook point offset set to {:?}", offset_m);
                self.chain
                    .borrow_mut()
                    .kinematic
                    .set_offset_hook_point_position(Vector3::from(*offset_m));
            }
            InputEvent::OffsetTowPoint(offset_m) => {
                debug!("Tow point offset set to {:?}", offset_m);
                self.chain
                    .borrow_mut()
                    .kinematic
                    .set_offset_tow_point_position(Vector3::from(*offset_m));
            }
            InputEvent::Position(position_m) => {
                self.pose_sync.set_position(Vector3::from(*position_m));
            }
            InputEvent::Orientation {
                roll_rad,
                pitch_rad,
                yaw_rad,
            } => {
                self.pose_sync.set_orientation(UnitQuaternion::from_euler_angles(
                    *roll_rad, *pitch_rad, *yaw_rad,
                ));
            }
            InputEvent::SteeringAngle(angle_rad) => {
                self.pose_sync.set_steering_angle(*angle_rad);
            }
            InputEvent::Options {
                without_orientation,
                from_pivot_point,
                without_tiling,
            } => {
                let options = pose_options(*without_orientation, *from_pivot_point, *without_tiling);
                info!("Pose options set to {:?}", options);
                self.chain.borrow_mut().pose_options = options;
            }
            InputEvent::Resynchronise => {
                debug!("Resynchronising pose");
                self.pose_sync.resynchronise();
            }
        }
    }

    /// Poses from the most recent kinematic calculation.
    pub fn last_poses(&self) -> Option<KinematicPoses> {
        self.chain.borrow().last_poses
    }

    /// The most recent plan query result.
    pub fn last_nearest(&self) -> Option<NearestPrimitive> {
        self.chain.borrow().last_nearest
    }
}

impl ChainState {
    pub fn new(params: &Params) -> Result<Self, TileError> {
        Ok(Self {
            tiles: TileStore::new(params.tile_size_m)?,
            kinematic: FixedKinematic::from_params(&params.kinematic),
            plan: params.plan.as_ref().map(Plan::from_params),
            pose_options: PoseOptions::empty(),
            last_poses: None,
            last_nearest: None,
        })
    }

    /// Run a synchronised world pose through the kinematic chain and query the plan with the
    /// resulting tow point.
    pub fn process(&mut self, synced: &SyncedPose) {
        let (tile, position_m) = self.tiles.localise(synced.position_m);
        let pose = Pose::new(tile, position_m, synced.attitude_q);

        let poses = self
            .kinematic
            .set_pose(&mut self.tiles, &pose, self.pose_options);

        if let Some(ref plan) = self.plan {
            // The plan is in world coordinates
            let tow_m = self.tiles.world_position(poses.tow.tile, &poses.tow.position_m);
            let nearest = plan.nearest_primitive(&Point2::from(tow_m.xy()));

            debug!(
                "Nearest primitive to tow point: {:?} at {:.3} m",
                nearest.index,
                nearest.distance_squared_m2.sqrt()
            );

            self.last_nearest = Some(nearest);
        }

        self.last_poses = Some(poses);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
