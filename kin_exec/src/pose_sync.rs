//! # Pose synchroniser
//!
//! Merges position, orientation and steering angle updates arriving independently into one
//! consistent pose.
//!
//! Position is the authoritative trigger: each new position is immediately broadcast together
//! with the last known orientation. Orientation updates are only cached and get folded into the
//! next position broadcast, so a position and orientation taken from the same navigation fix
//! cause a single downstream recalculation rather than two. Steering angle updates are broadcast
//! on their own signal straight away.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use nalgebra::{UnitQuaternion, Vector3};

use crate::signal::Signal;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A position and orientation broadcast by the synchroniser.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SyncedPose {
    pub position_m: Vector3<f64>,
    pub attitude_q: UnitQuaternion<f64>,
}

/// Caches the latest position, orientation and steering angle.
pub struct PoseSynchroniser {
    position_m: Vector3<f64>,
    attitude_q: UnitQuaternion<f64>,
    steering_angle_rad: f64,

    /// Emitted on every position update and on resynchronisation
    pub pose_changed: Signal<SyncedPose>,

    /// Emitted on every steering angle update and on resynchronisation
    pub steering_angle_changed: Signal<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PoseSynchroniser {
    /// Create a new synchroniser at the origin with the identity attitude and zero steering.
    pub fn new() -> Self {
        Self {
            position_m: Vector3::zeros(),
            attitude_q: UnitQuaternion::identity(),
            steering_angle_rad: 0.0,
            pose_changed: Signal::new(),
            steering_angle_changed: Signal::new(),
        }
    }

    /// Store a new position and broadcast it with the last known orientation.
    pub fn set_position(&mut self, position_m: Vector3<f64>) {
        self.position_m = position_m;

        let pose = self.pose();
        trace!("Synchronised pose: {:?}", pose);
        self.pose_changed.emit(&pose);
    }

    /// Store a new orientation. Nothing is emitted until the next position update.
    pub fn set_orientation(&mut self, attitude_q: UnitQuaternion<f64>) {
        self.attitude_q = attitude_q;
    }

    /// Store a new steering angle and broadcast it.
    pub fn set_steering_angle(&mut self, steering_angle_rad: f64) {
        self.steering_angle_rad = steering_angle_rad;
        self.steering_angle_changed.emit(&steering_angle_rad);
    }

    /// Re-emit the current pose and steering angle without changing them.
    ///
    /// Used to bring newly connected subscribers up to date.
    pub fn resynchronise(&mut self) {
        let pose = self.pose();
        self.pose_changed.emit(&pose);
        self.steering_angle_changed.emit(&self.steering_angle_rad);
    }

    /// The currently stored pose.
    pub fn pose(&self) -> SyncedPose {
        SyncedPose {
            position_m: self.position_m,
            attitude_q: self.attitude_q,
        }
    }

    /// The currently stored steering angle.
    pub fn steering_angle_rad(&self) -> f64 {
        self.steering_angle_rad
    }
}

impl Default for PoseSynchroniser {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
