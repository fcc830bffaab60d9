//! # Kinematic chain module
//!
//! The towed assembly is described by three reference points:
//!
//! - the **hook point**, where the towing vehicle couples to the assembly,
//! - the **pivot point**, the rotation centre of the assembly, offset from the hook point,
//! - the **tow point**, the reference point of the trailing implement, offset from the pivot.
//!
//! [`FixedKinematic`] takes one measured pose and produces the poses of all three points. Both
//! offsets are fixed vectors in the assembly's body frame, where +X is forwards. An implement
//! trailing its pivot therefore has a negative X offset.
//!
//! The calculation is done by [`FixedKinematic::compute_poses`], which returns all three poses
//! together. [`FixedKinematic::set_pose`] performs the same calculation and also emits each pose
//! on its own signal, hook point first, for subscribers interested in only one of them.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod fixed;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use fixed::*;
pub use params::Params;

use crate::pose::{Pose, PoseOptions};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The poses of the three reference points of the assembly, calculated from one input pose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KinematicPoses {
    /// Pose of the hook point, a relabelling of the input pose
    pub hook: Pose,

    /// Pose of the pivot point
    pub pivot: Pose,

    /// Pose of the tow point
    pub tow: Pose,

    /// The options forwarded to consumers of the poses. `CALCULATE_FROM_PIVOT_POINT` is always
    /// cleared since every pose has been resolved to its own point.
    pub options: PoseOptions,
}
