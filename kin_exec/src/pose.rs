//! # Poses
//!
//! A [`Pose`] is the unit of spatial state passed between stages of the kinematic chain: a
//! position relative to a tile, and an attitude. A pose's position is meaningless without its
//! tile once distances grow beyond the tile size.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use bitflags::bitflags;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::tile::TileId;
use util::maths::map_pi_to_2pi;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The position and attitude of a point on the assembly.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// The tile the position is expressed in
    pub tile: TileId,

    /// The position relative to the tile's origin
    pub position_m: Vector3<f64>,

    /// The attitude of the assembly. This quaternion rotates vectors from the assembly's body
    /// frame (+X forwards) into the tile frame.
    pub attitude_q: UnitQuaternion<f64>,
}

/// A pose along with the options that were used to calculate it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PoseUpdate {
    pub pose: Pose,
    pub options: PoseOptions,
}

bitflags! {
    /// Flags controlling how the kinematic chain calculates poses.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PoseOptions: u32 {
        /// Use the identity attitude for this calculation.
        const CALCULATE_WITHOUT_ORIENTATION = 1 << 0;

        /// The incoming position is already the pivot point, not the hook point.
        const CALCULATE_FROM_PIVOT_POINT = 1 << 1;

        /// Don't resolve positions into tiles, the caller guarantees they stay in the current
        /// tile.
        const CALCULATE_WITHOUT_TILING = 1 << 2;
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose {
    pub fn new(tile: TileId, position_m: Vector3<f64>, attitude_q: UnitQuaternion<f64>) -> Self {
        Self {
            tile,
            position_m,
            attitude_q,
        }
    }

    /// Return the heading (angle to the positive tile X axis) in radians.
    ///
    /// Heading is given in the range [0, 2*pi), with 0 being in the X direction.
    pub fn get_heading(&self) -> f64 {
        map_pi_to_2pi(self.attitude_q.euler_angles().2)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(TileId::ORIGIN, Vector3::zeros(), UnitQuaternion::identity())
    }
}

impl Default for PoseOptions {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_heading() {
        let mut pose = Pose::default();
        assert_eq!(pose.get_heading(), 0.0);

        pose.attitude_q = UnitQuaternion::from_euler_angles(0.0, 0.0, PI / 2.0);
        assert_relative_eq!(pose.get_heading(), PI / 2.0);

        pose.attitude_q = UnitQuaternion::from_euler_angles(0.0, 0.0, -PI / 2.0);
        assert_relative_eq!(pose.get_heading(), 1.5 * PI);
    }

    #[test]
    fn test_pose_options() {
        let mut options =
            PoseOptions::CALCULATE_FROM_PIVOT_POINT | PoseOptions::CALCULATE_WITHOUT_TILING;

        options.remove(PoseOptions::CALCULATE_FROM_PIVOT_POINT);

        assert_eq!(options, PoseOptions::CALCULATE_WITHOUT_TILING);
        assert!(!options.contains(PoseOptions::CALCULATE_WITHOUT_ORIENTATION));
        assert_eq!(PoseOptions::default(), PoseOptions::empty());
    }
}
