//! # Input events
//!
//! The inputs accepted by the executable, as they appear in input scripts. Each variant maps
//! onto one input of the synchroniser or kinematic chain.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::pose::PoseOptions;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum InputEvent {
    /// Set the offset from the pivot point to the hook point (body frame, meters)
    OffsetHookPoint([f64; 3]),

    /// Set the offset from the pivot point to the tow point (body frame, meters)
    OffsetTowPoint([f64; 3]),

    /// A new world position of the hook point (meters)
    Position([f64; 3]),

    /// A new attitude of the assembly
    Orientation {
        roll_rad: f64,
        pitch_rad: f64,
        yaw_rad: f64,
    },

    /// A new steering angle
    SteeringAngle(f64),

    /// Options used for all following kinematic calculations
    Options {
        #[serde(default)]
        without_orientation: bool,
        #[serde(default)]
        from_pivot_point: bool,
        #[serde(default)]
        without_tiling: bool,
    },

    /// Re-emit the current pose and steering angle
    Resynchronise,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the pose options selected by an `Options` event.
pub fn pose_options(without_orientation: bool, from_pivot_point: bool, without_tiling: bool) -> PoseOptions {
    let mut options = PoseOptions::empty();
    options.set(PoseOptions::CALCULATE_WITHOUT_ORIENTATION, without_orientation);
    options.set(PoseOptions::CALCULATE_FROM_PIVOT_POINT, from_pivot_point);
    options.set(PoseOptions::CALCULATE_WITHOUT_TILING, without_tiling);
    options
}
