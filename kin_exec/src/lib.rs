//! # Tow kinematics library.
//!
//! Computes the poses of a towed assembly from a single measured pose and
//! answers nearest-primitive queries against a planned path. Positions are
//! kept small by expressing them relative to fixed-size tiles of the world.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - owns the modules and wires the synchroniser into the kinematic chain
pub mod data_store;

/// Input events - the commands which can appear in an input script
pub mod input;

/// Kinematic chain - expands one pose into the hook, pivot and tow point poses
pub mod kinematic;

/// Executable parameters
pub mod params;

/// Plan - a path made of primitives supporting nearest primitive queries
pub mod plan;

/// Pose types and pose calculation options
pub mod pose;

/// Pose synchroniser - merges position, orientation and steering updates
pub mod pose_sync;

/// Signals - synchronous event delivery to subscribers
pub mod signal;

/// Tiles - local coordinate frames partitioning the world
pub mod tile;
