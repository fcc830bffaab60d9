//! Kinematic chain parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the fixed kinematic chain.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Offset from the pivot point to the hook point.
    ///
    /// Units: meters,
    /// Frame: Assembly body (+X forwards)
    pub offset_hook_point_m: [f64; 3],

    /// Offset from the pivot point to the tow point.
    ///
    /// Units: meters,
    /// Frame: Assembly body (+X forwards)
    pub offset_tow_point_m: [f64; 3],
}

impl Default for Params {
    fn default() -> Self {
        Self {
            offset_hook_point_m: [0.0, 0.0, 0.0],
            offset_tow_point_m: [-1.0, 0.0, 0.0],
        }
    }
}
