//! Plan parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters describing a plan of parallel passes either side of an AB line.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// First point defining the reference (AB) line.
    ///
    /// Units: meters,
    /// Frame: World
    pub point_a_m: [f64; 2],

    /// Second point defining the reference (AB) line.
    ///
    /// Units: meters,
    /// Frame: World
    pub point_b_m: [f64; 2],

    /// Distance between neighbouring passes, usually the implement width.
    ///
    /// Units: meters
    pub spacing_m: f64,

    /// Index of the first pass, negative passes are to the right of the AB line.
    pub first_pass: i32,

    /// Index of the last pass.
    pub last_pass: i32,
}
