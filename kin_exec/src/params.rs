//! Executable parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::{kinematic, plan};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for `kin_exec`, loaded from `kin_exec.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Side length of each tile of the world.
    ///
    /// Units: meters
    #[serde(default = "default_tile_size_m")]
    pub tile_size_m: f64,

    /// Offsets of the kinematic chain
    #[serde(default)]
    pub kinematic: kinematic::Params,

    /// The plan to query, if any
    pub plan: Option<plan::Params>,
}

fn default_tile_size_m() -> f64 {
    100.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_params() {
        let params: Params = util::params::load_str(
            r#"
            tile_size_m = 50.0

            [kinematic]
            offset_hook_point_m = [0.5, 0.0, 0.0]
            offset_tow_point_m = [-2.5, 0.0, 0.0]

            [plan]
            point_a_m = [0.0, 0.0]
            point_b_m = [10.0, 0.0]
            spacing_m = 3.0
            first_pass = -5
            last_pass = 5
            "#,
        )
        .unwrap();

        assert_eq!(params.tile_size_m, 50.0);
        assert_eq!(params.kinematic.offset_tow_point_m, [-2.5, 0.0, 0.0]);
        assert_eq!(params.plan.unwrap().last_pass, 5);

        // Everything but the plan has a default
        let params: Params = util::params::load_str("").unwrap();
        assert_eq!(params.tile_size_m, 100.0);
        assert_eq!(params.kinematic.offset_tow_point_m, [-1.0, 0.0, 0.0]);
        assert!(params.plan.is_none());
    }
}
