//! Fixed kinematic chain implementation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{UnitQuaternion, Vector3};

// Internal
use super::{KinematicPoses, Params};
use crate::{
    pose::{Pose, PoseOptions, PoseUpdate},
    signal::Signal,
    tile::TileResolver,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A rigid assembly whose hook, pivot and tow points are separated by fixed offsets.
pub struct FixedKinematic {
    /// Offset from the pivot point to the hook point in the body frame. Defined in the normal
    /// way, +X is forwards.
    offset_hook_point_m: Vector3<f64>,

    /// Offset from the pivot point to the tow point in the body frame. A trailing implement
    /// has a negative X component.
    offset_tow_point_m: Vector3<f64>,

    /// Emitted with the hook point pose on every `set_pose`
    pub pose_hook_point_changed: Signal<PoseUpdate>,

    /// Emitted with the pivot point pose on every `set_pose`
    pub pose_pivot_point_changed: Signal<PoseUpdate>,

    /// Emitted with the tow point pose on every `set_pose`
    pub pose_tow_point_changed: Signal<PoseUpdate>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FixedKinematic {
    /// Create a new chain with the hook point on the pivot and the tow point 1 m behind it.
    pub fn new() -> Self {
        Self::from_params(&Params::default())
    }

    /// Create a new chain with the offsets given in the parameters.
    pub fn from_params(params: &Params) -> Self {
        Self {
            offset_hook_point_m: Vector3::from(params.offset_hook_point_m),
            offset_tow_point_m: Vector3::from(params.offset_tow_point_m),
            pose_hook_point_changed: Signal::new(),
            pose_pivot_point_changed: Signal::new(),
            pose_tow_point_changed: Signal::new(),
        }
    }

    pub fn set_offset_hook_point_position(&mut self, offset_m: Vector3<f64>) {
        self.offset_hook_point_m = offset_m;
    }

    pub fn set_offset_tow_point_position(&mut self, offset_m: Vector3<f64>) {
        self.offset_tow_point_m = offset_m;
    }

    pub fn offset_hook_point_m(&self) -> Vector3<f64> {
        self.offset_hook_point_m
    }

    pub fn offset_tow_point_m(&self) -> Vector3<f64> {
        self.offset_tow_point_m
    }

    /// Calculate the poses of the hook, pivot and tow points from the given pose.
    ///
    /// The input pose is the hook point, unless `CALCULATE_FROM_PIVOT_POINT` is set in which
    /// case it is the pivot point. Pivot and tow positions are resolved into the tiles containing
    /// them using `tiles`, unless `CALCULATE_WITHOUT_TILING` is set.
    ///
    /// With `CALCULATE_WITHOUT_ORIENTATION` the identity attitude replaces the input attitude,
    /// both for the offsets and in all three output poses.
    ///
    /// Attitudes are not validated, a non-unit quaternion produces meaningless positions.
    pub fn compute_poses<R>(
        &self,
        tiles: &mut R,
        pose: &Pose,
        options: PoseOptions,
    ) -> KinematicPoses
    where
        R: TileResolver + ?Sized,
    {
        debug_assert!(
            pose.attitude_q.coords.iter().all(|c| c.is_finite()),
            "Non-finite attitude passed to the kinematic chain"
        );

        let mut options = options;

        let attitude_q = if options.contains(PoseOptions::CALCULATE_WITHOUT_ORIENTATION) {
            UnitQuaternion::identity()
        } else {
            pose.attitude_q
        };

        // Back-transform the measured hook point to the pivot point
        let mut position_pivot_m = pose.position_m;
        if !options.contains(PoseOptions::CALCULATE_FROM_PIVOT_POINT) {
            position_pivot_m += attitude_q * (-self.offset_hook_point_m);
        }
        options.remove(PoseOptions::CALCULATE_FROM_PIVOT_POINT);

        let tiling = !options.contains(PoseOptions::CALCULATE_WITHOUT_TILING);

        let hook = Pose::new(pose.tile, pose.position_m, attitude_q);

        let (tile_pivot, position_pivot_m) = if tiling {
            tiles.resolve(pose.tile, position_pivot_m)
        } else {
            (pose.tile, position_pivot_m)
        };
        let pivot = Pose::new(tile_pivot, position_pivot_m, attitude_q);

        // The tow point is resolved starting from the pivot's tile, which is already the closer
        // of the two to it
        let position_tow_m = position_pivot_m + attitude_q * self.offset_tow_point_m;
        let (tile_tow, position_tow_m) = if tiling {
            tiles.resolve(tile_pivot, position_tow_m)
        } else {
            (pose.tile, position_tow_m)
        };
        let tow = Pose::new(tile_tow, position_tow_m, attitude_q);

        KinematicPoses {
            hook,
            pivot,
            tow,
            options,
        }
    }

    /// Calculate the poses from the given pose and emit them on the hook, pivot and tow point
    /// signals, in that order.
    ///
    /// The calculated poses are also returned.
    pub fn set_pose<R>(&mut self, tiles: &mut R, pose: &Pose, options: PoseOptions) -> KinematicPoses
    where
        R: TileResolver + ?Sized,
    {
        let poses = self.compute_poses(tiles, pose, options);

        trace!(
            "Kinematic poses: hook {:?} in ({}, {}), pivot {:?} in ({}, {}), tow {:?} in ({}, {})",
            poses.hook.position_m.as_slice(), poses.hook.tile.x, poses.hook.tile.y,
            poses.pivot.position_m.as_slice(), poses.pivot.tile.x, poses.pivot.tile.y,
            poses.tow.position_m.as_slice(), poses.tow.tile.x, poses.tow.tile.y
        );

        self.pose_hook_point_changed.emit(&PoseUpdate {
            pose: poses.hook,
            options: poses.options,
        });
        self.pose_pivot_point_changed.emit(&PoseUpdate {
            pose: poses.pivot,
            options: poses.options,
        });
        self.pose_tow_point_changed.emit(&PoseUpdate {
            pose: poses.tow,
            options: poses.options,
        });

        poses
    }
}

impl Default for FixedKinematic {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::tile::{TileId, TileStore};
    use approx::assert_relative_eq;
    use std::{cell::RefCell, f64::consts::PI, rc::Rc};

    /// Resolver which records every call and never moves positions between tiles.
    struct RecordingResolver {
        calls: Vec<(TileId, Vector3<f64>)>,
    }

    impl TileResolver for RecordingResolver {
        fn resolve(&mut self, tile: TileId, local_position_m: Vector3<f64>) -> (TileId, Vector3<f64>) {
            self.calls.push((tile, local_position_m));
            (tile, local_position_m)
        }
    }

    fn yaw(angle_rad: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, angle_rad)
    }

    fn chain(hook: [f64; 3], tow: [f64; 3]) -> FixedKinematic {
        FixedKinematic::from_params(&Params {
            offset_hook_point_m: hook,
            offset_tow_point_m: tow,
        })
    }

    #[test]
    fn test_straight_ahead() {
        let kin = FixedKinematic::new();
        let mut tiles = TileStore::new(100.0).unwrap();

        let pose = Pose::new(TileId::ORIGIN, Vector3::new(5.0, 0.0, 0.0), UnitQuaternion::identity());
        let poses = kin.compute_poses(&mut tiles, &pose, PoseOptions::empty());

        assert_eq!(poses.hook, pose);
        assert_relative_eq!(poses.pivot.position_m, Vector3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(poses.tow.position_m, Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(poses.tow.tile, TileId::ORIGIN);
    }

    #[test]
    fn test_yawed_ninety_degrees() {
        let kin = FixedKinematic::new();
        let mut resolver = RecordingResolver { calls: Vec::new() };

        // Yaw is positive anticlockwise about +Z, so facing +Y puts the trailing tow point on the
        // -Y side of the pivot
        let pose = Pose::new(TileId::ORIGIN, Vector3::new(5.0, 0.0, 0.0), yaw(PI / 2.0));
        let poses = kin.compute_poses(&mut resolver, &pose, PoseOptions::empty());

        assert_relative_eq!(poses.pivot.position_m, Vector3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(poses.tow.position_m, Vector3::new(5.0, -1.0, 0.0), epsilon = 1e-12);
        assert_eq!(poses.tow.attitude_q, pose.attitude_q);
    }

    #[test]
    fn test_offsets_follow_attitude() {
        let kin = chain([1.5, 0.2, 0.0], [-3.0, 0.5, 0.1]);
        let mut resolver = RecordingResolver { calls: Vec::new() };

        let q = UnitQuaternion::from_euler_angles(0.1, -0.05, 2.3);
        let p = Vector3::new(20.0, 30.0, 1.0);
        let pose = Pose::new(TileId::new(4, -2), p, q);

        let poses = kin.compute_poses(&mut resolver, &pose, PoseOptions::empty());

        let pivot = p + q * -Vector3::new(1.5, 0.2, 0.0);
        let tow = pivot + q * Vector3::new(-3.0, 0.5, 0.1);

        assert_relative_eq!(poses.pivot.position_m, pivot, epsilon = 1e-12);
        assert_relative_eq!(poses.tow.position_m, tow, epsilon = 1e-12);

        // Pivot resolved from the input tile, tow from the pivot's tile
        assert_eq!(resolver.calls.len(), 2);
        assert_eq!(resolver.calls[0].0, TileId::new(4, -2));
        assert_relative_eq!(resolver.calls[0].1, pivot, epsilon = 1e-12);
        assert_eq!(resolver.calls[1].0, poses.pivot.tile);
    }

    #[test]
    fn test_from_pivot_point() {
        let kin = chain([2.0, 0.0, 0.0], [-1.0, 0.0, 0.0]);
        let mut tiles = TileStore::new(100.0).unwrap();

        let q = yaw(0.7);
        let p = Vector3::new(50.0, 50.0, 0.0);
        let pose = Pose::new(TileId::ORIGIN, p, q);

        let options = PoseOptions::CALCULATE_FROM_PIVOT_POINT;
        let poses = kin.compute_poses(&mut tiles, &pose, options);

        // The input is used exactly as the pivot point
        assert_eq!(poses.pivot.position_m, p);
        assert_relative_eq!(poses.tow.position_m, p + q * Vector3::new(-1.0, 0.0, 0.0));

        // The flag is resolved, so it is not forwarded
        assert!(!poses.options.contains(PoseOptions::CALCULATE_FROM_PIVOT_POINT));
    }

    #[test]
    fn test_without_orientation() {
        let kin = chain([2.0, 0.0, 0.0], [-1.0, 1.0, 0.0]);
        let mut tiles = TileStore::new(100.0).unwrap();

        let pose = Pose::new(TileId::ORIGIN, Vector3::new(50.0, 50.0, 0.0), yaw(1.2));
        let options = PoseOptions::CALCULATE_WITHOUT_ORIENTATION;
        let poses = kin.compute_poses(&mut tiles, &pose, options);

        assert_relative_eq!(poses.pivot.position_m, Vector3::new(48.0, 50.0, 0.0));
        assert_relative_eq!(poses.tow.position_m, Vector3::new(47.0, 51.0, 0.0));

        // The identity attitude is what gets passed on
        for out in [poses.hook, poses.pivot, poses.tow].iter() {
            assert_eq!(out.attitude_q, UnitQuaternion::identity());
        }
        assert_eq!(poses.hook.position_m, pose.position_m);
        assert_eq!(poses.options, options);
    }

    #[test]
    fn test_without_tiling() {
        let kin = FixedKinematic::new();
        let mut resolver = RecordingResolver { calls: Vec::new() };

        // Tow point falls outside the tile but must not be resolved
        let pose = Pose::new(TileId::new(1, 1), Vector3::new(0.5, 10.0, 0.0), UnitQuaternion::identity());
        let options = PoseOptions::CALCULATE_WITHOUT_TILING | PoseOptions::CALCULATE_FROM_PIVOT_POINT;
        let poses = kin.compute_poses(&mut resolver, &pose, options);

        assert!(resolver.calls.is_empty());
        assert_eq!(poses.pivot.tile, TileId::new(1, 1));
        assert_eq!(poses.tow.tile, TileId::new(1, 1));
        assert_relative_eq!(poses.tow.position_m, Vector3::new(-0.5, 10.0, 0.0));
        assert_eq!(poses.options, PoseOptions::CALCULATE_WITHOUT_TILING);
    }

    #[test]
    fn test_tile_boundary_crossing() {
        let kin = chain([1.0, 0.0, 0.0], [-2.0, 0.0, 0.0]);
        let mut tiles = TileStore::new(10.0).unwrap();

        // Hook point just inside tile (1, 0), pivot and tow points fall back into tile (0, 0)
        let pose = Pose::new(TileId::new(1, 0), Vector3::new(0.5, 5.0, 0.0), UnitQuaternion::identity());
        let poses = kin.compute_poses(&mut tiles, &pose, PoseOptions::empty());

        assert_eq!(poses.hook.tile, TileId::new(1, 0));
        assert_eq!(poses.pivot.tile, TileId::ORIGIN);
        assert_relative_eq!(poses.pivot.position_m, Vector3::new(9.5, 5.0, 0.0));
        assert_eq!(poses.tow.tile, TileId::ORIGIN);
        assert_relative_eq!(poses.tow.position_m, Vector3::new(7.5, 5.0, 0.0));

        // World positions agree with the untiled calculation
        let world_hook = tiles.world_position(poses.hook.tile, &poses.hook.position_m);
        let world_tow = tiles.world_position(poses.tow.tile, &poses.tow.position_m);
        assert_relative_eq!(world_hook - world_tow, Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_offsets() {
        let mut kin = FixedKinematic::new();
        let mut tiles = TileStore::new(100.0).unwrap();

        kin.set_offset_hook_point_position(Vector3::new(0.5, 0.0, 0.0));
        kin.set_offset_tow_point_position(Vector3::new(-4.0, 0.0, 0.0));
        assert_eq!(kin.offset_hook_point_m(), Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(kin.offset_tow_point_m(), Vector3::new(-4.0, 0.0, 0.0));

        let pose = Pose::new(TileId::ORIGIN, Vector3::new(50.0, 0.0, 0.0), UnitQuaternion::identity());
        let poses = kin.compute_poses(&mut tiles, &pose, PoseOptions::empty());

        assert_relative_eq!(poses.pivot.position_m, Vector3::new(49.5, 0.0, 0.0));
        assert_relative_eq!(poses.tow.position_m, Vector3::new(45.5, 0.0, 0.0));
    }

    #[test]
    fn test_set_pose_emits_in_order() {
        let mut kin = FixedKinematic::new();
        let mut tiles = TileStore::new(100.0).unwrap();
        let emitted = Rc::new(RefCell::new(Vec::new()));

        let log = emitted.clone();
        kin.pose_tow_point_changed.connect(move |u: &PoseUpdate| log.borrow_mut().push(("tow", *u)));
        let log = emitted.clone();
        kin.pose_hook_point_changed.connect(move |u: &PoseUpdate| log.borrow_mut().push(("hook", *u)));
        let log = emitted.clone();
        kin.pose_pivot_point_changed.connect(move |u: &PoseUpdate| log.borrow_mut().push(("pivot", *u)));

        let pose = Pose::new(TileId::ORIGIN, Vector3::new(5.0, 0.0, 0.0), UnitQuaternion::identity());
        let options = PoseOptions::CALCULATE_FROM_PIVOT_POINT;
        let poses = kin.set_pose(&mut tiles, &pose, options);

        let emitted = emitted.borrow();
        let names: Vec<&str> = emitted.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["hook", "pivot", "tow"]);

        assert_eq!(emitted[0].1.pose, poses.hook);
        assert_eq!(emitted[1].1.pose, poses.pivot);
        assert_eq!(emitted[2].1.pose, poses.tow);

        // Every port receives the cleared options
        for (_, update) in emitted.iter() {
            assert_eq!(update.options, PoseOptions::empty());
        }
    }
}
