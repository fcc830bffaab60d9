//! # Tiles
//!
//! The world is partitioned into square tiles of a fixed size. Each tile is a
//! local frame whose origin sits at its lower-left corner, so that positions
//! stored relative to a tile stay numerically small however far the
//! assembly travels from the world origin.
//!
//! Tiles are addressed by their integer grid index ([`TileId`]). The tile
//! with index `(i, j)` has its origin at `(i * size_m, j * size_m)` in the
//! world frame and covers local positions in `[0, size_m)` on the X and Y
//! axes. The Z axis is not tiled and passes through unchanged.
//!
//! # Resolution precondition
//!
//! A single position update is expected to move the assembly by less than
//! one tile extent, so a drifted position only ever needs rebasing onto a
//! direct neighbour. Resolution is computed in closed form and gives the
//! correct tile for any distance, but jumps of more than one tile break the
//! contract and are reported with a warning. Coordinates too large for an
//! `i64` tile index clamp to the edge of the grid.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use log::{trace, warn};
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use util::maths::rem_euclid;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Index of a tile in the tile grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileId {
    pub x: i64,
    pub y: i64,
}

/// A single tile of the world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    /// Index of this tile in the grid
    pub id: TileId,

    /// Position of the tile's origin in the world frame
    pub origin_m: Vector2<f64>,

    /// Length of each side of the tile
    pub size_m: f64,
}

/// Owns all tiles created so far, creating new ones as positions move into them.
#[derive(Debug, Clone)]
pub struct TileStore {
    size_m: f64,

    tiles: HashMap<TileId, Tile>,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A service rebasing local positions onto the tile they actually fall into.
pub trait TileResolver {
    /// Resolve `local_position_m`, given relative to `tile`, into the tile containing it.
    ///
    /// Returns the containing tile and the position relative to that tile's origin. Positions
    /// already inside `tile` are returned unchanged.
    fn resolve(&mut self, tile: TileId, local_position_m: Vector3<f64>) -> (TileId, Vector3<f64>);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TileError {
    #[error("Tile size must be finite and greater than zero, got {0} m")]
    InvalidTileSize(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TileId {
    pub const ORIGIN: TileId = TileId { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Get the index of the tile `dx` tiles along X and `dy` tiles along Y from this one.
    ///
    /// Indices saturate at the limits of `i64`.
    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl Tile {
    fn new(id: TileId, size_m: f64) -> Self {
        Self {
            id,
            origin_m: Vector2::new(id.x as f64 * size_m, id.y as f64 * size_m),
            size_m,
        }
    }

    /// Returns true if the local position lies within this tile's extent.
    pub fn contains(&self, local_position_m: &Vector3<f64>) -> bool {
        (0.0..self.size_m).contains(&local_position_m.x)
            && (0.0..self.size_m).contains(&local_position_m.y)
    }

    /// Convert a position local to this tile into the world frame.
    pub fn to_world(&self, local_position_m: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            self.origin_m.x + local_position_m.x,
            self.origin_m.y + local_position_m.y,
            local_position_m.z,
        )
    }
}

impl TileStore {
    /// Create a new store of tiles with the given side length. The origin tile is created
    /// immediately.
    pub fn new(size_m: f64) -> Result<Self, TileError> {
        if !size_m.is_finite() || size_m <= 0.0 {
            return Err(TileError::InvalidTileSize(size_m));
        }

        let mut store = Self {
            size_m,
            tiles: HashMap::new(),
        };
        store.get_or_create(TileId::ORIGIN);

        Ok(store)
    }

    /// The side length of every tile in the store.
    pub fn size_m(&self) -> f64 {
        self.size_m
    }

    /// The number of tiles created so far.
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Get a tile if it has been created.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Get a tile, creating it if this is the first time it's been requested.
    pub fn get_or_create(&mut self, id: TileId) -> &Tile {
        let size_m = self.size_m;
        self.tiles.entry(id).or_insert_with(|| {
            trace!("Creating tile ({}, {})", id.x, id.y);
            Tile::new(id, size_m)
        })
    }

    /// Find the tile containing a world position, returning it along with the position relative
    /// to the tile's origin.
    pub fn localise(&mut self, world_position_m: Vector3<f64>) -> (TileId, Vector3<f64>) {
        let (x, local_x_m) = split_axis(world_position_m.x, self.size_m);
        let (y, local_y_m) = split_axis(world_position_m.y, self.size_m);

        let id = self.get_or_create(TileId::new(x, y)).id;

        (id, Vector3::new(local_x_m, local_y_m, world_position_m.z))
    }

    /// Convert a position relative to the given tile into the world frame.
    ///
    /// The tile doesn't need to have been created, its origin only depends on its index.
    pub fn world_position(&self, tile: TileId, local_position_m: &Vector3<f64>) -> Vector3<f64> {
        Tile::new(tile, self.size_m).to_world(local_position_m)
    }
}

impl TileResolver for TileStore {
    fn resolve(&mut self, tile: TileId, local_position_m: Vector3<f64>) -> (TileId, Vector3<f64>) {
        let size_m = self.size_m;

        if self.get_or_create(tile).contains(&local_position_m) {
            return (tile, local_position_m);
        }

        let (dx, local_x_m) = split_axis(local_position_m.x, size_m);
        let (dy, local_y_m) = split_axis(local_position_m.y, size_m);

        if dx.abs() > 1 || dy.abs() > 1 {
            warn!(
                "Position moved by ({}, {}) tiles from tile ({}, {}) in one update, \
                 expected at most one tile",
                dx, dy, tile.x, tile.y
            );
        }

        let resolved = self.get_or_create(tile.offset(dx, dy)).id;

        trace!(
            "Resolved position from tile ({}, {}) into tile ({}, {})",
            tile.x, tile.y, resolved.x, resolved.y
        );

        (resolved, Vector3::new(local_x_m, local_y_m, local_position_m.z))
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Split a coordinate into a number of whole tiles and the remainder within the last tile.
///
/// The remainder is always in `[0, size_m)`.
fn split_axis(value_m: f64, size_m: f64) -> (i64, f64) {
    let mut local_m = rem_euclid(value_m, size_m);

    // Tiny negative values round up onto the far edge, which belongs to the next tile
    if local_m >= size_m {
        local_m = 0.0;
    }

    (((value_m - local_m) / size_m).round() as i64, local_m)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tile_store_new() {
        let store = TileStore::new(100.0).unwrap();

        assert_eq!(store.num_tiles(), 1);
        assert_eq!(store.get(TileId::ORIGIN).unwrap().origin_m, Vector2::new(0.0, 0.0));

        assert!(matches!(TileStore::new(0.0), Err(TileError::InvalidTileSize(_))));
        assert!(matches!(TileStore::new(-5.0), Err(TileError::InvalidTileSize(_))));
        assert!(matches!(TileStore::new(f64::NAN), Err(TileError::InvalidTileSize(_))));
    }

    #[test]
    fn test_resolve_inside_tile() {
        let mut store = TileStore::new(100.0).unwrap();

        let position = Vector3::new(10.0, 99.5, 3.0);
        assert_eq!(store.resolve(TileId::ORIGIN, position), (TileId::ORIGIN, position));

        // Lower edges belong to the tile
        let position = Vector3::new(0.0, 0.0, 0.0);
        assert_eq!(store.resolve(TileId::ORIGIN, position), (TileId::ORIGIN, position));

        assert_eq!(store.num_tiles(), 1);
    }

    #[test]
    fn test_resolve_neighbours() {
        let mut store = TileStore::new(100.0).unwrap();

        // Crossing the upper X edge
        let (tile, position) = store.resolve(TileId::ORIGIN, Vector3::new(100.0, 50.0, 1.0));
        assert_eq!(tile, TileId::new(1, 0));
        assert_relative_eq!(position, Vector3::new(0.0, 50.0, 1.0));

        // Crossing the lower X and Y edges at once
        let (tile, position) = store.resolve(TileId::new(1, 0), Vector3::new(-0.5, -2.0, 0.0));
        assert_eq!(tile, TileId::new(0, -1));
        assert_relative_eq!(position, Vector3::new(99.5, 98.0, 0.0));

        // Neighbours are created lazily
        assert_eq!(store.num_tiles(), 3);
        assert_eq!(store.get(TileId::new(0, -1)).unwrap().origin_m, Vector2::new(0.0, -100.0));
    }

    #[test]
    fn test_resolve_preserves_world_position() {
        let mut store = TileStore::new(25.0).unwrap();

        let tile = TileId::new(-3, 7);
        let local = Vector3::new(26.25, -0.75, -1.0);
        let world = store.world_position(tile, &local);

        let (resolved, resolved_local) = store.resolve(tile, local);

        assert_eq!(resolved, TileId::new(-2, 6));
        assert_relative_eq!(store.world_position(resolved, &resolved_local), world);
        assert!(store.get(resolved).unwrap().contains(&resolved_local));
    }

    #[test]
    fn test_resolve_long_jump() {
        let mut store = TileStore::new(10.0).unwrap();

        // A jump of several tiles breaks the precondition but still resolves correctly
        let (tile, position) = store.resolve(TileId::ORIGIN, Vector3::new(35.0, -12.0, 0.0));

        assert_eq!(tile, TileId::new(3, -2));
        assert_relative_eq!(position, Vector3::new(5.0, 8.0, 0.0));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let mut store = TileStore::new(100.0).unwrap();

        assert_eq!(TileId::new(i64::MAX, i64::MIN).offset(1, -1), TileId::new(i64::MAX, i64::MIN));

        // A jump beyond the range of tile indices clamps rather than overflowing
        let (tile, _) = store.resolve(TileId::new(1, -1), Vector3::new(1e30, -1e30, 0.0));
        assert_eq!(tile, TileId::new(i64::MAX, i64::MIN));
    }

    #[test]
    fn test_localise() {
        let mut store = TileStore::new(100.0).unwrap();

        let world = Vector3::new(123_456.75, -98_765.5, 12.0);
        let (tile, local) = store.localise(world);

        assert_eq!(tile, TileId::new(1234, -988));
        assert_relative_eq!(local, Vector3::new(56.75, 34.5, 12.0), epsilon = 1e-9);
        assert_relative_eq!(store.world_position(tile, &local), world, epsilon = 1e-9);

        // A tiny negative coordinate must not produce a local position on the far edge
        let (tile, local) = store.localise(Vector3::new(-1e-20, 0.0, 0.0));
        assert!(store.get(tile).unwrap().contains(&local));
    }
}
