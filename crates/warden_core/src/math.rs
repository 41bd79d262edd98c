//! # World Math
//!
//! Continuous locations, integer block coordinates and horizontal facings.
//!
//! Locations are `f64` because the movement checks compare against
//! calibrated constants with sub-millimetre precision. Rounding to `f32`
//! turns legitimate jump apexes into false positives.

use serde::{Deserialize, Serialize};

/// A point in world space (block units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate (feet height).
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Location {
    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new location.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns this location moved by the given offsets.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Squared distance to another location.
    ///
    /// Avoids the sqrt call for threshold comparisons.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to another location.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Distance on the horizontal (XZ) plane.
    #[inline]
    #[must_use]
    pub fn horizontal_distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// The block that contains this location.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn block_pos(self) -> BlockPos {
        // Saturating float-to-int casts; worlds are far smaller than i32.
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

/// Integer coordinates of a single block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The block directly below.
    #[inline]
    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y - 1, self.z)
    }

    /// The block directly above.
    #[inline]
    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.x, self.y + 1, self.z)
    }

    /// The neighbouring block in a horizontal direction.
    #[inline]
    #[must_use]
    pub const fn side(self, facing: Facing) -> Self {
        let (dx, dz) = facing.offset();
        Self::new(self.x + dx, self.y, self.z + dz)
    }
}

/// Horizontal facing of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Towards negative Z.
    #[default]
    North,
    /// Towards positive X.
    East,
    /// Towards positive Z.
    South,
    /// Towards negative X.
    West,
}

impl Facing {
    /// Unit block offset `(dx, dz)` of this facing.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// The facing behind this one.
    #[inline]
    #[must_use]
    pub const fn back(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// The facing on the left hand side.
    #[inline]
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
        }
    }

    /// The facing on the right hand side.
    #[inline]
    #[must_use]
    pub const fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }
}
