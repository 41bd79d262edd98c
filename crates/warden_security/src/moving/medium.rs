//! # Medium & Ground Classification
//!
//! Answers two questions about a location:
//!
//! - Is the player standing on something? ([`is_on_ground`])
//! - Which medium drags on the player? ([`classify_medium`])
//!
//! It also gathers the neighbourhood probes the analyzers consult
//! ([`Surroundings`]): blocks in front, beside, behind, below and above the
//! player.

use warden_core::{Block, BlockPos, Facing, Location, TerrainQuery};

use super::magic::PhysicsTable;

/// Depth of the primary ground probe.
const GROUND_PROBE_DEPTH: f64 = 0.5;

/// Depth of the under-block confirmation probe.
const UNDER_BLOCK_DEPTH: f64 = 1.0;

/// How far down [`Surroundings::scan`] looks for a surface when measuring the
/// sub-block height.
const TINY_HEIGHT_SCAN_DEPTH: i32 = 2;

/// Returns true if the location rests on a block.
///
/// Both the block half a unit below the feet and the block one unit below
/// must be non-air.
#[must_use]
pub fn is_on_ground(terrain: &dyn TerrainQuery, at: Location) -> bool {
    !terrain.block_at_location(at.offset(0.0, -GROUND_PROBE_DEPTH, 0.0)).is_air()
        && !terrain.block_at_location(at.offset(0.0, -UNDER_BLOCK_DEPTH, 0.0)).is_air()
}

/// Medium a player moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Medium {
    /// Inside a cobweb.
    Cobweb,
    /// On a ladder or vine.
    Climbable,
    /// Submerged in lava.
    Lava,
    /// Submerged in water.
    Water,
    /// Both endpoints in air.
    Air,
    /// Touching a solid block.
    Ground,
}

/// Horizontal and vertical drag factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Friction {
    /// Horizontal drag factor.
    pub horizontal: f64,
    /// Vertical drag factor.
    pub vertical: f64,
}

impl Friction {
    /// Friction before any medium has been observed.
    #[must_use]
    pub fn initial(physics: &PhysicsTable) -> Self {
        Medium::Ground.friction(physics)
    }
}

impl Medium {
    /// Drag factors of the medium.
    #[must_use]
    pub fn friction(self, physics: &PhysicsTable) -> Friction {
        let (horizontal, vertical) = match self {
            Self::Cobweb | Self::Climbable => (0.0, 0.0),
            Self::Lava => (physics.friction_medium_lava, physics.friction_medium_lava),
            Self::Water => (physics.friction_medium_water, physics.friction_medium_water),
            Self::Air => (physics.friction_medium_air, physics.friction_medium_air),
            Self::Ground => (0.0, physics.friction_medium_air),
        };
        Friction {
            horizontal,
            vertical,
        }
    }
}

/// Classifies the medium of a move.
///
/// Priority: cobweb, climbable, liquid (probed at `from` only), air on both
/// ends, then ground contact.
#[must_use]
pub fn classify_medium(terrain: &dyn TerrainQuery, from: Location, to: Location) -> Medium {
    let from_block = terrain.block_at_location(from);
    let to_block = terrain.block_at_location(to);

    if from_block.is_cobweb() || to_block.is_cobweb() {
        Medium::Cobweb
    } else if from_block.can_be_climbed() || to_block.can_be_climbed() {
        Medium::Climbable
    } else if from_block.is_lava() {
        Medium::Lava
    } else if from_block.is_water() {
        Medium::Water
    } else if from_block.is_air() && to_block.is_air() {
        Medium::Air
    } else {
        Medium::Ground
    }
}

/// Neighbourhood of a player's current location.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Surroundings {
    /// A block occupies the cell in front of the player.
    pub face_block: bool,
    /// A block occupies the cell to the left or right.
    pub friction_block: bool,
    /// Stairs or a slab right under the feet.
    pub stair_slab_below: bool,
    /// Stairs or a slab in one of the two cells behind the block below.
    pub stair_slab_behind: bool,
    /// The block below and its four horizontal neighbours are all air.
    pub full_air: bool,
    /// Something occupies the space above the head.
    pub head_blocked: bool,
    /// Feet height above the standing surface when within a block of it,
    /// otherwise 0.
    pub tiny_height: f64,
}

impl Surroundings {
    /// Probes the terrain around `at` with the player facing `facing`.
    #[must_use]
    pub fn scan(terrain: &dyn TerrainQuery, at: Location, facing: Facing) -> Self {
        let feet = at.block_pos();
        let is_solid = |pos: BlockPos| !terrain.block_at(pos).is_air();

        let below = feet.down();
        let behind = below.side(facing.back());
        let stair_slab = |block: Block| block.is_stair_or_slab();

        let full_air = [
            below,
            below.side(facing),
            below.side(facing.back()),
            below.side(facing.left()),
            below.side(facing.right()),
        ]
        .into_iter()
        .all(|pos| !is_solid(pos));

        let tiny_height = match terrain.height_above_ground(at, TINY_HEIGHT_SCAN_DEPTH) {
            Some(height) if height <= 1.0 => at.y - terrain.block_at(feet).min_y(),
            _ => 0.0,
        };

        Self {
            face_block: is_solid(feet.side(facing)),
            friction_block: is_solid(feet.side(facing.left()))
                || is_solid(feet.side(facing.right())),
            stair_slab_below: stair_slab(terrain.block_at_location(at.offset(0.0, -0.25, 0.0)))
                || stair_slab(terrain.block_at_location(at.offset(0.0, -1.0, 0.0))),
            stair_slab_behind: stair_slab(terrain.block_at(behind))
                || stair_slab(terrain.block_at(behind.side(facing.back()))),
            full_air,
            head_blocked: !terrain.block_at_location(at.offset(0.0, 1.75, 0.0)).is_air()
                || !terrain.block_at_location(at.offset(0.0, 2.0, 0.0)).is_air(),
            tiny_height,
        }
    }
}
