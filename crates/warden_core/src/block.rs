//! # Blocks
//!
//! Block identities and the handful of block properties movement checks need.
//!
//! A block is identified by a [`BlockId`] (what the network protocol sends) and
//! classified by a [`BlockKind`] (what the physics cares about). Two different
//! ids may share a kind, e.g. oak and birch planks are both [`BlockKind::Solid`].

use serde::{Deserialize, Serialize};

use crate::math::BlockPos;

/// Network identifier of a block type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air. Every unloaded or empty position reports this id.
    pub const AIR: Self = Self(0);
    /// Stone.
    pub const STONE: Self = Self(1);
    /// Flowing/still water.
    pub const WATER: Self = Self(9);
    /// Flowing/still lava.
    pub const LAVA: Self = Self(11);
    /// Cobweb.
    pub const COBWEB: Self = Self(30);
    /// Stone slab (bottom half).
    pub const SLAB: Self = Self(44);
    /// Ladder.
    pub const LADDER: Self = Self(65);
    /// Stone stairs.
    pub const STAIRS: Self = Self(67);
    /// Ice.
    pub const ICE: Self = Self(79);
    /// Vines.
    pub const VINE: Self = Self(106);

    /// Returns true for air.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == Self::AIR.0
    }
}

/// Physical classification of a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Nothing there.
    #[default]
    Air,
    /// Full solid cube.
    Solid,
    /// Bottom half slab (0.5 high).
    Slab,
    /// Stairs.
    Stairs,
    /// Slippery full cube.
    Ice,
    /// Water.
    Water,
    /// Lava.
    Lava,
    /// Cobweb (stops all motion).
    Cobweb,
    /// Ladder.
    Ladder,
    /// Vines.
    Vine,
}

impl BlockKind {
    /// Canonical id used when a caller only knows the kind.
    #[must_use]
    pub const fn default_id(self) -> BlockId {
        match self {
            Self::Air => BlockId::AIR,
            Self::Solid => BlockId::STONE,
            Self::Slab => BlockId::SLAB,
            Self::Stairs => BlockId::STAIRS,
            Self::Ice => BlockId::ICE,
            Self::Water => BlockId::WATER,
            Self::Lava => BlockId::LAVA,
            Self::Cobweb => BlockId::COBWEB,
            Self::Ladder => BlockId::LADDER,
            Self::Vine => BlockId::VINE,
        }
    }

    /// Collision height of the block in block units.
    #[must_use]
    pub const fn height(self) -> f64 {
        match self {
            Self::Air | Self::Water | Self::Lava | Self::Cobweb | Self::Ladder | Self::Vine => 0.0,
            Self::Slab => 0.5,
            Self::Solid | Self::Stairs | Self::Ice => 1.0,
        }
    }
}

/// A block at a concrete position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// Where the block is.
    pub pos: BlockPos,
    /// Protocol id.
    pub id: BlockId,
    /// Physical kind.
    pub kind: BlockKind,
}

impl Block {
    /// Creates a block.
    #[inline]
    #[must_use]
    pub const fn new(pos: BlockPos, id: BlockId, kind: BlockKind) -> Self {
        Self { pos, id, kind }
    }

    /// Creates an air block at a position.
    #[inline]
    #[must_use]
    pub const fn air(pos: BlockPos) -> Self {
        Self::new(pos, BlockId::AIR, BlockKind::Air)
    }

    /// Returns true if the block is air.
    #[inline]
    #[must_use]
    pub const fn is_air(&self) -> bool {
        self.id.is_air()
    }

    /// Returns true for water or lava.
    #[inline]
    #[must_use]
    pub const fn is_liquid(&self) -> bool {
        matches!(self.kind, BlockKind::Water | BlockKind::Lava)
    }

    /// Returns true for water.
    #[inline]
    #[must_use]
    pub const fn is_water(&self) -> bool {
        matches!(self.kind, BlockKind::Water)
    }

    /// Returns true for lava.
    #[inline]
    #[must_use]
    pub const fn is_lava(&self) -> bool {
        matches!(self.kind, BlockKind::Lava)
    }

    /// Returns true for cobwebs.
    #[inline]
    #[must_use]
    pub const fn is_cobweb(&self) -> bool {
        matches!(self.kind, BlockKind::Cobweb)
    }

    /// Returns true for blocks a player can climb.
    #[inline]
    #[must_use]
    pub const fn can_be_climbed(&self) -> bool {
        matches!(self.kind, BlockKind::Ladder | BlockKind::Vine)
    }

    /// Returns true for stairs or slabs.
    #[inline]
    #[must_use]
    pub const fn is_stair_or_slab(&self) -> bool {
        matches!(self.kind, BlockKind::Stairs | BlockKind::Slab)
    }

    /// Returns true for ice.
    #[inline]
    #[must_use]
    pub const fn is_ice(&self) -> bool {
        matches!(self.kind, BlockKind::Ice)
    }

    /// Bottom of the block's cell.
    #[inline]
    #[must_use]
    pub fn min_y(&self) -> f64 {
        f64::from(self.pos.y)
    }

    /// Top of the block's collision box.
    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.min_y() + self.kind.height()
    }
}
