//! # Terrain Queries
//!
//! The movement checks never own the world. They ask a [`TerrainQuery`] what
//! block sits at a position and treat the answer as read-only for the tick.
//!
//! [`VoxelTerrain`] is a sparse in-memory implementation used by tests, the
//! trace replay tool, and servers that mirror chunk data into the check thread.

use std::collections::HashMap;

use crate::block::{Block, BlockId, BlockKind};
use crate::math::{BlockPos, Location};

/// Read-only access to world blocks.
///
/// Implementations must return [`Block::air`] for unloaded positions instead
/// of failing: a missing chunk is treated as empty space.
pub trait TerrainQuery {
    /// Returns the block at a block position.
    fn block_at(&self, pos: BlockPos) -> Block;

    /// Returns the block containing a location.
    fn block_at_location(&self, location: Location) -> Block {
        self.block_at(location.block_pos())
    }

    /// Distance from `location` down to the top of the first non-air block
    /// within `max_depth` blocks, or `None` if there is only air.
    fn height_above_ground(&self, location: Location, max_depth: i32) -> Option<f64> {
        let start = location.block_pos();
        (0..=max_depth)
            .map(|depth| self.block_at(BlockPos::new(start.x, start.y - depth, start.z)))
            .find(|block| !block.is_air() && block.max_y() <= location.y)
            .map(|block| location.y - block.max_y())
    }
}

/// Sparse voxel terrain backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct VoxelTerrain {
    blocks: HashMap<BlockPos, (BlockId, BlockKind)>,
}

impl VoxelTerrain {
    /// Creates empty terrain (all air).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates terrain with a flat floor whose top surface is at `top_y + 1`.
    ///
    /// The floor spans `-radius..=radius` on both horizontal axes.
    #[must_use]
    pub fn flat(top_y: i32, radius: i32, kind: BlockKind) -> Self {
        let mut terrain = Self::new();
        terrain.fill(
            BlockPos::new(-radius, top_y, -radius),
            BlockPos::new(radius, top_y, radius),
            kind,
        );
        terrain
    }

    /// Places a block of the given kind using its canonical id.
    pub fn set(&mut self, pos: BlockPos, kind: BlockKind) {
        self.set_block(pos, kind.default_id(), kind);
    }

    /// Places a block with an explicit id.
    ///
    /// Setting air removes the entry.
    pub fn set_block(&mut self, pos: BlockPos, id: BlockId, kind: BlockKind) {
        if id.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, (id, kind));
        }
    }

    /// Removes the block at a position.
    pub fn remove(&mut self, pos: BlockPos) {
        self.blocks.remove(&pos);
    }

    /// Fills the inclusive cuboid between two corners.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, kind: BlockKind) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set(BlockPos::new(x, y, z), kind);
                }
            }
        }
    }

    /// Number of non-air blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if every position is air.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl TerrainQuery for VoxelTerrain {
    fn block_at(&self, pos: BlockPos) -> Block {
        self.blocks
            .get(&pos)
            .map_or_else(|| Block::air(pos), |&(id, kind)| Block::new(pos, id, kind))
    }
}
