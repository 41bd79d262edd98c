//! # Ghost-Block Analyzer
//!
//! A client that renders a block the server never committed can stand on it.
//! Each placement arms a [`GhostBlockTracker`]; while the window is open, a
//! server block that changed and then diverged from the placement is charged
//! once. The charge never carries over to the next placement's window.

use warden_core::TerrainQuery;

use super::bound::Bound;
use super::data::PlayerMotionState;
use super::sample::BlockPlaceSample;
use super::tracker::{GhostBlockTracker, GhostKey, TrackerPhase, GHOST_BLOCK_WINDOW};

/// Allowance charged once per window.
pub const GHOST_LAG_ALLOWANCE: f64 = 0.25;

/// Allowance at which the packet is cancelled.
pub const GHOST_LAG_LIMIT: f64 = 0.5;

/// Arms a tracker for a placement.
///
/// A repeated packet for the same placement keeps the running window. Any
/// other placement replaces the tracker with a fresh window.
pub fn arm(state: &mut PlayerMotionState, place: &BlockPlaceSample, terrain: &dyn TerrainQuery) {
    let key = GhostKey {
        pos: place.pos,
        block: place.block,
        held_item: place.held_item,
    };

    let duplicate = state
        .ghost_tracker()
        .is_some_and(|current| current.key() == key && current.phase() != TrackerPhase::Expired);
    if duplicate {
        return;
    }

    let baseline = terrain.block_at(place.pos).id;
    state.set_ghost_tracker(GhostBlockTracker::new(key, baseline, GHOST_BLOCK_WINDOW));
}

/// Advances the tracker by one tick and returns its bound.
///
/// Returns `None` when no tracker is live.
pub fn advance(state: &mut PlayerMotionState, terrain: &dyn TerrainQuery) -> Option<Bound> {
    let tracker = state.ghost_tracker_mut()?;
    tracker.tick(terrain);

    let bound = if tracker.is_live() {
        let mut allowed = 0.0;
        if tracker.is_change_block() && tracker.is_lag() && tracker.can_lag() {
            tracker.on_lag();
            allowed = GHOST_LAG_ALLOWANCE;
        }
        Some(Bound::new(allowed, GHOST_LAG_LIMIT))
    } else {
        None
    };

    state.drop_expired_ghost_tracker();
    bound
}

/// Returns true if the bound cancels the packet.
#[inline]
#[must_use]
pub fn cancels(bound: &Bound) -> bool {
    bound.allowed >= bound.limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moving::magic::PhysicsTable;
    use warden_core::{BlockId, BlockKind, BlockPos, ItemId, Location, VoxelTerrain};

    fn place(pos: BlockPos) -> BlockPlaceSample {
        BlockPlaceSample {
            pos,
            block: BlockId::STONE,
            held_item: ItemId(1),
        }
    }

    fn state() -> PlayerMotionState {
        PlayerMotionState::new(Location::new(0.5, 64.0, 0.5), &PhysicsTable::default())
    }

    #[test]
    fn test_no_tracker_no_bound() {
        let terrain = VoxelTerrain::new();
        assert!(advance(&mut state(), &terrain).is_none());
    }

    #[test]
    fn test_single_charge_per_window() {
        let pos = BlockPos::new(1, 64, 0);
        let mut terrain = VoxelTerrain::flat(63, 4, BlockKind::Solid);
        let mut state = state();
        arm(&mut state, &place(pos), &terrain);

        // Server commits, then reverts the block.
        terrain.set(pos, BlockKind::Solid);
        assert_eq!(advance(&mut state, &terrain).map(|b| b.allowed), Some(0.0));
        terrain.remove(pos);
        let charged = advance(&mut state, &terrain);
        assert_eq!(charged.map(|b| b.allowed), Some(GHOST_LAG_ALLOWANCE));
        assert!(!charged.is_some_and(|b| cancels(&b)));

        // Lag recurs inside the same window: nothing more is granted.
        terrain.set(pos, BlockKind::Solid);
        advance(&mut state, &terrain);
        terrain.remove(pos);
        assert_eq!(advance(&mut state, &terrain).map(|b| b.allowed), Some(0.0));
    }

    #[test]
    fn test_duplicate_packet_keeps_window() {
        let pos = BlockPos::new(1, 64, 0);
        let mut terrain = VoxelTerrain::flat(63, 4, BlockKind::Solid);
        let mut state = state();
        arm(&mut state, &place(pos), &terrain);
        terrain.set(pos, BlockKind::Solid);
        advance(&mut state, &terrain);
        terrain.remove(pos);
        advance(&mut state, &terrain);

        arm(&mut state, &place(pos), &terrain);
        assert!(state.ghost_tracker().is_some_and(|t| t.has_charged()));
    }

    /// Charges one window at `pos`: the server commits, then reverts.
    fn charge(state: &mut PlayerMotionState, terrain: &mut VoxelTerrain, pos: BlockPos) -> Option<Bound> {
        arm(state, &place(pos), terrain);
        terrain.set(pos, BlockKind::Solid);
        advance(state, terrain);
        terrain.remove(pos);
        advance(state, terrain)
    }

    #[test]
    fn test_charges_do_not_stack_across_windows() {
        let mut terrain = VoxelTerrain::flat(63, 4, BlockKind::Solid);
        let mut state = state();

        for x in 1..=2 {
            let bound = charge(&mut state, &mut terrain, BlockPos::new(x, 64, 0));
            assert_eq!(bound.map(|b| b.allowed), Some(GHOST_LAG_ALLOWANCE));
            assert!(!bound.is_some_and(|b| cancels(&b)));
        }

        // Third placement commits and never lags.
        let third = BlockPos::new(3, 64, 0);
        arm(&mut state, &place(third), &terrain);
        terrain.set(third, BlockKind::Solid);
        for tick in 0..GHOST_BLOCK_WINDOW - 1 {
            let bound = advance(&mut state, &terrain);
            assert_eq!(bound.map(|b| b.allowed), Some(0.0), "tick {tick}");
            assert!(!bound.is_some_and(|b| cancels(&b)), "tick {tick}");
        }
    }

    #[test]
    fn test_cancels_at_limit() {
        assert!(!cancels(&Bound::new(GHOST_LAG_ALLOWANCE, GHOST_LAG_LIMIT)));
        assert!(cancels(&Bound::new(GHOST_LAG_LIMIT, GHOST_LAG_LIMIT)));
    }

    #[test]
    fn test_tracker_dropped_after_window() {
        let terrain = VoxelTerrain::new();
        let mut state = state();
        arm(&mut state, &place(BlockPos::new(0, 64, 0)), &terrain);
        for _ in 0..GHOST_BLOCK_WINDOW {
            advance(&mut state, &terrain);
        }
        assert!(state.ghost_tracker().is_none());
    }
}
