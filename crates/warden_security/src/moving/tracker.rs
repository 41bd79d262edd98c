//! # Short-Lived Trackers
//!
//! Small per-player state machines created by a triggering event and advanced
//! once per tick until their window runs out.
//!
//! ```text
//!   create ──► Armed ──tick──► Live ──window elapsed──► Expired
//! ```
//!
//! - [`MovementTracker`]: jump height since the last ground contact (landing)
//! - [`SpeedTracker`]: max horizontal speed over a short window (ice contact)
//! - [`GhostBlockTracker`]: phantom-block window (block-place packet)
//!
//! The owning [`PlayerMotionState`](crate::moving::PlayerMotionState) holds at
//! most one of each; creating a new tracker discards the old one.

use warden_core::{BlockId, BlockPos, ItemId, TerrainQuery};

/// Lifecycle phase shared by all trackers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackerPhase {
    /// Created, not advanced yet.
    #[default]
    Armed,
    /// Advanced at least once, window still open.
    Live,
    /// Window elapsed. Never transitions back without a restart.
    Expired,
}

/// Advances a phase by one tick. Returns false if the tracker is expired.
fn advance(phase: &mut TrackerPhase, ticks: &mut u32, window: u32) -> bool {
    match *phase {
        TrackerPhase::Expired => return false,
        TrackerPhase::Armed => *phase = TrackerPhase::Live,
        TrackerPhase::Live => {}
    }
    *ticks += 1;
    if *ticks >= window {
        *phase = TrackerPhase::Expired;
    }
    true
}

// ============================================================================
// MOVEMENT TRACKER
// ============================================================================

/// Window of a movement tracker in ticks.
pub const MOVEMENT_TRACKER_WINDOW: u32 = 40;

/// Tracks the height of the jump that follows a ground contact.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementTracker {
    origin_y: f64,
    height: f64,
    abs_height: f64,
    ticks: u32,
    window: u32,
    phase: TrackerPhase,
}

impl MovementTracker {
    /// Creates a tracker anchored at the ground height `origin_y`.
    #[must_use]
    pub fn new(origin_y: f64) -> Self {
        Self::with_window(origin_y, MOVEMENT_TRACKER_WINDOW)
    }

    /// Creates a tracker with a custom window.
    #[must_use]
    pub fn with_window(origin_y: f64, window: u32) -> Self {
        Self {
            origin_y,
            height: 0.0,
            abs_height: 0.0,
            ticks: 0,
            window: window.max(1),
            phase: TrackerPhase::Armed,
        }
    }

    /// Advances the tracker with the player's current feet height.
    pub fn tick(&mut self, y: f64) {
        if !advance(&mut self.phase, &mut self.ticks, self.window) {
            return;
        }
        let rise = y - self.origin_y;
        self.height = self.height.max(rise);
        self.abs_height = self.abs_height.max(rise.abs());
    }

    /// Highest rise above the anchor so far (0 while walking).
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Largest absolute vertical displacement from the anchor.
    #[inline]
    #[must_use]
    pub fn abs_height(&self) -> f64 {
        self.abs_height
    }

    /// Ground height the tracker is anchored at.
    #[inline]
    #[must_use]
    pub fn origin_y(&self) -> f64 {
        self.origin_y
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    /// Returns true while the window is open and the tracker has been advanced.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.phase == TrackerPhase::Live
    }
}

// ============================================================================
// SPEED TRACKER
// ============================================================================

/// Window of a speed tracker in ticks.
pub const SPEED_TRACKER_WINDOW: u32 = 10;

/// Rolling max horizontal speed while on ice.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedTracker {
    max_speed: f64,
    ticks: u32,
    window: u32,
    phase: TrackerPhase,
}

impl Default for SpeedTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeedTracker {
    /// Creates a tracker with the default window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(SPEED_TRACKER_WINDOW)
    }

    /// Creates a tracker with a custom window.
    #[must_use]
    pub fn with_window(window: u32) -> Self {
        Self {
            max_speed: 0.0,
            ticks: 0,
            window: window.max(1),
            phase: TrackerPhase::Armed,
        }
    }

    /// Records this tick's horizontal speed.
    pub fn tick(&mut self, speed: f64) {
        if advance(&mut self.phase, &mut self.ticks, self.window) {
            self.max_speed = self.max_speed.max(speed);
        }
    }

    /// Starts a fresh window.
    pub fn restart(&mut self) {
        *self = Self::with_window(self.window);
    }

    /// Highest speed seen in the window.
    #[inline]
    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    /// Returns true while the window is open.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.phase == TrackerPhase::Live
    }
}

// ============================================================================
// GHOST BLOCK TRACKER
// ============================================================================

/// Window of a ghost-block tracker in ticks.
pub const GHOST_BLOCK_WINDOW: u32 = 45;

/// Identity of a placement. A repeated packet with the same key is a duplicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostKey {
    /// Placement position.
    pub pos: BlockPos,
    /// Placed block.
    pub block: BlockId,
    /// Item in hand.
    pub held_item: ItemId,
}

/// Follows one block placement to catch client/server block divergence.
#[derive(Clone, Debug, PartialEq)]
pub struct GhostBlockTracker {
    key: GhostKey,
    baseline: BlockId,
    changed: bool,
    lagging: bool,
    charged: bool,
    ticks: u32,
    window: u32,
    phase: TrackerPhase,
}

impl GhostBlockTracker {
    /// Arms a tracker for a placement.
    ///
    /// `baseline` is the server's block at the position when the packet arrived.
    #[must_use]
    pub fn new(key: GhostKey, baseline: BlockId, window: u32) -> Self {
        Self {
            key,
            baseline,
            changed: false,
            lagging: false,
            charged: false,
            ticks: 0,
            window: window.max(1),
            phase: TrackerPhase::Armed,
        }
    }

    /// Advances the window and samples the server block.
    pub fn tick(&mut self, terrain: &dyn TerrainQuery) {
        if !advance(&mut self.phase, &mut self.ticks, self.window) {
            self.lagging = false;
            return;
        }
        let observed = terrain.block_at(self.key.pos).id;
        if observed != self.baseline {
            self.changed = true;
        }
        self.lagging = observed != self.key.block;
    }

    /// Placement identity.
    #[inline]
    #[must_use]
    pub fn key(&self) -> GhostKey {
        self.key
    }

    /// Returns true once the server block differed from the baseline.
    #[inline]
    #[must_use]
    pub fn is_change_block(&self) -> bool {
        self.changed
    }

    /// Returns true if the server block currently differs from what the
    /// client placed.
    #[inline]
    #[must_use]
    pub fn is_lag(&self) -> bool {
        self.lagging
    }

    /// Returns true if the window has not charged lag yet.
    #[inline]
    #[must_use]
    pub fn can_lag(&self) -> bool {
        !self.charged
    }

    /// Marks the window as charged.
    pub fn on_lag(&mut self) {
        self.charged = true;
    }

    /// Returns true if this window charged lag.
    #[inline]
    #[must_use]
    pub fn has_charged(&self) -> bool {
        self.charged
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    /// Returns true while the window is open.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.phase == TrackerPhase::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{BlockKind, VoxelTerrain};

    #[test]
    fn test_movement_tracker_phases() {
        let mut tracker = MovementTracker::with_window(64.0, 3);
        assert_eq!(tracker.phase(), TrackerPhase::Armed);
        assert!(!tracker.is_live());

        tracker.tick(64.42);
        assert!(tracker.is_live());
        tracker.tick(65.0);
        assert!((tracker.height() - 1.0).abs() < 1e-12);

        tracker.tick(64.5);
        assert_eq!(tracker.phase(), TrackerPhase::Expired);

        // Expired trackers ignore further motion.
        tracker.tick(70.0);
        assert!((tracker.height() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_movement_tracker_abs_height_counts_drops() {
        let mut tracker = MovementTracker::new(64.0);
        tracker.tick(63.0);
        assert_eq!(tracker.height(), 0.0);
        assert!((tracker.abs_height() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_speed_tracker_restart() {
        let mut tracker = SpeedTracker::with_window(2);
        tracker.tick(0.4);
        tracker.tick(0.9);
        assert_eq!(tracker.phase(), TrackerPhase::Expired);
        assert!((tracker.max_speed() - 0.9).abs() < 1e-12);

        tracker.restart();
        assert_eq!(tracker.phase(), TrackerPhase::Armed);
        assert_eq!(tracker.max_speed(), 0.0);
    }

    #[test]
    fn test_ghost_tracker_detects_reverted_placement() {
        let pos = BlockPos::new(0, 64, 0);
        let mut terrain = VoxelTerrain::new();
        let key = GhostKey {
            pos,
            block: BlockId::STONE,
            held_item: ItemId(1),
        };
        let mut tracker = GhostBlockTracker::new(key, BlockId::AIR, GHOST_BLOCK_WINDOW);

        // Server has not committed the block yet.
        tracker.tick(&terrain);
        assert!(tracker.is_live());
        assert!(!tracker.is_change_block());
        assert!(tracker.is_lag());

        // Committed.
        terrain.set(pos, BlockKind::Solid);
        tracker.tick(&terrain);
        assert!(tracker.is_change_block());
        assert!(!tracker.is_lag());

        // Reverted by the server.
        terrain.remove(pos);
        tracker.tick(&terrain);
        assert!(tracker.is_change_block() && tracker.is_lag());
        assert!(tracker.can_lag());
        tracker.on_lag();
        assert!(!tracker.can_lag());
    }

    #[test]
    fn test_ghost_tracker_expires_after_window() {
        let terrain = VoxelTerrain::new();
        let key = GhostKey {
            pos: BlockPos::new(0, 0, 0),
            block: BlockId::STONE,
            held_item: ItemId(1),
        };
        let mut tracker = GhostBlockTracker::new(key, BlockId::AIR, GHOST_BLOCK_WINDOW);
        for _ in 0..GHOST_BLOCK_WINDOW {
            tracker.tick(&terrain);
        }
        assert_eq!(tracker.phase(), TrackerPhase::Expired);
        assert!(!tracker.is_lag());
    }
}
