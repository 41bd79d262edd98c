//! # Movement Samples
//!
//! Per-tick inputs delivered by the server adapter.

use serde::{Deserialize, Serialize};
use warden_core::{BlockId, BlockPos, Effects, Facing, GameMode, ItemId, Location};

/// Food level at or below which a player is starving.
pub const HUNGER_FOOD_LEVEL: u8 = 6;

/// One reported move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementSample {
    /// Where the player was.
    pub from: Location,
    /// Where the player claims to be now.
    pub to: Location,
    /// Capture time in milliseconds.
    pub timestamp_ms: u64,
}

impl MovementSample {
    /// Creates a sample.
    #[inline]
    #[must_use]
    pub const fn new(from: Location, to: Location, timestamp_ms: u64) -> Self {
        Self {
            from,
            to,
            timestamp_ms,
        }
    }

    /// X displacement.
    #[inline]
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.to.x - self.from.x
    }

    /// Y displacement.
    #[inline]
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.to.y - self.from.y
    }

    /// Z displacement.
    #[inline]
    #[must_use]
    pub fn dz(&self) -> f64 {
        self.to.z - self.from.z
    }

    /// Distance travelled.
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.from.distance(self.to)
    }

    /// Horizontal distance travelled.
    #[inline]
    #[must_use]
    pub fn horizontal_distance(&self) -> f64 {
        self.from.horizontal_distance(self.to)
    }

    /// Exact position match. No tolerance: any reported motion counts.
    #[inline]
    #[must_use]
    pub fn is_same_position(&self) -> bool {
        self.from == self.to
    }

    /// Returns true if both horizontal axes changed.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_diagonal(&self) -> bool {
        self.to.x != self.from.x && self.to.z != self.from.z
    }
}

/// Ambient player state that accompanies a movement sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerContext {
    /// Current game mode.
    pub game_mode: GameMode,
    /// Active movement effects.
    pub effects: Effects,
    /// Client sprint flag.
    pub sprinting: bool,
    /// Food level (0-20).
    pub food_level: u8,
    /// Latency estimate in milliseconds.
    pub ping_ms: u32,
    /// Consecutive airborne ticks as counted by the server.
    pub in_air_ticks: u32,
    /// Horizontal facing.
    pub facing: Facing,
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self {
            game_mode: GameMode::Survival,
            effects: Effects::NONE,
            sprinting: false,
            food_level: 20,
            ping_ms: 0,
            in_air_ticks: 0,
            facing: Facing::North,
        }
    }
}

impl PlayerContext {
    /// Returns true if the player is starving.
    #[inline]
    #[must_use]
    pub const fn is_hungry(&self) -> bool {
        self.food_level <= HUNGER_FOOD_LEVEL
    }

    /// Latency tolerance added to jump-height limits.
    #[inline]
    #[must_use]
    pub fn ping_tolerance(&self) -> f64 {
        f64::from(self.ping_ms) * 0.000_08 + 0.000_1
    }
}

/// A block placement reported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPlaceSample {
    /// Where the block was placed.
    pub pos: BlockPos,
    /// Placed block.
    pub block: BlockId,
    /// Item in hand while placing.
    pub held_item: ItemId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_position_is_exact() {
        let at = Location::new(1.0, 64.0, 1.0);
        assert!(MovementSample::new(at, at, 0).is_same_position());
        let nudged = at.offset(1e-12, 0.0, 0.0);
        assert!(!MovementSample::new(at, nudged, 0).is_same_position());
    }

    #[test]
    fn test_diagonal_requires_both_axes() {
        let from = Location::new(0.0, 64.0, 0.0);
        assert!(MovementSample::new(from, from.offset(0.2, 0.0, 0.2), 0).is_diagonal());
        assert!(!MovementSample::new(from, from.offset(0.2, 0.0, 0.0), 0).is_diagonal());
    }

    #[test]
    fn test_ping_tolerance() {
        let ctx = PlayerContext {
            ping_ms: 100,
            ..PlayerContext::default()
        };
        assert!((ctx.ping_tolerance() - 0.0081).abs() < 1e-12);
        assert!(!ctx.is_hungry());
    }
}
