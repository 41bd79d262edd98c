//! # Physics Calibration Table
//!
//! Named speed, height and friction thresholds used by the movement checks.
//!
//! The defaults are calibrated against vanilla voxel-sandbox physics at a
//! 20 Hz client tick (jump apex 1.2522, air drag 0.98, water drag 0.89, lava
//! drag 0.535). Servers running modified physics override individual entries
//! in the `[physics]` table of the check configuration; unspecified entries
//! keep their defaults.

use serde::{Deserialize, Serialize};

/// Calibrated movement constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTable {
    // ---------------------------------------------------------------------
    // Friction
    // ---------------------------------------------------------------------
    /// Drag factor in air.
    pub friction_medium_air: f64,
    /// Drag factor in water.
    pub friction_medium_water: f64,
    /// Drag factor in lava.
    pub friction_medium_lava: f64,
    /// Vertical speed below which a landing still counts as walking.
    pub walk_speed: f64,

    // ---------------------------------------------------------------------
    // Jump height
    // ---------------------------------------------------------------------
    /// Highest legitimate jump without effects.
    pub jump_normal_walk: f64,
    /// Highest legitimate jump with jump boost I.
    pub jump_boost_v1_max_height: f64,
    /// Highest legitimate jump with jump boost II or above.
    pub jump_boost_v2_max_height: f64,
    /// Lower edge of the jump boost I bypass band.
    pub block_bunny_bypass_v1_min: f64,
    /// Upper edge of the jump boost I bypass band.
    pub block_bunny_bypass_v1_max: f64,
    /// Lower edge of the jump boost II bypass band.
    pub block_bunny_bypass_v2_min: f64,
    /// Upper edge of the jump boost II bypass band.
    pub block_bunny_bypass_v2_max: f64,
    /// Lower edge of the step-up band (jumping onto a block).
    pub block_bunny_min: f64,
    /// Upper edge of the step-up band. Also the speed cap under a ceiling.
    pub block_bunny_max: f64,
    /// Below this sub-block height a jump never counts as a bunny hop.
    pub min_jump_height: f64,

    // ---------------------------------------------------------------------
    // Sprint transitions
    // ---------------------------------------------------------------------
    /// Horizontal speed cap right after a sprint jump.
    pub sprint_change_max_speed: f64,
    /// Same cap when the player faces a block.
    pub sprint_change_face_block_max_speed: f64,
    /// Allowance per airborne tick after losing sprint mid-air.
    pub sprint_change_speed_addition: f64,
    /// Allowance per airborne tick during the first five airborne ticks.
    pub sprint_change_speed_addition_v2: f64,
    /// Allowance per consecutive lose-sprint tick.
    pub sprint_change_speed_back_direction: f64,

    // ---------------------------------------------------------------------
    // Bunny hop
    // ---------------------------------------------------------------------
    /// First-stage bunny-hop speed cap.
    pub bunny_hop_max_speed: f64,
    /// Second-stage bunny-hop speed cap.
    pub bunny_hop_max_speed_max: f64,
    /// Bunny-hop speed cap with speed I.
    pub speed_boost_v1_bunny_hop: f64,
    /// Bunny-hop speed cap with speed II or above.
    pub speed_boost_v2_bunny_hop: f64,
    /// Max speed of a bunny-hop window on ice.
    pub bunny_ice_ground_default: f64,
    /// Extra ice allowance when a ceiling boosts the hop.
    pub bunny_up_block_addition: f64,
    /// First tiny-jump sub-block height.
    pub bunny_hop_tiny_jump_first: f64,
    /// Second tiny-jump sub-block height.
    pub bunny_hop_tiny_jump_second: f64,
    /// Speed cap of a tiny jump.
    pub bunny_tiny_jump_max: f64,
    /// Tiny-jump speed cap next to a block.
    pub bunny_tiny_jump_friction: f64,
    /// Tiny-jump speed cap with speed I.
    pub bunny_tiny_jump_speed_boost_v1: f64,
    /// Tiny-jump speed cap with speed II or above.
    pub bunny_tiny_jump_speed_boost_v2: f64,
    /// Sub-block height below which diagonal corner hops are judged directly.
    pub bunny_tiny_direction_height: f64,
    /// Speed cap of a jump while starving (sprinting is impossible).
    pub hunger_bunny_max_speed: f64,
}

impl Default for PhysicsTable {
    fn default() -> Self {
        Self {
            friction_medium_air: 0.98,
            friction_medium_water: 0.89,
            friction_medium_lava: 0.535,
            walk_speed: 0.1,

            jump_normal_walk: 1.2523,
            jump_boost_v1_max_height: 1.85,
            jump_boost_v2_max_height: 2.5,
            block_bunny_bypass_v1_min: 1.85,
            block_bunny_bypass_v1_max: 1.95,
            block_bunny_bypass_v2_min: 2.5,
            block_bunny_bypass_v2_max: 2.65,
            block_bunny_min: 0.9,
            block_bunny_max: 1.05,
            min_jump_height: 0.4,

            sprint_change_max_speed: 0.7,
            sprint_change_face_block_max_speed: 0.85,
            sprint_change_speed_addition: 0.01,
            sprint_change_speed_addition_v2: 0.02,
            sprint_change_speed_back_direction: 0.05,

            bunny_hop_max_speed: 0.95,
            bunny_hop_max_speed_max: 1.1,
            speed_boost_v1_bunny_hop: 1.25,
            speed_boost_v2_bunny_hop: 1.5,
            bunny_ice_ground_default: 1.0,
            bunny_up_block_addition: 0.3,
            bunny_hop_tiny_jump_first: 0.25,
            bunny_hop_tiny_jump_second: 0.375,
            bunny_tiny_jump_max: 0.6,
            bunny_tiny_jump_friction: 0.7,
            bunny_tiny_jump_speed_boost_v1: 0.75,
            bunny_tiny_jump_speed_boost_v2: 0.9,
            bunny_tiny_direction_height: 0.42,
            hunger_bunny_max_speed: 0.45,
        }
    }
}

impl PhysicsTable {
    /// Returns the names of entries that are negative or not finite.
    #[must_use]
    pub fn invalid_entries(&self) -> Vec<&'static str> {
        let entries = [
            ("friction_medium_air", self.friction_medium_air),
            ("friction_medium_water", self.friction_medium_water),
            ("friction_medium_lava", self.friction_medium_lava),
            ("walk_speed", self.walk_speed),
            ("jump_normal_walk", self.jump_normal_walk),
            ("jump_boost_v1_max_height", self.jump_boost_v1_max_height),
            ("jump_boost_v2_max_height", self.jump_boost_v2_max_height),
            ("block_bunny_bypass_v1_min", self.block_bunny_bypass_v1_min),
            ("block_bunny_bypass_v1_max", self.block_bunny_bypass_v1_max),
            ("block_bunny_bypass_v2_min", self.block_bunny_bypass_v2_min),
            ("block_bunny_bypass_v2_max", self.block_bunny_bypass_v2_max),
            ("block_bunny_min", self.block_bunny_min),
            ("block_bunny_max", self.block_bunny_max),
            ("min_jump_height", self.min_jump_height),
            ("sprint_change_max_speed", self.sprint_change_max_speed),
            ("sprint_change_face_block_max_speed", self.sprint_change_face_block_max_speed),
            ("sprint_change_speed_addition", self.sprint_change_speed_addition),
            ("sprint_change_speed_addition_v2", self.sprint_change_speed_addition_v2),
            ("sprint_change_speed_back_direction", self.sprint_change_speed_back_direction),
            ("bunny_hop_max_speed", self.bunny_hop_max_speed),
            ("bunny_hop_max_speed_max", self.bunny_hop_max_speed_max),
            ("speed_boost_v1_bunny_hop", self.speed_boost_v1_bunny_hop),
            ("speed_boost_v2_bunny_hop", self.speed_boost_v2_bunny_hop),
            ("bunny_ice_ground_default", self.bunny_ice_ground_default),
            ("bunny_up_block_addition", self.bunny_up_block_addition),
            ("bunny_hop_tiny_jump_first", self.bunny_hop_tiny_jump_first),
            ("bunny_hop_tiny_jump_second", self.bunny_hop_tiny_jump_second),
            ("bunny_tiny_jump_max", self.bunny_tiny_jump_max),
            ("bunny_tiny_jump_friction", self.bunny_tiny_jump_friction),
            ("bunny_tiny_jump_speed_boost_v1", self.bunny_tiny_jump_speed_boost_v1),
            ("bunny_tiny_jump_speed_boost_v2", self.bunny_tiny_jump_speed_boost_v2),
            ("bunny_tiny_direction_height", self.bunny_tiny_direction_height),
            ("hunger_bunny_max_speed", self.hunger_bunny_max_speed),
        ];
        entries
            .into_iter()
            .filter(|(_, value)| !value.is_finite() || *value < 0.0)
            .map(|(name, _)| name)
            .collect()
    }

    /// Jump height cap for a jump boost amplifier.
    #[inline]
    #[must_use]
    pub fn jump_boost_max_height(&self, amplifier: u8) -> f64 {
        if amplifier == 0 {
            self.jump_boost_v1_max_height
        } else {
            self.jump_boost_v2_max_height
        }
    }

    /// Bypass band `(min, max)` for a jump boost amplifier.
    ///
    /// Tiers above II have no band.
    #[inline]
    #[must_use]
    pub fn jump_boost_bypass_band(&self, amplifier: u8) -> Option<(f64, f64)> {
        match amplifier {
            0 => Some((self.block_bunny_bypass_v1_min, self.block_bunny_bypass_v1_max)),
            1 => Some((self.block_bunny_bypass_v2_min, self.block_bunny_bypass_v2_max)),
            _ => None,
        }
    }
}
