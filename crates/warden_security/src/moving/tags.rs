//! # Tick Tags
//!
//! Diagnostic flags raised while evaluating one movement sample.
//!
//! A fresh [`TickTags`] is created for every evaluation and dropped with the
//! [`CheckOutcome`](crate::moving::CheckOutcome); tags never persist across
//! ticks. Some tags also steer later stages of the same evaluation (for
//! example [`TickTags::FACE_BLOCK`] relaxes the jump-height bound).

use bitflags::bitflags;

bitflags! {
    /// Set of per-tick diagnostic tags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TickTags: u32 {
        /// Player is (or was just) sprinting.
        const SPRINT = 1 << 0;
        /// Sprint was lost while airborne.
        const LOSE_SPRINT = 1 << 1;
        /// Sprint loss ended by landing.
        const INVALIDATE_LOSE_SPRINT = 1 << 2;
        /// Jump boost active.
        const EFFECT_JUMP = 1 << 3;
        /// Speed effect active.
        const EFFECT_SPEED = 1 << 4;
        /// Food level at or below the starving threshold.
        const HUNGER = 1 << 5;
        /// Stairs or slab under the player.
        const STAIR_SLAB = 1 << 6;
        /// Airborne long enough without falling.
        const FLYING = 1 << 7;
        /// A block is in front of the player.
        const FACE_BLOCK = 1 << 8;
        /// A block touches the player's left or right side.
        const FRICTION_BLOCK = 1 << 9;
        /// Walking on the ground, no jump height tracked.
        const GROUND_WALK = 1 << 10;
        /// A jump is in progress.
        const BUNNY_HOP = 1 << 11;
        /// Airborne tick count did not advance.
        const SAME_AT = 1 << 12;
        /// Nothing solid anywhere around the player.
        const FULL_AIR = 1 << 13;
        /// Airborne for 300 ticks or more.
        const LONG_FLY = 1 << 14;
        /// Jump chained on ice.
        const ICE_GROUND = 1 << 15;
        /// Tiny-jump hysteresis fired.
        const BAD_TINY = 1 << 16;
        /// Generic bunny-hop overshoot.
        const BAD_BUNNY_HOP = 1 << 17;
        /// Short hop while starving exceeded its cap.
        const SHORT_BUNNY = 1 << 18;
        /// Falling along a valid free-fall trajectory.
        const VANILLA_FALL = 1 << 19;
        /// A ghost-block allowance is in effect.
        const GHOST_LAG = 1 << 20;
    }
}

impl TickTags {
    /// Lower-case tag names in bit order, for debug output.
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.iter_names().map(|(name, _)| name.to_ascii_lowercase())
    }
}

impl std::fmt::Display for TickTags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("empty")?;
        for name in self.names() {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}
