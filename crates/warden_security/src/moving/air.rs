//! # Vertical / Air Distance Analyzer
//!
//! Computes the tick's `(allowed, limit)` bound for vertical motion and
//! airborne behaviour.
//!
//! ## Evaluation Order
//!
//! ```text
//! free-fall validator ──► vanilla fall / flying classification
//!         │
//!         ▼
//! jump height (live movement tracker)
//!         │
//!         ▼
//! sprint change (bunny bucket 1-2)
//!         │
//!         ▼
//! flight: level hover, stuck in open air, long flight
//!         │
//!         ▼
//! bunny hop, short hop when starving
//! ```
//!
//! Any overshoot requests a lag-back to the last ground location.

use tracing::debug;

use super::bound::Bound;
use super::bunny;
use super::data::PlayerMotionState;
use super::fall;
use super::frame::TickFrame;
use super::tags::TickTags;
use super::tracker::MovementTracker;
use crate::violation::ViolationRecord;

/// Airborne ticks after which falling and flying are told apart.
pub const FALL_AIR_TICKS: u32 = 15;

/// Airborne ticks after which level flight is judged.
pub const HOVER_AIR_TICKS: u32 = 30;

/// Height gain above the last ground that makes level flight a violation.
pub const HOVER_HEIGHT_GAIN: f64 = 1.57;

/// Airborne ticks that always count as flying (15 s at 20 Hz).
pub const LONG_FLY_TICKS: u32 = 300;

/// Airborne ticks during which the early sprint allowance applies.
const EARLY_AIR_TICKS: u32 = 5;

/// Judges the tick's vertical motion.
pub fn analyze(
    frame: &mut TickFrame<'_>,
    state: &mut PlayerMotionState,
    record: &mut ViolationRecord,
) -> Bound {
    let sample = frame.sample;
    let dy = sample.dy();
    let in_air = frame.ctx.in_air_ticks;

    let valid_fall = fall::is_free_fall(state, sample.horizontal_distance());
    if !valid_fall {
        state.clear_history();
    }
    let vanilla_fall = valid_fall && in_air > FALL_AIR_TICKS && dy < 0.0;
    let flying = !vanilla_fall && in_air > FALL_AIR_TICKS && dy >= 0.0;
    if vanilla_fall {
        frame.tag(TickTags::VANILLA_FALL);
    }
    if flying && !frame.from_on_ground && !frame.to_on_ground {
        frame.tag(TickTags::FLYING);
    }
    if frame.surroundings.face_block {
        frame.tag(TickTags::FACE_BLOCK);
    }
    if frame.surroundings.friction_block {
        frame.tag(TickTags::FRICTION_BLOCK);
    }

    let mut bound = Bound::PERMISSIVE;
    let mut lag_back = false;
    let mut bunny_candidate = false;

    if let Some(height) = state.live_movement_tracker().map(MovementTracker::height) {
        if height == 0.0 {
            frame.tag(TickTags::GROUND_WALK);
        } else {
            frame.tag(TickTags::BUNNY_HOP);
            bound = jump_height(frame, state, height);
            bunny_candidate = !frame.has(TickTags::EFFECT_JUMP | TickTags::STAIR_SLAB);
            if bound.exceeds() {
                lag_back = true;
                if frame.debug {
                    debug!(player = %frame.player, allowed = bound.allowed, limit = bound.limit, "jump height");
                }
            }
        }
    }

    if frame.has(TickTags::SPRINT) && !bunny_candidate && (1..=2).contains(&frame.bunny_bucket) {
        bound = sprint_change(frame, state, in_air);
        if bound.exceeds() {
            lag_back = true;
            if frame.debug {
                debug!(player = %frame.player, allowed = bound.allowed, limit = bound.limit, "sprint change");
            }
        }
    }

    if flying {
        let gain = sample.to.y - state.last_ground.y;
        if in_air >= HOVER_AIR_TICKS && dy == 0.0 && gain >= HOVER_HEIGHT_GAIN {
            lag_back = true;
            bound = Bound::new(f64::from(in_air) * 0.15 + gain * 10.0, 0.0);
            if frame.debug {
                debug!(player = %frame.player, in_air, gain, "level flight");
            }
        } else if in_air == state.last_in_air_ticks {
            frame.tag(TickTags::SAME_AT);
            if frame.surroundings.full_air {
                frame.tag(TickTags::FULL_AIR);
                state.full_air_ticks += 1;
                if !state.is_jump {
                    lag_back = true;
                }
            }
        }
        if in_air >= LONG_FLY_TICKS {
            frame.tag(TickTags::LONG_FLY);
            lag_back = true;
        }
    }

    if bunny_candidate {
        let hop = bunny::analyze(frame, state, record);
        if hop.exceeds() {
            bound = hop;
            lag_back = true;
        } else if frame.has(TickTags::HUNGER) {
            let short = bunny::analyze_short_hop(frame, state, record);
            if short.exceeds() {
                bound = short;
                lag_back = true;
            }
        }
    }

    if lag_back {
        record.set_lag_back(state.last_ground);
        if frame.debug {
            debug!(player = %frame.player, setback = ?state.last_ground, "lag back");
        }
    }
    bound
}

/// Jump height against the effect-dependent cap.
fn jump_height(frame: &TickFrame<'_>, state: &PlayerMotionState, height: f64) -> Bound {
    let physics = frame.physics;
    let surroundings = &frame.surroundings;
    let sample = frame.sample;
    let dy = sample.dy();

    let mut bound = match frame.ctx.effects.jump_boost {
        Some(amplifier) => {
            let mut limit = physics.jump_boost_max_height(amplifier);
            if let Some((low, high)) = physics.jump_boost_bypass_band(amplifier) {
                if (low..=high).contains(&height) {
                    limit = height;
                }
            }
            Bound::new(height, limit)
        }
        None => Bound::new(height, physics.jump_normal_walk),
    };

    if frame.has(TickTags::STAIR_SLAB) {
        bound = Bound::ZERO;
        let step = sample.from.distance_squared(sample.to);
        if dy > 0.0 {
            if step < 0.1 && dy < 0.3 && height < 0.5 {
                bound = Bound::new(step + 0.1, 0.1);
            }
        } else if dy < -0.5 {
            bound = Bound::new(dy.abs(), 0.5);
        }
    } else if state.slab.is_recent() || state.stair.is_recent() || surroundings.stair_slab_behind {
        bound.allowed = bound.limit;
    }

    bound.limit += frame.ctx.ping_tolerance();

    let step_up = (physics.block_bunny_min..=physics.block_bunny_max).contains(&bound.allowed);
    if step_up || frame.has(TickTags::FACE_BLOCK | TickTags::FRICTION_BLOCK | TickTags::LOSE_SPRINT) {
        bound.allowed = bound.limit;
    }
    bound
}

/// Horizontal speed right after a sprint jump.
fn sprint_change(frame: &TickFrame<'_>, state: &PlayerMotionState, in_air: u32) -> Bound {
    let physics = frame.physics;
    let mut limit = if frame.has(TickTags::FACE_BLOCK) {
        physics.sprint_change_face_block_max_speed
    } else {
        physics.sprint_change_max_speed
    };
    if frame.has(TickTags::LOSE_SPRINT) && in_air > EARLY_AIR_TICKS {
        limit += physics.sprint_change_speed_addition * f64::from(in_air);
    }
    if in_air <= EARLY_AIR_TICKS {
        limit += physics.sprint_change_speed_addition_v2 * f64::from(in_air);
    }
    if state.lose_sprint_count >= 2 {
        limit += f64::from(state.lose_sprint_count) * physics.sprint_change_speed_back_direction;
    }
    Bound::new(state.air_max_speed, limit)
}
