//! # Bunny-Hop Analyzer
//!
//! Catches horizontal speed gained by chaining jumps right after landing.
//!
//! Only runs within [`JUMP_WINDOW_MS`] of a jump and while a jump tracker is
//! live. Branches, first match wins:
//!
//! 1. **Ice**: hops on ice are judged by the ice speed tracker's window max.
//! 2. **Tiny jump**: a sub-block height matching one of the two tiny-jump
//!    heights gets tight speed caps, gated behind five consecutive overshoots.
//! 3. **Diagonal corner**: a falling diagonal move below the direction height
//!    is flagged outright.
//! 4. **Generic**: speed against the bunny-hop caps, gated behind more than
//!    three overshoots and a final 0.75 margin.

use tracing::debug;

use super::bound::Bound;
use super::data::PlayerMotionState;
use super::frame::TickFrame;
use super::tags::TickTags;
use crate::violation::{PreViolation, ViolationRecord};

/// Window after a jump in which hops are judged.
pub const JUMP_WINDOW_MS: u64 = 100;

/// Consecutive tiny-jump overshoots needed to flag.
pub const TINY_BUNNY_TICKS: u32 = 5;

/// Generic overshoots tolerated before flagging.
pub const BAD_BUNNY_HOP_TICKS: u32 = 3;

/// Short-hop overshoots tolerated before flagging while starving.
pub const SHORT_BUNNY_TICKS: u32 = 3;

/// Tiny jumps lower than this never count.
const TINY_ABS_HEIGHT_MIN: f64 = 0.1;

/// Margin subtracted from a generic overshoot before it counts.
const GENERIC_MARGIN: f64 = 0.75;

/// Judges a hop. Returns the permissive bound when the tick is clean.
pub fn analyze(
    frame: &mut TickFrame<'_>,
    state: &mut PlayerMotionState,
    record: &mut ViolationRecord,
) -> Bound {
    let Some(tracker) = state.live_movement_tracker() else {
        return Bound::ZERO;
    };
    let abs_height = tracker.abs_height();
    let within_window = state
        .ms_since_jump(frame.now_ms())
        .is_some_and(|ms| ms <= JUMP_WINDOW_MS);
    if !within_window {
        return Bound::PERMISSIVE;
    }

    if state.ice.ticks() >= 2 {
        return ice_hop(frame, state);
    }

    let physics = frame.physics;
    let sample = frame.sample;
    let speed = sample.distance();
    let tiny_height = frame.surroundings.tiny_height;
    let no_ice = !state.ice.is_recent();

    let mut limit = if frame.surroundings.head_blocked {
        physics.block_bunny_max
    } else {
        physics.bunny_hop_max_speed
    };

    // Tiny heights are exact block fractions.
    #[allow(clippy::float_cmp)]
    let tiny_jump = tiny_height == physics.bunny_hop_tiny_jump_first
        || tiny_height == physics.bunny_hop_tiny_jump_second;
    if tiny_jump {
        return tiny_hop(frame, record, speed, abs_height, no_ice);
    }

    if sample.is_diagonal()
        && tiny_height < physics.bunny_tiny_direction_height
        && speed > physics.bunny_tiny_jump_max
        && sample.dy() < 0.0
        && !frame.from_on_ground
        && !frame.to_on_ground
        && no_ice
    {
        if frame.debug {
            debug!(player = %frame.player, speed, dy = sample.dy(), tiny_height, abs_height, "corner bunny hop");
        }
        return Bound::new(speed, physics.bunny_tiny_jump_max);
    }

    if tiny_height < physics.min_jump_height {
        return Bound::PERMISSIVE;
    }

    let mut bound = Bound::new(speed, limit);
    if bound.exceeds() {
        frame.tag(TickTags::BAD_BUNNY_HOP);
        record.add_pre_vl(PreViolation::BadBunnyHop);
        limit = match frame.ctx.effects.speed {
            Some(0) => physics.speed_boost_v1_bunny_hop,
            Some(_) => physics.speed_boost_v2_bunny_hop,
            None => physics.bunny_hop_max_speed_max,
        };
        bound = Bound::new(speed, limit);
        if bound.exceeds() {
            record.add_pre_vl(PreViolation::BadBunnyHop);
        }
        if record.pre_vl(PreViolation::BadBunnyHop) > BAD_BUNNY_HOP_TICKS {
            if frame.debug {
                debug!(player = %frame.player, speed, limit, abs_height, "bad bunny hop");
            }
            record.clear_pre_vl(PreViolation::BadBunnyHop);
        } else {
            bound = Bound::PERMISSIVE;
        }
    } else {
        record.clear_pre_vl(PreViolation::BadBunnyHop);
    }

    if bound.exceeds() && bound.overshoot() - GENERIC_MARGIN > 0.0 {
        bound
    } else {
        Bound::PERMISSIVE
    }
}

fn ice_hop(frame: &mut TickFrame<'_>, state: &mut PlayerMotionState) -> Bound {
    frame.tag(TickTags::ICE_GROUND);
    let physics = frame.physics;
    let Some(tracker) = state.speed_tracker_mut() else {
        return Bound::ZERO;
    };
    if tracker.is_live() {
        return Bound::ZERO;
    }

    let allowed = tracker.max_speed();
    tracker.restart();
    let limit = if frame.surroundings.head_blocked {
        physics.bunny_ice_ground_default + physics.bunny_up_block_addition
    } else {
        physics.bunny_ice_ground_default
    };
    let bound = Bound::new(allowed, limit);
    if bound.exceeds() && frame.debug {
        debug!(player = %frame.player, allowed, limit, "ice bunny hop");
    }
    bound
}

fn tiny_hop(
    frame: &mut TickFrame<'_>,
    record: &mut ViolationRecord,
    speed: f64,
    abs_height: f64,
    no_ice: bool,
) -> Bound {
    let physics = frame.physics;
    let mut limit = physics.bunny_tiny_jump_max;
    if frame.surroundings.friction_block || frame.surroundings.face_block {
        limit = physics.bunny_tiny_jump_friction;
    }
    match frame.ctx.effects.speed {
        Some(0) => limit = physics.bunny_tiny_jump_speed_boost_v1,
        Some(_) => limit = physics.bunny_tiny_jump_speed_boost_v2,
        None => {}
    }

    if speed > limit && abs_height > TINY_ABS_HEIGHT_MIN && no_ice {
        record.add_pre_vl(PreViolation::TinyBunny);
    } else {
        record.clear_pre_vl(PreViolation::TinyBunny);
    }

    if record.pre_vl(PreViolation::TinyBunny) > TINY_BUNNY_TICKS {
        frame.tag(TickTags::BAD_TINY);
        record.clear_pre_vl(PreViolation::TinyBunny);
        if frame.debug {
            debug!(player = %frame.player, speed, limit, abs_height, "tiny bunny hop");
        }
        Bound::new(speed, limit)
    } else {
        Bound::PERMISSIVE
    }
}

/// Judges a jump while starving.
///
/// Sprinting is impossible at low food, so a hop right after a jump must stay
/// under the walking hop speed.
pub fn analyze_short_hop(
    frame: &mut TickFrame<'_>,
    state: &PlayerMotionState,
    record: &mut ViolationRecord,
) -> Bound {
    let within_window = state
        .ms_since_jump(frame.now_ms())
        .is_some_and(|ms| ms < JUMP_WINDOW_MS);
    if !within_window {
        return Bound::ZERO;
    }

    let speed = frame.sample.distance();
    let limit = frame.physics.hunger_bunny_max_speed;
    if speed <= limit {
        record.clear_pre_vl(PreViolation::ShortBunny);
        return Bound::ZERO;
    }
    if record.add_pre_vl(PreViolation::ShortBunny) > SHORT_BUNNY_TICKS {
        frame.tag(TickTags::SHORT_BUNNY);
        record.clear_pre_vl(PreViolation::ShortBunny);
        if frame.debug {
            debug!(player = %frame.player, speed, limit, "short bunny hop");
        }
        return Bound::new(speed, limit);
    }
    Bound::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moving::magic::PhysicsTable;
    use crate::moving::medium::Surroundings;
    use crate::moving::sample::{MovementSample, PlayerContext};
    use warden_core::{BlockKind, Location, PlayerId, VoxelTerrain};

    const JUMP_AT: u64 = 10_000;

    /// A player one tick into a jump from y=64.
    fn jumping_state(physics: &PhysicsTable) -> PlayerMotionState {
        let terrain = VoxelTerrain::flat(63, 4, BlockKind::Solid);
        let ctx = PlayerContext::default();
        let ground = Location::new(0.5, 64.0, 0.5);
        let mut state = PlayerMotionState::new(ground, physics);
        state.observe(&MovementSample::new(ground, ground, JUMP_AT - 50), &ctx, &terrain, true, true);
        let rise = MovementSample::new(ground, ground.offset(0.0, 0.25, 0.0), JUMP_AT);
        state.observe(&rise, &ctx, &terrain, true, false);
        state
    }

    fn frame<'a>(
        sample: &'a MovementSample,
        ctx: &'a PlayerContext,
        physics: &'a PhysicsTable,
        tiny_height: f64,
    ) -> TickFrame<'a> {
        TickFrame {
            player: PlayerId(1),
            sample,
            ctx,
            physics,
            from_on_ground: false,
            to_on_ground: false,
            surroundings: Surroundings {
                tiny_height,
                ..Surroundings::default()
            },
            bunny_bucket: 0,
            debug: false,
            tags: TickTags::empty(),
        }
    }

    fn fast_tiny_sample() -> MovementSample {
        let from = Location::new(0.5, 64.0, 0.5);
        MovementSample::new(from, from.offset(0.7, 0.25, 0.0), JUMP_AT + 50)
    }

    #[test]
    fn test_tiny_hysteresis_fires_after_five_ticks() {
        let physics = PhysicsTable::default();
        let ctx = PlayerContext::default();
        let mut state = jumping_state(&physics);
        let mut record = ViolationRecord::new();
        let sample = fast_tiny_sample();

        for _ in 0..TINY_BUNNY_TICKS {
            let mut frame = frame(&sample, &ctx, &physics, 0.25);
            assert!(!analyze(&mut frame, &mut state, &mut record).exceeds());
            assert!(!frame.tags.contains(TickTags::BAD_TINY));
        }
        assert_eq!(record.pre_vl(PreViolation::TinyBunny), TINY_BUNNY_TICKS);

        let mut frame = frame(&sample, &ctx, &physics, 0.25);
        assert!(analyze(&mut frame, &mut state, &mut record).exceeds());
        assert!(frame.tags.contains(TickTags::BAD_TINY));
        assert_eq!(record.pre_vl(PreViolation::TinyBunny), 0);
    }

    #[test]
    fn test_tiny_hysteresis_resets_on_clean_tick() {
        let physics = PhysicsTable::default();
        let ctx = PlayerContext::default();
        let mut state = jumping_state(&physics);
        let mut record = ViolationRecord::new();
        let fast = fast_tiny_sample();
        let from = Location::new(0.5, 64.0, 0.5);
        let slow = MovementSample::new(from, from.offset(0.2, 0.25, 0.0), JUMP_AT + 50);

        for round in 0..3 {
            for _ in 0..4 {
                let mut frame = frame(&fast, &ctx, &physics, 0.375);
                assert!(!analyze(&mut frame, &mut state, &mut record).exceeds(), "round {round}");
            }
            let mut frame = frame(&slow, &ctx, &physics, 0.375);
            assert!(!analyze(&mut frame, &mut state, &mut record).exceeds());
            assert_eq!(record.pre_vl(PreViolation::TinyBunny), 0);
        }
    }

    #[test]
    fn test_outside_jump_window_is_clean() {
        let physics = PhysicsTable::default();
        let ctx = PlayerContext::default();
        let mut state = jumping_state(&physics);
        let mut record = ViolationRecord::new();
        let from = Location::new(0.5, 64.0, 0.5);
        let late = MovementSample::new(from, from.offset(3.0, 0.5, 0.0), JUMP_AT + 150);
        let mut frame = frame(&late, &ctx, &physics, 0.5);
        assert_eq!(analyze(&mut frame, &mut state, &mut record), Bound::PERMISSIVE);
    }

    #[test]
    fn test_generic_overshoot_needs_hysteresis_and_margin() {
        let physics = PhysicsTable::default();
        let ctx = PlayerContext::default();
        let mut state = jumping_state(&physics);
        let mut record = ViolationRecord::new();
        let from = Location::new(0.5, 64.0, 0.5);
        let teleport = MovementSample::new(from, from.offset(2.5, 0.5, 0.0), JUMP_AT + 50);

        // Each overshoot of both caps counts twice.
        let mut frame_one = frame(&teleport, &ctx, &physics, 0.5);
        assert!(!analyze(&mut frame_one, &mut state, &mut record).exceeds());
        assert!(frame_one.tags.contains(TickTags::BAD_BUNNY_HOP));
        assert_eq!(record.pre_vl(PreViolation::BadBunnyHop), 2);

        let mut frame_two = frame(&teleport, &ctx, &physics, 0.5);
        let bound = analyze(&mut frame_two, &mut state, &mut record);
        assert!(bound.exceeds());
        assert_eq!(bound.limit, physics.bunny_hop_max_speed_max);
    }

    #[test]
    fn test_low_hop_is_never_generic_violation() {
        let physics = PhysicsTable::default();
        let ctx = PlayerContext::default();
        let mut state = jumping_state(&physics);
        let mut record = ViolationRecord::new();
        let from = Location::new(0.5, 64.0, 0.5);
        let fast = MovementSample::new(from, from.offset(2.5, 0.1, 0.0), JUMP_AT + 50);
        for _ in 0..10 {
            let mut frame = frame(&fast, &ctx, &physics, 0.1);
            assert!(!analyze(&mut frame, &mut state, &mut record).exceeds());
        }
    }

    #[test]
    fn test_corner_hop_flags_directly() {
        let physics = PhysicsTable::default();
        let ctx = PlayerContext::default();
        let mut state = jumping_state(&physics);
        let mut record = ViolationRecord::new();
        let from = Location::new(0.5, 64.3, 0.5);
        let corner = MovementSample::new(from, from.offset(0.6, -0.05, 0.6), JUMP_AT + 50);
        let mut frame = frame(&corner, &ctx, &physics, 0.3);
        let bound = analyze(&mut frame, &mut state, &mut record);
        assert!(bound.exceeds());
        assert_eq!(bound.limit, physics.bunny_tiny_jump_max);
    }

    #[test]
    fn test_short_hop_while_starving() {
        let physics = PhysicsTable::default();
        let ctx = PlayerContext {
            food_level: 4,
            ..PlayerContext::default()
        };
        let state = jumping_state(&physics);
        let mut record = ViolationRecord::new();
        let from = Location::new(0.5, 64.0, 0.5);
        let hop = MovementSample::new(from, from.offset(0.6, 0.1, 0.0), JUMP_AT + 50);

        for _ in 0..SHORT_BUNNY_TICKS {
            let mut frame = frame(&hop, &ctx, &physics, 0.1);
            assert!(!analyze_short_hop(&mut frame, &state, &mut record).exceeds());
        }
        let mut frame = frame(&hop, &ctx, &physics, 0.1);
        assert!(analyze_short_hop(&mut frame, &state, &mut record).exceeds());
        assert!(frame.tags.contains(TickTags::SHORT_BUNNY));
    }
}
