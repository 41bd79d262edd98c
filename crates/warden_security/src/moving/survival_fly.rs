//! # Survival Fly Check
//!
//! Sequences the movement analyzers once per sample and turns their bounds
//! into a [`CheckOutcome`].
//!
//! ## Per-Sample Pipeline
//!
//! ```text
//! sample ─► ground probes ─► motion state ─► lose sprint ─► next friction
//!                                                              │
//!   ┌──────────────────────────────────────────────────────────┘
//!   ▼
//! ghost tracker ─► bunny bucket ─► context tags ─► air analyzer (not in liquid)
//!                                                      │
//!   ┌──────────────────────────────────────────────────┘
//!   ▼
//! full-air injection ─► ghost cancel ─► last ground ─► decay ─► outcome
//! ```

use std::sync::Arc;

use tracing::debug;
use warden_core::{Location, PlayerId, TerrainQuery};

use super::air;
use super::data::PlayerMotionState;
use super::frame::TickFrame;
use super::ghost;
use super::medium::{classify_medium, is_on_ground, Surroundings};
use super::sample::{BlockPlaceSample, MovementSample, PlayerContext};
use super::tags::TickTags;
use crate::config::CheckConfig;
use crate::violation::{CheckType, ViolationBook, DECAY_FACTOR};

/// Full-air ticks tolerated before the standalone violation.
pub const FULL_AIR_TICKS_MAX: u32 = 7;

/// Score per full-air tick.
const FULL_AIR_SCORE: f64 = 1.3;

/// Lose-sprint ticks after which landing no longer counts as sprinting.
const LOSE_SPRINT_GRACE: u32 = 3;

/// Hundreds of milliseconds since the jump, rounded half to even.
///
/// Ticks land on 50 ms boundaries, so ties are the common case: 50 ms is
/// bucket 0 and 250 ms is bucket 2.
#[inline]
#[must_use]
pub fn bunny_bucket(ms_since_jump: u64) -> u64 {
    let (bucket, rest) = (ms_since_jump / 100, ms_since_jump % 100);
    if rest > 50 || (rest == 50 && bucket % 2 == 1) {
        bucket + 1
    } else {
        bucket
    }
}

/// Result of checking one movement sample.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckOutcome {
    /// Violation score added this tick.
    pub vl_delta: f64,
    /// Violation level after decay.
    pub violation_level: f64,
    /// Where to teleport the player back to, if anywhere.
    pub setback: Option<Location>,
    /// Drop the packet that carried the sample.
    pub cancel: bool,
    /// Diagnostic tags raised this tick.
    pub tags: TickTags,
}

impl CheckOutcome {
    /// Outcome of a sample the check did not look at.
    #[must_use]
    pub fn skipped(violation_level: f64) -> Self {
        Self {
            vl_delta: 0.0,
            violation_level,
            setback: None,
            cancel: false,
            tags: TickTags::empty(),
        }
    }

    /// Returns true if the sample needs no corrective action and scored nothing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.vl_delta == 0.0 && self.setback.is_none() && !self.cancel
    }
}

/// The survival movement check.
#[derive(Clone, Debug)]
pub struct SurvivalFly {
    config: Arc<CheckConfig>,
}

impl SurvivalFly {
    /// Category this check reports under.
    pub const CHECK: CheckType = CheckType::SurvivalFly;

    /// Creates the check.
    #[must_use]
    pub fn new(config: Arc<CheckConfig>) -> Self {
        Self { config }
    }

    /// Shared configuration.
    #[must_use]
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Checks one movement sample.
    pub fn check(
        &self,
        player: PlayerId,
        state: &mut PlayerMotionState,
        violations: &mut ViolationBook,
        sample: &MovementSample,
        ctx: &PlayerContext,
        terrain: &dyn TerrainQuery,
    ) -> CheckOutcome {
        let settings = self.config.settings(Self::CHECK);
        let record = violations.record_mut(Self::CHECK);
        if ctx.game_mode.is_movement_exempt() || !settings.enabled {
            return CheckOutcome::skipped(record.level());
        }

        let physics = &self.config.physics;
        let from_on_ground = is_on_ground(terrain, sample.from);
        let to_on_ground = is_on_ground(terrain, sample.to);
        state.observe(sample, ctx, terrain, from_on_ground, to_on_ground);

        let mut frame = TickFrame {
            player,
            sample,
            ctx,
            physics,
            from_on_ground,
            to_on_ground,
            surroundings: Surroundings::scan(terrain, sample.to, ctx.facing),
            bunny_bucket: 0,
            debug: self.config.debug,
            tags: TickTags::empty(),
        };

        let mut sprinting = ctx.sprinting;
        if state.lose_sprint_count > 0 {
            if to_on_ground && (from_on_ground || sample.dy() < physics.walk_speed) {
                sprinting |= state.lose_sprint_count < LOSE_SPRINT_GRACE;
                state.lose_sprint_count = 0;
                frame.tag(TickTags::INVALIDATE_LOSE_SPRINT);
            } else {
                sprinting = true;
                frame.tag(TickTags::LOSE_SPRINT);
                if state.lose_sprint_count < LOSE_SPRINT_GRACE && to_on_ground {
                    state.lose_sprint_count = 0;
                }
            }
        }
        if sprinting {
            frame.tag(TickTags::SPRINT);
        }

        state.set_next_medium(classify_medium(terrain, sample.from, sample.to), physics);

        let ghost_cancel = match ghost::advance(state, terrain) {
            Some(bound) => {
                if bound.allowed > 0.0 {
                    frame.tag(TickTags::GHOST_LAG);
                }
                ghost::cancels(&bound)
            }
            None => false,
        };

        if state.is_jump {
            frame.bunny_bucket = state
                .ms_since_jump(sample.timestamp_ms)
                .map_or(0, bunny_bucket);
        }

        if ctx.effects.jump_boost.is_some() {
            frame.tag(TickTags::EFFECT_JUMP);
        }
        if ctx.effects.speed.is_some() {
            frame.tag(TickTags::EFFECT_SPEED);
        }
        if ctx.is_hungry() {
            frame.tag(TickTags::HUNGER);
        }
        if frame.surroundings.stair_slab_below {
            frame.tag(TickTags::STAIR_SLAB);
        }

        let mut vl_delta = 0.0;
        if !state.liquid.is_recent() {
            let bound = air::analyze(&mut frame, state, record);
            if bound.exceeds() {
                let score = bound.score();
                record.add(score);
                vl_delta += score;
            }
        }

        if state.full_air_ticks > FULL_AIR_TICKS_MAX {
            let score = f64::from(state.full_air_ticks) * FULL_AIR_SCORE;
            state.full_air_ticks = 0;
            record.add(score);
            vl_delta += score;
            record.set_lag_back(state.last_ground);
        }

        if ghost_cancel {
            record.set_cancel();
        }

        if frame.debug {
            debug!(player = %player, tags = %frame.tags, level = record.level(), "survival fly");
        }

        if !record.is_cheat(settings.cancel_threshold) && from_on_ground && to_on_ground {
            state.last_ground = sample.to;
        }
        record.decay(DECAY_FACTOR);
        state.last_in_air_ticks = ctx.in_air_ticks;

        let setback = record.take_lag_back();
        let over_threshold = settings.enable_cancel && record.is_cheat(settings.cancel_threshold);
        let client_owned = setback.is_some() && !self.config.server_authoritative_movement;
        let cancel = record.take_cancel() || over_threshold || client_owned;

        CheckOutcome {
            vl_delta,
            violation_level: record.level(),
            setback,
            cancel,
            tags: frame.tags,
        }
    }

    /// Arms the ghost-block tracker for a placement.
    pub fn on_block_place(
        &self,
        state: &mut PlayerMotionState,
        place: &BlockPlaceSample,
        terrain: &dyn TerrainQuery,
    ) {
        if self.config.settings(Self::CHECK).enabled {
            ghost::arm(state, place, terrain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{BlockKind, GameMode, VoxelTerrain};

    fn check() -> SurvivalFly {
        SurvivalFly::new(Arc::new(CheckConfig::default()))
    }

    fn setup() -> (PlayerMotionState, ViolationBook, VoxelTerrain) {
        let config = CheckConfig::default();
        let state = PlayerMotionState::new(Location::new(0.5, 64.0, 0.5), &config.physics);
        (state, ViolationBook::new(), VoxelTerrain::flat(63, 8, BlockKind::Solid))
    }

    #[test]
    fn test_bunny_bucket_rounds_half_to_even() {
        assert_eq!(bunny_bucket(0), 0);
        assert_eq!(bunny_bucket(50), 0);
        assert_eq!(bunny_bucket(51), 1);
        assert_eq!(bunny_bucket(100), 1);
        assert_eq!(bunny_bucket(150), 2);
        assert_eq!(bunny_bucket(200), 2);
        assert_eq!(bunny_bucket(250), 2);
        assert_eq!(bunny_bucket(350), 4);
    }

    #[test]
    fn test_first_air_tick_skips_sprint_change() {
        let check = check();
        let (mut state, mut book, terrain) = setup();
        let ground = Location::new(0.5, 64.0, 0.5);
        let sprint = |in_air_ticks| PlayerContext {
            sprinting: true,
            in_air_ticks,
            effects: warden_core::Effects {
                jump_boost: Some(1),
                speed: None,
            },
            ..PlayerContext::default()
        };

        let standing = MovementSample::new(ground, ground, 950);
        check.check(PlayerId(1), &mut state, &mut book, &standing, &sprint(0), &terrain);
        let jump = MovementSample::new(ground, ground.offset(0.3, 0.5, 0.0), 1_000);
        check.check(PlayerId(1), &mut state, &mut book, &jump, &sprint(0), &terrain);
        assert_eq!(state.last_jump_ms, Some(1_000));

        // 50 ms after the jump is bucket 0: a fast first air tick is not a
        // sprint change.
        let from = jump.to;
        let fast = MovementSample::new(from, from.offset(0.75, 0.4, 0.0), 1_050);
        let outcome = check.check(PlayerId(1), &mut state, &mut book, &fast, &sprint(1), &terrain);
        assert!(outcome.is_clean(), "{outcome:?}");
    }

    #[test]
    fn test_standing_still_is_clean() {
        let check = check();
        let (mut state, mut book, terrain) = setup();
        let at = Location::new(0.5, 64.0, 0.5);
        for tick in 0..100 {
            let sample = MovementSample::new(at, at, tick * 50);
            let outcome = check.check(PlayerId(1), &mut state, &mut book, &sample, &PlayerContext::default(), &terrain);
            assert!(outcome.is_clean(), "tick {tick}: {outcome:?}");
        }
    }

    #[test]
    fn test_creative_is_skipped() {
        let check = check();
        let (mut state, mut book, terrain) = setup();
        let ctx = PlayerContext {
            game_mode: GameMode::Creative,
            in_air_ticks: 400,
            ..PlayerContext::default()
        };
        let from = Location::new(0.5, 90.0, 0.5);
        let sample = MovementSample::new(from, from.offset(0.0, 1.0, 0.0), 0);
        let outcome = check.check(PlayerId(1), &mut state, &mut book, &sample, &ctx, &terrain);
        assert_eq!(outcome, CheckOutcome::skipped(0.0));
    }

    #[test]
    fn test_disabled_check_is_skipped() {
        let mut config = CheckConfig::default();
        config.checks.survival_fly.enabled = false;
        let check = SurvivalFly::new(Arc::new(config));
        let (mut state, mut book, terrain) = setup();
        let ctx = PlayerContext {
            in_air_ticks: 400,
            ..PlayerContext::default()
        };
        let from = Location::new(0.5, 90.0, 0.5);
        let sample = MovementSample::new(from, from.offset(0.0, 1.0, 0.0), 0);
        assert!(check.check(PlayerId(1), &mut state, &mut book, &sample, &ctx, &terrain).is_clean());
    }

    #[test]
    fn test_last_ground_follows_clean_walk() {
        let check = check();
        let (mut state, mut book, terrain) = setup();
        let from = Location::new(0.5, 64.0, 0.5);
        let to = Location::new(0.7, 64.0, 0.5);
        let sample = MovementSample::new(from, to, 0);
        check.check(PlayerId(1), &mut state, &mut book, &sample, &PlayerContext::default(), &terrain);
        assert_eq!(state.last_ground, to);
    }

    #[test]
    fn test_full_air_injection() {
        let check = check();
        let (mut state, mut book, terrain) = setup();
        let ctx = PlayerContext {
            in_air_ticks: 20,
            ..PlayerContext::default()
        };
        state.last_in_air_ticks = 20;
        let at = Location::new(100.5, 90.0, 100.5);
        let sample = MovementSample::new(at, at.offset(0.1, 0.0, 0.0), 0);

        let mut injected = None;
        for _ in 0..10 {
            let outcome = check.check(PlayerId(1), &mut state, &mut book, &sample, &ctx, &terrain);
            assert!(outcome.tags.contains(TickTags::FULL_AIR));
            if outcome.vl_delta > 0.0 {
                injected = Some(outcome);
                break;
            }
        }
        let outcome = injected.unwrap();
        assert!((outcome.vl_delta - 8.0 * 1.3).abs() < 1e-9);
        assert_eq!(outcome.setback, Some(Location::new(0.5, 64.0, 0.5)));
        assert_eq!(state.full_air_ticks, 0);
    }

    #[test]
    fn test_client_authoritative_lag_back_cancels() {
        let config = CheckConfig {
            server_authoritative_movement: false,
            ..CheckConfig::default()
        };
        let check = SurvivalFly::new(Arc::new(config));
        let (mut state, mut book, terrain) = setup();
        let ctx = PlayerContext {
            in_air_ticks: 300,
            ..PlayerContext::default()
        };
        let from = Location::new(0.5, 90.0, 0.5);
        let sample = MovementSample::new(from, from.offset(0.0, 0.1, 0.0), 0);
        let outcome = check.check(PlayerId(1), &mut state, &mut book, &sample, &ctx, &terrain);
        assert!(outcome.tags.contains(TickTags::LONG_FLY));
        assert!(outcome.setback.is_some());
        assert!(outcome.cancel);
    }
}
