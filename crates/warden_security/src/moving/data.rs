//! # Player Motion State
//!
//! Everything the movement check remembers about one player between ticks.
//!
//! Owned by the player's session and mutated only by
//! [`SurvivalFly`](crate::moving::SurvivalFly) for that player; samples must
//! be applied in arrival order because histories and counters are
//! difference-based.

use std::collections::VecDeque;

use warden_core::{BlockKind, Location, TerrainQuery};

use super::magic::PhysicsTable;
use super::medium::{Friction, Medium};
use super::sample::{MovementSample, PlayerContext};
use super::tracker::{GhostBlockTracker, MovementTracker, SpeedTracker, TrackerPhase};

/// Capacity of the position/speed/vertical-delta histories.
pub const HISTORY_CAPACITY: usize = 20;

/// Upper bound of the recent-contact counters.
pub const CONTACT_TICKS_MAX: u8 = 10;

/// Recent-contact counter: climbs by one per tick of contact, drains by one
/// per tick without.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactCounter(u8);

impl ContactCounter {
    /// Records one tick.
    pub fn update(&mut self, touching: bool) {
        self.0 = if touching {
            (self.0 + 1).min(CONTACT_TICKS_MAX)
        } else {
            self.0.saturating_sub(1)
        };
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u8 {
        self.0
    }

    /// Returns true if the counter has not drained yet.
    #[inline]
    #[must_use]
    pub const fn is_recent(self) -> bool {
        self.0 > 0
    }
}

/// One recorded tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Where the player ended the tick.
    pub location: Location,
    /// Distance travelled during the tick.
    pub speed: f64,
    /// Vertical delta of the tick.
    pub motion_y: f64,
}

/// Per-player movement memory.
#[derive(Clone, Debug)]
pub struct PlayerMotionState {
    /// Drag in effect this tick.
    pub friction: Friction,
    /// Drag classified at the end of the last tick, latched next tick.
    pub next_friction: Friction,
    /// Timestamp of the last detected jump.
    pub last_jump_ms: Option<u64>,
    /// A jump is in progress (rising since leaving the ground).
    pub is_jump: bool,
    /// Consecutive ticks since sprint was dropped.
    pub lose_sprint_count: u32,
    /// Whether the previous sample reported sprinting.
    pub was_sprinting: bool,
    /// Consecutive ticks stuck in open air.
    pub full_air_ticks: u32,
    /// Airborne tick count reported with the previous sample.
    pub last_in_air_ticks: u32,
    /// Last location where the player stood on both ends of a clean tick.
    pub last_ground: Location,
    /// Highest horizontal speed since the player left the ground.
    pub air_max_speed: f64,
    /// Recent liquid contact.
    pub liquid: ContactCounter,
    /// Recent ice contact.
    pub ice: ContactCounter,
    /// Recent stair contact.
    pub stair: ContactCounter,
    /// Recent slab contact.
    pub slab: ContactCounter,
    history: VecDeque<HistoryEntry>,
    movement_tracker: Option<MovementTracker>,
    speed_tracker: Option<SpeedTracker>,
    ghost_tracker: Option<GhostBlockTracker>,
}

impl PlayerMotionState {
    /// Creates the state for a player who spawned at `spawn`.
    #[must_use]
    pub fn new(spawn: Location, physics: &PhysicsTable) -> Self {
        let friction = Friction::initial(physics);
        Self {
            friction,
            next_friction: friction,
            last_jump_ms: None,
            is_jump: false,
            lose_sprint_count: 0,
            was_sprinting: false,
            full_air_ticks: 0,
            last_in_air_ticks: 0,
            last_ground: spawn,
            air_max_speed: 0.0,
            liquid: ContactCounter::default(),
            ice: ContactCounter::default(),
            stair: ContactCounter::default(),
            slab: ContactCounter::default(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            movement_tracker: None,
            speed_tracker: None,
            ghost_tracker: None,
        }
    }

    /// Applies one sample to the state before any analyzer runs.
    ///
    /// Latches friction, records history, updates contact counters, detects
    /// jumps, tracks sprint loss and advances the movement and speed trackers.
    pub fn observe(
        &mut self,
        sample: &MovementSample,
        ctx: &PlayerContext,
        terrain: &dyn TerrainQuery,
        from_on_ground: bool,
        to_on_ground: bool,
    ) {
        self.friction = self.next_friction;

        let dy = sample.dy();
        let landed = !from_on_ground && to_on_ground;
        if landed {
            self.is_jump = false;
            self.clear_history();
        } else if from_on_ground && !to_on_ground && dy > 0.0 {
            self.is_jump = true;
            self.last_jump_ms = Some(sample.timestamp_ms);
        } else if dy <= 0.0 {
            self.is_jump = false;
        }
        if from_on_ground && to_on_ground {
            self.clear_history();
        }
        self.push_history(HistoryEntry {
            location: sample.to,
            speed: sample.distance(),
            motion_y: dy,
        });

        let horizontal = sample.horizontal_distance();
        self.air_max_speed = if from_on_ground && to_on_ground {
            horizontal
        } else {
            self.air_max_speed.max(horizontal)
        };
        if to_on_ground {
            self.full_air_ticks = 0;
        }

        let feet = terrain.block_at_location(sample.to);
        let under = terrain.block_at_location(sample.to.offset(0.0, -0.5, 0.0));
        let from_block = terrain.block_at_location(sample.from);
        self.liquid.update(feet.is_liquid() || from_block.is_liquid());
        self.ice.update(under.is_ice());
        self.stair.update(under.kind == BlockKind::Stairs);
        self.slab.update(under.kind == BlockKind::Slab);

        if ctx.sprinting {
            self.was_sprinting = true;
            self.lose_sprint_count = 0;
        } else if self.was_sprinting || self.lose_sprint_count > 0 {
            self.was_sprinting = false;
            self.lose_sprint_count += 1;
        }

        self.update_movement_tracker(sample, to_on_ground, landed);
        self.update_speed_tracker(under.is_ice(), horizontal);
    }

    fn update_movement_tracker(&mut self, sample: &MovementSample, to_on_ground: bool, landed: bool) {
        let stale = self
            .movement_tracker
            .as_ref()
            .map_or(true, |t| t.phase() == TrackerPhase::Expired || t.height() > 0.0);
        if landed || (to_on_ground && sample.dy() <= 0.0 && stale) {
            self.movement_tracker = Some(MovementTracker::new(sample.to.y));
        }
        if let Some(tracker) = self.movement_tracker.as_mut() {
            tracker.tick(sample.to.y);
        }
    }

    fn update_speed_tracker(&mut self, on_ice: bool, horizontal: f64) {
        if on_ice && self.speed_tracker.is_none() {
            self.speed_tracker = Some(SpeedTracker::new());
        }
        if !self.ice.is_recent() {
            self.speed_tracker = None;
        }
        if let Some(tracker) = self.speed_tracker.as_mut() {
            tracker.tick(horizontal);
        }
    }

    /// Latches the friction the classifier picked for the next tick.
    pub fn set_next_medium(&mut self, medium: Medium, physics: &PhysicsTable) {
        self.next_friction = medium.friction(physics);
    }

    /// Milliseconds since the last jump, or `None` if the player never jumped.
    #[inline]
    #[must_use]
    pub fn ms_since_jump(&self, now_ms: u64) -> Option<u64> {
        self.last_jump_ms.map(|last| now_ms.saturating_sub(last))
    }

    /// Appends a tick to the history, evicting the oldest beyond capacity.
    pub fn push_history(&mut self, entry: HistoryEntry) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    /// Recorded ticks, oldest first.
    #[must_use]
    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    /// Drops every recorded tick.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Jump tracker, if any.
    #[must_use]
    pub fn movement_tracker(&self) -> Option<&MovementTracker> {
        self.movement_tracker.as_ref()
    }

    /// Jump tracker that is currently live.
    #[must_use]
    pub fn live_movement_tracker(&self) -> Option<&MovementTracker> {
        self.movement_tracker.as_ref().filter(|t| t.is_live())
    }

    /// Ice speed tracker, if any.
    #[must_use]
    pub fn speed_tracker(&self) -> Option<&SpeedTracker> {
        self.speed_tracker.as_ref()
    }

    /// Mutable ice speed tracker, if any.
    pub fn speed_tracker_mut(&mut self) -> Option<&mut SpeedTracker> {
        self.speed_tracker.as_mut()
    }

    /// Ghost-block tracker, if any.
    #[must_use]
    pub fn ghost_tracker(&self) -> Option<&GhostBlockTracker> {
        self.ghost_tracker.as_ref()
    }

    /// Mutable ghost-block tracker, if any.
    pub fn ghost_tracker_mut(&mut self) -> Option<&mut GhostBlockTracker> {
        self.ghost_tracker.as_mut()
    }

    /// Installs a ghost-block tracker, replacing the current one.
    pub fn set_ghost_tracker(&mut self, tracker: GhostBlockTracker) {
        self.ghost_tracker = Some(tracker);
    }

    /// Drops the ghost-block tracker once its window has closed.
    pub fn drop_expired_ghost_tracker(&mut self) {
        if self
            .ghost_tracker
            .as_ref()
            .is_some_and(|t| t.phase() == TrackerPhase::Expired)
        {
            self.ghost_tracker = None;
        }
    }

    /// Resets the state after a respawn at `location`.
    ///
    /// The respawn point becomes the lag-back target so a pending correction
    /// cannot pull the player back to where they died.
    pub fn on_respawn(&mut self, location: Location) {
        self.last_ground = location;
        self.last_jump_ms = None;
        self.is_jump = false;
        self.lose_sprint_count = 0;
        self.was_sprinting = false;
        self.full_air_ticks = 0;
        self.last_in_air_ticks = 0;
        self.air_max_speed = 0.0;
        self.clear_history();
        self.movement_tracker = None;
        self.speed_tracker = None;
        self.ghost_tracker = None;
    }
}
