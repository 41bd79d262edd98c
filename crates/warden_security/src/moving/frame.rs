//! Inputs shared by the analyzers during one evaluation.

use warden_core::PlayerId;

use super::magic::PhysicsTable;
use super::medium::Surroundings;
use super::sample::{MovementSample, PlayerContext};
use super::tags::TickTags;

/// Everything an analyzer needs to know about the tick being evaluated.
///
/// Built once per sample by [`SurvivalFly`](crate::moving::SurvivalFly) and
/// dropped with the outcome.
#[derive(Debug)]
pub struct TickFrame<'a> {
    /// Player being checked.
    pub player: PlayerId,
    /// The reported move.
    pub sample: &'a MovementSample,
    /// Ambient player state.
    pub ctx: &'a PlayerContext,
    /// Calibration constants.
    pub physics: &'a PhysicsTable,
    /// Standing at the start of the move.
    pub from_on_ground: bool,
    /// Standing at the end of the move.
    pub to_on_ground: bool,
    /// Neighbourhood of the destination.
    pub surroundings: Surroundings,
    /// Time since the last jump in 100 ms buckets while a jump is in progress,
    /// otherwise 0.
    pub bunny_bucket: u64,
    /// Emit debug lines.
    pub debug: bool,
    /// Tags raised so far.
    pub tags: TickTags,
}

impl TickFrame<'_> {
    /// Capture time of the sample.
    #[inline]
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.sample.timestamp_ms
    }

    /// Returns true if any of `tags` has been raised.
    #[inline]
    #[must_use]
    pub fn has(&self, tags: TickTags) -> bool {
        self.tags.intersects(tags)
    }

    /// Raises `tags`.
    #[inline]
    pub fn tag(&mut self, tags: TickTags) {
        self.tags.insert(tags);
    }
}
