//! # Movement Traces
//!
//! Recorded sessions of a single player, replayed through the checks offline.
//!
//! ## File Format
//!
//! ```toml
//! player = 1
//! spawn = { x = 0.5, y = 64.0, z = 0.5 }
//!
//! [[terrain]]
//! min = { x = -8, y = 63, z = -8 }
//! max = { x = 8, y = 63, z = 8 }
//! kind = "solid"
//!
//! [[events]]
//! type = "move"
//! from = { x = 0.5, y = 64.0, z = 0.5 }
//! to = { x = 0.78, y = 64.0, z = 0.5 }
//! timestamp_ms = 50
//! context = { sprinting = true, in_air_ticks = 0 }
//!
//! [[events]]
//! type = "place"
//! pos = { x = 1, y = 64, z = 0 }
//! block = 1
//!
//! [[events]]
//! type = "respawn"
//! location = { x = 0.5, y = 64.0, z = 0.5 }
//! ```
//!
//! A placement with a `kind` is applied to the terrain (the server accepted
//! it); without one the world keeps its old block (a ghost block).

use std::path::Path;

use serde::{Deserialize, Serialize};
use warden_core::{BlockId, BlockKind, BlockPos, ItemId, Location, PlayerId, VoxelTerrain};

use crate::bridge::{apply_outcome, MovementBridge};
use crate::error::{SecurityError, SecurityResult};
use crate::moving::{BlockPlaceSample, CheckOutcome, MovementSample, PlayerContext};
use crate::session::MovementChecker;

/// An inclusive cuboid of one block kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    /// Lower corner.
    pub min: BlockPos,
    /// Upper corner.
    pub max: BlockPos,
    /// Block kind filling the cuboid.
    pub kind: BlockKind,
}

/// One recorded event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A movement packet.
    Move {
        /// Previous position.
        from: Location,
        /// Reported position.
        to: Location,
        /// Capture time.
        timestamp_ms: u64,
        /// Ambient state at capture time.
        #[serde(default)]
        context: PlayerContext,
    },
    /// A block placement.
    Place {
        /// Placement position.
        pos: BlockPos,
        /// Placed block id.
        block: BlockId,
        /// Item in hand.
        #[serde(default)]
        held_item: ItemId,
        /// Kind written to the world if the server accepted the placement.
        #[serde(default)]
        kind: Option<BlockKind>,
    },
    /// A respawn.
    Respawn {
        /// Respawn point.
        location: Location,
    },
}

/// A recorded session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Recorded player.
    #[serde(default)]
    pub player: PlayerId,
    /// Join location.
    pub spawn: Location,
    /// World geometry at the start of the recording.
    #[serde(default)]
    pub terrain: Vec<Cuboid>,
    /// Events in arrival order.
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

/// Result of replaying one movement event.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceStep {
    /// Index of the event in [`Trace::events`].
    pub index: usize,
    /// Capture time of the movement.
    pub timestamp_ms: u64,
    /// Check result.
    pub outcome: CheckOutcome,
}

impl Trace {
    /// Parses a trace.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::Toml`] if the document is malformed.
    pub fn from_toml_str(source: &str) -> SecurityResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a trace file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> SecurityResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SecurityError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Builds the initial world.
    #[must_use]
    pub fn build_terrain(&self) -> VoxelTerrain {
        let mut terrain = VoxelTerrain::new();
        for cuboid in &self.terrain {
            terrain.fill(cuboid.min, cuboid.max, cuboid.kind);
        }
        terrain
    }

    /// Number of movement events.
    #[must_use]
    pub fn movement_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TraceEvent::Move { .. }))
            .count()
    }

    /// Replays the trace through `checker`, forwarding corrective actions to
    /// `bridge`. The player joins at [`Trace::spawn`] and leaves at the end.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnknownPlayer`] if the session disappears
    /// during the replay.
    pub fn replay<B: MovementBridge + ?Sized>(
        &self,
        checker: &MovementChecker,
        bridge: &mut B,
    ) -> SecurityResult<Vec<TraceStep>> {
        let mut terrain = self.build_terrain();
        let mut steps = Vec::with_capacity(self.movement_count());
        checker.join(self.player, self.spawn);

        for (index, event) in self.events.iter().enumerate() {
            match event {
                TraceEvent::Move {
                    from,
                    to,
                    timestamp_ms,
                    context,
                } => {
                    let sample = MovementSample::new(*from, *to, *timestamp_ms);
                    let outcome = checker.process_movement(self.player, &sample, context, &terrain)?;
                    apply_outcome(bridge, self.player, &outcome);
                    steps.push(TraceStep {
                        index,
                        timestamp_ms: *timestamp_ms,
                        outcome,
                    });
                }
                TraceEvent::Place {
                    pos,
                    block,
                    held_item,
                    kind,
                } => {
                    if let Some(kind) = kind {
                        terrain.set_block(*pos, *block, *kind);
                    }
                    let place = BlockPlaceSample {
                        pos: *pos,
                        block: *block,
                        held_item: *held_item,
                    };
                    checker.process_block_place(self.player, &place, &terrain)?;
                }
                TraceEvent::Respawn { location } => checker.respawn(self.player, *location)?,
            }
        }

        checker.leave(self.player);
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;
    use std::sync::Arc;

    const WALK: &str = r#"
        player = 7
        spawn = { x = 0.5, y = 64.0, z = 0.5 }

        [[terrain]]
        min = { x = -8, y = 63, z = -8 }
        max = { x = 8, y = 63, z = 8 }
        kind = "solid"

        [[events]]
        type = "move"
        from = { x = 0.5, y = 64.0, z = 0.5 }
        to = { x = 0.7, y = 64.0, z = 0.5 }
        timestamp_ms = 50

        [[events]]
        type = "place"
        pos = { x = 2, y = 64, z = 0 }
        block = 1

        [[events]]
        type = "move"
        from = { x = 0.7, y = 64.0, z = 0.5 }
        to = { x = 0.9, y = 64.0, z = 0.5 }
        timestamp_ms = 100
        context = { sprinting = true }

        [[events]]
        type = "respawn"
        location = { x = 3.5, y = 64.0, z = 3.5 }
    "#;

    #[derive(Default)]
    struct CountingBridge {
        setbacks: usize,
        cancels: usize,
    }

    impl MovementBridge for CountingBridge {
        fn setback(&mut self, _player: PlayerId, _location: Location) {
            self.setbacks += 1;
        }

        fn cancel(&mut self, _player: PlayerId) {
            self.cancels += 1;
        }
    }

    #[test]
    fn test_parse() {
        let trace = Trace::from_toml_str(WALK).unwrap();
        assert_eq!(trace.player, PlayerId(7));
        assert_eq!(trace.events.len(), 4);
        assert_eq!(trace.movement_count(), 2);
        assert_eq!(trace.build_terrain().len(), 17 * 17);
        match &trace.events[2] {
            TraceEvent::Move { context, .. } => {
                assert!(context.sprinting);
                assert_eq!(context.food_level, 20);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_replay_clean_walk() {
        let trace = Trace::from_toml_str(WALK).unwrap();
        let checker = MovementChecker::new(Arc::new(CheckConfig::default()));
        let mut bridge = CountingBridge::default();
        let steps = trace.replay(&checker, &mut bridge).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].index, 2);
        assert!(steps.iter().all(|step| step.outcome.is_clean()));
        assert_eq!((bridge.setbacks, bridge.cancels), (0, 0));
        assert!(checker.sessions().is_empty());
    }

    #[test]
    fn test_bundled_hover_trace() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/traces/hover.toml");
        let trace = Trace::from_file(path).unwrap();
        let checker = MovementChecker::new(Arc::new(CheckConfig::default()));
        let mut bridge = CountingBridge::default();
        let steps = trace.replay(&checker, &mut bridge).unwrap();

        assert_eq!(steps.len(), 6);
        assert!(steps[..2].iter().all(|step| step.outcome.is_clean()));
        assert!(steps[2..].iter().all(|step| step.outcome.setback.is_some()));
        assert_eq!(bridge.setbacks, 4);
    }

    #[test]
    fn test_missing_trace_file() {
        let err = Trace::from_file("/nonexistent/trace.toml").unwrap_err();
        assert!(matches!(err, SecurityError::Io { .. }));
    }

    #[test]
    fn test_unknown_event_type() {
        let err = Trace::from_toml_str(
            "spawn = { x = 0.0, y = 64.0, z = 0.0 }\n[[events]]\ntype = \"teleport\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, SecurityError::Toml(_)));
    }
}
