//! # Moving Checks
//!
//! Per-player movement state and the analyzers that judge each sample.
//!
//! ## Layout
//!
//! - **Inputs**: [`MovementSample`], [`PlayerContext`], [`BlockPlaceSample`]
//! - **State**: [`PlayerMotionState`] with its bounded history and trackers
//! - **Environment**: ground probes, [`Medium`] classification, [`Surroundings`]
//! - **Analyzers**: free fall, jump height, flight, bunny hop, ghost blocks
//! - **Orchestration**: [`SurvivalFly`] producing a [`CheckOutcome`]

pub mod air;
pub mod bound;
pub mod bunny;
pub mod data;
pub mod fall;
pub mod frame;
pub mod ghost;
pub mod magic;
pub mod medium;
pub mod sample;
pub mod survival_fly;
pub mod tags;
pub mod tracker;

pub use bound::Bound;
pub use data::{ContactCounter, HistoryEntry, PlayerMotionState};
pub use magic::PhysicsTable;
pub use medium::{Friction, Medium, Surroundings};
pub use sample::{BlockPlaceSample, MovementSample, PlayerContext};
pub use survival_fly::{CheckOutcome, SurvivalFly};
pub use tags::TickTags;
pub use tracker::{GhostBlockTracker, GhostKey, MovementTracker, SpeedTracker, TrackerPhase};
