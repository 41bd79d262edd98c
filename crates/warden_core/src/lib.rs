//! # WARDEN Core
//!
//! World vocabulary shared by the server adapter and the movement checks.
//!
//! ## Contents
//!
//! - **Math**: `f64` locations, block coordinates, horizontal facings
//! - **Blocks**: protocol ids and the physical kinds the checks care about
//! - **Terrain**: the read-only [`TerrainQuery`] seam and [`VoxelTerrain`]
//! - **Player**: game mode, status effects, identifiers
//!
//! ## Example
//!
//! ```rust
//! use warden_core::{BlockKind, Location, TerrainQuery, VoxelTerrain};
//!
//! let terrain = VoxelTerrain::flat(63, 8, BlockKind::Solid);
//! let feet = Location::new(0.5, 64.0, 0.5);
//! assert!(!terrain.block_at_location(feet.offset(0.0, -0.5, 0.0)).is_air());
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod block;
pub mod math;
pub mod player;
pub mod terrain;

pub use block::{Block, BlockId, BlockKind};
pub use math::{BlockPos, Facing, Location};
pub use player::{Effects, GameMode, ItemId, PlayerId};
pub use terrain::{TerrainQuery, VoxelTerrain};
