//! # WARDEN Security - Movement Integrity
//!
//! Server-side movement anti-cheat for voxel game servers.
//!
//! ## Features
//!
//! - **Ground/Medium Classification**: friction latched one tick late, as the client does
//! - **Free-Fall Validation**: history replayed against drag and gravity
//! - **Jump Height & Flight**: effect-aware caps, level hover, long flight
//! - **Bunny Hop**: tiny-jump, corner, ice and generic hop speed caps
//! - **Ghost Blocks**: one-time allowance for client-side placement lag
//! - **Recovery**: decaying violation levels, lag-back and packet cancellation
//!
//! ## Architecture
//!
//! ```text
//! SERVER ADAPTER                         WARDEN
//!     │                                    │
//!     │─── MovementSample + Context ──────►│ MovementChecker
//!     │─── BlockPlaceSample ──────────────►│   └─ PlayerSession (per player lock)
//!     │                                    │        └─ SurvivalFly
//!     │                                    │
//!     │◄── CheckOutcome ───────────────────┤
//!     │                                    │
//!     └─ MovementBridge::setback / cancel ◄┘ apply_outcome
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod moving;
pub mod session;
pub mod trace;
pub mod violation;

pub use bridge::{apply_outcome, MovementBridge};
pub use config::{CheckConfig, CheckSettings, ChecksConfig};
pub use error::{SecurityError, SecurityResult};
pub use moving::{BlockPlaceSample, CheckOutcome, MovementSample, PhysicsTable, PlayerContext, SurvivalFly, TickTags};
pub use session::{MovementChecker, PlayerSession, SessionHandle, SessionRegistry};
pub use trace::{Trace, TraceEvent, TraceStep};
pub use violation::{CheckType, ViolationBook, ViolationRecord, DECAY_FACTOR};
