//! # Server Bridge
//!
//! The checks never touch the server directly. Corrective actions leave the
//! core through a [`MovementBridge`] implemented by the server adapter.

use warden_core::{Location, PlayerId};

use crate::moving::CheckOutcome;

/// Corrective actions the server adapter must provide.
pub trait MovementBridge {
    /// Teleports the player back to `location`.
    fn setback(&mut self, player: PlayerId, location: Location);

    /// Drops the packet that carried the last movement sample.
    fn cancel(&mut self, player: PlayerId);
}

/// Forwards the corrective actions of `outcome` to `bridge`.
///
/// The setback is issued before the cancel. Returns true if anything was
/// forwarded.
pub fn apply_outcome<B: MovementBridge + ?Sized>(
    bridge: &mut B,
    player: PlayerId,
    outcome: &CheckOutcome,
) -> bool {
    if let Some(location) = outcome.setback {
        bridge.setback(player, location);
    }
    if outcome.cancel {
        bridge.cancel(player);
    }
    outcome.setback.is_some() || outcome.cancel
}
