//! # Player Ambient Types
//!
//! Identity, game mode and status effects as delivered by the server adapter.

use serde::{Deserialize, Serialize};

/// Stable identifier of a connected player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Network identifier of an item type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u16);

/// Player game mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Normal play.
    #[default]
    Survival,
    /// Free flight, no damage.
    Creative,
    /// Survival without block interaction.
    Adventure,
    /// Noclip observer.
    Spectator,
}

impl GameMode {
    /// Returns true if movement checks do not apply in this mode.
    #[inline]
    #[must_use]
    pub const fn is_movement_exempt(self) -> bool {
        matches!(self, Self::Creative | Self::Spectator)
    }
}

/// Active status effects relevant to movement.
///
/// Each field holds the effect amplifier (0 = tier I). `None` means the effect
/// is absent; malformed or unknown effects must be mapped to `None` upstream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    /// Jump boost amplifier.
    #[serde(default)]
    pub jump_boost: Option<u8>,
    /// Speed amplifier.
    #[serde(default)]
    pub speed: Option<u8>,
}

impl Effects {
    /// No effects.
    pub const NONE: Self = Self {
        jump_boost: None,
        speed: None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exempt_game_modes() {
        assert!(GameMode::Creative.is_movement_exempt());
        assert!(GameMode::Spectator.is_movement_exempt());
        assert!(!GameMode::Survival.is_movement_exempt());
        assert!(!GameMode::Adventure.is_movement_exempt());
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "player#7");
    }
}
