//! # Player Sessions
//!
//! One [`PlayerSession`] per connected player holds everything the checks
//! mutate for that player. Sessions sit behind their own lock so distinct
//! players can be checked in parallel; samples for one player are applied in
//! arrival order under that player's lock.
//!
//! ```text
//! SessionRegistry ── RwLock<HashMap<PlayerId, Arc<Mutex<PlayerSession>>>>
//!        │
//!        ▼
//! MovementChecker ── SurvivalFly (Arc<CheckConfig>, read-only)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;
use warden_core::{Location, PlayerId, TerrainQuery};

use crate::config::CheckConfig;
use crate::error::{SecurityError, SecurityResult};
use crate::moving::{BlockPlaceSample, CheckOutcome, MovementSample, PlayerContext, PlayerMotionState, SurvivalFly};
use crate::violation::{CheckType, ViolationBook};

/// Mutable check state of one player.
#[derive(Clone, Debug)]
pub struct PlayerSession {
    /// Player this session belongs to.
    pub id: PlayerId,
    /// Movement state.
    pub motion: PlayerMotionState,
    /// Violation records.
    pub violations: ViolationBook,
}

impl PlayerSession {
    /// Creates the session of a player who spawned at `spawn`.
    #[must_use]
    pub fn new(id: PlayerId, spawn: Location, config: &CheckConfig) -> Self {
        Self {
            id,
            motion: PlayerMotionState::new(spawn, &config.physics),
            violations: ViolationBook::new(),
        }
    }

    /// Moves the last known ground to the respawn point and restarts motion
    /// tracking. A lag-back requested before the death is dropped.
    pub fn respawn(&mut self, location: Location) {
        self.motion.on_respawn(location);
        let record = self.violations.record_mut(CheckType::SurvivalFly);
        record.take_lag_back();
        record.take_cancel();
    }
}

/// Shared handle to a session.
pub type SessionHandle = Arc<Mutex<PlayerSession>>;

/// Sessions of every connected player.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<PlayerId, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player, replacing any stale session with the same id.
    pub fn join(&self, session: PlayerSession) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        if self.sessions.write().insert(id, Arc::clone(&handle)).is_some() {
            info!(player = %id, "replaced stale session");
        } else {
            info!(player = %id, "session opened");
        }
        handle
    }

    /// Removes a player. Returns the session if there was one.
    pub fn leave(&self, id: PlayerId) -> Option<SessionHandle> {
        let removed = self.sessions.write().remove(&id);
        if removed.is_some() {
            info!(player = %id, "session closed");
        }
        removed
    }

    /// Looks up a player's session.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnknownPlayer`] if the player never joined.
    pub fn get(&self, id: PlayerId) -> SecurityResult<SessionHandle> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(SecurityError::UnknownPlayer(id))
    }

    /// Number of open sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns true if no session is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Entry point for a server adapter: sessions plus the movement check.
#[derive(Debug)]
pub struct MovementChecker {
    survival_fly: SurvivalFly,
    registry: SessionRegistry,
}

impl MovementChecker {
    /// Creates a checker around a loaded configuration.
    #[must_use]
    pub fn new(config: Arc<CheckConfig>) -> Self {
        Self {
            survival_fly: SurvivalFly::new(config),
            registry: SessionRegistry::new(),
        }
    }

    /// Shared configuration.
    #[must_use]
    pub fn config(&self) -> &CheckConfig {
        self.survival_fly.config()
    }

    /// Session registry.
    #[must_use]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Opens a session for a player who spawned at `spawn`.
    pub fn join(&self, player: PlayerId, spawn: Location) -> SessionHandle {
        self.registry.join(PlayerSession::new(player, spawn, self.config()))
    }

    /// Closes a player's session. Returns true if one was open.
    pub fn leave(&self, player: PlayerId) -> bool {
        self.registry.leave(player).is_some()
    }

    /// Handles a respawn.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnknownPlayer`] if the player never joined.
    pub fn respawn(&self, player: PlayerId, location: Location) -> SecurityResult<()> {
        let handle = self.registry.get(player)?;
        handle.lock().respawn(location);
        info!(player = %player, ?location, "respawned");
        Ok(())
    }

    /// Checks one movement sample.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnknownPlayer`] if the player never joined.
    pub fn process_movement(
        &self,
        player: PlayerId,
        sample: &MovementSample,
        ctx: &PlayerContext,
        terrain: &dyn TerrainQuery,
    ) -> SecurityResult<CheckOutcome> {
        let handle = self.registry.get(player)?;
        let mut session = handle.lock();
        let session = &mut *session;
        Ok(self.survival_fly.check(
            player,
            &mut session.motion,
            &mut session.violations,
            sample,
            ctx,
            terrain,
        ))
    }

    /// Records a block placement.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnknownPlayer`] if the player never joined.
    pub fn process_block_place(
        &self,
        player: PlayerId,
        place: &BlockPlaceSample,
        terrain: &dyn TerrainQuery,
    ) -> SecurityResult<()> {
        let handle = self.registry.get(player)?;
        self.survival_fly.on_block_place(&mut handle.lock().motion, place, terrain);
        Ok(())
    }

    /// Current violation level of a player.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnknownPlayer`] if the player never joined.
    pub fn violation_level(&self, player: PlayerId, check: CheckType) -> SecurityResult<f64> {
        Ok(self.registry.get(player)?.lock().violations.level(check))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{BlockKind, VoxelTerrain};

    fn checker() -> MovementChecker {
        MovementChecker::new(Arc::new(CheckConfig::default()))
    }

    #[test]
    fn test_join_and_leave() {
        let checker = checker();
        assert!(checker.sessions().is_empty());
        checker.join(PlayerId(1), Location::new(0.5, 64.0, 0.5));
        checker.join(PlayerId(2), Location::new(2.5, 64.0, 0.5));
        assert_eq!(checker.sessions().len(), 2);
        assert!(checker.leave(PlayerId(1)));
        assert!(!checker.leave(PlayerId(1)));
        assert_eq!(checker.sessions().len(), 1);
    }

    #[test]
    fn test_unknown_player() {
        let checker = checker();
        let terrain = VoxelTerrain::new();
        let at = Location::new(0.5, 64.0, 0.5);
        let err = checker
            .process_movement(PlayerId(9), &MovementSample::new(at, at, 0), &PlayerContext::default(), &terrain)
            .unwrap_err();
        assert!(matches!(err, SecurityError::UnknownPlayer(PlayerId(9))));
        assert!(checker.respawn(PlayerId(9), at).is_err());
        assert!(checker.violation_level(PlayerId(9), CheckType::SurvivalFly).is_err());
    }

    #[test]
    fn test_process_movement_updates_session() {
        let checker = checker();
        let terrain = VoxelTerrain::flat(63, 8, BlockKind::Solid);
        let handle = checker.join(PlayerId(3), Location::new(0.5, 64.0, 0.5));
        let to = Location::new(0.8, 64.0, 0.5);
        let sample = MovementSample::new(Location::new(0.5, 64.0, 0.5), to, 0);
        let outcome = checker
            .process_movement(PlayerId(3), &sample, &PlayerContext::default(), &terrain)
            .unwrap();
        assert!(outcome.is_clean());
        assert_eq!(handle.lock().motion.last_ground, to);
    }

    #[test]
    fn test_respawn_moves_last_ground() {
        let checker = checker();
        let handle = checker.join(PlayerId(5), Location::new(0.5, 64.0, 0.5));
        handle.lock().motion.full_air_ticks = 6;
        let bed = Location::new(-40.5, 70.0, 12.5);
        checker.respawn(PlayerId(5), bed).unwrap();
        let session = handle.lock();
        assert_eq!(session.motion.last_ground, bed);
        assert_eq!(session.motion.full_air_ticks, 0);
    }

    #[test]
    fn test_rejoin_replaces_session() {
        let registry = SessionRegistry::new();
        let config = CheckConfig::default();
        let first = registry.join(PlayerSession::new(PlayerId(1), Location::ZERO, &config));
        let second = registry.join(PlayerSession::new(PlayerId(1), Location::ZERO, &config));
        assert_eq!(registry.len(), 1);
        let current = registry.get(PlayerId(1)).unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert!(!Arc::ptr_eq(&current, &first));
    }
}
