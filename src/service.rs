//! Operation entry points: load the record, run the state machine, write
//! back one new version.
//!
//! Pause-timeout enforcement runs at the top of join, move, heartbeat, and
//! timeout-turn; the enforced transition persists even when the operation
//! itself is then rejected.

use crate::error::GameError;
use crate::matchmaking::{self, FindOrCreateRequest};
use crate::session::{PlayerId, Session, SessionId, SessionStatus};
use crate::store::SessionStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Heartbeat acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatAck {
    /// Always true for an accepted heartbeat.
    pub ok: bool,
    /// Session status after reconciliation.
    pub status: SessionStatus,
}

/// The engine's external surface: every session operation, keyed by an
/// already-authenticated caller identity.
#[derive(Debug, Clone, Default)]
pub struct GameService {
    store: SessionStore,
}

impl GameService {
    /// Creates a service over a fresh store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game service");
        Self {
            store: SessionStore::new(),
        }
    }

    /// Creates a service over an existing store.
    pub fn with_store(store: SessionStore) -> Self {
        Self { store }
    }

    /// The backing store (shared handle).
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Matchmaking: join the oldest compatible waiting session or create
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] for an invalid configuration.
    #[instrument(skip(self, caller))]
    pub fn find_or_create(
        &self,
        caller: &PlayerId,
        request: FindOrCreateRequest,
    ) -> Result<SessionId, GameError> {
        matchmaking::find_or_create(&self.store, caller, request, Utc::now())
    }

    /// Joins the caller into a session's open slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] or [`GameError::SessionFull`].
    #[instrument(skip(self, caller))]
    pub fn join(&self, caller: &PlayerId, id: &str) -> Result<Session, GameError> {
        let now = Utc::now();
        self.store.update(id, |session| {
            session.enforce_pause_timeout(now);
            session.join(caller, now)?;
            Ok(session.clone())
        })
    }

    /// Places a move for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] or any rejection from the move
    /// validation ladder.
    #[instrument(skip(self, caller))]
    pub fn place_move(
        &self,
        caller: &PlayerId,
        id: &str,
        index: usize,
    ) -> Result<Session, GameError> {
        let now = Utc::now();
        self.store.update(id, |session| {
            session.enforce_pause_timeout(now);
            session.place_move(caller, index, now)?;
            Ok(session.clone())
        })
    }

    /// Records the caller's liveness and reconciles pause state.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] or [`GameError::NotParticipant`].
    #[instrument(skip(self, caller))]
    pub fn heartbeat(&self, caller: &PlayerId, id: &str) -> Result<HeartbeatAck, GameError> {
        let now = Utc::now();
        self.store.update(id, |session| {
            if !session.is_participant(caller) {
                return Err(GameError::NotParticipant);
            }
            if session.enforce_pause_timeout(now) {
                // The session just ended; report that instead of stamping
                // presence on a terminal record.
                return Ok(HeartbeatAck {
                    ok: true,
                    status: session.status,
                });
            }
            let status = session.heartbeat(caller, now)?;
            Ok(HeartbeatAck { ok: true, status })
        })
    }

    /// Resets the board (match score and round history survive).
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`], [`GameError::NotParticipant`], or
    /// [`GameError::BoardShapeMismatch`].
    #[instrument(skip(self, caller))]
    pub fn restart(&self, caller: &PlayerId, id: &str) -> Result<Session, GameError> {
        let now = Utc::now();
        self.store.update(id, |session| {
            session.restart(caller, now)?;
            Ok(session.clone())
        })
    }

    /// Deletes the session outright. No terminal record survives this
    /// path, unlike the `disconnect`-ended sessions other operations leave
    /// behind.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] or [`GameError::NotParticipant`].
    #[instrument(skip(self, caller))]
    pub fn abandon(&self, caller: &PlayerId, id: &str) -> Result<(), GameError> {
        self.store.transaction(|sessions| {
            let session = sessions.get(id).ok_or(GameError::NotFound)?;
            if !session.is_participant(caller) {
                return Err(GameError::NotParticipant);
            }
            sessions.remove(id);
            info!(session_id = id, "Session abandoned and deleted");
            Ok(())
        })
    }

    /// Applies a due turn-timer expiry (or a due pause timeout); returns
    /// the record unchanged when neither is due.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub fn timeout_turn(&self, id: &str) -> Result<Session, GameError> {
        let now = Utc::now();
        self.store.update(id, |session| {
            if !session.enforce_pause_timeout(now) {
                session.timeout_turn(now);
            }
            Ok(session.clone())
        })
    }

    /// Reads a session record.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: &str) -> Option<Session> {
        self.store.get(id)
    }

    /// Waiting sessions with an open slot, oldest first.
    #[instrument(skip(self))]
    pub fn list_waiting(&self) -> Vec<Session> {
        self.store.list_waiting()
    }

    /// Sessions the caller participates in that are not terminal.
    #[instrument(skip(self, caller))]
    pub fn list_my_active(&self, caller: &PlayerId) -> Vec<Session> {
        self.store
            .list_by_participant(caller)
            .into_iter()
            .filter(|s| {
                !matches!(s.status, SessionStatus::Ended | SessionStatus::Canceled)
            })
            .collect()
    }
}
