//! In-memory session store: the single authoritative mutation point.
//!
//! The durable record store is an external collaborator; what the engine
//! relies on is atomic single-record read-modify-write plus two indexes
//! (waiting sessions oldest-first, sessions by participant). This store
//! provides those guarantees behind one mutex, the same shape as a shared
//! session manager map.

use crate::error::GameError;
use crate::session::{PlayerId, Session, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

/// The records behind the lock. Exposed to callers only inside a
/// [`SessionStore::transaction`] closure.
#[derive(Debug, Default)]
pub struct Sessions {
    records: HashMap<SessionId, Session>,
    next_seq: u64,
}

impl Sessions {
    /// Allocates the next session id. Ids are zero-padded so lexicographic
    /// order equals creation order.
    pub fn allocate_id(&mut self) -> SessionId {
        self.next_seq += 1;
        format!("g{:08}", self.next_seq)
    }

    /// Looks up a session.
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.records.get(id)
    }

    /// Looks up a session for mutation.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.records.get_mut(id)
    }

    /// Inserts or replaces a session record.
    pub fn insert(&mut self, session: Session) {
        self.records.insert(session.id.clone(), session);
    }

    /// Removes a session record.
    pub fn remove(&mut self, id: &str) -> Option<Session> {
        self.records.remove(id)
    }

    /// Ids of `waiting` sessions with slot B open, oldest first.
    pub fn waiting_ids_oldest_first(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self
            .records
            .values()
            .filter(|s| {
                s.status == crate::session::SessionStatus::Waiting && s.slot_b.is_none()
            })
            .map(|s| s.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Sessions where the player occupies a slot.
    pub fn by_participant(&self, player: &str) -> Vec<Session> {
        let mut sessions: Vec<_> = self
            .records
            .values()
            .filter(|s| s.is_participant(player))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        sessions
    }
}

/// Thread-safe handle over the shared session map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session store");
        Self::default()
    }

    /// Runs `f` with exclusive access to the records. Everything inside the
    /// closure is one atomic unit relative to all other operations.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Sessions) -> T) -> T {
        let mut sessions = self.inner.lock().unwrap();
        f(&mut sessions)
    }

    /// Loads a session by id, mutates it through `f`, and keeps whatever
    /// `f` left in place — one atomic read-modify-write.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] for an unknown id, or whatever `f`
    /// rejects with.
    pub fn update<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        self.transaction(|sessions| {
            let session = sessions.get_mut(id).ok_or(GameError::NotFound)?;
            f(session)
        })
    }

    /// Returns a snapshot of a session, if it exists.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Option<Session> {
        let session = self.transaction(|sessions| sessions.get(id).cloned());
        if session.is_none() {
            debug!(session_id = id, "Session not found");
        }
        session
    }

    /// Removes a session outright.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> Option<Session> {
        self.transaction(|sessions| sessions.remove(id))
    }

    /// Snapshots of `waiting` sessions with slot B open, oldest first.
    #[instrument(skip(self))]
    pub fn list_waiting(&self) -> Vec<Session> {
        self.transaction(|sessions| {
            sessions
                .waiting_ids_oldest_first()
                .iter()
                .filter_map(|id| sessions.get(id).cloned())
                .collect()
        })
    }

    /// Snapshots of sessions the player participates in.
    #[instrument(skip(self))]
    pub fn list_by_participant(&self, player: &PlayerId) -> Vec<Session> {
        self.transaction(|sessions| sessions.by_participant(player))
    }
}
