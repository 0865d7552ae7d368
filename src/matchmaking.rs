//! Exact-config FIFO matchmaking over the session store.

use crate::config::{GameConfig, MatchFormat, validate_turn_duration};
use crate::error::GameError;
use crate::session::{PlayerId, Session, SessionId};
use crate::store::SessionStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Caller inputs for find-or-create; omitted fields take the defaults
/// (3x3, win-3, single, no turn timer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindOrCreateRequest {
    /// Board side length.
    pub grid_size: Option<usize>,
    /// Win-line length.
    pub win_length: Option<usize>,
    /// Match format.
    pub match_format: Option<MatchFormat>,
    /// Per-turn time limit for a newly created session.
    pub turn_duration_ms: Option<u64>,
}

/// Joins the oldest compatible waiting session, or creates a fresh one with
/// the caller in slot A.
///
/// Compatibility is exact: same grid size, win length, and match format; a
/// caller never matches their own waiting session. No cross-config matching,
/// no priority beyond FIFO by creation order. The scan and the join (or
/// create) happen in one store transaction.
///
/// # Errors
///
/// Returns [`GameError::InvalidConfig`] when the resolved config fails
/// validation.
#[instrument(skip(store, caller))]
pub fn find_or_create(
    store: &SessionStore,
    caller: &PlayerId,
    request: FindOrCreateRequest,
    now: DateTime<Utc>,
) -> Result<SessionId, GameError> {
    let config = GameConfig::resolve(request.grid_size, request.win_length, request.match_format)?;
    validate_turn_duration(request.turn_duration_ms)?;

    store.transaction(|sessions| {
        let candidate = sessions.waiting_ids_oldest_first().into_iter().find(|id| {
            sessions.get(id).is_some_and(|s| {
                s.config == config && s.slot_a.as_deref() != Some(caller.as_str())
            })
        });

        if let Some(id) = candidate {
            // Filtered to open waiting sessions above, so join cannot reject.
            let session = sessions.get_mut(&id).ok_or(GameError::NotFound)?;
            session.join(caller, now)?;
            info!(session_id = %id, "Matched caller into waiting session");
            return Ok(id);
        }

        let id = sessions.allocate_id();
        let session = Session::new(
            id.clone(),
            config,
            caller.clone(),
            request.turn_duration_ms,
            now,
        );
        sessions.insert(session);
        info!(session_id = %id, "No compatible waiting session, created new");
        Ok(id)
    })
}
