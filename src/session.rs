//! The session aggregate and its authoritative state machine.
//!
//! Every operation here mutates one loaded record and bumps its `version`
//! exactly once per applied write; validation failures leave the record
//! untouched. Time-based transitions (pause timeout, turn timeout) are lazy:
//! each operation takes `now` from its caller and compares it against stored
//! timestamps, nothing is scheduled.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{Board, EndedReason, MatchState, RoundVerdict, Slot, evaluate_winner};
use crate::presence::{Presence, pause_expired};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a session.
pub type SessionId = String;

/// Unique identifier for a player (identity resolution is external).
pub type PlayerId = String;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    /// Created, slot B still open.
    Waiting,
    /// Both slots filled, rounds in progress.
    Playing,
    /// A participant's presence went stale.
    Paused,
    /// Terminal: win, draw, or disconnect timeout.
    Ended,
    /// Terminal: canceled outside the engine.
    Canceled,
}

/// The most recent move applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    /// Cell index.
    pub index: usize,
    /// Slot that played it.
    pub slot: Slot,
    /// When it was applied.
    pub at: DateTime<Utc>,
}

/// One shared game session: the aggregate root mutated exclusively by the
/// operations below, persisted as a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session id.
    pub id: SessionId,
    /// Immutable rules configuration.
    pub config: GameConfig,
    /// Current round's board; always `grid_size^2` cells.
    pub board: Board,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// User occupying slot A (the creator).
    pub slot_a: Option<PlayerId>,
    /// User occupying slot B; unset while `waiting`.
    pub slot_b: Option<PlayerId>,
    /// Slot expected to move next.
    pub current_turn: Slot,
    /// Current round's winner, once decided.
    pub winner: Option<Slot>,
    /// Indexes of the winning line, ordered as generated.
    pub winning_line: Option<Vec<usize>>,
    /// Why the session ended (tentatively `disconnect` while paused).
    pub ended_reason: Option<EndedReason>,
    /// Slot whose absence caused a timeout-ended session.
    pub abandoned_by: Option<Slot>,
    /// Per-slot last-seen stamps.
    pub presence: Presence,
    /// When the current pause began.
    pub paused_at: Option<DateTime<Utc>>,
    /// Moves applied in the current round.
    pub moves_count: u32,
    /// Monotonic write counter; callers use it to detect stale reads.
    pub version: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
    /// Per-turn time limit; unset disables the turn timer.
    pub turn_duration_ms: Option<u64>,
    /// Deadline for the current turn; unset unless a timer is running.
    pub turn_deadline: Option<DateTime<Utc>>,
    /// Most recent applied move.
    pub last_move: Option<LastMove>,
    /// Best-of-N bookkeeping.
    pub match_state: MatchState,
}

impl Session {
    /// Creates a fresh `waiting` session with the creator in slot A.
    #[instrument(skip(creator), fields(session_id = %id))]
    pub fn new(
        id: SessionId,
        config: GameConfig,
        creator: PlayerId,
        turn_duration_ms: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        info!(
            grid_size = config.grid_size,
            win_length = config.win_length,
            format = %config.format,
            "Creating session"
        );
        Self {
            id,
            config,
            board: Board::new(config.grid_size),
            status: SessionStatus::Waiting,
            slot_a: Some(creator),
            slot_b: None,
            current_turn: Slot::A,
            winner: None,
            winning_line: None,
            ended_reason: None,
            abandoned_by: None,
            presence: Presence::default(),
            paused_at: None,
            moves_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
            turn_duration_ms,
            turn_deadline: None,
            last_move: None,
            match_state: MatchState::new(config.format),
        }
    }

    /// Maps a caller to the slot they occupy, if any.
    pub fn slot_of(&self, caller: &str) -> Option<Slot> {
        if self.slot_a.as_deref() == Some(caller) {
            Some(Slot::A)
        } else if self.slot_b.as_deref() == Some(caller) {
            Some(Slot::B)
        } else {
            None
        }
    }

    /// Whether the caller occupies either slot.
    pub fn is_participant(&self, caller: &str) -> bool {
        self.slot_of(caller).is_some()
    }

    /// Joins the caller into slot B.
    ///
    /// Idempotent for a caller already occupying a slot: returns `false`
    /// without touching the record (no version bump). Otherwise the session
    /// must be `waiting` with slot B open; both presence stamps are seeded
    /// and the session starts `playing`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionFull`] when the caller is a stranger and
    /// slot B is already taken (or the session left `waiting`).
    #[instrument(skip(self, caller), fields(session_id = %self.id))]
    pub fn join(&mut self, caller: &str, now: DateTime<Utc>) -> Result<bool, GameError> {
        if self.is_participant(caller) {
            debug!("Caller already seated, join is a no-op");
            return Ok(false);
        }
        if self.status != SessionStatus::Waiting || self.slot_b.is_some() {
            warn!(status = %self.status, "Join rejected: session full");
            return Err(GameError::SessionFull);
        }

        self.slot_b = Some(caller.to_string());
        if self.presence.seen_a.is_none() {
            self.presence.touch(Slot::A, now);
        }
        self.presence.touch(Slot::B, now);
        self.status = SessionStatus::Playing;
        // First turn gets a deadline as soon as play can actually begin.
        self.reset_turn_deadline(now);
        self.mark_written(now);
        info!(version = self.version, "Slot B joined, session playing");
        Ok(true)
    }

    /// Applies a move for the caller at `index`.
    ///
    /// Runs the full validation ladder, then either plays normally (win /
    /// draw / turn swap) or — when the opponent's presence is stale — banks
    /// the move and pauses the session instead of losing it.
    ///
    /// # Errors
    ///
    /// [`GameError::NotParticipant`], [`GameError::NotInProgress`],
    /// [`GameError::Paused`], [`GameError::InvalidIndex`],
    /// [`GameError::CellOccupied`], or [`GameError::WrongTurn`].
    #[instrument(skip(self, caller), fields(session_id = %self.id, index))]
    pub fn place_move(
        &mut self,
        caller: &str,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<(), GameError> {
        let slot = self.slot_of(caller).ok_or_else(|| {
            warn!("Move rejected: caller not a participant");
            GameError::NotParticipant
        })?;
        match self.status {
            SessionStatus::Playing => {}
            SessionStatus::Paused => {
                warn!("Move rejected: session paused");
                return Err(GameError::Paused);
            }
            _ => {
                warn!(status = %self.status, "Move rejected: not in progress");
                return Err(GameError::NotInProgress);
            }
        }
        if index >= self.config.cell_count() {
            warn!(
                cell_count = self.config.cell_count(),
                "Move rejected: index out of bounds"
            );
            return Err(GameError::InvalidIndex);
        }
        if !self.board.is_empty(index) {
            warn!("Move rejected: cell occupied");
            return Err(GameError::CellOccupied);
        }
        if slot != self.current_turn {
            warn!(slot = %slot, current_turn = %self.current_turn, "Move rejected: wrong turn");
            return Err(GameError::WrongTurn);
        }

        self.board.place(index, slot);
        self.moves_count += 1;
        self.last_move = Some(LastMove { index, slot, at: now });
        self.presence.touch(slot, now);

        let opponent = slot.opponent();
        if !self.presence.is_fresh(opponent, now) {
            // Bank the move: keep it on the board, but pause until the
            // opponent reappears. The reason is tentatively `disconnect`;
            // the pause timeout decides whether it sticks.
            self.status = SessionStatus::Paused;
            self.paused_at = Some(now);
            self.ended_reason = Some(EndedReason::Disconnect);
            self.current_turn = opponent;
            self.reset_turn_deadline(now);
            self.mark_written(now);
            info!(slot = %slot, "Opponent stale, move banked and session paused");
            return Ok(());
        }

        if let Some((round_winner, line)) = evaluate_winner(&self.board, &self.config) {
            self.finish_round(Some(round_winner), Some(line), now);
        } else if self.board.is_full() {
            self.finish_round(None, None, now);
        } else {
            self.current_turn = opponent;
            self.reset_turn_deadline(now);
        }
        self.mark_written(now);
        debug!(
            slot = %slot,
            status = %self.status,
            moves = self.moves_count,
            version = self.version,
            "Move applied"
        );
        Ok(())
    }

    /// Refreshes the caller's presence and reconciles pause state.
    ///
    /// While `playing`, a stale opponent pauses the session; while `paused`,
    /// two fresh slots resume it. Returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotParticipant`] for a caller outside the
    /// session.
    #[instrument(skip(self, caller), fields(session_id = %self.id))]
    pub fn heartbeat(
        &mut self,
        caller: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionStatus, GameError> {
        let slot = self.slot_of(caller).ok_or(GameError::NotParticipant)?;
        if matches!(self.status, SessionStatus::Ended | SessionStatus::Canceled) {
            debug!(status = %self.status, "Heartbeat on terminal session, nothing to stamp");
            return Ok(self.status);
        }
        self.presence.touch(slot, now);

        match self.status {
            SessionStatus::Playing if !self.presence.is_fresh(slot.opponent(), now) => {
                self.status = SessionStatus::Paused;
                self.paused_at = Some(now);
                self.ended_reason = Some(EndedReason::Disconnect);
                info!(stale = %slot.opponent(), "Opponent stale, session paused");
            }
            SessionStatus::Paused
                if self.presence.is_fresh(Slot::A, now)
                    && self.presence.is_fresh(Slot::B, now) =>
            {
                self.status = SessionStatus::Playing;
                self.paused_at = None;
                self.ended_reason = None;
                info!("Both slots fresh, session resumed");
                // A banked move may have completed the round while the
                // session was paused; settle it now, otherwise a full board
                // would leave no legal move to trigger evaluation.
                if let Some((round_winner, line)) = evaluate_winner(&self.board, &self.config) {
                    self.finish_round(Some(round_winner), Some(line), now);
                } else if self.board.is_full() {
                    self.finish_round(None, None, now);
                } else {
                    // The old deadline likely lapsed during the pause.
                    self.reset_turn_deadline(now);
                }
            }
            _ => {}
        }
        self.mark_written(now);
        Ok(self.status)
    }

    /// Enforces a due pause timeout, if any.
    ///
    /// Only applies when the session is `paused` and the pause has outlived
    /// the timeout. Attribution is asymmetric: the stale slot is the
    /// abandoner only when exactly one slot is fresh. Returns whether the
    /// transition fired (and therefore wrote).
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn enforce_pause_timeout(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        let Some(paused_at) = self.paused_at else {
            return false;
        };
        if !pause_expired(paused_at, now) {
            return false;
        }

        self.abandoned_by = self.presence.attribute_abandonment(now);
        self.status = SessionStatus::Ended;
        self.ended_reason = Some(EndedReason::Disconnect);
        self.turn_deadline = None;
        self.mark_written(now);
        info!(
            abandoned_by = ?self.abandoned_by,
            "Pause timeout elapsed, session ended"
        );
        true
    }

    /// Passes the turn when the active slot's deadline has lapsed.
    ///
    /// Treats the expiry as "no legal move available": the turn passes
    /// without marking a cell, round and match state are untouched, and a
    /// fresh deadline is issued. Returns whether anything changed.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn timeout_turn(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != SessionStatus::Playing {
            return false;
        }
        let Some(deadline) = self.turn_deadline else {
            return false;
        };
        if now <= deadline {
            return false;
        }

        let lapsed = self.current_turn;
        self.current_turn = lapsed.opponent();
        self.reset_turn_deadline(now);
        self.mark_written(now);
        info!(lapsed = %lapsed, next = %self.current_turn, "Turn timer expired, turn passed");
        true
    }

    /// Resets the board for a fresh round without touching match score or
    /// round history.
    ///
    /// # Errors
    ///
    /// [`GameError::NotParticipant`] for outsiders;
    /// [`GameError::BoardShapeMismatch`] when the persisted board length
    /// disagrees with the grid size (fail loudly, never repair).
    #[instrument(skip(self, caller), fields(session_id = %self.id))]
    pub fn restart(&mut self, caller: &str, now: DateTime<Utc>) -> Result<(), GameError> {
        if !self.is_participant(caller) {
            return Err(GameError::NotParticipant);
        }
        if self.board.cell_count() != self.config.cell_count() {
            warn!(
                board_len = self.board.cell_count(),
                expected = self.config.cell_count(),
                "Restart rejected: board shape mismatch"
            );
            return Err(GameError::BoardShapeMismatch);
        }

        self.board = Board::new(self.config.grid_size);
        self.winner = None;
        self.winning_line = None;
        self.ended_reason = None;
        self.paused_at = None;
        self.abandoned_by = None;
        self.moves_count = 0;
        self.last_move = None;
        self.current_turn = Slot::A;
        if self.slot_b.is_some() {
            self.status = SessionStatus::Playing;
            self.reset_turn_deadline(now);
        } else {
            self.status = SessionStatus::Waiting;
            self.turn_deadline = None;
        }
        self.mark_written(now);
        info!(status = %self.status, "Board restarted");
        Ok(())
    }

    /// Completes the current round and either ends the match or resets the
    /// board for the next round.
    fn finish_round(
        &mut self,
        round_winner: Option<Slot>,
        line: Option<Vec<usize>>,
        now: DateTime<Utc>,
    ) {
        match self
            .match_state
            .record_round(round_winner, self.moves_count, now)
        {
            RoundVerdict::MatchOver { reason } => {
                self.status = SessionStatus::Ended;
                self.ended_reason = Some(reason);
                self.winner = round_winner;
                self.winning_line = line;
                self.turn_deadline = None;
                info!(reason = %reason, winner = ?round_winner, "Match over, session ended");
            }
            RoundVerdict::NextRound => {
                self.board = Board::new(self.config.grid_size);
                self.moves_count = 0;
                self.last_move = None;
                self.winner = None;
                self.winning_line = None;
                self.current_turn = Slot::A;
                self.reset_turn_deadline(now);
                info!(
                    round_index = self.match_state.round_index,
                    "Round complete, board reset for next round"
                );
            }
        }
    }

    /// Recomputes the turn deadline for whichever slot now holds the turn;
    /// stays unset while the timer is disabled.
    ///
    /// Matchmaking caps the duration on the way in; a persisted value that
    /// still cannot produce a representable deadline disables the timer
    /// instead of panicking.
    fn reset_turn_deadline(&mut self, now: DateTime<Utc>) {
        self.turn_deadline = self.turn_duration_ms.and_then(|ms| {
            let ms = i64::try_from(ms).ok()?;
            now.checked_add_signed(Duration::milliseconds(ms))
        });
    }

    /// Stamps one applied write: bumps `version`, refreshes `updated_at`.
    fn mark_written(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}
