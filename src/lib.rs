//! Gridmatch - authoritative session engine for two-player grid games.
//!
//! Two remote players share one turn-based grid game with a configurable
//! board size, win length, and best-of-N match format. The engine owns the
//! session lifecycle: it validates moves, detects wins and draws on an
//! arbitrary NxN grid, advances multi-round matches, and reconciles player
//! presence (heartbeats, disconnect pauses, timeouts) against the shared
//! session record.
//!
//! # Architecture
//!
//! - **Rules**: pure win-line generation and winner evaluation
//! - **Progress**: round history, per-slot scores, match completion
//! - **Presence**: last-seen stamps, freshness window, pause timeout
//! - **Session**: the state machine producing each new record version
//! - **Service**: operation entry points over an atomic session store
//! - **Server**: REST surface (axum) with header-based caller identity
//!
//! Every operation is one read-modify-write against a single session
//! record; time-based transitions are evaluated lazily at call time, never
//! scheduled.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod error;
mod game;
mod matchmaking;
mod presence;
mod server;
mod service;
mod session;
mod store;

// Crate-level exports - configuration
pub use config::{
    DEFAULT_GRID_SIZE, DEFAULT_WIN_LENGTH, GameConfig, MAX_TURN_DURATION_MS, MatchFormat,
    validate_turn_duration,
};

// Crate-level exports - errors
pub use error::GameError;

// Crate-level exports - pure game logic
pub use game::{
    Board, Cell, EndedReason, MatchState, RoundSummary, RoundVerdict, Slot, evaluate_winner,
    win_lines,
};

// Crate-level exports - presence policy
pub use presence::{FRESHNESS_WINDOW_SECS, PAUSE_TIMEOUT_SECS, Presence, pause_expired};

// Crate-level exports - session state machine
pub use session::{LastMove, PlayerId, Session, SessionId, SessionStatus};

// Crate-level exports - store and matchmaking
pub use matchmaking::{FindOrCreateRequest, find_or_create};
pub use store::{SessionStore, Sessions};

// Crate-level exports - service and HTTP surface
pub use server::{
    AbandonResponse, ApiError, CreateGameResponse, ErrorBody, MoveRequest, router,
};
pub use service::{GameService, HeartbeatAck};
