//! Typed errors for engine operations.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Rejection produced by a session operation.
///
/// Every operation either fully applies its one write or applies none, so an
/// error always means "nothing happened" — except pause-timeout enforcement,
/// which may have fired before the rejection (see the session state machine).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, Serialize, Deserialize, strum::AsRefStr)]
pub enum GameError {
    /// No resolvable caller identity.
    #[display("no resolvable caller identity")]
    Unauthorized,
    /// Session id does not exist.
    #[display("session not found")]
    NotFound,
    /// Caller occupies neither slot of the session.
    #[display("caller is not a participant in this session")]
    NotParticipant,
    /// Session already has both slots filled.
    #[display("session already has two players")]
    SessionFull,
    /// Game configuration failed validation.
    #[display("invalid config: {_0}")]
    InvalidConfig(#[error(not(source))] String),
    /// Cell index outside `[0, grid_size^2)`.
    #[display("cell index out of bounds")]
    InvalidIndex,
    /// Target cell is already taken.
    #[display("cell is already occupied")]
    CellOccupied,
    /// Caller's slot is not the current turn.
    #[display("not your turn")]
    WrongTurn,
    /// Session is not in the `playing` state.
    #[display("game is not in progress")]
    NotInProgress,
    /// Session is paused waiting on presence.
    #[display("game is paused")]
    Paused,
    /// Persisted board length disagrees with the grid size.
    ///
    /// A consistency-invariant breach; the session is unrecoverable rather
    /// than silently repaired.
    #[display("persisted board does not match grid size")]
    BoardShapeMismatch,
}
