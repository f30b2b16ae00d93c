//! Error taxonomy for the session core.
//!
//! Nothing here is fatal to the process. Every failure mode degrades to
//! "reject the one operation and keep the session usable" — the
//! authoritative peer, not this client, owns correctness.

use thiserror::Error;

/// Errors surfaced by session-core operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A confirmed move's index does not match the expected next ledger
    /// index. The append is rejected; the ledger is untouched. Implies
    /// lost or duplicated transport delivery, so callers surface it to
    /// observability rather than swallowing it.
    #[error("out-of-order move: expected index {expected}, got {got}")]
    OutOfOrderMove {
        /// The next index the ledger would accept.
        expected: u32,
        /// The index the record carried.
        got: u32,
    },

    /// The rules engine rejected a user's attempted move. UI feedback
    /// only; no state was mutated.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// Replaying the ledger hit a record the rules engine no longer
    /// accepts, e.g. after an earlier undetected corruption.
    #[error("replay desync at index {index}: {reason}")]
    ReplayDesync {
        /// Ledger index of the offending record.
        index: u32,
        /// What the engine objected to.
        reason: String,
    },

    /// The operation needs a joined session.
    #[error("not joined to a room")]
    NotJoined,

    /// The game has already finished.
    #[error("game is already over")]
    GameOver,

    /// Spectators cannot perform this action.
    #[error("seat is spectator")]
    SpectatorSeat,

    /// It is not our turn to move.
    #[error("not your turn")]
    NotYourTurn,

    /// A sub-protocol request is already outstanding.
    #[error("a {0} request is already pending")]
    AlreadyPending(&'static str),

    /// The sub-protocol action needs a pending request that does not
    /// exist (or is ours rather than the opponent's).
    #[error("no matching pending {0} request")]
    NoPendingRequest(&'static str),
}
