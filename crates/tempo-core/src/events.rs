//! The wire contract between the client core and the authoritative peer.
//!
//! Two message families:
//!
//! - **[`ServerEvent`]**: Inbound events from the authoritative peer
//!   (join snapshots, confirmed moves, chat, sub-protocol signals).
//! - **[`ClientCommand`]**: Outbound fire-and-forget commands
//!   (move submission, chat, draw/rematch/resign actions).
//!
//! Both are internally tagged on `"type"` with kebab-case event names and
//! camelCase payload fields. Payload shapes are the contract; the transport
//! mechanics (socket framing, reconnection) live outside the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{MessageId, RoomId, UserId};
use crate::seat::Seat;

// ─────────────────────────────────────────────────────────────────────────────
// Shared payload types
// ─────────────────────────────────────────────────────────────────────────────

/// A confirmed (or optimistically applied) move, as carried on the wire
/// and stored in the move ledger.
///
/// Immutable once appended to a ledger; `index` is the record's position
/// in the ledger and is assigned by the authoritative peer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// The move in UCI notation (e.g. `"e2e4"`, `"e7e8q"`).
    #[serde(rename = "move")]
    pub uci: String,
    /// The move in Standard Algebraic Notation (e.g. `"e4"`, `"O-O"`).
    pub san: String,
    /// FEN of the position after this move.
    pub fen: String,
    /// Ledger index; strictly increasing, gapless.
    pub index: u32,
    /// Who played the move.
    pub actor: UserId,
    /// When the move was confirmed.
    pub ts: DateTime<Utc>,
}

/// A participant in the room roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Participant identity.
    pub user_id: UserId,
    /// Assigned seat.
    pub seat: Seat,
    /// Display name, if the server provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Chat message author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    /// Participant identity.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Avatar reference (URL or asset key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A single chat entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message identity.
    pub id: MessageId,
    /// Author.
    pub user: ChatUser,
    /// Message body.
    pub text: String,
    /// Server receive time.
    pub ts: DateTime<Utc>,
}

/// Current status of the game, as announced by the authoritative peer.
///
/// The client never decides a result locally; it records what the peer
/// announced and gates local actions (moves, draw offers) on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Game is in progress.
    #[default]
    InProgress,
    /// White won.
    WhiteWins,
    /// Black won.
    BlackWins,
    /// Drawn.
    Draw,
    /// Aborted before completion.
    Aborted,
}

impl GameStatus {
    /// Returns true while moves can still be played.
    #[must_use]
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns true once the game has ended.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !self.is_ongoing()
    }
}

/// Why a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEndReason {
    /// Checkmate on the board.
    Checkmate,
    /// A player resigned.
    Resignation,
    /// A player ran out of time.
    Timeout,
    /// Draw agreed via the draw sub-protocol.
    DrawAgreement,
    /// Stalemate on the board.
    Stalemate,
    /// Neither side can mate.
    InsufficientMaterial,
    /// Aborted early.
    Aborted,
}

// ─────────────────────────────────────────────────────────────────────────────
// ServerEvent — inbound
// ─────────────────────────────────────────────────────────────────────────────

/// Events delivered by the authoritative peer.
///
/// Delivery may be reordered or duplicated by the network; the session
/// store's index guard is what restores a total order on moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Authoritative snapshot on initial join or reconnect.
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        /// Room being joined.
        room_id: RoomId,
        /// Current roster.
        players: Vec<Player>,
        /// Our assigned seat.
        seat: Seat,
        /// Confirmed moves so far, in ledger order.
        moves: Vec<MoveRecord>,
        /// Chat history resync, if the server sent one.
        #[serde(skip_serializing_if = "Option::is_none")]
        messages: Option<Vec<ChatMessage>>,
    },

    /// A confirmed move (including the echo of our own submissions).
    #[serde(rename_all = "camelCase")]
    OpponentMove {
        /// The confirmed record, carrying the server-assigned index.
        #[serde(flatten)]
        record: MoveRecord,
    },

    /// A chat entry for the room.
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        /// The entry.
        message: ChatMessage,
    },

    /// The opponent offered a draw.
    #[serde(rename_all = "camelCase")]
    DrawOffered {
        /// Offering player.
        from: UserId,
    },

    /// Our draw offer was accepted. A `game-ended` announcement follows.
    DrawAccepted,

    /// Our draw offer was declined.
    DrawDeclined,

    /// The opponent requested a rematch.
    #[serde(rename_all = "camelCase")]
    RematchRequested {
        /// Requesting player.
        from: UserId,
    },

    /// Rematch agreed; hand off to a brand-new session.
    #[serde(rename_all = "camelCase")]
    RematchAccepted {
        /// Room id of the new game.
        room_id: RoomId,
    },

    /// Our rematch request was declined.
    RematchDeclined,

    /// The authoritative peer declared the game finished.
    #[serde(rename_all = "camelCase")]
    GameEnded {
        /// Final status.
        status: GameStatus,
        /// Reason, when the server supplied one.
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<GameEndReason>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// ClientCommand — outbound
// ─────────────────────────────────────────────────────────────────────────────

/// Fire-and-forget commands emitted toward the authoritative peer.
///
/// Note `send-move` carries no index: the server assigns the authoritative
/// index and echoes the move back (to the sender too) as `opponent-move`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientCommand {
    /// Ask to (re)join a room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        /// Target room.
        room_id: RoomId,
    },

    /// Submit a locally validated move.
    #[serde(rename_all = "camelCase")]
    SendMove {
        /// Target room.
        room_id: RoomId,
        /// The move in UCI notation.
        #[serde(rename = "move")]
        uci: String,
    },

    /// Send a chat message.
    #[serde(rename_all = "camelCase")]
    SendChat {
        /// Target room.
        room_id: RoomId,
        /// Message body.
        text: String,
    },

    /// Offer a draw.
    #[serde(rename_all = "camelCase")]
    OfferDraw {
        /// Target room.
        room_id: RoomId,
    },

    /// Accept the opponent's draw offer.
    #[serde(rename_all = "camelCase")]
    AcceptDraw {
        /// Target room.
        room_id: RoomId,
    },

    /// Decline the opponent's draw offer.
    #[serde(rename_all = "camelCase")]
    DeclineDraw {
        /// Target room.
        room_id: RoomId,
    },

    /// Resign the game.
    #[serde(rename_all = "camelCase")]
    Resign {
        /// Target room.
        room_id: RoomId,
    },

    /// Request a rematch.
    #[serde(rename_all = "camelCase")]
    RequestRematch {
        /// Target room.
        room_id: RoomId,
    },

    /// Accept the opponent's rematch request.
    #[serde(rename_all = "camelCase")]
    AcceptRematch {
        /// Target room.
        room_id: RoomId,
    },

    /// Decline the opponent's rematch request.
    #[serde(rename_all = "camelCase")]
    DeclineRematch {
        /// Target room.
        room_id: RoomId,
    },

    /// Withdraw our own pending rematch request.
    #[serde(rename_all = "camelCase")]
    CancelRematch {
        /// Target room.
        room_id: RoomId,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
