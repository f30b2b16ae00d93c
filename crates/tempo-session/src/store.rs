//! The session state store.
//!
//! Single mutable source of truth for room identity, seat assignment,
//! roster, game status, and the move ledger. Only the store's own
//! contract methods mutate it; transport callbacks and UI code route
//! through them, never reach inside.

use tempo_core::errors::SessionError;
use tempo_core::events::{GameStatus, MoveRecord, Player};
use tempo_core::ids::RoomId;
use tempo_core::seat::Seat;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::ledger::MoveLedger;

/// Capacity of the change-notification channel. Lagging subscribers drop
/// old updates; they can always re-read the store directly.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Authoritative state delivered on (re)join.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomSnapshot {
    /// Current roster.
    pub players: Vec<Player>,
    /// Our assigned seat.
    pub seat: Seat,
    /// Confirmed moves so far, in ledger order.
    pub moves: Vec<MoveRecord>,
}

/// Change notifications emitted after every successful store transition.
///
/// Downstream consumers (board redraw, clock logic) subscribe via
/// [`SessionStore::subscribe`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The session joined a room and seeded from a snapshot.
    Joined {
        /// The joined room.
        room_id: RoomId,
    },
    /// A move was appended to the ledger.
    MoveApplied {
        /// Ledger index of the new record.
        index: u32,
        /// True for optimistic local appends, false for confirmed ones.
        local: bool,
    },
    /// The authoritative peer declared the game finished.
    GameEnded {
        /// Final status.
        status: GameStatus,
    },
    /// The session left the room and reset.
    Left,
}

/// The session state store.
///
/// Lifecycle is explicit: create one per session attempt, seed it with
/// [`SessionStore::join`], tear it down with [`SessionStore::leave`].
/// There is no global instance.
#[derive(Debug)]
pub struct SessionStore {
    room_id: Option<RoomId>,
    joined: bool,
    players: Vec<Player>,
    seat: Seat,
    status: GameStatus,
    ledger: MoveLedger,
    updates: broadcast::Sender<SessionUpdate>,
}

impl SessionStore {
    /// An empty, unjoined store.
    #[must_use]
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            room_id: None,
            joined: false,
            players: Vec::new(),
            seat: Seat::Spectator,
            status: GameStatus::InProgress,
            ledger: MoveLedger::new(),
            updates,
        }
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates.subscribe()
    }

    /// Seed the session from an authoritative snapshot.
    ///
    /// Used on initial join and on reconnect; a reconnect snapshot fully
    /// replaces the previous view. Fails — leaving the store unjoined —
    /// if the snapshot's move list violates the gapless-index invariant.
    pub fn join(&mut self, room_id: RoomId, snapshot: RoomSnapshot) -> Result<(), SessionError> {
        let ledger = MoveLedger::from_records(snapshot.moves)?;
        self.room_id = Some(room_id.clone());
        self.joined = true;
        self.players = snapshot.players;
        self.seat = snapshot.seat;
        self.status = GameStatus::InProgress;
        self.ledger = ledger;
        debug!(room_id = %room_id, seat = %self.seat, moves = self.ledger.len(), "joined room");
        self.notify(SessionUpdate::Joined { room_id });
        Ok(())
    }

    /// Append a server-confirmed move.
    ///
    /// Rejections (out-of-order or duplicate delivery) leave the ledger
    /// untouched and are surfaced to observability: they imply lost or
    /// duplicated transport delivery, which the authoritative peer needs
    /// to hear about even though the session stays usable.
    pub fn apply_confirmed_move(&mut self, record: MoveRecord) -> Result<(), SessionError> {
        self.ensure_joined()?;
        let index = record.index;
        if let Err(err) = self.ledger.append(record) {
            warn!(%err, "rejected confirmed move");
            metrics::counter!("session_out_of_order_moves_total").increment(1);
            return Err(err);
        }
        self.notify(SessionUpdate::MoveApplied {
            index,
            local: false,
        });
        Ok(())
    }

    /// Optimistically append a move the local user just made, before the
    /// upstream confirmation arrives. Same index contract as
    /// [`Self::apply_confirmed_move`]; the record is speculative until the
    /// authoritative echo arrives.
    pub fn apply_local_move(&mut self, record: MoveRecord) -> Result<(), SessionError> {
        self.ensure_joined()?;
        let index = record.index;
        self.ledger.append(record)?;
        self.notify(SessionUpdate::MoveApplied { index, local: true });
        Ok(())
    }

    /// Record a peer-announced game end.
    ///
    /// The client never decides a result locally; this is the only way a
    /// session becomes finished.
    pub fn set_game_ended(&mut self, status: GameStatus) {
        self.status = status;
        self.notify(SessionUpdate::GameEnded { status });
    }

    /// Reset to empty and unjoined.
    pub fn leave(&mut self) {
        self.room_id = None;
        self.joined = false;
        self.players.clear();
        self.seat = Seat::Spectator;
        self.status = GameStatus::InProgress;
        self.ledger = MoveLedger::new();
        self.notify(SessionUpdate::Left);
    }

    /// The joined room, if any.
    #[must_use]
    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    /// Whether a room is currently joined.
    #[must_use]
    pub fn joined(&self) -> bool {
        self.joined
    }

    /// Our seat. Spectator until joined; immutable for the session.
    #[must_use]
    pub fn seat(&self) -> Seat {
        self.seat
    }

    /// Current roster.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Game status as last announced by the peer.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The move ledger (read-only; mutate through the apply methods).
    #[must_use]
    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    /// The most recent move, if any.
    #[must_use]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.ledger.last()
    }

    fn ensure_joined(&self) -> Result<(), SessionError> {
        if self.joined {
            Ok(())
        } else {
            Err(SessionError::NotJoined)
        }
    }

    fn notify(&self, update: SessionUpdate) {
        // No subscribers is fine; the store does not require observers.
        let _ = self.updates.send(update);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempo_core::ids::UserId;

    fn record(index: u32, uci: &str) -> MoveRecord {
        MoveRecord {
            uci: uci.into(),
            san: String::new(),
            fen: String::new(),
            index,
            actor: UserId::from("u-1"),
            ts: chrono::Utc::now(),
        }
    }

    fn snapshot(moves: Vec<MoveRecord>) -> RoomSnapshot {
        RoomSnapshot {
            players: vec![
                Player {
                    user_id: UserId::from("u-1"),
                    seat: Seat::White,
                    display_name: None,
                },
                Player {
                    user_id: UserId::from("u-2"),
                    seat: Seat::Black,
                    display_name: None,
                },
            ],
            seat: Seat::White,
            moves,
        }
    }

    #[test]
    fn join_seeds_from_snapshot() {
        let mut store = SessionStore::new();
        store
            .join(RoomId::from("room-1"), snapshot(vec![record(0, "e2e4")]))
            .unwrap();

        assert!(store.joined());
        assert_eq!(store.room_id().unwrap().as_str(), "room-1");
        assert_eq!(store.seat(), Seat::White);
        assert_eq!(store.players().len(), 2);
        assert_eq!(store.ledger().len(), 1);
        assert_eq!(store.last_move().unwrap().uci, "e2e4");
    }

    #[test]
    fn join_rejects_corrupt_snapshot() {
        let mut store = SessionStore::new();
        let result = store.join(
            RoomId::from("room-1"),
            snapshot(vec![record(0, "e2e4"), record(2, "e7e5")]),
        );
        assert_matches!(result, Err(SessionError::OutOfOrderMove { .. }));
        assert!(!store.joined());
    }

    #[test]
    fn moves_require_join() {
        let mut store = SessionStore::new();
        assert_matches!(
            store.apply_confirmed_move(record(0, "e2e4")),
            Err(SessionError::NotJoined)
        );
    }

    #[test]
    fn confirmed_move_appends_and_notifies() {
        let mut store = SessionStore::new();
        let mut rx = store.subscribe();
        store.join(RoomId::from("room-1"), snapshot(vec![])).unwrap();
        store.apply_confirmed_move(record(0, "e2e4")).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionUpdate::Joined {
                room_id: RoomId::from("room-1")
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionUpdate::MoveApplied {
                index: 0,
                local: false
            }
        );
        assert_eq!(store.last_move().unwrap().uci, "e2e4");
    }

    #[test]
    fn out_of_order_confirmed_move_rejected() {
        let mut store = SessionStore::new();
        store
            .join(RoomId::from("room-1"), snapshot(vec![record(0, "e2e4")]))
            .unwrap();

        // Duplicate delivery (index below tip).
        assert_matches!(
            store.apply_confirmed_move(record(0, "e2e4")),
            Err(SessionError::OutOfOrderMove { expected: 1, got: 0 })
        );
        // Gap (index beyond tip).
        assert_matches!(
            store.apply_confirmed_move(record(2, "g1f3")),
            Err(SessionError::OutOfOrderMove { expected: 1, got: 2 })
        );
        assert_eq!(store.ledger().len(), 1);
    }

    #[test]
    fn local_move_is_optimistic_append() {
        let mut store = SessionStore::new();
        store.join(RoomId::from("room-1"), snapshot(vec![])).unwrap();
        let mut rx = store.subscribe();

        store.apply_local_move(record(0, "e2e4")).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionUpdate::MoveApplied {
                index: 0,
                local: true
            }
        );
    }

    #[test]
    fn game_end_is_recorded_not_decided() {
        let mut store = SessionStore::new();
        store.join(RoomId::from("room-1"), snapshot(vec![])).unwrap();
        assert!(store.status().is_ongoing());

        store.set_game_ended(GameStatus::Draw);
        assert!(store.status().is_finished());
        assert_eq!(store.status(), GameStatus::Draw);
    }

    #[test]
    fn leave_resets_everything() {
        let mut store = SessionStore::new();
        store
            .join(RoomId::from("room-1"), snapshot(vec![record(0, "e2e4")]))
            .unwrap();
        store.set_game_ended(GameStatus::WhiteWins);
        store.leave();

        assert!(!store.joined());
        assert!(store.room_id().is_none());
        assert!(store.players().is_empty());
        assert_eq!(store.seat(), Seat::Spectator);
        assert!(store.ledger().is_empty());
        assert!(store.status().is_ongoing());
    }

    #[test]
    fn rejoin_replaces_previous_view() {
        let mut store = SessionStore::new();
        store
            .join(RoomId::from("room-1"), snapshot(vec![record(0, "e2e4")]))
            .unwrap();

        // Reconnect snapshot with more moves.
        store
            .join(
                RoomId::from("room-1"),
                snapshot(vec![record(0, "e2e4"), record(1, "e7e5")]),
            )
            .unwrap();
        assert_eq!(store.ledger().len(), 2);
    }
}
