//! The session client facade.
//!
//! One `SessionClient` per session attempt. It is the single writer of
//! the store, the replay cursor, the sub-protocol controllers, and the
//! chat buffer: inbound server events route through
//! [`SessionClient::handle_event`], user gestures through the named
//! methods, and nothing else mutates session state.

use std::time::Duration;

use chrono::Utc;
use tempo_board::notation::PgnTags;
use tempo_board::{BoardPosition, Color, PromotionPiece, Square, UciMove};
use tempo_core::errors::SessionError;
use tempo_core::events::{ClientCommand, MoveRecord, ServerEvent};
use tempo_core::ids::{RoomId, UserId};
use tempo_session::protocols::draw::DrawController;
use tempo_session::protocols::promotion::PromotionPrompt;
use tempo_session::protocols::rematch::RematchController;
use tempo_session::store::RoomSnapshot;
use tempo_session::{ChatLog, Replay, SessionStore};
use tempo_settings::get_settings;
use tracing::{debug, info};

use crate::transport::Transport;

/// What became of a move gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied locally and submitted upstream.
    Sent,
    /// The move is a promotion and is held until a piece is chosen.
    AwaitingPromotion,
}

/// The client core of one game session.
///
/// Created unjoined; feed it a `room-joined` event (after
/// [`SessionClient::join_room`]) to seed state. On an accepted rematch it
/// resets itself and requests the fresh room automatically.
pub struct SessionClient<T: Transport> {
    user: UserId,
    transport: T,
    store: SessionStore,
    replay: Replay,
    chat: ChatLog,
    draw: DrawController,
    rematch: RematchController,
    promotion: PromotionPrompt,
}

impl<T: Transport> SessionClient<T> {
    /// A fresh, unjoined client for `user`.
    #[must_use]
    pub fn new(user: UserId, transport: T) -> Self {
        let settings = get_settings();
        Self {
            user,
            transport,
            store: SessionStore::new(),
            replay: Replay::new(),
            chat: ChatLog::new(settings.chat.buffer_cap),
            draw: DrawController::new(),
            rematch: RematchController::new(),
            promotion: PromotionPrompt::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inbound events
    // ─────────────────────────────────────────────────────────────────────

    /// Route one inbound server event into session state.
    ///
    /// Errors are per-event: the one event is rejected and the session
    /// stays usable.
    pub fn handle_event(&mut self, event: ServerEvent) -> Result<(), SessionError> {
        match event {
            ServerEvent::RoomJoined {
                room_id,
                players,
                seat,
                moves,
                messages,
            } => {
                self.store.join(
                    room_id,
                    RoomSnapshot {
                        players,
                        seat,
                        moves,
                    },
                )?;
                if let Some(history) = messages {
                    self.chat.replace_all(history);
                }
                self.replay.stop_playback();
                self.replay.live();
                self.draw.clear();
                self.rematch.clear();
                let _ = self.promotion.abandon();
                Ok(())
            }

            ServerEvent::OpponentMove { record } => self.apply_confirmed(record),

            ServerEvent::ChatMessage { message } => {
                self.chat.append(message);
                Ok(())
            }

            ServerEvent::DrawOffered { from } => {
                if from == self.user {
                    debug!("ignoring echoed draw offer");
                } else {
                    self.draw.remote_offer(from);
                }
                Ok(())
            }

            ServerEvent::DrawAccepted | ServerEvent::DrawDeclined => {
                self.draw.resolve_local();
                Ok(())
            }

            ServerEvent::RematchRequested { from } => {
                if from == self.user {
                    debug!("ignoring echoed rematch request");
                } else {
                    self.rematch.remote_request(from);
                }
                Ok(())
            }

            ServerEvent::RematchAccepted { room_id } => {
                info!(room_id = %room_id, "rematch agreed, moving to fresh room");
                self.rematch.resolve_accepted();
                self.reset_session();
                self.transport.send(ClientCommand::JoinRoom { room_id });
                Ok(())
            }

            ServerEvent::RematchDeclined => {
                self.rematch.resolve_declined();
                Ok(())
            }

            ServerEvent::GameEnded { status, reason } => {
                info!(?status, ?reason, "game ended");
                self.store.set_game_ended(status);
                self.draw.clear();
                let _ = self.promotion.abandon();
                Ok(())
            }
        }
    }

    /// Append a server-confirmed move, recognizing the echo of our own
    /// optimistic append as a confirmation no-op.
    fn apply_confirmed(&mut self, record: MoveRecord) -> Result<(), SessionError> {
        let is_echo = record.actor == self.user
            && self.store.last_move().is_some_and(|last| {
                last.index == record.index && last.uci == record.uci
            });
        if is_echo {
            debug!(index = record.index, "local move confirmed");
            return Ok(());
        }
        self.store.apply_confirmed_move(record)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Move gestures
    // ─────────────────────────────────────────────────────────────────────

    /// Attempt the move `from → to`.
    ///
    /// Validated locally before anything leaves the client: the gesture
    /// fails fast when not joined, game over, spectating, out of turn, or
    /// illegal on the board. A pawn reaching the back rank is held open
    /// for [`SessionClient::choose_promotion`] instead of being sent.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, SessionError> {
        let position = self.playable_position()?;
        if position.is_promotion(from, to) && position.is_reachable(from, to) {
            self.promotion.begin(from, to);
            return Ok(MoveOutcome::AwaitingPromotion);
        }
        self.commit_move(position, UciMove::from_squares(from, to, None))?;
        Ok(MoveOutcome::Sent)
    }

    /// Complete a held promotion with the chosen piece.
    pub fn choose_promotion(&mut self, piece: PromotionPiece) -> Result<(), SessionError> {
        let position = self.playable_position()?;
        let mv = self
            .promotion
            .choose(piece)
            .ok_or(SessionError::NoPendingRequest("promotion"))?;
        self.commit_move(position, mv)
    }

    /// Discard a held promotion without moving. Returns whether a prompt
    /// was active.
    pub fn abandon_promotion(&mut self) -> bool {
        self.promotion.abandon()
    }

    /// Whether a promotion choice is being awaited.
    #[must_use]
    pub fn awaiting_promotion(&self) -> bool {
        self.promotion.is_awaiting()
    }

    fn commit_move(
        &mut self,
        mut position: BoardPosition,
        mv: UciMove,
    ) -> Result<(), SessionError> {
        let applied = position
            .apply_uci(&mv)
            .map_err(|err| SessionError::IllegalMove(err.to_string()))?;
        let record = MoveRecord {
            uci: mv.as_str().to_owned(),
            san: applied.san,
            fen: applied.fen,
            index: self.store.ledger().next_index(),
            actor: self.user.clone(),
            ts: Utc::now(),
        };
        self.store.apply_local_move(record)?;
        self.transport.send(ClientCommand::SendMove {
            room_id: self.joined_room()?,
            uci: mv.as_str().to_owned(),
        });
        Ok(())
    }

    /// The live position, with every gating check a move gesture needs.
    fn playable_position(&self) -> Result<BoardPosition, SessionError> {
        let _room = self.joined_room()?;
        if self.store.status().is_finished() {
            return Err(SessionError::GameOver);
        }
        let our_color =
            Color::from_seat(self.store.seat()).ok_or(SessionError::SpectatorSeat)?;
        let position = self.live_position()?;
        if position.turn() != our_color {
            return Err(SessionError::NotYourTurn);
        }
        Ok(position)
    }

    /// The position after the ledger tip (the starting position when the
    /// ledger is empty).
    pub fn live_position(&self) -> Result<BoardPosition, SessionError> {
        match self.store.last_move() {
            None => Ok(BoardPosition::new()),
            Some(last) => BoardPosition::from_fen(&last.fen).map_err(|err| {
                SessionError::ReplayDesync {
                    index: last.index,
                    reason: err.to_string(),
                }
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Draw / resign / rematch / chat gestures
    // ─────────────────────────────────────────────────────────────────────

    /// Offer the opponent a draw.
    pub fn offer_draw(&mut self) -> Result<(), SessionError> {
        let room_id = self.playing_room()?;
        self.draw.offer(self.user.clone(), self.store.status())?;
        self.transport.send(ClientCommand::OfferDraw { room_id });
        Ok(())
    }

    /// Accept the opponent's pending draw offer.
    pub fn accept_draw(&mut self) -> Result<(), SessionError> {
        let room_id = self.joined_room()?;
        self.draw.accept()?;
        self.transport.send(ClientCommand::AcceptDraw { room_id });
        Ok(())
    }

    /// Decline the opponent's pending draw offer.
    pub fn decline_draw(&mut self) -> Result<(), SessionError> {
        let room_id = self.joined_room()?;
        self.draw.decline()?;
        self.transport.send(ClientCommand::DeclineDraw { room_id });
        Ok(())
    }

    /// Resign the game.
    pub fn resign(&mut self) -> Result<(), SessionError> {
        let room_id = self.playing_room()?;
        if self.store.status().is_finished() {
            return Err(SessionError::GameOver);
        }
        self.transport.send(ClientCommand::Resign { room_id });
        Ok(())
    }

    /// Request a rematch.
    pub fn request_rematch(&mut self) -> Result<(), SessionError> {
        let room_id = self.playing_room()?;
        self.rematch.request(self.user.clone())?;
        self.transport.send(ClientCommand::RequestRematch { room_id });
        Ok(())
    }

    /// Withdraw our own pending rematch request.
    pub fn cancel_rematch(&mut self) -> Result<(), SessionError> {
        let room_id = self.joined_room()?;
        self.rematch.cancel()?;
        self.transport.send(ClientCommand::CancelRematch { room_id });
        Ok(())
    }

    /// Accept the opponent's pending rematch request.
    pub fn accept_rematch(&mut self) -> Result<(), SessionError> {
        let room_id = self.joined_room()?;
        self.rematch.accept()?;
        self.transport.send(ClientCommand::AcceptRematch { room_id });
        Ok(())
    }

    /// Decline the opponent's pending rematch request.
    pub fn decline_rematch(&mut self) -> Result<(), SessionError> {
        let room_id = self.joined_room()?;
        self.rematch.decline()?;
        self.transport.send(ClientCommand::DeclineRematch { room_id });
        Ok(())
    }

    /// Send a chat message. Whitespace-only input is dropped locally.
    pub fn send_chat(&mut self, text: &str) -> Result<(), SessionError> {
        let room_id = self.joined_room()?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        self.transport.send(ClientCommand::SendChat {
            room_id,
            text: text.to_owned(),
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Room lifecycle and replay
    // ─────────────────────────────────────────────────────────────────────

    /// Ask the server to (re)join a room. State is seeded when the
    /// `room-joined` snapshot arrives.
    pub fn join_room(&self, room_id: RoomId) {
        self.transport.send(ClientCommand::JoinRoom { room_id });
    }

    /// Leave the current room and reset all session state.
    pub fn leave_room(&mut self) {
        self.reset_session();
    }

    /// Point the replay cursor at `index` (clamped to the ledger).
    pub fn review(&self, index: usize) {
        self.replay.set_cursor(index, self.store.ledger().len());
    }

    /// Step the replay cursor by `delta` (negative steps back).
    pub fn step_review(&self, delta: i32) {
        self.replay.step(delta, self.store.ledger().len());
    }

    /// Return to the live position.
    pub fn go_live(&self) {
        self.replay.live();
    }

    /// The position the UI should display: the cursor's when reviewing,
    /// the ledger tip's when live.
    pub fn displayed_position(&self) -> Result<BoardPosition, SessionError> {
        self.replay.displayed_position(self.store.ledger())
    }

    /// Start autoplay from the first move at the configured interval.
    pub fn start_playback(&mut self) {
        let interval = Duration::from_millis(get_settings().replay.playback_interval_ms);
        self.replay.start_playback(self.store.ledger().len(), interval);
    }

    /// Stop autoplay, leaving the cursor where it is.
    pub fn stop_playback(&mut self) {
        self.replay.stop_playback();
    }

    /// Export the game so far as PGN.
    #[must_use]
    pub fn export_pgn(&self, tags: &PgnTags) -> String {
        Replay::export_pgn(self.store.ledger(), tags)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────

    /// The session store (read-only).
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The replay cursor.
    #[must_use]
    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    /// The chat buffer.
    #[must_use]
    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// The draw controller (read-only; mutate through the gestures).
    #[must_use]
    pub fn draw(&self) -> &DrawController {
        &self.draw
    }

    /// The rematch controller (read-only; mutate through the gestures).
    #[must_use]
    pub fn rematch(&self) -> &RematchController {
        &self.rematch
    }

    /// Our identity.
    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    fn joined_room(&self) -> Result<RoomId, SessionError> {
        self.store.room_id().cloned().ok_or(SessionError::NotJoined)
    }

    fn playing_room(&self) -> Result<RoomId, SessionError> {
        let room_id = self.joined_room()?;
        if !self.store.seat().is_player() {
            return Err(SessionError::SpectatorSeat);
        }
        Ok(room_id)
    }

    fn reset_session(&mut self) {
        self.replay.stop_playback();
        self.replay.live();
        self.chat.clear();
        self.draw.clear();
        self.rematch.clear();
        let _ = self.promotion.abandon();
        self.store.leave();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
