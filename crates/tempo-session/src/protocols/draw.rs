//! The draw-offer state machine.

use tempo_core::errors::SessionError;
use tempo_core::events::GameStatus;
use tempo_core::ids::UserId;
use tracing::debug;

use super::{Origin, PendingRequest};

/// Tracks at most one outstanding draw offer per session.
///
/// Accepting never ends the game locally: the authoritative peer marks
/// the session finished via its own announcement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawController {
    pending: Option<PendingRequest>,
}

impl DrawController {
    /// A controller with no outstanding offer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding offer, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Record a local draw offer.
    ///
    /// Only valid from `none`, and only while the game is unfinished. In
    /// particular an existing opponent-initiated offer is never
    /// overwritten — the one-outstanding-offer invariant.
    pub fn offer(&mut self, from: UserId, status: GameStatus) -> Result<(), SessionError> {
        if status.is_finished() {
            return Err(SessionError::GameOver);
        }
        if self.pending.is_some() {
            return Err(SessionError::AlreadyPending("draw"));
        }
        self.pending = Some(PendingRequest::new(Origin::Local, from));
        Ok(())
    }

    /// Record a remote draw offer. A duplicate while one is already
    /// pending is a no-op.
    pub fn remote_offer(&mut self, from: UserId) {
        if self.pending.is_some() {
            debug!(%from, "ignoring draw offer while one is pending");
            return;
        }
        self.pending = Some(PendingRequest::new(Origin::Remote, from));
    }

    /// Accept the opponent's pending offer, clearing it.
    ///
    /// The session is marked finished by the peer's follow-up
    /// announcement, not here.
    pub fn accept(&mut self) -> Result<(), SessionError> {
        self.take_remote()
    }

    /// Decline the opponent's pending offer, clearing it.
    pub fn decline(&mut self) -> Result<(), SessionError> {
        self.take_remote()
    }

    /// The peer answered our offer (`draw-accepted` / `draw-declined`).
    ///
    /// With no matching local offer pending (late duplicate) this is a
    /// stale no-op.
    pub fn resolve_local(&mut self) {
        match self.pending {
            Some(PendingRequest {
                origin: Origin::Local,
                ..
            }) => self.pending = None,
            _ => debug!("ignoring stale draw resolution"),
        }
    }

    /// Drop any pending offer (session reset or game end).
    pub fn clear(&mut self) {
        self.pending = None;
    }

    fn take_remote(&mut self) -> Result<(), SessionError> {
        match self.pending {
            Some(PendingRequest {
                origin: Origin::Remote,
                ..
            }) => {
                self.pending = None;
                Ok(())
            }
            _ => Err(SessionError::NoPendingRequest("draw")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn me() -> UserId {
        UserId::from("u-me")
    }

    fn opp() -> UserId {
        UserId::from("u-opp")
    }

    #[test]
    fn offer_from_none_goes_pending_local() {
        let mut draw = DrawController::new();
        draw.offer(me(), GameStatus::InProgress).unwrap();
        assert_eq!(draw.pending().unwrap().origin, Origin::Local);
    }

    #[test]
    fn offer_rejected_when_game_finished() {
        let mut draw = DrawController::new();
        assert_matches!(
            draw.offer(me(), GameStatus::Draw),
            Err(SessionError::GameOver)
        );
    }

    #[test]
    fn offer_does_not_overwrite_pending_remote() {
        let mut draw = DrawController::new();
        draw.remote_offer(opp());

        assert_matches!(
            draw.offer(me(), GameStatus::InProgress),
            Err(SessionError::AlreadyPending("draw"))
        );
        // Opponent-initiated state intact.
        let pending = draw.pending().unwrap();
        assert_eq!(pending.origin, Origin::Remote);
        assert_eq!(pending.from, opp());
    }

    #[test]
    fn duplicate_remote_offer_is_noop() {
        let mut draw = DrawController::new();
        draw.offer(me(), GameStatus::InProgress).unwrap();
        draw.remote_offer(opp());
        // Still our local offer.
        assert_eq!(draw.pending().unwrap().origin, Origin::Local);
    }

    #[test]
    fn accept_clears_remote_offer() {
        let mut draw = DrawController::new();
        draw.remote_offer(opp());
        draw.accept().unwrap();
        assert!(draw.pending().is_none());
    }

    #[test]
    fn accept_without_remote_offer_fails() {
        let mut draw = DrawController::new();
        assert_matches!(draw.accept(), Err(SessionError::NoPendingRequest("draw")));

        // Our own offer cannot be accepted by us either.
        draw.offer(me(), GameStatus::InProgress).unwrap();
        assert_matches!(draw.accept(), Err(SessionError::NoPendingRequest("draw")));
    }

    #[test]
    fn decline_clears_remote_offer() {
        let mut draw = DrawController::new();
        draw.remote_offer(opp());
        draw.decline().unwrap();
        assert!(draw.pending().is_none());
    }

    #[test]
    fn resolve_local_clears_our_offer() {
        let mut draw = DrawController::new();
        draw.offer(me(), GameStatus::InProgress).unwrap();
        draw.resolve_local();
        assert!(draw.pending().is_none());
    }

    #[test]
    fn stale_resolution_is_noop() {
        let mut draw = DrawController::new();
        draw.resolve_local(); // nothing pending
        assert!(draw.pending().is_none());

        // A remote offer is not "ours"; a stray resolution leaves it.
        draw.remote_offer(opp());
        draw.resolve_local();
        assert!(draw.pending().is_some());
    }

    #[test]
    fn offer_again_after_resolution() {
        let mut draw = DrawController::new();
        draw.offer(me(), GameStatus::InProgress).unwrap();
        draw.resolve_local();
        draw.offer(me(), GameStatus::InProgress).unwrap();
        assert_eq!(draw.pending().unwrap().origin, Origin::Local);
    }
}
