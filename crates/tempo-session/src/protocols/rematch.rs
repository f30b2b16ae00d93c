//! The rematch-request state machine.

use tempo_core::errors::SessionError;
use tempo_core::ids::UserId;
use tracing::debug;

use super::{Origin, PendingRequest};

/// Tracks at most one outstanding rematch request per session.
///
/// Requests are accepted at any point in the session, not only after the
/// game finishes. An accepted rematch resolves here and hands control to
/// the caller, who tears down the current session and joins the fresh
/// room the acceptance names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RematchController {
    pending: Option<PendingRequest>,
}

impl RematchController {
    /// A controller with no outstanding request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Record a local rematch request. Only valid from `none`.
    pub fn request(&mut self, from: UserId) -> Result<(), SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::AlreadyPending("rematch"));
        }
        self.pending = Some(PendingRequest::new(Origin::Local, from));
        Ok(())
    }

    /// Withdraw our own pending request.
    ///
    /// Only a local-origin request can be cancelled; an opponent's
    /// request is answered, not withdrawn.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        match self.pending {
            Some(PendingRequest {
                origin: Origin::Local,
                ..
            }) => {
                self.pending = None;
                Ok(())
            }
            _ => Err(SessionError::NoPendingRequest("rematch")),
        }
    }

    /// Record a remote rematch request. A duplicate while one is already
    /// pending is a no-op.
    pub fn remote_request(&mut self, from: UserId) {
        if self.pending.is_some() {
            debug!(%from, "ignoring rematch request while one is pending");
            return;
        }
        self.pending = Some(PendingRequest::new(Origin::Remote, from));
    }

    /// Accept the opponent's pending request, clearing it.
    pub fn accept(&mut self) -> Result<(), SessionError> {
        self.take_remote()
    }

    /// Decline the opponent's pending request, clearing it.
    pub fn decline(&mut self) -> Result<(), SessionError> {
        self.take_remote()
    }

    /// The opponent accepted: clear whatever is pending.
    ///
    /// Acceptance arrives on both sides of the handshake, so it resolves
    /// a pending request of either origin. With nothing pending (late
    /// duplicate) this is a stale no-op.
    pub fn resolve_accepted(&mut self) {
        if self.pending.take().is_none() {
            debug!("ignoring stale rematch acceptance");
        }
    }

    /// The opponent declined our request.
    pub fn resolve_declined(&mut self) {
        match self.pending {
            Some(PendingRequest {
                origin: Origin::Local,
                ..
            }) => self.pending = None,
            _ => debug!("ignoring stale rematch decline"),
        }
    }

    /// Drop any pending request (session reset).
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
            _ => Err(SessionError::NoPendingRequest("rematch")),
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
    fn request_goes_pending_local() {
        let mut rematch = RematchController::new();
        rematch.request(me()).unwrap();
        assert_eq!(rematch.pending().unwrap().origin, Origin::Local);
    }

    #[test]
    fn request_mid_game_is_allowed() {
        // There is deliberately no game-over gate here.
        let mut rematch = RematchController::new();
        assert!(rematch.request(me()).is_ok());
    }

    #[test]
    fn second_request_rejected() {
        let mut rematch = RematchController::new();
        rematch.request(me()).unwrap();
        assert_matches!(
            rematch.request(me()),
            Err(SessionError::AlreadyPending("rematch"))
        );
    }

    #[test]
    fn cancel_clears_local_request() {
        let mut rematch = RematchController::new();
        rematch.request(me()).unwrap();
        rematch.cancel().unwrap();
        assert!(rematch.pending().is_none());
    }

    #[test]
    fn cancel_cannot_withdraw_remote_request() {
        let mut rematch = RematchController::new();
        rematch.remote_request(opp());
        assert_matches!(
            rematch.cancel(),
            Err(SessionError::NoPendingRequest("rematch"))
        );
        assert!(rematch.pending().is_some());
    }

    #[test]
    fn remote_request_does_not_overwrite_local() {
        let mut rematch = RematchController::new();
        rematch.request(me()).unwrap();
        rematch.remote_request(opp());
        assert_eq!(rematch.pending().unwrap().origin, Origin::Local);
    }

    #[test]
    fn accept_clears_remote_request() {
        let mut rematch = RematchController::new();
        rematch.remote_request(opp());
        rematch.accept().unwrap();
        assert!(rematch.pending().is_none());
    }

    #[test]
    fn accept_without_remote_request_fails() {
        let mut rematch = RematchController::new();
        assert_matches!(
            rematch.accept(),
            Err(SessionError::NoPendingRequest("rematch"))
        );
    }

    #[test]
    fn resolve_accepted_clears_either_origin() {
        let mut rematch = RematchController::new();
        rematch.request(me()).unwrap();
        rematch.resolve_accepted();
        assert!(rematch.pending().is_none());

        rematch.remote_request(opp());
        rematch.resolve_accepted();
        assert!(rematch.pending().is_none());
    }

    #[test]
    fn resolve_declined_only_clears_local() {
        let mut rematch = RematchController::new();
        rematch.request(me()).unwrap();
        rematch.resolve_declined();
        assert!(rematch.pending().is_none());

        rematch.remote_request(opp());
        rematch.resolve_declined();
        assert!(rematch.pending().is_some());
    }

    #[test]
    fn stale_resolutions_are_noops() {
        let mut rematch = RematchController::new();
        rematch.resolve_accepted();
        rematch.resolve_declined();
        assert!(rematch.pending().is_none());
    }
}
