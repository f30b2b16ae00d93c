//! Sub-protocols layered on the session.
//!
//! Each is a small finite state machine owning its own pending-request
//! field and clearing it atomically on resolution:
//!
//! | Controller | States |
//! |------------|--------|
//! | [`draw::DrawController`] | `none → pending(local\|remote) → none` |
//! | [`rematch::RematchController`] | `none → pending(local\|remote) → none` |
//! | [`promotion::PromotionPrompt`] | `inactive → awaiting_choice → inactive` |
//!
//! A resolution event with no matching pending request (late duplicate
//! delivery) is a stale no-op everywhere, never an escalated error.
//! Identity is the one canonical [`tempo_core::ids::UserId`]; there is no
//! connection-level fallback matching.

pub mod draw;
pub mod promotion;
pub mod rematch;

use chrono::{DateTime, Utc};
use tempo_core::ids::UserId;

/// Which side initiated a pending request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// We initiated it.
    Local,
    /// The opponent initiated it.
    Remote,
}

/// An outstanding draw or rematch request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Which side initiated.
    pub origin: Origin,
    /// The initiating player.
    pub from: UserId,
    /// When the request was recorded locally.
    pub at: DateTime<Utc>,
}

impl PendingRequest {
    pub(crate) fn new(origin: Origin, from: UserId) -> Self {
        Self {
            origin,
            from,
            at: Utc::now(),
        }
    }
}
