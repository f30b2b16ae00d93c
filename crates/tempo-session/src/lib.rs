//! # tempo-session
//!
//! The session core of the tempo chess client:
//!
//! - **[`ledger::MoveLedger`]**: append-only, index-ordered record of all
//!   confirmed moves — the single source of truth for "what happened"
//! - **[`store::SessionStore`]**: room identity, seat, roster, and the
//!   ledger, mutated only through well-defined transitions
//! - **[`replay::Replay`]**: a read-only cursor into the ledger with full
//!   position replay, PGN export, and timer-driven autoplay
//! - **[`protocols`]**: the draw-offer, rematch, and promotion-choice
//!   state machines layered on the session
//! - **[`chat::ChatLog`]**: capped, order-preserving chat buffer
//!
//! All mutation is single-writer and event-driven; the only background
//! task in the crate is the replay playback timer.

#![deny(unsafe_code)]

pub mod chat;
pub mod ledger;
pub mod protocols;
pub mod replay;
pub mod store;

pub use chat::ChatLog;
pub use ledger::MoveLedger;
pub use replay::Replay;
pub use store::{RoomSnapshot, SessionStore, SessionUpdate};
