//! # tempo-client
//!
//! The client facade of the tempo chess client:
//!
//! - **[`transport::Transport`]**: the outbound command seam; the session
//!   core never touches a socket directly
//! - **[`client::SessionClient`]**: owns the session store, replay cursor,
//!   sub-protocol controllers, and chat buffer; the single writer of all
//!   of them
//!
//! Inbound server events enter through [`client::SessionClient::handle_event`],
//! user gestures through the named methods; both translate into store and
//! controller transitions plus fire-and-forget commands.

#![deny(unsafe_code)]

pub mod client;
pub mod transport;

pub use client::{MoveOutcome, SessionClient};
pub use transport::{ChannelTransport, Transport};
