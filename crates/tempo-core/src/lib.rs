//! # tempo-core
//!
//! Foundation types, errors, branded IDs, and the wire contract for the
//! tempo chess client.
//!
//! This crate provides the shared vocabulary that all other tempo crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::RoomId`], [`ids::UserId`], [`ids::MessageId`] as newtypes
//! - **Seats**: [`seat::Seat`] — a participant's role in a session
//! - **Wire contract**: [`events::ServerEvent`] inbound, [`events::ClientCommand`] outbound
//! - **Errors**: [`errors::SessionError`] taxonomy via `thiserror`
//! - **Logging**: [`logging::init`] tracing-subscriber setup
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other tempo crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod ids;
pub mod logging;
pub mod seat;
