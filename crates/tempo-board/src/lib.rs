//! # tempo-board
//!
//! The position engine for the tempo client: a thin facade over shakmaty
//! plus PGN movetext read/write.
//!
//! - **Types**: [`types::Color`], [`types::PromotionPiece`], [`types::UciMove`] —
//!   serializable wrappers around shakmaty's vocabulary
//! - **Position**: [`position::BoardPosition`] — FEN load/dump, validate and
//!   apply moves, legal moves from a square, outcome detection
//! - **Notation**: [`notation`] — PGN movetext writing and parsing
//!
//! Pure and synchronous; no I/O. The rules library is consumed as a black
//! box: given a position and a candidate move it returns the resulting
//! position or rejects it.

#![deny(unsafe_code)]

pub mod notation;
pub mod position;
pub mod types;

pub use position::{Applied, BoardError, BoardPosition, Outcome};
pub use types::{Color, PromotionPiece, UciMove};

pub use shakmaty::Square;

/// Standard starting position in FEN.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
