//! Serializable wrappers around shakmaty's vocabulary.

use serde::{Deserialize, Serialize};
use tempo_core::seat::Seat;

use crate::position::BoardError;

/// Piece color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// White pieces.
    White,
    /// Black pieces.
    Black,
}

impl Color {
    /// The opposite color.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The color a seat plays, if it plays one.
    #[must_use]
    pub const fn from_seat(seat: Seat) -> Option<Self> {
        match seat {
            Seat::White => Some(Self::White),
            Seat::Black => Some(Self::Black),
            Seat::Spectator => None,
        }
    }
}

impl From<shakmaty::Color> for Color {
    fn from(c: shakmaty::Color) -> Self {
        match c {
            shakmaty::Color::White => Self::White,
            shakmaty::Color::Black => Self::Black,
        }
    }
}

impl From<Color> for shakmaty::Color {
    fn from(c: Color) -> Self {
        match c {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::White => f.write_str("white"),
            Self::Black => f.write_str("black"),
        }
    }
}

/// The piece a promoting pawn becomes.
///
/// Serialized as the single UCI letter (`"q"`, `"r"`, `"b"`, `"n"`), which
/// is also how the choice travels inside a UCI move string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionPiece {
    /// Queen.
    #[serde(rename = "q")]
    Queen,
    /// Rook.
    #[serde(rename = "r")]
    Rook,
    /// Bishop.
    #[serde(rename = "b")]
    Bishop,
    /// Knight.
    #[serde(rename = "n")]
    Knight,
}

impl PromotionPiece {
    /// The UCI suffix letter.
    #[must_use]
    pub const fn uci_char(self) -> char {
        match self {
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
        }
    }
}

impl From<PromotionPiece> for shakmaty::Role {
    fn from(p: PromotionPiece) -> Self {
        match p {
            PromotionPiece::Queen => Self::Queen,
            PromotionPiece::Rook => Self::Rook,
            PromotionPiece::Bishop => Self::Bishop,
            PromotionPiece::Knight => Self::Knight,
        }
    }
}

/// A move in UCI notation, validated on construction.
///
/// Examples: `"e2e4"`, `"e1g1"` (castling as a king move), `"e7e8q"`
/// (promotion).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UciMove(String);

impl UciMove {
    /// Validate and wrap a UCI move string.
    pub fn new(raw: &str) -> Result<Self, BoardError> {
        let _: shakmaty::uci::UciMove = raw
            .parse()
            .map_err(|_| BoardError::InvalidUciMove(raw.to_owned()))?;
        Ok(Self(raw.to_owned()))
    }

    /// Build a UCI move from squares plus an optional promotion choice.
    #[must_use]
    pub fn from_squares(
        from: shakmaty::Square,
        to: shakmaty::Square,
        promotion: Option<PromotionPiece>,
    ) -> Self {
        let mut s = format!("{from}{to}");
        if let Some(p) = promotion {
            s.push(p.uci_char());
        }
        Self(s)
    }

    /// The raw string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UciMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UciMove {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
