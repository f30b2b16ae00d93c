//! Seat assignment within a session.

use serde::{Deserialize, Serialize};

/// A participant's role in a session.
///
/// Assigned once by the server when the room is joined and immutable for
/// the session's duration. Spectators can watch and chat but never move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// Plays the white pieces.
    White,
    /// Plays the black pieces.
    Black,
    /// Watching only.
    #[default]
    Spectator,
}

impl Seat {
    /// Returns true if this seat plays one of the two sides.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::White | Self::Black)
    }

    /// The opposing player seat, if this is a player seat.
    #[must_use]
    pub const fn opponent(self) -> Option<Self> {
        match self {
            Self::White => Some(Self::Black),
            Self::Black => Some(Self::White),
            Self::Spectator => None,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::White => f.write_str("white"),
            Self::Black => f.write_str("black"),
            Self::Spectator => f.write_str("spectator"),
        }
    }
}
