//! Position management on top of shakmaty.
//!
//! [`BoardPosition`] is the rules seam the rest of the client talks to:
//! load a position from FEN, serialize it back, validate and apply moves,
//! list legal moves from a square, and detect game-ending outcomes.

use shakmaty::{
    fen::Fen,
    san::{San, SanPlus},
    uci::UciMove as ShakmatyUciMove,
    CastlingMode, Chess, Move, Position, Square,
};
use thiserror::Error;

use crate::types::{Color, UciMove};

/// Errors from position operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The FEN string could not be parsed or is not a valid position.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// The UCI move string is malformed.
    #[error("invalid UCI move: {0}")]
    InvalidUciMove(String),

    /// The SAN token is malformed or ambiguous.
    #[error("invalid SAN: {0}")]
    InvalidSan(String),

    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// A decisive on-board outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Checkmate; the given color delivered it.
    Checkmate(Color),
    /// Stalemate.
    Stalemate,
    /// Neither side can mate.
    InsufficientMaterial,
}

/// What a successfully applied move produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// The move in SAN, computed against the position it was played from.
    pub san: String,
    /// FEN of the resulting position.
    pub fen: String,
}

/// A chess position with validation and serialization.
#[derive(Debug, Clone)]
pub struct BoardPosition {
    position: Chess,
}

impl BoardPosition {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
        }
    }

    /// Load a position from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|e| BoardError::InvalidFen(format!("{e}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| BoardError::InvalidFen(format!("{e}")))?;
        Ok(Self { position })
    }

    /// Serialize the current position to FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        Fen::from_position(self.position.clone(), shakmaty::EnPassantMode::Legal).to_string()
    }

    /// Side to move.
    #[must_use]
    pub fn turn(&self) -> Color {
        self.position.turn().into()
    }

    /// Is the side to move in check?
    #[must_use]
    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    /// Decisive outcome, if the game is over on the board.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.position.is_checkmate() {
            // The side to move is mated, so the other color won.
            Some(Outcome::Checkmate(self.turn().opposite()))
        } else if self.position.is_stalemate() {
            Some(Outcome::Stalemate)
        } else if self.position.is_insufficient_material() {
            Some(Outcome::InsufficientMaterial)
        } else {
            None
        }
    }

    /// Is the game over on the board?
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Validate and apply a UCI move, advancing the position.
    pub fn apply_uci(&mut self, mv: &UciMove) -> Result<Applied, BoardError> {
        let m = self.resolve_uci(mv)?;
        self.apply_resolved(&m, mv.as_str())
    }

    /// Validate and apply a SAN token, advancing the position.
    ///
    /// Returns the move's UCI form. Used on the PGN import path.
    pub fn apply_san(&mut self, san: &str) -> Result<String, BoardError> {
        // SanPlus tolerates check/mate suffixes on imported movetext.
        let parsed: SanPlus = san
            .parse()
            .map_err(|_| BoardError::InvalidSan(san.to_owned()))?;
        let m = parsed
            .san
            .to_move(&self.position)
            .map_err(|_| BoardError::IllegalMove(san.to_owned()))?;
        let uci = ShakmatyUciMove::from_move(&m, CastlingMode::Standard).to_string();
        let _ = self.apply_resolved(&m, san)?;
        Ok(uci)
    }

    /// Legal destination moves for the piece on `from`, in UCI notation.
    ///
    /// Promotions appear once per choosable piece (`e7e8q`, `e7e8r`, ...).
    #[must_use]
    pub fn legal_moves_from(&self, from: Square) -> Vec<UciMove> {
        self.position
            .legal_moves()
            .iter()
            .filter(|m| m.from() == Some(from))
            .filter_map(|m| {
                let uci = ShakmatyUciMove::from_move(m, CastlingMode::Standard).to_string();
                UciMove::new(&uci).ok()
            })
            .collect()
    }

    /// Would moving `from` → `to` promote a pawn?
    ///
    /// True when some legal move matches the squares and carries a
    /// promotion role, i.e. a pawn of the side to move reaching its last
    /// rank. Callers hold such a move until the user picks a piece.
    #[must_use]
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.position
            .legal_moves()
            .iter()
            .any(|m| m.from() == Some(from) && m.to() == to && m.promotion().is_some())
    }

    /// Does any legal move lead from `from` to `to`?
    #[must_use]
    pub fn is_reachable(&self, from: Square, to: Square) -> bool {
        self.position
            .legal_moves()
            .iter()
            .any(|m| m.from() == Some(from) && m.to() == to)
    }

    fn resolve_uci(&self, mv: &UciMove) -> Result<Move, BoardError> {
        let parsed: ShakmatyUciMove = mv
            .as_str()
            .parse()
            .map_err(|_| BoardError::InvalidUciMove(mv.to_string()))?;
        parsed
            .to_move(&self.position)
            .map_err(|_| BoardError::IllegalMove(mv.to_string()))
    }

    fn apply_resolved(&mut self, m: &Move, original: &str) -> Result<Applied, BoardError> {
        if !self.position.is_legal(m) {
            return Err(BoardError::IllegalMove(original.to_owned()));
        }
        // SAN depends on the position the move is played from.
        let san = San::from_move(&self.position, m).to_string();
        self.position = self
            .position
            .clone()
            .play(m)
            .map_err(|_| BoardError::IllegalMove(original.to_owned()))?;
        Ok(Applied {
            san,
            fen: self.to_fen(),
        })
    }
}

impl Default for BoardPosition {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
