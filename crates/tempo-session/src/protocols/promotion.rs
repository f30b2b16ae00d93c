//! The pawn-promotion prompt.
//!
//! When a pawn move reaches the back rank the move is held locally until
//! the player picks a piece; nothing is sent in the meantime. There is no
//! default piece: abandoning the prompt discards the move entirely.

use tempo_board::{PromotionPiece, Square, UciMove};

/// A promotion move held open while the player chooses a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingPromotion {
    /// The pawn's origin square.
    pub from: Square,
    /// The back-rank destination square.
    pub to: Square,
}

/// `inactive → awaiting_choice → inactive` prompt state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromotionPrompt {
    pending: Option<PendingPromotion>,
}

impl PromotionPrompt {
    /// An inactive prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a choice is being awaited.
    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        self.pending.is_some()
    }

    /// The held move, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingPromotion> {
        self.pending.as_ref()
    }

    /// Hold a promotion move open. Replaces any previous unanswered
    /// prompt, discarding its move.
    pub fn begin(&mut self, from: Square, to: Square) {
        self.pending = Some(PendingPromotion { from, to });
    }

    /// Complete the held move with the chosen piece, clearing the
    /// prompt. Returns `None` when no prompt is active.
    pub fn choose(&mut self, piece: PromotionPiece) -> Option<UciMove> {
        let held = self.pending.take()?;
        Some(UciMove::from_squares(held.from, held.to, Some(piece)))
    }

    /// Discard the held move without choosing. Returns whether a prompt
    /// was active.
    pub fn abandon(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_builds_suffixed_move_and_clears() {
        let mut prompt = PromotionPrompt::new();
        prompt.begin(Square::E7, Square::E8);
        assert!(prompt.is_awaiting());

        let mv = prompt.choose(PromotionPiece::Queen).unwrap();
        assert_eq!(mv.as_str(), "e7e8q");
        assert!(!prompt.is_awaiting());
    }

    #[test]
    fn choose_without_prompt_returns_none() {
        let mut prompt = PromotionPrompt::new();
        assert!(prompt.choose(PromotionPiece::Knight).is_none());
    }

    #[test]
    fn abandon_discards_held_move() {
        let mut prompt = PromotionPrompt::new();
        prompt.begin(Square::A7, Square::B8);
        assert!(prompt.abandon());
        assert!(!prompt.is_awaiting());
        assert!(!prompt.abandon());
    }

    #[test]
    fn begin_replaces_unanswered_prompt() {
        let mut prompt = PromotionPrompt::new();
        prompt.begin(Square::E7, Square::E8);
        prompt.begin(Square::H7, Square::H8);

        let mv = prompt.choose(PromotionPiece::Rook).unwrap();
        assert_eq!(mv.as_str(), "h7h8r");
    }

    #[test]
    fn underpromotion_suffixes() {
        for (piece, suffix) in [
            (PromotionPiece::Queen, 'q'),
            (PromotionPiece::Rook, 'r'),
            (PromotionPiece::Bishop, 'b'),
            (PromotionPiece::Knight, 'n'),
        ] {
            let mut prompt = PromotionPrompt::new();
            prompt.begin(Square::C7, Square::C8);
            let mv = prompt.choose(piece).unwrap();
            assert!(mv.as_str().ends_with(suffix));
        }
    }
}
