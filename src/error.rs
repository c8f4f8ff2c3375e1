use thiserror::Error;

use crate::piece::PieceType;
use crate::square::Square;

/// Failures when proposing or applying a move.
#[derive(Clone, Copy, PartialEq, Eq, Error, Debug)]
pub enum MoveError {
    /// The requested from/to/promotion matches no currently legal move.
    /// Covers moving into check, moving an opponent's piece, moving through
    /// blockers, illegal castling, and bogus promotion requests.
    #[error("illegal move {from}{to}: does not match any legal move in this position")]
    Illegal {
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    },

    /// The applier was handed a move that is not in the legal-move list for
    /// this exact position. A caller bug, never silently corrected.
    #[error("move was not drawn from the legal-move list for this position")]
    Invalid,
}

#[derive(Clone, Copy, PartialEq, Eq, Error, Debug)]
pub enum UndoError {
    #[error("no moves to undo")]
    NothingToUndo,
}
