use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Color, PieceType};
use crate::square::Square;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    FiftyMoveDraw,
    InsufficientMaterialDraw,
    RepetitionDraw,
}

impl GameStatus {
    /// Checkmate, stalemate and the draws end the game; `Ongoing` and
    /// `Check` do not.
    pub fn is_game_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::FiftyMoveDraw => "draw by fifty-move rule",
            GameStatus::InsufficientMaterialDraw => "draw by insufficient material",
            GameStatus::RepetitionDraw => "draw by repetition",
        };
        write!(f, "{text}")
    }
}

/// Derive the game status for the side to move. `occurrences` is how many
/// times the current position (exact placement/side/rights/en-passant
/// tuple) has appeared over the session, the current one included.
///
/// Running out of legal moves ends the game immediately, so checkmate and
/// stalemate are decided before any of the draw conditions.
pub fn evaluate(board: &Board, legal_moves: &[Move], occurrences: usize) -> GameStatus {
    let in_check = board.in_check(board.side_to_move());

    if legal_moves.is_empty() {
        return if in_check {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
    }
    if board.halfmove_clock() >= 100 {
        return GameStatus::FiftyMoveDraw;
    }
    if occurrences >= 3 {
        return GameStatus::RepetitionDraw;
    }
    if insufficient_material(board) {
        return GameStatus::InsufficientMaterialDraw;
    }
    if in_check {
        GameStatus::Check
    } else {
        GameStatus::Ongoing
    }
}

/// Neither side can force mate: king versus king, or king versus king and
/// a single minor piece.
fn insufficient_material(board: &Board) -> bool {
    let mut white = Vec::new();
    let mut black = Vec::new();
    for sq in Square::all() {
        if let Some(piece) = board.piece_at(sq) {
            match piece.color {
                Color::White => white.push(piece.piece_type),
                Color::Black => black.push(piece.piece_type),
            }
        }
    }

    let lone_king = |pieces: &[PieceType]| pieces.len() == 1;
    let king_and_minor = |pieces: &[PieceType]| {
        pieces.len() == 2 && pieces.iter().any(|kind| kind.is_minor())
    };

    (lone_king(&white) && lone_king(&black))
        || (lone_king(&white) && king_and_minor(&black))
        || (lone_king(&black) && king_and_minor(&white))
}
