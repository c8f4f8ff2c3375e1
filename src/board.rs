use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::movegen;
use crate::moves::{CastleSide, Move};
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
const STRAIGHT_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn all() -> CastlingRights {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> CastlingRights {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }
}

/// An immutable position snapshot: piece placement plus the derived state a
/// rule decision needs (side to move, castling rights, en-passant target,
/// move counters). Applying a move always produces a new `Board`; existing
/// values stay valid for undo and repetition counting.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Board {
    /// squares[rank][file], rank 0 = White's back rank, file 0 = the a-file.
    pub(crate) squares: [[Option<Piece>; 8]; 8],
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    /// Plies since the last capture or pawn move, for the fifty-move rule.
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position, White to move.
    pub fn new() -> Board {
        let mut squares = [[None; 8]; 8];
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, kind) in back_rank.into_iter().enumerate() {
            squares[0][file] = Some(Piece::new(kind, Color::White));
            squares[1][file] = Some(Piece::new(PieceType::Pawn, Color::White));
            squares[6][file] = Some(Piece::new(PieceType::Pawn, Color::Black));
            squares[7][file] = Some(Piece::new(kind, Color::Black));
        }
        Board {
            squares,
            side_to_move: Color::White,
            castling_rights: CastlingRights::all(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// An empty board with no pieces and no castling rights. Useful for
    /// setting up test positions via the `with_*` builders.
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn with_piece(mut self, square: Square, piece: Piece) -> Board {
        self.squares[square.rank()][square.file()] = Some(piece);
        self
    }

    pub fn with_side_to_move(mut self, color: Color) -> Board {
        self.side_to_move = color;
        self
    }

    pub fn with_castling_rights(mut self, rights: CastlingRights) -> Board {
        self.castling_rights = rights;
        self
    }

    pub fn with_en_passant_target(mut self, target: Option<Square>) -> Board {
        self.en_passant_target = target;
        self
    }

    pub fn with_halfmove_clock(mut self, clock: u32) -> Board {
        self.halfmove_clock = clock;
        self
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.rank()][square.file()]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some(Piece::new(PieceType::King, color)))
    }

    /// True if any piece of `attacker` pseudo-legally reaches `square`.
    /// Scans attack patterns directly rather than generating moves, so the
    /// castling checks that call this never recurse.
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        for (dr, df) in KNIGHT_OFFSETS {
            if let Some(sq) = square.offset(dr, df) {
                if self.piece_at(sq) == Some(Piece::new(PieceType::Knight, attacker)) {
                    return true;
                }
            }
        }

        for dr in -1..=1 {
            for df in -1..=1 {
                if dr == 0 && df == 0 {
                    continue;
                }
                if let Some(sq) = square.offset(dr, df) {
                    if self.piece_at(sq) == Some(Piece::new(PieceType::King, attacker)) {
                        return true;
                    }
                }
            }
        }

        // A pawn attacks diagonally forward, so look one rank back from
        // the target square along the attacker's push direction.
        let pawn_dir: i32 = if attacker == Color::White { 1 } else { -1 };
        for df in [-1, 1] {
            if let Some(sq) = square.offset(-pawn_dir, df) {
                if self.piece_at(sq) == Some(Piece::new(PieceType::Pawn, attacker)) {
                    return true;
                }
            }
        }

        for (dr, df) in STRAIGHT_DIRS {
            if let Some(piece) = self.first_piece_along(square, dr, df) {
                if piece.color == attacker
                    && matches!(piece.piece_type, PieceType::Rook | PieceType::Queen)
                {
                    return true;
                }
            }
        }
        for (dr, df) in DIAGONAL_DIRS {
            if let Some(piece) = self.first_piece_along(square, dr, df) {
                if piece.color == attacker
                    && matches!(piece.piece_type, PieceType::Bishop | PieceType::Queen)
                {
                    return true;
                }
            }
        }

        false
    }

    fn first_piece_along(&self, from: Square, dr: i32, df: i32) -> Option<Piece> {
        let mut sq = from.offset(dr, df)?;
        loop {
            if let Some(piece) = self.piece_at(sq) {
                return Some(piece);
            }
            sq = sq.offset(dr, df)?;
        }
    }

    pub fn in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(sq) => self.is_square_attacked(sq, color.opposite()),
            None => false,
        }
    }

    /// Repetition compares the exact (placement, side to move, castling
    /// rights, en-passant target) tuple; the move counters do not count.
    pub fn same_position(&self, other: &Board) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_target == other.en_passant_target
    }

    /// Apply a legal move, producing the resulting position. Fails with
    /// `MoveError::Invalid` if `mv` is not in the legal-move list for this
    /// exact position; the board is never partially updated.
    pub fn apply(&self, mv: &Move) -> Result<Board, MoveError> {
        if !movegen::legal_moves(self).contains(mv) {
            return Err(MoveError::Invalid);
        }
        Ok(self.apply_unchecked(mv))
    }

    /// Application without the legality membership check. The legality
    /// filter uses this on pseudo-legal candidates; everything else goes
    /// through `apply`.
    pub(crate) fn apply_unchecked(&self, mv: &Move) -> Board {
        let mut next = self.clone();
        let piece = mv.piece;

        // The en-passant victim sits beside the destination, on the
        // capturing pawn's starting rank.
        if mv.is_en_passant {
            next.squares[mv.from.rank()][mv.to.file()] = None;
        }

        next.squares[mv.to.rank()][mv.to.file()] = Some(piece);
        next.squares[mv.from.rank()][mv.from.file()] = None;

        if let Some(kind) = mv.promotion {
            next.squares[mv.to.rank()][mv.to.file()] = Some(Piece::new(kind, piece.color));
        }

        // Castling relocates the rook in the same ply.
        if let Some(side) = mv.castle {
            let rank = mv.from.rank();
            match side {
                CastleSide::Kingside => {
                    next.squares[rank][5] = next.squares[rank][7].take();
                }
                CastleSide::Queenside => {
                    next.squares[rank][3] = next.squares[rank][0].take();
                }
            }
        }

        // Rights only ever narrow: any king move clears both of that
        // color's rights, a rook leaving or being captured on its home
        // square clears the matching one.
        if piece.piece_type == PieceType::King {
            match piece.color {
                Color::White => {
                    next.castling_rights.white_kingside = false;
                    next.castling_rights.white_queenside = false;
                }
                Color::Black => {
                    next.castling_rights.black_kingside = false;
                    next.castling_rights.black_queenside = false;
                }
            }
        }
        for corner in [mv.from, mv.to] {
            match (corner.rank(), corner.file()) {
                (0, 0) => next.castling_rights.white_queenside = false,
                (0, 7) => next.castling_rights.white_kingside = false,
                (7, 0) => next.castling_rights.black_queenside = false,
                (7, 7) => next.castling_rights.black_kingside = false,
                _ => {}
            }
        }

        next.en_passant_target = if piece.piece_type == PieceType::Pawn
            && mv.from.rank().abs_diff(mv.to.rank()) == 2
        {
            Some(Square::at((mv.from.rank() + mv.to.rank()) / 2, mv.from.file()))
        } else {
            None
        };

        if piece.piece_type == PieceType::Pawn || mv.captured.is_some() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }

        if self.side_to_move == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = self.side_to_move.opposite();

        next
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.squares[rank][file] {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
