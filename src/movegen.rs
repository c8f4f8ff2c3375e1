//! Pseudo-legal move generation and the legality filter.
//!
//! `pseudo_legal_moves` enumerates every geometrically reachable move for
//! the side to move; `legal_moves` keeps only those that leave the mover's
//! own king safe. The latter is the one place check is evaluated.

use crate::board::Board;
use crate::moves::{CastleSide, Move};
use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const QUEEN_DIRS: [(i32, i32); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

/// Every geometrically reachable move for the side to move. No king-safety
/// filtering; castling is the one case already gated on attacks here. The
/// input board is untouched.
pub fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let color = board.side_to_move();
    let mut moves = Vec::new();

    for from in Square::all() {
        let piece = match board.piece_at(from) {
            Some(p) if p.color == color => p,
            _ => continue,
        };
        match piece.piece_type {
            PieceType::Pawn => pawn_moves(board, from, piece, &mut moves),
            PieceType::Knight => knight_moves(board, from, piece, &mut moves),
            PieceType::Bishop => sliding_moves(board, from, piece, &BISHOP_DIRS, &mut moves),
            PieceType::Rook => sliding_moves(board, from, piece, &ROOK_DIRS, &mut moves),
            PieceType::Queen => sliding_moves(board, from, piece, &QUEEN_DIRS, &mut moves),
            PieceType::King => king_moves(board, from, piece, &mut moves),
        }
    }

    moves
}

/// The pseudo-legal moves that do not leave the mover's own king attacked.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let color = board.side_to_move();
    pseudo_legal_moves(board)
        .into_iter()
        .filter(|mv| !board.apply_unchecked(mv).in_check(color))
        .collect()
}

/// Push `base`, fanning out into the four promotion variants when the
/// destination is the far rank.
fn push_with_promotions(base: Move, moves: &mut Vec<Move>) {
    let promo_rank = match base.piece.color {
        Color::White => 7,
        Color::Black => 0,
    };
    if base.to.rank() == promo_rank {
        for kind in PieceType::PROMOTIONS {
            moves.push(Move {
                promotion: Some(kind),
                ..base
            });
        }
    } else {
        moves.push(base);
    }
}

fn pawn_moves(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let (dir, start_rank) = match piece.color {
        Color::White => (1, 1),
        Color::Black => (-1, 6),
    };

    // Pushes go onto empty squares only; the double push additionally
    // needs the skipped square empty.
    if let Some(one) = from.offset(dir, 0) {
        if board.piece_at(one).is_none() {
            push_with_promotions(Move::quiet(from, one, piece), moves);
            if from.rank() == start_rank {
                if let Some(two) = one.offset(dir, 0) {
                    if board.piece_at(two).is_none() {
                        moves.push(Move::quiet(from, two, piece));
                    }
                }
            }
        }
    }

    // Diagonal moves only onto an enemy piece or the en-passant target.
    for df in [-1, 1] {
        let to = match from.offset(dir, df) {
            Some(sq) => sq,
            None => continue,
        };
        if let Some(target) = board.piece_at(to) {
            if target.color != piece.color {
                push_with_promotions(Move::capture(from, to, piece, target), moves);
            }
        } else if board.en_passant_target() == Some(to) {
            let victim = Piece::new(PieceType::Pawn, piece.color.opposite());
            moves.push(Move {
                is_en_passant: true,
                ..Move::capture(from, to, piece, victim)
            });
        }
    }
}

fn knight_moves(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    for (dr, df) in KNIGHT_OFFSETS {
        let to = match from.offset(dr, df) {
            Some(sq) => sq,
            None => continue,
        };
        match board.piece_at(to) {
            None => moves.push(Move::quiet(from, to, piece)),
            Some(target) if target.color != piece.color => {
                moves.push(Move::capture(from, to, piece, target));
            }
            Some(_) => {}
        }
    }
}

/// Ray-cast along each direction, stopping at the first occupied square:
/// included as a capture if enemy, excluded if our own.
fn sliding_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    directions: &[(i32, i32)],
    moves: &mut Vec<Move>,
) {
    for &(dr, df) in directions {
        let mut to = from;
        while let Some(next) = to.offset(dr, df) {
            to = next;
            match board.piece_at(to) {
                None => moves.push(Move::quiet(from, to, piece)),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(Move::capture(from, to, piece, target));
                    }
                    break;
                }
            }
        }
    }
}

fn king_moves(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    for dr in -1..=1 {
        for df in -1..=1 {
            if dr == 0 && df == 0 {
                continue;
            }
            let to = match from.offset(dr, df) {
                Some(sq) => sq,
                None => continue,
            };
            match board.piece_at(to) {
                None => moves.push(Move::quiet(from, to, piece)),
                Some(target) if target.color != piece.color => {
                    moves.push(Move::capture(from, to, piece, target));
                }
                Some(_) => {}
            }
        }
    }
    castling_moves(board, from, piece, moves);
}

fn castling_moves(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let home_rank = match piece.color {
        Color::White => 0,
        Color::Black => 7,
    };
    if from.rank() != home_rank || from.file() != 4 {
        return;
    }
    let enemy = piece.color.opposite();
    // No castling out of check.
    if board.is_square_attacked(from, enemy) {
        return;
    }

    let rights = board.castling_rights();
    let (kingside, queenside) = match piece.color {
        Color::White => (rights.white_kingside, rights.white_queenside),
        Color::Black => (rights.black_kingside, rights.black_queenside),
    };
    let own_rook = Piece::new(PieceType::Rook, piece.color);

    // Kingside: f and g must be empty and unattacked, rook still home on h.
    if kingside
        && board.piece_at(Square::at(home_rank, 5)).is_none()
        && board.piece_at(Square::at(home_rank, 6)).is_none()
        && board.piece_at(Square::at(home_rank, 7)) == Some(own_rook)
        && !board.is_square_attacked(Square::at(home_rank, 5), enemy)
        && !board.is_square_attacked(Square::at(home_rank, 6), enemy)
    {
        moves.push(Move {
            castle: Some(CastleSide::Kingside),
            ..Move::quiet(from, Square::at(home_rank, 6), piece)
        });
    }

    // Queenside: b, c and d empty, rook home on a; the king only crosses
    // d and lands on c, so b may be attacked.
    if queenside
        && board.piece_at(Square::at(home_rank, 1)).is_none()
        && board.piece_at(Square::at(home_rank, 2)).is_none()
        && board.piece_at(Square::at(home_rank, 3)).is_none()
        && board.piece_at(Square::at(home_rank, 0)) == Some(own_rook)
        && !board.is_square_attacked(Square::at(home_rank, 3), enemy)
        && !board.is_square_attacked(Square::at(home_rank, 2), enemy)
    {
        moves.push(Move {
            castle: Some(CastleSide::Queenside),
            ..Move::quiet(from, Square::at(home_rank, 2), piece)
        });
    }
}
