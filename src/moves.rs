use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceType};
use crate::square::Square;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// A single ply, fully described: the legality filter produces these and the
/// applier consumes them without re-deriving anything from the board.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    /// The piece removed by this move, if any. For en passant this is the
    /// pawn on the adjacent square, not a piece on `to`.
    pub captured: Option<Piece>,
    pub promotion: Option<PieceType>,
    pub castle: Option<CastleSide>,
    pub is_en_passant: bool,
}

impl Move {
    pub(crate) fn quiet(from: Square, to: Square, piece: Piece) -> Move {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            castle: None,
            is_en_passant: false,
        }
    }

    pub(crate) fn capture(from: Square, to: Square, piece: Piece, captured: Piece) -> Move {
        Move {
            captured: Some(captured),
            ..Move::quiet(from, to, piece)
        }
    }

    /// Convert to UCI notation, e.g. "e2e4", "a7a8q"
    pub fn to_uci(&self) -> String {
        let promo = match self.promotion {
            Some(PieceType::Queen) => "q",
            Some(PieceType::Rook) => "r",
            Some(PieceType::Bishop) => "b",
            Some(PieceType::Knight) => "n",
            _ => "",
        };
        format!("{}{}{promo}", self.from, self.to)
    }
}

/// Parse UCI notation into the (from, to, promotion) triple a session
/// proposal takes. The full `Move` can only come from the legal-move list.
pub fn parse_uci(s: &str) -> Option<(Square, Square, Option<PieceType>)> {
    if s.len() < 4 {
        return None;
    }
    let from = Square::from_algebraic(s.get(0..2)?)?;
    let to = Square::from_algebraic(s.get(2..4)?)?;
    let promotion = match s.get(4..) {
        None | Some("") => None,
        Some("q") => Some(PieceType::Queen),
        Some("r") => Some(PieceType::Rook),
        Some("b") => Some(PieceType::Bishop),
        Some("n") => Some(PieceType::Knight),
        Some(_) => return None,
    };
    Some((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn uci_text_for_a_plain_move() {
        let mv = Move::quiet(sq("e2"), sq("e4"), Piece::new(PieceType::Pawn, Color::White));
        assert_eq!(mv.to_uci(), "e2e4");
    }

    #[test]
    fn uci_text_includes_promotion_kind() {
        let mv = Move {
            promotion: Some(PieceType::Knight),
            ..Move::quiet(sq("a7"), sq("a8"), Piece::new(PieceType::Pawn, Color::White))
        };
        assert_eq!(mv.to_uci(), "a7a8n");
    }

    #[test]
    fn parse_uci_round_trips_coordinates() {
        assert_eq!(parse_uci("e2e4"), Some((sq("e2"), sq("e4"), None)));
        assert_eq!(
            parse_uci("a7a8q"),
            Some((sq("a7"), sq("a8"), Some(PieceType::Queen)))
        );
    }

    #[test]
    fn parse_uci_rejects_malformed_input() {
        assert!(parse_uci("e2").is_none());
        assert!(parse_uci("e2e9").is_none());
        assert!(parse_uci("e2e4k").is_none());
        assert!(parse_uci("e2e4qq").is_none());
    }
}
