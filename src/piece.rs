use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// The four kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    pub fn is_minor(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Knight)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Piece {
        Piece { piece_type, color }
    }

    /// Single-letter representation: uppercase for white, lowercase for black.
    pub fn to_char(self) -> char {
        let c = match self.piece_type {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_color_toggles() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn piece_chars_encode_color_by_case() {
        assert_eq!(Piece::new(PieceType::King, Color::White).to_char(), 'K');
        assert_eq!(Piece::new(PieceType::Knight, Color::Black).to_char(), 'n');
        assert_eq!(Piece::new(PieceType::Pawn, Color::White).to_char(), 'P');
    }

    #[test]
    fn minor_pieces() {
        assert!(PieceType::Bishop.is_minor());
        assert!(PieceType::Knight.is_minor());
        assert!(!PieceType::Rook.is_minor());
        assert!(!PieceType::Queen.is_minor());
    }
}
