use std::fmt;

use serde::{Deserialize, Serialize};

/// A board coordinate. Rank 0 is White's back rank (rank 1 in algebraic
/// notation), file 0 is the a-file. Both components are always in 0..8.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Square {
    rank: usize,
    file: usize,
}

impl Square {
    /// Create a square from rank and file. Returns `None` if either is out of range.
    pub fn new(rank: usize, file: usize) -> Option<Square> {
        if rank < 8 && file < 8 {
            Some(Square { rank, file })
        } else {
            None
        }
    }

    /// Construct from indices already known to be on the board.
    pub(crate) fn at(rank: usize, file: usize) -> Square {
        debug_assert!(rank < 8 && file < 8);
        Square { rank, file }
    }

    pub fn rank(self) -> usize {
        self.rank
    }

    pub fn file(self) -> usize {
        self.file
    }

    /// Shift by a signed (rank, file) delta. Returns `None` off the board.
    pub fn offset(self, rank_delta: i32, file_delta: i32) -> Option<Square> {
        let rank = self.rank as i32 + rank_delta;
        let file = self.file as i32 + file_delta;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square {
                rank: rank as usize,
                file: file as usize,
            })
        } else {
            None
        }
    }

    /// All 64 squares, a1 through h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|rank| (0..8).map(move |file| Square { rank, file }))
    }

    /// Parse algebraic notation, e.g. "e4" -> rank 3, file 4.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = match chars.next()? {
            c @ 'a'..='h' => c as usize - 'a' as usize,
            _ => return None,
        };
        let rank = match chars.next()?.to_digit(10) {
            Some(d) if (1..=8).contains(&d) => d as usize - 1,
            _ => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Square { rank, file })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file as u8) as char;
        let rank = (b'1' + self.rank as u8) as char;
        write!(f, "{file}{rank}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Square::new(0, 0).is_some());
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
    }

    #[test]
    fn algebraic_round_trip() {
        for sq in Square::all() {
            let text = sq.to_string();
            assert_eq!(Square::from_algebraic(&text), Some(sq));
        }
        assert_eq!(Square::from_algebraic("e4"), Square::new(3, 4));
        assert_eq!(Square::from_algebraic("a1"), Square::new(0, 0));
        assert_eq!(Square::from_algebraic("h8"), Square::new(7, 7));
    }

    #[test]
    fn from_algebraic_rejects_garbage() {
        assert!(Square::from_algebraic("i1").is_none());
        assert!(Square::from_algebraic("a9").is_none());
        assert!(Square::from_algebraic("a").is_none());
        assert!(Square::from_algebraic("e4x").is_none());
    }

    #[test]
    fn offset_stops_at_the_edge() {
        let a1 = Square::at(0, 0);
        assert_eq!(a1.offset(1, 1), Some(Square::at(1, 1)));
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(Square::at(7, 7).offset(1, 0), None);
    }

    #[test]
    fn all_covers_the_board_once() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        for sq in &squares {
            assert_eq!(squares.iter().filter(|s| *s == sq).count(), 1);
        }
    }
}
