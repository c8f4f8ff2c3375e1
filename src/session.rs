//! A full game: the current board, the move history behind it, and the
//! cached legal-move list and status for the position on top.

use crate::board::Board;
use crate::error::{MoveError, UndoError};
use crate::movegen;
use crate::moves::Move;
use crate::piece::PieceType;
use crate::square::Square;
use crate::status::{self, GameStatus};

/// One game from the standard starting position. Owns every board it has
/// produced: the history is an append-only list of (board after the move,
/// the move), which is what repetition counting and undo work from.
///
/// Not synchronized; callers that share a session across threads must
/// serialize access themselves.
#[derive(Clone, Debug)]
pub struct GameSession {
    initial: Board,
    history: Vec<(Board, Move)>,
    legal: Vec<Move>,
    status: GameStatus,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> GameSession {
        let mut session = GameSession {
            initial: Board::new(),
            history: Vec::new(),
            legal: Vec::new(),
            status: GameStatus::Ongoing,
        };
        session.refresh();
        session
    }

    /// The current position, read-only.
    pub fn board(&self) -> &Board {
        self.history.last().map_or(&self.initial, |(board, _)| board)
    }

    /// Legal moves for the current position, recomputed once per turn.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Every (board, move) pair played so far, oldest first.
    pub fn history(&self) -> &[(Board, Move)] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|(_, mv)| mv)
    }

    /// Match the request against the current legal moves; on a hit, apply
    /// it, append to history and return the applied move. A miss fails
    /// with `MoveError::Illegal` and changes nothing — callers re-query
    /// `legal_moves` to refresh their affordances.
    pub fn propose_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<Move, MoveError> {
        let mv = match self
            .legal
            .iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
        {
            Some(m) => *m,
            None => {
                return Err(MoveError::Illegal {
                    from,
                    to,
                    promotion,
                })
            }
        };
        let next = self.board().apply(&mv)?;
        self.history.push((next, mv));
        self.refresh();
        Ok(mv)
    }

    /// Pop the last move. The initial position itself cannot be popped.
    pub fn undo(&mut self) -> Result<(), UndoError> {
        if self.history.pop().is_none() {
            return Err(UndoError::NothingToUndo);
        }
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        self.legal = movegen::legal_moves(self.board());
        let occurrences = self.occurrences_of_current();
        self.status = status::evaluate(self.board(), &self.legal, occurrences);
    }

    /// How many boards over the whole game, the current one included,
    /// share the current position.
    fn occurrences_of_current(&self) -> usize {
        let current = self.board();
        let initial_hit = usize::from(self.initial.same_position(current));
        initial_hit
            + self
                .history
                .iter()
                .filter(|(board, _)| board.same_position(current))
                .count()
    }
}

/// Start a session from the standard initial position.
pub fn new_game() -> GameSession {
    GameSession::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::parse_uci;
    use crate::piece::{Color, Piece};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(session: &mut GameSession, uci: &str) -> Move {
        let (from, to, promotion) = parse_uci(uci).expect("well-formed uci");
        session
            .propose_move(from, to, promotion)
            .unwrap_or_else(|e| panic!("{uci} should be accepted: {e}"))
    }

    fn play_all(session: &mut GameSession, ucis: &str) {
        for uci in ucis.split_whitespace() {
            play(session, uci);
        }
    }

    #[test]
    fn a_new_game_offers_twenty_moves() {
        let session = GameSession::new();
        assert_eq!(session.legal_moves().len(), 20);
        assert_eq!(session.status(), GameStatus::Ongoing);
        assert!(session.last_move().is_none());
    }

    #[test]
    fn proposals_not_in_the_legal_set_are_rejected_unchanged() {
        let mut session = GameSession::new();
        let before = session.board().clone();

        // A pawn cannot jump three ranks.
        let err = session.propose_move(sq("e2"), sq("e5"), None);
        assert_eq!(
            err,
            Err(MoveError::Illegal {
                from: sq("e2"),
                to: sq("e5"),
                promotion: None
            })
        );
        // Black piece while it is White's turn.
        assert!(session.propose_move(sq("e7"), sq("e5"), None).is_err());
        // Promotion flag on a non-promoting move.
        assert!(session
            .propose_move(sq("e2"), sq("e4"), Some(PieceType::Queen))
            .is_err());

        assert_eq!(session.board(), &before, "failed proposals leave no trace");
        assert_eq!(session.history().len(), 0);
    }

    #[test]
    fn undo_restores_the_exact_prior_board() {
        let mut session = GameSession::new();
        play(&mut session, "e2e4");
        let snapshot = session.board().clone();
        let legal_before = session.legal_moves().to_vec();

        play(&mut session, "e7e5");
        session.undo().unwrap();

        assert_eq!(session.board(), &snapshot);
        assert_eq!(session.legal_moves(), legal_before.as_slice());

        session.undo().unwrap();
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.undo(), Err(UndoError::NothingToUndo));
    }

    #[test]
    fn scholars_mate_ends_the_game() {
        let mut session = GameSession::new();
        play_all(&mut session, "e2e4 e7e5 f1c4 b8c6 d1h5 g8f6");
        let mate = play(&mut session, "h5f7");
        assert_eq!(mate.captured, Some(Piece::new(PieceType::Pawn, Color::Black)));
        assert_eq!(session.status(), GameStatus::Checkmate);
        assert!(session.legal_moves().is_empty());

        // Nothing more to play.
        assert!(session.propose_move(sq("e8"), sq("f7"), None).is_err());

        // But the mate can be taken back.
        session.undo().unwrap();
        assert_eq!(session.status(), GameStatus::Ongoing);
        assert!(!session.legal_moves().is_empty());
    }

    #[test]
    fn en_passant_capture_through_the_session() {
        let mut session = GameSession::new();
        play_all(&mut session, "e2e4 a7a6 e4e5 d7d5");
        assert_eq!(session.board().en_passant_target(), Some(sq("d6")));

        let mv = play(&mut session, "e5d6");
        assert!(mv.is_en_passant);
        assert_eq!(session.board().piece_at(sq("d5")), None, "victim removed from d5");
        assert_eq!(
            session.board().piece_at(sq("d6")),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
    }

    #[test]
    fn en_passant_expires_after_one_ply() {
        let mut session = GameSession::new();
        play_all(&mut session, "e2e4 a7a6 e4e5 d7d5 g1f3 a6a5");
        // The d6 target lapsed when White played something else.
        assert!(session.propose_move(sq("e5"), sq("d6"), None).is_err());
    }

    #[test]
    fn castling_is_refused_once_the_king_has_moved() {
        let mut session = GameSession::new();
        play_all(
            &mut session,
            "e2e4 e7e5 g1f3 g8f6 f1c4 f8c5 e1e2 e8e7 e2e1 e7e8",
        );
        // Both kings are back home with clear castling paths, but the
        // rights are gone for good.
        assert!(session.propose_move(sq("e1"), sq("g1"), None).is_err());
        play(&mut session, "b1c3");
        assert!(session.propose_move(sq("e8"), sq("g8"), None).is_err());
    }

    #[test]
    fn kingside_castling_works_when_untouched() {
        let mut session = GameSession::new();
        play_all(&mut session, "e2e4 e7e5 g1f3 g8f6 f1c4 f8c5");
        let mv = play(&mut session, "e1g1");
        assert!(mv.castle.is_some());
        assert_eq!(
            session.board().piece_at(sq("f1")),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
    }

    #[test]
    fn knight_shuffle_draws_on_the_third_occurrence() {
        let mut session = GameSession::new();

        // One full round trip brings the second occurrence of the
        // starting position; the game must still be on.
        play_all(&mut session, "g1f3 g8f6 f3g1 f6g8");
        assert_eq!(
            session.status(),
            GameStatus::Ongoing,
            "two occurrences are not yet a draw"
        );

        play_all(&mut session, "g1f3 g8f6 f3g1");
        assert_eq!(session.status(), GameStatus::Ongoing);
        play(&mut session, "f6g8");
        assert_eq!(session.status(), GameStatus::RepetitionDraw);
    }

    #[test]
    fn repetition_draws_are_claimable_not_forced() {
        let mut session = GameSession::new();
        play_all(&mut session, "g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8");
        assert_eq!(session.status(), GameStatus::RepetitionDraw);
        // Playing on is allowed; a fresh position clears the status.
        play(&mut session, "e2e4");
        assert_eq!(session.status(), GameStatus::Ongoing);
    }

    #[test]
    fn promotion_through_the_session_needs_the_kind() {
        let mut session = GameSession::new();
        play_all(
            &mut session,
            "h2h4 g7g5 h4g5 g8f6 g5g6 f6e4 g6g7 e4c5",
        );
        // Bare g7-g8 is not a legal request; the kind is required.
        assert!(session.propose_move(sq("g7"), sq("g8"), None).is_err());
        let mv = play(&mut session, "g7g8q");
        assert_eq!(mv.promotion, Some(PieceType::Queen));
        assert_eq!(
            session.board().piece_at(sq("g8")),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
    }

    #[test]
    fn last_move_tracks_the_top_of_history() {
        let mut session = GameSession::new();
        let mv = play(&mut session, "d2d4");
        assert_eq!(session.last_move(), Some(&mv));
        session.undo().unwrap();
        assert!(session.last_move().is_none());
    }
}
