use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::piece::{Color, PieceType};
use crate::session::GameSession;
use crate::square::Square;
use crate::status::GameStatus;

#[derive(Serialize)]
struct SquarePiece {
    piece_type: String,
    color: String,
}

#[derive(Serialize)]
struct MoveJson {
    from: [usize; 2],
    to: [usize; 2],
    promotion: Option<String>,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_turn: String,
    status: String,
    game_over: bool,
    result: Option<String>,
    is_in_check: bool,
    legal_moves: Vec<MoveJson>,
    captured_white: Vec<String>,
    captured_black: Vec<String>,
    last_move: Option<[[usize; 2]; 2]>,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

#[derive(Serialize)]
struct SquareMoveJson {
    to: [usize; 2],
    promotion: Option<String>,
}

fn piece_type_to_string(pt: PieceType) -> String {
    match pt {
        PieceType::King => "King".to_string(),
        PieceType::Queen => "Queen".to_string(),
        PieceType::Rook => "Rook".to_string(),
        PieceType::Bishop => "Bishop".to_string(),
        PieceType::Knight => "Knight".to_string(),
        PieceType::Pawn => "Pawn".to_string(),
    }
}

fn color_to_string(c: Color) -> String {
    match c {
        Color::White => "White".to_string(),
        Color::Black => "Black".to_string(),
    }
}

fn string_to_piece_type(s: &str) -> Option<PieceType> {
    match s {
        "Queen" => Some(PieceType::Queen),
        "Rook" => Some(PieceType::Rook),
        "Bishop" => Some(PieceType::Bishop),
        "Knight" => Some(PieceType::Knight),
        _ => None,
    }
}

/// Result line shown under the board once the game ends.
fn result_string(session: &GameSession) -> Option<String> {
    match session.status() {
        GameStatus::Checkmate => Some(match session.board().side_to_move() {
            Color::White => "Black wins".to_string(),
            Color::Black => "White wins".to_string(),
        }),
        GameStatus::Stalemate
        | GameStatus::FiftyMoveDraw
        | GameStatus::InsufficientMaterialDraw
        | GameStatus::RepetitionDraw => Some("Draw".to_string()),
        GameStatus::Ongoing | GameStatus::Check => None,
    }
}

fn build_board_state(session: &GameSession) -> BoardState {
    let board = session.board();
    let squares: Vec<Vec<Option<SquarePiece>>> = (0..8)
        .map(|rank| {
            (0..8)
                .map(|file| {
                    Square::new(rank, file)
                        .and_then(|sq| board.piece_at(sq))
                        .map(|p| SquarePiece {
                            piece_type: piece_type_to_string(p.piece_type),
                            color: color_to_string(p.color),
                        })
                })
                .collect()
        })
        .collect();

    let legal_moves: Vec<MoveJson> = session
        .legal_moves()
        .iter()
        .map(|m| MoveJson {
            from: [m.from.rank(), m.from.file()],
            to: [m.to.rank(), m.to.file()],
            promotion: m.promotion.map(piece_type_to_string),
        })
        .collect();

    let mut captured_white = Vec::new();
    let mut captured_black = Vec::new();
    for (_, mv) in session.history() {
        if let Some(captured) = mv.captured {
            match captured.color {
                Color::White => captured_white.push(piece_type_to_string(captured.piece_type)),
                Color::Black => captured_black.push(piece_type_to_string(captured.piece_type)),
            }
        }
    }

    BoardState {
        squares,
        current_turn: color_to_string(board.side_to_move()),
        status: session.status().to_string(),
        game_over: session.status().is_game_over(),
        result: result_string(session),
        is_in_check: board.in_check(board.side_to_move()),
        legal_moves,
        captured_white,
        captured_black,
        last_move: session
            .last_move()
            .map(|m| [[m.from.rank(), m.from.file()], [m.to.rank(), m.to.file()]]),
    }
}

fn error_result(message: &str) -> JsValue {
    let err = MoveResult {
        board_state: None,
        error: Some(message.to_string()),
    };
    serde_wasm_bindgen::to_value(&err).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub struct Game {
    session: GameSession,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        Game {
            session: GameSession::new(),
        }
    }

    pub fn get_board_state(&self) -> JsValue {
        let state = build_board_state(&self.session);
        serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
    }

    pub fn make_move(
        &mut self,
        from_rank: usize,
        from_file: usize,
        to_rank: usize,
        to_file: usize,
        promotion: Option<String>,
    ) -> JsValue {
        if self.session.status().is_game_over() {
            return error_result("Game is already over");
        }

        let (from, to) = match (
            Square::new(from_rank, from_file),
            Square::new(to_rank, to_file),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => return error_result("Square out of range"),
        };
        let promo_pt = promotion.as_deref().and_then(string_to_piece_type);

        match self.session.propose_move(from, to, promo_pt) {
            Ok(_) => {
                let state = build_board_state(&self.session);
                serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
            }
            Err(e) => error_result(&e.to_string()),
        }
    }

    pub fn undo_move(&mut self) -> JsValue {
        match self.session.undo() {
            Ok(()) => {
                let state = build_board_state(&self.session);
                serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
            }
            Err(e) => error_result(&e.to_string()),
        }
    }

    pub fn get_legal_moves_for_square(&self, rank: usize, file: usize) -> JsValue {
        let from = match Square::new(rank, file) {
            Some(sq) => sq,
            None => return serde_wasm_bindgen::to_value::<Vec<SquareMoveJson>>(&Vec::new())
                .unwrap_or(JsValue::NULL),
        };
        let square_moves: Vec<SquareMoveJson> = self
            .session
            .legal_moves()
            .iter()
            .filter(|m| m.from == from)
            .map(|m| SquareMoveJson {
                to: [m.to.rank(), m.to.file()],
                promotion: m.promotion.map(piece_type_to_string),
            })
            .collect();

        serde_wasm_bindgen::to_value(&square_moves).unwrap_or(JsValue::NULL)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
