//! Random self-play smoke harness: plays bounded games of random legal
//! moves, checking rule invariants after every ply, and prints one JSON
//! record per game.

use rand::seq::SliceRandom;
use serde::Serialize;

use chess_core::movegen;
use chess_core::session::GameSession;
use chess_core::status::GameStatus;

const GAMES: usize = 20;
const MAX_PLIES: usize = 300;

#[derive(Serialize)]
struct GameRecord {
    game: usize,
    moves: Vec<String>,
    status: String,
}

fn main() {
    let mut rng = rand::thread_rng();
    let mut finished = 0;

    for game in 0..GAMES {
        let mut session = GameSession::new();
        let mut moves = Vec::new();

        while !session.status().is_game_over() && moves.len() < MAX_PLIES {
            let pseudo = movegen::pseudo_legal_moves(session.board());
            let legal = session.legal_moves().to_vec();
            for mv in &legal {
                assert!(
                    pseudo.contains(mv),
                    "legal move {} missing from the pseudo-legal set",
                    mv.to_uci()
                );
            }

            let mv = match legal.choose(&mut rng) {
                Some(mv) => *mv,
                None => break,
            };
            let played = match session.propose_move(mv.from, mv.to, mv.promotion) {
                Ok(played) => played,
                Err(e) => {
                    eprintln!("game {game}: rejected own legal move {}: {e}", mv.to_uci());
                    std::process::exit(1);
                }
            };
            assert!(
                !session.board().in_check(played.piece.color),
                "{} left the mover in check",
                played.to_uci()
            );
            moves.push(played.to_uci());
        }

        if session.status().is_game_over() {
            finished += 1;
        }
        if session.status() == GameStatus::Checkmate {
            eprintln!("game {game} ended in mate:\n{}", session.board());
        }
        let record = GameRecord {
            game,
            moves,
            status: session.status().to_string(),
        };
        match serde_json::to_string(&record) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("game {game}: serialization failed: {e}"),
        }
    }

    eprintln!("{finished}/{GAMES} games reached a terminal status within {MAX_PLIES} plies");
}
