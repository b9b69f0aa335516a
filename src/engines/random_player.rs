use crate::chess_board::{ChessBoard, Color, Move};
use crate::engines::Player;
use rand::prelude::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::debug;

/// Plays a uniformly random legal move.
pub struct RandomPlayer {
    rng: Pcg64,
}

impl RandomPlayer {
    pub fn new() -> Self {
        RandomPlayer {
            rng: Pcg64::from_entropy(),
        }
    }

    /// Same seed, same games.
    pub fn with_seed(seed: u64) -> Self {
        RandomPlayer {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "Random mover"
    }

    fn choose_move(&mut self, board: &ChessBoard, active_color: Color) -> Option<Move> {
        let moves = board.legal_moves(active_color);
        let mv = moves.choose(&mut self.rng).copied();
        debug!(candidates = moves.len(), chosen = ?mv.map(|m| m.as_algebraic()), "random move");
        mv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_move_is_legal() {
        let board = ChessBoard::initial();
        let mut player = RandomPlayer::with_seed(7);
        for _ in 0..20 {
            let mv = player.choose_move(&board, Color::White).unwrap();
            assert!(board.legal_moves(Color::White).contains(&mv));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let board = ChessBoard::initial();
        let mut first = RandomPlayer::with_seed(1234);
        let mut second = RandomPlayer::with_seed(1234);
        let a: Vec<_> = (0..10).map(|_| first.choose_move(&board, Color::Black)).collect();
        let b: Vec<_> = (0..10).map(|_| second.choose_move(&board, Color::Black)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_move_in_terminal_position() {
        let (board, color) = ChessBoard::from_fen("1k6/8/8/8/8/1r6/7r/K7 w - - 0 1").unwrap();
        let mut player = RandomPlayer::with_seed(0);
        assert_eq!(player.choose_move(&board, color), None);
    }
}
