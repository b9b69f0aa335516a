use super::{ChessBoard, Color, PieceType};
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::sync::Arc;

const BOARD_SIZE: usize = 8;

/// Random keys for hashing a placement together with the side to move.
pub struct ZobristHash {
    piece_keys: [[[u64; BOARD_SIZE * BOARD_SIZE]; 6]; 2],
    side_to_move_key: u64,
}

impl ZobristHash {
    fn new(seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);

        let mut piece_keys = [[[0; BOARD_SIZE * BOARD_SIZE]; 6]; 2];
        for color_keys in &mut piece_keys {
            for piece_type_keys in color_keys {
                for square_key in piece_type_keys {
                    *square_key = rng.gen();
                }
            }
        }

        let side_to_move_key = rng.gen();

        ZobristHash {
            piece_keys,
            side_to_move_key,
        }
    }

    pub fn calculate_hash(&self, board: &ChessBoard, active_color: Color) -> u64 {
        let mut hash = 0;

        for (pos, piece) in board.pieces_with_coordinates() {
            let color_index = match piece.color {
                Color::White => 0,
                Color::Black => 1,
            };
            let piece_index = match piece.kind {
                PieceType::Pawn => 0,
                PieceType::Knight => 1,
                PieceType::Bishop => 2,
                PieceType::Rook => 3,
                PieceType::Queen => 4,
                PieceType::King => 5,
            };
            let square_index = pos.row as usize * BOARD_SIZE + pos.col as usize;
            hash ^= self.piece_keys[color_index][piece_index][square_index];
        }

        if active_color == Color::Black {
            hash ^= self.side_to_move_key;
        }

        hash
    }
}

lazy_static! {
    pub static ref ZOBRIST: Arc<ZobristHash> = Arc::new(ZobristHash::new(42));
}

#[cfg(test)]
mod tests {
    use super::super::Position;
    use super::*;

    #[test]
    fn test_hash_depends_on_side_to_move() {
        let board = ChessBoard::initial();
        assert_ne!(
            ZOBRIST.calculate_hash(&board, Color::White),
            ZOBRIST.calculate_hash(&board, Color::Black)
        );
    }

    #[test]
    fn test_hash_returns_after_moves_back() {
        let board = ChessBoard::initial();
        let start = ZOBRIST.calculate_hash(&board, Color::White);
        let there = board.apply_move(Position::new(7, 6), Position::new(5, 5));
        assert_ne!(ZOBRIST.calculate_hash(&there, Color::Black), start);
        let back = there.apply_move(Position::new(5, 5), Position::new(7, 6));
        assert_eq!(ZOBRIST.calculate_hash(&back, Color::White), start);
    }

    #[test]
    fn test_empty_board_hash() {
        assert_eq!(ZOBRIST.calculate_hash(&ChessBoard::empty(), Color::White), 0);
    }
}
