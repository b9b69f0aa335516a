pub mod fen;
pub mod model;
pub mod perft;
pub mod rules;
pub mod zobrist_hash;
pub use model::{Color, Move, Piece, PieceType, Position, Square};
pub use rules::GameStatus;
pub use zobrist_hash::ZobristHash;
pub use zobrist_hash::ZOBRIST;

mod chess_board;
#[cfg(test)]
pub mod test_utils;
pub use chess_board::ChessBoard;
