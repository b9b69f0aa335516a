use crate::chess_board::{ChessBoard, Color, Move};

pub mod random_player;
pub use random_player::RandomPlayer;

/// Something that picks moves for one side.
pub trait Player {
    fn name(&self) -> &str;
    /// A legal move for `active_color`, or `None` when it has none.
    fn choose_move(&mut self, board: &ChessBoard, active_color: Color) -> Option<Move>;
}
