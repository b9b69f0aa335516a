pub mod chess_board;
pub mod engines;
pub mod error;
pub mod game;
pub mod ui;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use chess_board::{ChessBoard, Color, GameStatus, Move, Piece, PieceType, Position, Square};
pub use error::{ChessError, ChessResult};
pub use game::{ClickOutcome, GameOutcome, GamePhase, GameSession, MoveRecord};
