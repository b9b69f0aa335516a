//! Error types for board parsing and game sessions.
//!
//! The rule predicates never fail; these errors only show up at the edges
//! (FEN and move notation parsing, moves submitted to a session, terminal IO).

use thiserror::Error;

use crate::chess_board::{Color, PieceType, Position};

#[derive(Error, Debug)]
pub enum ChessError {
    #[error("Invalid FEN string: {message}")]
    InvalidFen { message: String },

    #[error("Invalid square: {square}")]
    InvalidSquare { square: String },

    #[error("Invalid move notation: {notation}")]
    InvalidMoveNotation { notation: String },

    #[error("No piece at {position}")]
    NoPieceAtSquare { position: Position },

    #[error("Piece at {position} does not belong to {color}")]
    WrongPieceColor { position: Position, color: Color },

    #[error("Illegal move: {notation}")]
    IllegalMove { notation: String },

    #[error("The game is over")]
    GameOver,

    #[error("A promotion choice is pending at {position}")]
    PromotionPending { position: Position },

    #[error("No promotion choice is pending")]
    NoPromotionPending,

    #[error("A pawn cannot promote to {kind:?}")]
    InvalidPromotionPiece { kind: PieceType },

    #[error("Move {notation} does not promote a pawn")]
    UnexpectedPromotion { notation: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ChessResult<T> = Result<T, ChessError>;

impl ChessError {
    pub(crate) fn fen(message: impl Into<String>) -> Self {
        ChessError::InvalidFen { message: message.into() }
    }
}
