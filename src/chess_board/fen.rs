use super::ChessBoard;
use super::{Color, Piece, Position};
use crate::error::{ChessError, ChessResult};

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// Parses a FEN string into a board and the side to move.
///
/// Only the placement field is required. The side to move defaults to white;
/// castling, en passant and clock fields are accepted and ignored.
pub fn parse_fen(fen: &str) -> ChessResult<(ChessBoard, Color)> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.is_empty() || parts.len() > 6 {
        return Err(ChessError::fen("must have between 1 and 6 parts"));
    }

    let rows: Vec<&str> = parts[0].split('/').collect();
    if rows.len() != 8 {
        return Err(ChessError::fen("expected 8 rows"));
    }

    let mut board = ChessBoard::empty();
    for (row_index, row) in rows.iter().enumerate() {
        let mut col_index = 0usize;

        for c in row.chars() {
            if col_index > 7 {
                return Err(ChessError::fen(format!("too many squares in row {}", row_index)));
            }
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(ChessError::fen(format!("invalid empty square count {}", c)));
                }
                col_index += skip as usize;
            } else {
                let piece = Piece::from_char(c)
                    .ok_or_else(|| ChessError::fen(format!("invalid piece character {}", c)))?;
                board = board.with_piece(Position::new(row_index as i8, col_index as i8), piece);
                col_index += 1;
            }
        }
        if col_index != 8 {
            return Err(ChessError::fen(format!(
                "row {} covers {} squares instead of 8",
                row_index, col_index
            )));
        }
    }

    let active_color = match parts.get(1) {
        None | Some(&"w") => Color::White,
        Some(&"b") => Color::Black,
        Some(other) => return Err(ChessError::fen(format!("invalid active color {}", other))),
    };

    Ok((board, active_color))
}

pub fn to_fen(board: &ChessBoard, active_color: Color) -> String {
    let mut board_representation = String::new();

    for row in 0..8 {
        let mut empty_count = 0;

        for col in 0..8 {
            match board.piece_at(Position::new(row, col)) {
                Some(piece) => {
                    if empty_count > 0 {
                        board_representation.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    board_representation.push(piece.to_char());
                }
                None => {
                    empty_count += 1;
                }
            }
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if row < 7 {
            board_representation.push('/');
        }
    }

    let active_color = if active_color == Color::White { "w" } else { "b" };

    format!("{} {} - - 0 1", board_representation, active_color)
}
