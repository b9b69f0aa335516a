use super::{fen, Color, Move, Piece, PieceType, Position, Square};
use crate::error::ChessResult;

/// An 8x8 chess board.
///
/// The grid lives inline, so every copy is a full copy. Methods that "apply"
/// something return a new board and leave `self` untouched, which lets the
/// rules try a move on a scratch board without touching the real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChessBoard {
    squares: [[Square; 8]; 8],
}

impl ChessBoard {
    /// Creates an empty chess board
    pub fn empty() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
        }
    }

    /// The standard starting position. Black occupies rows 0 and 1, white rows 6 and 7.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for col in 0..8 {
            board.squares[1][col] = Square::Occupied(Piece::new(Color::Black, PieceType::Pawn));
            board.squares[6][col] = Square::Occupied(Piece::new(Color::White, PieceType::Pawn));
        }
        for (col, kind) in PieceType::BACK_RANK.iter().enumerate() {
            board.squares[0][col] = Square::Occupied(Piece::new(Color::Black, *kind));
            board.squares[7][col] = Square::Occupied(Piece::new(Color::White, *kind));
        }
        board
    }

    /// Delegates FEN parsing to the `fen` module.
    pub fn from_fen(fen: &str) -> ChessResult<(Self, Color)> {
        fen::parse_fen(fen)
    }

    pub fn to_fen(&self, active_color: Color) -> String {
        fen::to_fen(self, active_color)
    }

    /// Content of the square, `Square::Empty` for positions off the board.
    pub fn square(&self, pos: Position) -> Square {
        match pos.index() {
            Some((row, col)) => self.squares[row][col],
            None => Square::Empty,
        }
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.square(pos).piece()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.square(pos).is_empty()
    }

    /// Returns a copy with `piece` placed on `pos`. Off-board positions leave the copy unchanged.
    pub fn with_piece(mut self, pos: Position, piece: Piece) -> Self {
        if let Some((row, col)) = pos.index() {
            self.squares[row][col] = Square::Occupied(piece);
        }
        self
    }

    pub fn without_piece(mut self, pos: Position) -> Self {
        if let Some((row, col)) = pos.index() {
            self.squares[row][col] = Square::Empty;
        }
        self
    }

    /// Returns a copy with the piece on `from` moved to `to`, capturing whatever stood there.
    ///
    /// No legality check is made. An empty or off-board `from` yields an unchanged copy.
    pub fn apply_move(&self, from: Position, to: Position) -> Self {
        match (self.piece_at(from), to.is_on_board()) {
            (Some(piece), true) => self.without_piece(from).with_piece(to, piece),
            _ => *self,
        }
    }

    /// Like `apply_move`, but also replaces the moved piece when the move carries a promotion.
    pub fn apply(&self, mv: Move) -> Self {
        let board = self.apply_move(mv.from, mv.to);
        match (mv.promotion, board.piece_at(mv.to)) {
            (Some(kind), Some(piece)) => board.with_piece(mv.to, Piece::new(piece.color, kind)),
            _ => board,
        }
    }

    /// Returns an iterator over all pieces on the chessboard along with their coordinates.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces_with_coordinates().filter(move |(_, piece)| piece.color == color)
    }

    pub fn count_pieces(&self, piece: Piece) -> usize {
        self.pieces_with_coordinates().filter(|(_, p)| *p == piece).count()
    }

    /// Scans row by row for the king of `color`.
    pub fn find_king_position(&self, color: Color) -> Option<Position> {
        let king = Piece::new(color, PieceType::King);
        self.pieces_with_coordinates().find(|(_, piece)| *piece == king).map(|(pos, _)| pos)
    }

    pub fn render_to_string(&self) -> String {
        self.render_with_highlights(&[])
    }

    /// Renders the board with rank 8 on top. Highlighted squares are marked with `*` when empty
    /// and bracketed when occupied.
    pub fn render_with_highlights(&self, highlights: &[Position]) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for row in 0..8i8 {
            let rank = 8 - row;
            board_representation.push_str(&format!("{} │", rank));
            for col in 0..8i8 {
                let pos = Position::new(row, col);
                let highlighted = highlights.contains(&pos);
                let cell = match (self.piece_at(pos), highlighted) {
                    (Some(piece), true) => format!("[{}]", piece.to_char()),
                    (Some(piece), false) => format!(" {} ", piece.to_char()),
                    (None, true) => " * ".to_string(),
                    (None, false) => "   ".to_string(),
                };
                board_representation.push_str(&cell);
                board_representation.push('│');
            }
            board_representation.push_str(&format!(" {}\n", rank));

            if row < 7 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board_piece_counts() {
        let board = ChessBoard::initial();
        let expected = [
            (PieceType::Pawn, 8),
            (PieceType::Rook, 2),
            (PieceType::Knight, 2),
            (PieceType::Bishop, 2),
            (PieceType::Queen, 1),
            (PieceType::King, 1),
        ];
        for color in [Color::White, Color::Black] {
            for (kind, count) in expected {
                assert_eq!(board.count_pieces(Piece::new(color, kind)), count, "{:?} {:?}", color, kind);
            }
        }
        assert_eq!(board.pieces_with_coordinates().count(), 32);
    }

    #[test]
    fn test_initial_board_ranks() {
        let board = ChessBoard::initial();
        for col in 0..8 {
            assert_eq!(
                board.piece_at(Position::new(1, col)),
                Some(Piece::new(Color::Black, PieceType::Pawn))
            );
            assert_eq!(
                board.piece_at(Position::new(6, col)),
                Some(Piece::new(Color::White, PieceType::Pawn))
            );
            let kind = PieceType::BACK_RANK[col as usize];
            assert_eq!(board.piece_at(Position::new(0, col)), Some(Piece::new(Color::Black, kind)));
            assert_eq!(board.piece_at(Position::new(7, col)), Some(Piece::new(Color::White, kind)));
            for row in 2..6 {
                assert!(board.is_empty_at(Position::new(row, col)));
            }
        }
        assert_eq!(board.find_king_position(Color::White), Some(Position::new(7, 4)));
        assert_eq!(board.find_king_position(Color::Black), Some(Position::new(0, 4)));
    }

    #[test]
    fn test_apply_move_changes_only_two_squares() {
        let board = ChessBoard::initial();
        let from = Position::new(6, 4);
        let to = Position::new(4, 4);
        let new_board = board.apply_move(from, to);

        assert_eq!(new_board.piece_at(from), None);
        assert_eq!(new_board.piece_at(to), Some(Piece::new(Color::White, PieceType::Pawn)));
        for pos in Position::all().filter(|p| *p != from && *p != to) {
            assert_eq!(new_board.square(pos), board.square(pos), "square {} changed", pos);
        }
        // the source board is untouched
        assert_eq!(board, ChessBoard::initial());
    }

    #[test]
    fn test_apply_move_from_empty_square() {
        let board = ChessBoard::initial();
        assert_eq!(board.apply_move(Position::new(4, 4), Position::new(3, 4)), board);
        assert_eq!(board.apply_move(Position::new(6, 4), Position::new(8, 4)), board);
    }

    #[test]
    fn test_apply_with_promotion() {
        let board = ChessBoard::empty().with_piece(Position::new(1, 0), Piece::new(Color::White, PieceType::Pawn));
        let mv = Move::new(Position::new(1, 0), Position::new(0, 0)).with_promotion(PieceType::Rook);
        let new_board = board.apply(mv);
        assert_eq!(new_board.piece_at(Position::new(0, 0)), Some(Piece::new(Color::White, PieceType::Rook)));
        assert!(new_board.is_empty_at(Position::new(1, 0)));
    }

    #[test]
    fn test_off_board_access() {
        let board = ChessBoard::initial();
        assert_eq!(board.square(Position::new(-1, 0)), Square::Empty);
        assert_eq!(board.with_piece(Position::new(9, 9), Piece::new(Color::White, PieceType::Queen)), board);
    }

    #[test]
    fn test_missing_king() {
        let board = ChessBoard::empty();
        assert_eq!(board.find_king_position(Color::White), None);
    }

    #[test]
    fn test_render_to_string() {
        let rendered = ChessBoard::initial().render_to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "8 │ r │ n │ b │ q │ k │ b │ n │ r │ 8");
        assert_eq!(lines[16], "1 │ R │ N │ B │ Q │ K │ B │ N │ R │ 1");

        let highlighted = ChessBoard::initial().render_with_highlights(&[Position::new(5, 4), Position::new(6, 4)]);
        assert!(highlighted.contains("[P]"));
        assert!(highlighted.contains(" * "));
    }
}
