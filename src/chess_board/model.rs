use std::fmt;

use crate::error::{ChessError, ChessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step. Rows grow towards white's side of the board.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> i8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn back_rank(&self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn promotion_row(&self) -> i8 {
        self.opposite().back_rank()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const PROMOTION_CHOICES: [PieceType; 4] =
        [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

    /// Back rank order from file a to file h.
    pub const BACK_RANK: [PieceType; 8] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];

    pub fn is_promotion_choice(&self) -> bool {
        Self::PROMOTION_CHOICES.contains(self)
    }

    /// Parses a piece letter, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// FEN letter: upper case for white, lower case for black.
    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let kind = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Self { color, kind })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    Occupied(Piece),
    #[default]
    Empty,
}

impl Square {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Square::Occupied(piece) => Some(*piece),
            Square::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Square::Empty)
    }
}

/// A board coordinate. Row 0 is black's back rank (rank 8), column 0 is file a.
///
/// Coordinates are signed so that a target computed off the edge of the board
/// can still be passed around and rejected by the rules.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(&self) -> bool {
        (0..8).contains(&self.row) && (0..8).contains(&self.col)
    }

    /// Array indexes for this position, or `None` when it is off the board.
    pub fn index(&self) -> Option<(usize, usize)> {
        if self.is_on_board() {
            Some((self.row as usize, self.col as usize))
        } else {
            None
        }
    }

    pub fn offset(&self, d_row: i8, d_col: i8) -> Self {
        Self::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }

    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8).flat_map(|row| (0..8).map(move |col| Position::new(row, col)))
    }

    pub fn from_algebraic(square: &str) -> ChessResult<Self> {
        let invalid = || ChessError::InvalidSquare { square: square.to_string() };
        let mut chars = square.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(invalid()),
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(invalid());
        }
        let col = (file as u8 - b'a') as i8;
        let row = 7 - (rank as u8 - b'1') as i8;
        Ok(Self { row, col })
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to, promotion: None }
    }

    pub fn with_promotion(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion);
        self
    }

    pub fn as_algebraic(&self) -> String {
        let base_move = format!("{}{}", self.from.as_algebraic(), self.to.as_algebraic());
        if let Some(promo) = self.promotion {
            base_move + &promo.to_string().to_lowercase()
        } else {
            base_move
        }
    }

    /// Parses long algebraic notation such as `e2e4` or `e7e8q`.
    pub fn from_algebraic(algebraic: &str) -> ChessResult<Self> {
        let invalid = || ChessError::InvalidMoveNotation { notation: algebraic.to_string() };
        if !algebraic.is_ascii() || !(4..=5).contains(&algebraic.len()) {
            return Err(invalid());
        }
        let from = Position::from_algebraic(&algebraic[0..2]).map_err(|_| invalid())?;
        let to = Position::from_algebraic(&algebraic[2..4]).map_err(|_| invalid())?;

        let promotion = match algebraic.chars().nth(4) {
            Some(c) => match PieceType::from_char(c) {
                Some(kind) if kind.is_promotion_choice() => Some(kind),
                _ => return Err(invalid()),
            },
            None => None,
        };
        Ok(Self { from, to, promotion })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algebraic())
    }
}

/// Off-board squares print as `(row, col)`.
pub fn to_algebraic_square(row: i8, col: i8) -> String {
    if !Position::new(row, col).is_on_board() {
        return format!("({}, {})", row, col);
    }
    let file = (b'a' + col as u8) as char;
    let rank = 8 - row;
    format!("{}{}", file, rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_methods() {
        assert_eq!(Position::from_algebraic("a8").unwrap(), Position::new(0, 0));
        assert_eq!(Position::from_algebraic("e2").unwrap(), Position::new(6, 4));
        assert_eq!(Position::from_algebraic("h1").unwrap(), Position::new(7, 7));
        assert_eq!(Position::new(6, 4).as_algebraic(), "e2");
        assert_eq!(Move::from_algebraic("e2e4").unwrap().as_algebraic(), "e2e4");
        assert_eq!(
            Move::from_algebraic("b7b8N").unwrap().promotion,
            Some(PieceType::Knight)
        );
    }

    #[test]
    fn test_invalid_notation() {
        assert!(Position::from_algebraic("i1").is_err());
        assert!(Position::from_algebraic("a9").is_err());
        assert!(Position::from_algebraic("a10").is_err());
        assert!(Move::from_algebraic("e2").is_err());
        assert!(Move::from_algebraic("e2e4k").is_err());
        assert!(Move::from_algebraic("e2é4").is_err());
    }

    #[test]
    fn test_off_board_positions() {
        assert!(!Position::new(-1, 0).is_on_board());
        assert!(!Position::new(0, 8).is_on_board());
        assert_eq!(Position::new(8, 3).index(), None);
        assert_eq!(Position::new(3, 5).index(), Some((3, 5)));
        assert_eq!(Position::all().count(), 64);
    }

    #[test]
    fn test_off_board_notation() {
        assert_eq!(Position::new(-1, 4).as_algebraic(), "(-1, 4)");
        assert_eq!(Position::new(3, 8).to_string(), "(3, 8)");
        let mv = Move::new(Position::new(6, 4), Position::new(6, -1));
        assert_eq!(mv.to_string(), "e2(6, -1)");
        assert_eq!(to_algebraic_square(i8::MIN, i8::MAX), "(-128, 127)");
    }

    #[test]
    fn test_piece_chars() {
        let piece = Piece::new(Color::White, PieceType::Knight);
        assert_eq!(piece.to_char(), 'N');
        assert_eq!(Piece::from_char('N'), Some(piece));
        assert_eq!(Piece::from_char('k'), Some(Piece::new(Color::Black, PieceType::King)));
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn test_color_directions() {
        assert_eq!(Color::White.forward(), -1);
        assert_eq!(Color::Black.forward(), 1);
        assert_eq!(Color::White.promotion_row(), 0);
        assert_eq!(Color::Black.promotion_row(), 7);
        assert_eq!(Color::Black.opposite(), Color::White);
    }
}
