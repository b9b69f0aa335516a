use super::{ChessBoard, Color, Move, Piece, PieceType, Position};

/// Status of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl ChessBoard {
    /// Full legality test: geometry, path, no self-capture, and the mover's king
    /// must not be in check afterwards.
    pub fn is_valid_move(&self, from: Position, to: Position, piece: Piece) -> bool {
        self.check_move(from, to, piece, false)
    }

    /// Attack-only test: whether `piece` standing on `from` attacks `to`, ignoring
    /// what the move would do to its own king.
    pub fn can_attack(&self, from: Position, to: Position, piece: Piece) -> bool {
        self.check_move(from, to, piece, true)
    }

    fn check_move(&self, from: Position, to: Position, piece: Piece, attack_only: bool) -> bool {
        if !from.is_on_board() || !to.is_on_board() || from == to {
            return false;
        }
        if let Some(target) = self.piece_at(to) {
            if target.color == piece.color {
                return false;
            }
        }
        if !self.is_geometry_valid(from, to, piece) {
            return false;
        }
        if attack_only {
            return true;
        }

        let scratch = self.without_piece(from).with_piece(to, piece);
        !scratch.is_king_in_check(piece.color)
    }

    fn is_geometry_valid(&self, from: Position, to: Position, piece: Piece) -> bool {
        let dx = to.col - from.col;
        let dy = to.row - from.row;
        let abs_dx = dx.abs();
        let abs_dy = dy.abs();

        match piece.kind {
            PieceType::Pawn => {
                let direction = piece.color.forward();
                match self.piece_at(to) {
                    None if dx == 0 && dy == direction => true,
                    None if dx == 0 && dy == 2 * direction && from.row == piece.color.pawn_start_row() => {
                        self.is_empty_at(from.offset(direction, 0))
                    }
                    Some(target) => abs_dx == 1 && dy == direction && target.color != piece.color,
                    None => false,
                }
            }
            PieceType::Knight => (abs_dx == 2 && abs_dy == 1) || (abs_dx == 1 && abs_dy == 2),
            PieceType::Bishop => abs_dx == abs_dy && self.is_path_clear(from, to),
            PieceType::Rook => (dx == 0) != (dy == 0) && self.is_path_clear(from, to),
            PieceType::Queen => {
                ((dx == 0) != (dy == 0) || abs_dx == abs_dy) && self.is_path_clear(from, to)
            }
            PieceType::King => abs_dx <= 1 && abs_dy <= 1,
        }
    }

    /// Whether every square strictly between `from` and `to` is empty. Only meaningful
    /// for straight or diagonal lines.
    pub fn is_path_clear(&self, from: Position, to: Position) -> bool {
        let step_col = (to.col - from.col).signum();
        let step_row = (to.row - from.row).signum();

        let mut current = from.offset(step_row, step_col);
        while current != to {
            if !current.is_on_board() || !self.is_empty_at(current) {
                return false;
            }
            current = current.offset(step_row, step_col);
        }
        true
    }

    /// A missing king is never in check.
    pub fn is_king_in_check(&self, color: Color) -> bool {
        let king_pos = match self.find_king_position(color) {
            Some(pos) => pos,
            None => return false,
        };
        self.is_square_attacked_by_color(king_pos, color.opposite())
    }

    /// Whether a piece of `attacker` attacks `target`, which may be empty.
    /// Pawns attack only their two forward diagonals, never the push square.
    pub fn is_square_attacked_by_color(&self, target: Position, attacker: Color) -> bool {
        if !target.is_on_board() {
            return false;
        }
        if self.piece_at(target).is_some_and(|p| p.color == attacker) {
            return false;
        }
        self.pieces_of(attacker).any(|(pos, piece)| match piece.kind {
            PieceType::Pawn => target.row - pos.row == attacker.forward() && (target.col - pos.col).abs() == 1,
            _ => self.can_attack(pos, target, piece),
        })
    }

    /// Whether `color` has at least one legal move. Stops at the first one found.
    pub fn has_valid_moves(&self, color: Color) -> bool {
        self.pieces_of(color).any(|(from, piece)| {
            Position::all().any(|to| self.is_valid_move(from, to, piece))
        })
    }

    /// Legal destinations of the piece standing on `from`.
    pub fn legal_targets(&self, from: Position) -> Vec<Position> {
        match self.piece_at(from) {
            Some(piece) => Position::all()
                .filter(|to| self.is_valid_move(from, *to, piece))
                .collect(),
            None => Vec::new(),
        }
    }

    /// All legal moves of `color`. A pawn reaching its last row yields one move per
    /// promotion choice.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (from, piece) in self.pieces_of(color) {
            for to in self.legal_targets(from) {
                let mv = Move::new(from, to);
                if piece.kind == PieceType::Pawn && to.row == color.promotion_row() {
                    for kind in PieceType::PROMOTION_CHOICES {
                        moves.push(mv.with_promotion(kind));
                    }
                } else {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_king_in_check(color) && !self.has_valid_moves(color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_king_in_check(color) && !self.has_valid_moves(color)
    }

    pub fn status(&self, color: Color) -> GameStatus {
        match (self.is_king_in_check(color), self.has_valid_moves(color)) {
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Ongoing,
        }
    }
}
