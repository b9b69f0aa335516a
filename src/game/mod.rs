//! Game session
//!
//! Owns the one mutable board of a game and drives the turn cycle on top of the
//! pure rules: select a piece, pick a destination, optionally choose a promotion
//! piece, hand the turn over, and stop once the side to move has no legal move.

use std::fmt;

use tracing::{debug, info};

use crate::chess_board::{ChessBoard, Color, GameStatus, Move, Piece, PieceType, Position, ZOBRIST};
use crate::error::{ChessError, ChessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner: Color::White } => write!(f, "Checkmate! White wins!"),
            GameOutcome::Checkmate { winner: Color::Black } => write!(f, "Checkmate! Black wins!"),
            GameOutcome::Stalemate => write!(f, "Stalemate!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingSelection,
    AwaitingDestination { from: Position },
    /// A pawn stands on its last row and the turn is not handed over until a piece is chosen.
    AwaitingPromotionChoice { at: Position },
    GameOver(GameOutcome),
}

/// Move record for history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

/// What a click on a square did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected(Position),
    Moved(MoveRecord),
    PromotionPending(Position),
    Rejected,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: ChessBoard,
    current_player: Color,
    phase: GamePhase,
    in_check: Option<Color>,
    history: Vec<MoveRecord>,
    position_hashes: Vec<u64>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::from_position(ChessBoard::initial(), Color::White)
    }

    /// Starts a session from an arbitrary position. A position that is already
    /// checkmate or stalemate starts in `GameOver`.
    pub fn from_position(board: ChessBoard, current_player: Color) -> Self {
        let mut session = Self {
            board,
            current_player,
            phase: GamePhase::AwaitingSelection,
            in_check: None,
            history: Vec::new(),
            position_hashes: Vec::new(),
        };
        session.record_position();
        session.evaluate();
        session
    }

    pub fn reset(&mut self) {
        info!("new game");
        *self = Self::new();
    }

    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The color whose king is attacked, if any.
    pub fn in_check(&self) -> Option<Color> {
        self.in_check
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            GamePhase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn selected(&self) -> Option<Position> {
        match self.phase {
            GamePhase::AwaitingDestination { from } => Some(from),
            _ => None,
        }
    }

    /// How many times the current placement with the same side to move has occurred.
    pub fn repetition_count(&self) -> usize {
        match self.position_hashes.last() {
            Some(current) => self.position_hashes.iter().filter(|h| *h == current).count(),
            None => 0,
        }
    }

    /// Legal destinations for a piece of the side to move; empty when nothing can move.
    pub fn legal_targets(&self, from: Position) -> Vec<Position> {
        let can_move = matches!(
            self.phase,
            GamePhase::AwaitingSelection | GamePhase::AwaitingDestination { .. }
        );
        match self.board.piece_at(from) {
            Some(piece) if can_move && piece.color == self.current_player => self.board.legal_targets(from),
            _ => Vec::new(),
        }
    }

    /// Click-to-select, click-to-move. The selection is cleared after every
    /// destination click, whether the move was accepted or not.
    pub fn click(&mut self, pos: Position) -> ClickOutcome {
        match self.phase {
            GamePhase::GameOver(_) | GamePhase::AwaitingPromotionChoice { .. } => ClickOutcome::Ignored,
            GamePhase::AwaitingSelection => match self.board.piece_at(pos) {
                Some(piece) if piece.color == self.current_player => {
                    debug!(square = %pos, "piece selected");
                    self.phase = GamePhase::AwaitingDestination { from: pos };
                    ClickOutcome::Selected(pos)
                }
                _ => ClickOutcome::Ignored,
            },
            GamePhase::AwaitingDestination { from } => {
                self.phase = GamePhase::AwaitingSelection;
                match self.make_move(Move::new(from, pos)) {
                    Ok(record) => match self.phase {
                        GamePhase::AwaitingPromotionChoice { at } => ClickOutcome::PromotionPending(at),
                        _ => ClickOutcome::Moved(record),
                    },
                    Err(err) => {
                        debug!(%err, "move rejected");
                        ClickOutcome::Rejected
                    }
                }
            }
        }
    }

    /// Plays `mv` for the side to move.
    ///
    /// A pawn reaching its last row is promoted right away when `mv` names the
    /// piece; otherwise the session waits for `promote`.
    pub fn make_move(&mut self, mv: Move) -> ChessResult<MoveRecord> {
        match self.phase {
            GamePhase::GameOver(_) => return Err(ChessError::GameOver),
            GamePhase::AwaitingPromotionChoice { at } => {
                return Err(ChessError::PromotionPending { position: at })
            }
            GamePhase::AwaitingSelection | GamePhase::AwaitingDestination { .. } => {}
        }
        for position in [mv.from, mv.to] {
            if !position.is_on_board() {
                return Err(ChessError::InvalidSquare {
                    square: position.to_string(),
                });
            }
        }

        let piece = self
            .board
            .piece_at(mv.from)
            .ok_or(ChessError::NoPieceAtSquare { position: mv.from })?;
        if piece.color != self.current_player {
            return Err(ChessError::WrongPieceColor {
                position: mv.from,
                color: self.current_player,
            });
        }
        if !self.board.is_valid_move(mv.from, mv.to, piece) {
            return Err(ChessError::IllegalMove {
                notation: mv.as_algebraic(),
            });
        }

        let promotes = piece.kind == PieceType::Pawn && mv.to.row == piece.color.promotion_row();
        match mv.promotion {
            Some(_) if !promotes => {
                return Err(ChessError::UnexpectedPromotion {
                    notation: mv.as_algebraic(),
                })
            }
            Some(kind) if !kind.is_promotion_choice() => return Err(ChessError::InvalidPromotionPiece { kind }),
            _ => {}
        }

        let record = MoveRecord {
            mv,
            piece,
            captured: self.board.piece_at(mv.to),
        };
        self.board = self.board.apply(mv);
        self.history.push(record);
        debug!(color = %piece.color, mv = %mv, captured = ?record.captured.map(|p| p.kind), "move applied");

        if promotes && mv.promotion.is_none() {
            info!(square = %mv.to, "waiting for promotion choice");
            self.phase = GamePhase::AwaitingPromotionChoice { at: mv.to };
            self.refresh_check();
        } else {
            self.finish_turn();
        }
        Ok(record)
    }

    /// Replaces the pawn waiting on its last row and hands the turn over.
    pub fn promote(&mut self, kind: PieceType) -> ChessResult<()> {
        let at = match self.phase {
            GamePhase::AwaitingPromotionChoice { at } => at,
            _ => return Err(ChessError::NoPromotionPending),
        };
        if !kind.is_promotion_choice() {
            return Err(ChessError::InvalidPromotionPiece { kind });
        }

        self.board = self.board.with_piece(at, Piece::new(self.current_player, kind));
        if let Some(last) = self.history.last_mut() {
            last.mv.promotion = Some(kind);
        }
        info!(square = %at, ?kind, "pawn promoted");
        self.finish_turn();
        Ok(())
    }

    fn finish_turn(&mut self) {
        self.current_player = self.current_player.opposite();
        self.phase = GamePhase::AwaitingSelection;
        self.record_position();
        self.evaluate();
    }

    fn record_position(&mut self) {
        self.position_hashes
            .push(ZOBRIST.calculate_hash(&self.board, self.current_player));
    }

    fn refresh_check(&mut self) {
        self.in_check = [Color::White, Color::Black]
            .into_iter()
            .find(|color| self.board.is_king_in_check(*color));
    }

    fn evaluate(&mut self) {
        self.refresh_check();

        match self.board.status(self.current_player) {
            GameStatus::Checkmate => {
                let outcome = GameOutcome::Checkmate {
                    winner: self.current_player.opposite(),
                };
                info!(%outcome, "game over");
                self.phase = GamePhase::GameOver(outcome);
            }
            GameStatus::Stalemate => {
                let outcome = GameOutcome::Stalemate;
                info!(%outcome, "game over");
                self.phase = GamePhase::GameOver(outcome);
            }
            GameStatus::Check => info!(color = %self.current_player, "king in check"),
            GameStatus::Ongoing => {}
        }
    }
}
