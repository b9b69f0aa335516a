//! Bindings for a browser page that renders the board itself and forwards clicks.

use wasm_bindgen::prelude::*;

use crate::chess_board::{Color, PieceType, Position};
use crate::game::{ClickOutcome, GamePhase, GameSession};

#[wasm_bindgen]
pub struct WasmGame {
    session: GameSession,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            session: GameSession::new(),
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Returns `true` when the click changed the game state.
    pub fn click(&mut self, row: i8, col: i8) -> bool {
        !matches!(
            self.session.click(Position::new(row, col)),
            ClickOutcome::Ignored | ClickOutcome::Rejected
        )
    }

    /// Promotes the waiting pawn. `letter` is one of `q`, `r`, `b`, `n`.
    pub fn promote(&mut self, letter: char) -> Result<(), JsError> {
        let kind = PieceType::from_char(letter).ok_or_else(|| JsError::new("unknown piece letter"))?;
        self.session.promote(kind).map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn fen(&self) -> String {
        self.session.board().to_fen(self.session.current_player())
    }

    pub fn current_player(&self) -> String {
        self.session.current_player().to_string()
    }

    /// The color in check, or `undefined`.
    pub fn in_check(&self) -> Option<String> {
        self.session.in_check().map(|color: Color| color.to_string())
    }

    pub fn status_text(&self) -> String {
        if let GamePhase::AwaitingPromotionChoice { at } = self.session.phase() {
            return format!("Choose promotion piece for {}", at);
        }
        match (self.session.outcome(), self.session.in_check()) {
            (Some(outcome), _) => outcome.to_string(),
            (None, Some(color)) => format!("{} king is in check!", color),
            (None, None) => format!("{} to move", self.session.current_player()),
        }
    }

    /// Legal destinations as `row * 8 + col` indexes.
    pub fn legal_targets(&self, row: i8, col: i8) -> Vec<u8> {
        self.session
            .legal_targets(Position::new(row, col))
            .iter()
            .map(|p| (p.row * 8 + p.col) as u8)
            .collect()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    tracing::debug!("chess-arcade loaded");
}
