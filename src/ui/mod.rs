//! Line-oriented terminal front end for a `GameSession`.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::chess_board::{Color, Move, PieceType, Position};
use crate::engines::Player;
use crate::error::ChessResult;
use crate::game::{ClickOutcome, GamePhase, GameSession};

const HELP: &str = "\
Commands:
  e2e4      move a piece (append q, r, b or n to promote)
  e2        click a square: select a piece, then click its destination
  q|r|b|n   choose the promotion piece
  moves e2  list the legal destinations of a piece
  board     show the board
  fen       print the position as FEN
  reset     start a new game
  help      show this help
  quit      leave";

/// Computer opponent playing one color.
pub struct Opponent {
    pub color: Color,
    pub player: Box<dyn Player>,
}

pub struct TerminalGame {
    session: GameSession,
    opponent: Option<Opponent>,
}

impl TerminalGame {
    pub fn new(session: GameSession, opponent: Option<Opponent>) -> Self {
        Self { session, opponent }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> ChessResult<()> {
        writeln!(output, "Type 'help' for the list of commands.")?;
        self.play_opponent(output)?;
        self.print_position(output)?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !self.handle_command(line, output)? {
                break;
            }
            self.play_opponent(output)?;
            output.flush()?;
        }
        Ok(())
    }

    /// Returns `false` when the user asked to leave.
    fn handle_command<W: Write>(&mut self, line: &str, output: &mut W) -> ChessResult<bool> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "quit" | "exit" => return Ok(false),
            "help" => writeln!(output, "{}", HELP)?,
            "board" => self.print_position(output)?,
            "fen" => writeln!(
                output,
                "{}",
                self.session.board().to_fen(self.session.current_player())
            )?,
            "reset" => {
                self.session.reset();
                self.print_position(output)?;
            }
            "moves" => match tokens.get(1).map(|s| Position::from_algebraic(s)) {
                Some(Ok(from)) => {
                    let targets: Vec<String> = self
                        .session
                        .legal_targets(from)
                        .iter()
                        .map(|p| p.as_algebraic())
                        .collect();
                    writeln!(output, "{}: {}", from, targets.join(" "))?;
                }
                _ => writeln!(output, "Usage: moves <square>")?,
            },
            token if token.len() == 1 => self.handle_promotion(token, output)?,
            token if token.len() == 2 => self.handle_click(token, output)?,
            token => self.handle_move(token, output)?,
        }
        Ok(true)
    }

    fn handle_promotion<W: Write>(&mut self, token: &str, output: &mut W) -> ChessResult<()> {
        let kind = token.chars().next().and_then(PieceType::from_char);
        match kind {
            Some(kind) => match self.session.promote(kind) {
                Ok(()) => self.print_position(output)?,
                Err(err) => writeln!(output, "{}", err)?,
            },
            None => writeln!(output, "Unknown command: {}", token)?,
        }
        Ok(())
    }

    fn handle_click<W: Write>(&mut self, token: &str, output: &mut W) -> ChessResult<()> {
        let pos = match Position::from_algebraic(token) {
            Ok(pos) => pos,
            Err(err) => {
                writeln!(output, "{}", err)?;
                return Ok(());
            }
        };
        match self.session.click(pos) {
            ClickOutcome::Selected(from) => {
                let targets = self.session.legal_targets(from);
                writeln!(output, "{}", self.session.board().render_with_highlights(&targets))?;
                writeln!(output, "Selected {}", from)?;
            }
            ClickOutcome::Moved(_) | ClickOutcome::PromotionPending(_) => self.print_position(output)?,
            ClickOutcome::Rejected => writeln!(output, "Illegal move")?,
            ClickOutcome::Ignored => writeln!(output, "Nothing to select on {}", pos)?,
        }
        Ok(())
    }

    fn handle_move<W: Write>(&mut self, token: &str, output: &mut W) -> ChessResult<()> {
        let result = Move::from_algebraic(token).and_then(|mv| self.session.make_move(mv));
        match result {
            Ok(_) => self.print_position(output)?,
            Err(err) => {
                warn!(%err, "move refused");
                writeln!(output, "{}", err)?;
            }
        }
        Ok(())
    }

    fn play_opponent<W: Write>(&mut self, output: &mut W) -> ChessResult<()> {
        let opponent = match self.opponent.as_mut() {
            Some(opponent) => opponent,
            None => return Ok(()),
        };
        while self.session.current_player() == opponent.color
            && matches!(
                self.session.phase(),
                GamePhase::AwaitingSelection | GamePhase::AwaitingDestination { .. }
            )
        {
            let mv = match opponent.player.choose_move(self.session.board(), opponent.color) {
                Some(mv) => mv,
                None => break,
            };
            self.session.make_move(mv)?;
            writeln!(output, "{} ({}) plays {}", opponent.player.name(), opponent.color, mv)?;
            write_position(&self.session, output)?;
        }
        Ok(())
    }

    fn print_position<W: Write>(&self, output: &mut W) -> ChessResult<()> {
        write_position(&self.session, output)
    }
}

/// Board followed by the game over, promotion, check and turn banners.
fn write_position<W: Write>(session: &GameSession, output: &mut W) -> ChessResult<()> {
    writeln!(output, "{}", session.board().render_to_string())?;
    match session.phase() {
        GamePhase::GameOver(outcome) => {
            writeln!(output, "{}", outcome)?;
            writeln!(output, "Type 'reset' to play again.")?;
            return Ok(());
        }
        GamePhase::AwaitingPromotionChoice { at } => {
            writeln!(output, "Choose promotion piece for {}: q, r, b, n", at)?;
            return Ok(());
        }
        GamePhase::AwaitingSelection | GamePhase::AwaitingDestination { .. } => {}
    }
    if let Some(color) = session.in_check() {
        writeln!(output, "{} king is in check!", capitalize(color))?;
    }
    writeln!(output, "{}'s turn", capitalize(session.current_player()))?;
    Ok(())
}

fn capitalize(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_board::{ChessBoard, Piece};
    use crate::engines::RandomPlayer;
    use crate::game::GameOutcome;

    fn run_script(game: &mut TerminalGame, script: &str) -> String {
        let mut output = Vec::new();
        game.run(script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn pos(square: &str) -> Position {
        Position::from_algebraic(square).unwrap()
    }

    #[test]
    fn test_moves_by_notation() {
        let mut game = TerminalGame::new(GameSession::new(), None);
        let output = run_script(&mut game, "e2e4\ne7e5\nquit\n");
        assert!(output.contains("Black's turn"));
        assert_eq!(game.session().history().len(), 2);
        assert_eq!(game.session().current_player(), Color::White);
    }

    #[test]
    fn test_moves_by_clicks() {
        let mut game = TerminalGame::new(GameSession::new(), None);
        let output = run_script(&mut game, "g1\nf3\n");
        assert!(output.contains("Selected g1"));
        assert_eq!(
            game.session().board().piece_at(pos("f3")),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
    }

    #[test]
    fn test_illegal_move_is_reported() {
        let mut game = TerminalGame::new(GameSession::new(), None);
        let output = run_script(&mut game, "e2e5\nxyz\n");
        assert!(output.contains("Illegal move: e2e5"));
        assert!(output.contains("Invalid move notation: xyz"));
        assert!(game.session().history().is_empty());
    }

    #[test]
    fn test_promotion_prompt() {
        let (board, color) = ChessBoard::from_fen("k7/2P5/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut game = TerminalGame::new(GameSession::from_position(board, color), None);
        let output = run_script(&mut game, "c7c8\nr\n");
        assert!(output.contains("Choose promotion piece for c8"));
        assert_eq!(
            game.session().board().piece_at(pos("c8")),
            Some(Piece::new(Color::White, PieceType::Rook))
        );
        assert!(output.contains("Black king is in check!"));
    }

    #[test]
    fn test_checkmate_banner_and_reset() {
        let mut game = TerminalGame::new(GameSession::new(), None);
        let output = run_script(&mut game, "f2f3\ne7e5\ng2g4\nd8h4\n");
        assert!(output.contains("Checkmate! Black wins!"));
        assert_eq!(
            game.session().outcome(),
            Some(GameOutcome::Checkmate { winner: Color::Black })
        );
        run_script(&mut game, "reset\n");
        assert!(!game.session().is_over());
    }

    #[test]
    fn test_moves_command_and_fen() {
        let mut game = TerminalGame::new(GameSession::new(), None);
        let output = run_script(&mut game, "moves b1\nfen\n");
        assert!(output.contains("b1: a3 c3"));
        assert!(output.contains("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"));
    }

    #[test]
    fn test_random_opponent_replies() {
        let opponent = Opponent {
            color: Color::Black,
            player: Box::new(RandomPlayer::with_seed(3)),
        };
        let mut game = TerminalGame::new(GameSession::new(), Some(opponent));
        let output = run_script(&mut game, "e2e4\n");
        assert!(output.contains("Random mover (black) plays"));
        assert_eq!(game.session().history().len(), 2);
        assert_eq!(game.session().current_player(), Color::White);
    }

    #[test]
    fn test_random_opponent_opens_as_white() {
        let opponent = Opponent {
            color: Color::White,
            player: Box::new(RandomPlayer::with_seed(3)),
        };
        let mut game = TerminalGame::new(GameSession::new(), Some(opponent));
        run_script(&mut game, "");
        assert_eq!(game.session().history().len(), 1);
        assert_eq!(game.session().current_player(), Color::Black);
    }
}
