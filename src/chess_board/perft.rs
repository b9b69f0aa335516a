use super::{ChessBoard, Color, Move};

/// Counts the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(board: &ChessBoard, active_color: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1u64;
    }

    let mut node_count = 0u64;
    for mv in board.legal_moves(active_color) {
        if depth == 1 {
            node_count += 1;
        } else {
            node_count += perft(&board.apply(mv), active_color.opposite(), depth - 1);
        }
    }
    node_count
}

/// Per-move node counts of the first ply, sorted by move notation. Empty at depth 0,
/// where there is no first ply to split.
pub fn divide(board: &ChessBoard, active_color: Color, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut result: Vec<(Move, u64)> = board
        .legal_moves(active_color)
        .into_iter()
        .map(|mv| {
            let count = perft(&board.apply(mv), active_color.opposite(), depth - 1);
            (mv, count)
        })
        .collect();
    result.sort_by_key(|(mv, _)| mv.as_algebraic());
    result
}
