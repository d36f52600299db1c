//! The default static evaluator. SPEC_FULL.md §9 treats evaluation as a
//! pluggable external collaborator and declines to choose among
//! material-only / material-plus-PST / hybrid designs; this crate ships the
//! minimal one, using the same per-piece values as `Board::material_score`.

use crate::board::{Board, Color};

/// Material balance from the side-to-move's point of view, in centipawns.
pub fn static_eval(board: &Board) -> i32 {
    let white = board.material_score[Color::White as usize];
    let black = board.material_score[Color::Black as usize];
    let score = white - black;
    match board.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}
