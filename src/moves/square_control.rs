//! Attack queries: is a given square attacked by a given side? Implemented
//! by ray-walking the mailbox-120 grid (SPEC_FULL.md §4.3) rather than
//! magic-bitboard lookups — no allocation, no board mutation.

use crate::board::{Board, Color, Piece};
use crate::moves::types::Move;
use crate::square::{BISHOP_DIRS, KNIGHT_OFFSETS, ROOK_DIRS, Square};

/// Is `square` attacked by any piece of `attacker`'s color?
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    // Pawns: a square is attacked by a pawn sitting one diagonal step behind
    // it from the attacker's point of view.
    let pawn_step = match attacker {
        Color::White => crate::square::OFFSET_S,
        Color::Black => crate::square::OFFSET_N,
    };
    for diag in [pawn_step + crate::square::OFFSET_E, pawn_step + crate::square::OFFSET_W] {
        if let Some(from) = square.try_step(diag) {
            if board.piece_at(from) == Some((attacker, Piece::Pawn)) {
                return true;
            }
        }
    }

    for &off in &KNIGHT_OFFSETS {
        if let Some(from) = square.try_step(off) {
            if board.piece_at(from) == Some((attacker, Piece::Knight)) {
                return true;
            }
        }
    }

    for &off in &crate::square::KING_DIRS {
        if let Some(from) = square.try_step(off) {
            if board.piece_at(from) == Some((attacker, Piece::King)) {
                return true;
            }
        }
    }

    for &dir in &ROOK_DIRS {
        let mut cur = square;
        while let Some(next) = cur.try_step(dir) {
            match board.piece_at(next) {
                None => cur = next,
                Some((c, p)) => {
                    if c == attacker && (p == Piece::Rook || p == Piece::Queen) {
                        return true;
                    }
                    break;
                }
            }
        }
    }

    for &dir in &BISHOP_DIRS {
        let mut cur = square;
        while let Some(next) = cur.try_step(dir) {
            match board.piece_at(next) {
                None => cur = next,
                Some((c, p)) => {
                    if c == attacker && (p == Piece::Bishop || p == Piece::Queen) {
                        return true;
                    }
                    break;
                }
            }
        }
    }

    false
}

#[inline(always)]
pub fn in_check(board: &Board, side: Color) -> bool {
    is_square_attacked(board, board.king_square(side), side.opposite())
}

/// Whether a castling move is currently legal: rights already checked by the
/// generator, this confirms the king isn't in check and doesn't pass through
/// or land on an attacked square.
pub fn is_legal_castling(board: &Board, mv: Move) -> bool {
    let color = board.side_to_move;

    if in_check(board, color) {
        return false;
    }

    let (start_idx, middle_idx, end_idx) = match (color, mv.to().index()) {
        (Color::White, 6) => (4, 5, 6),
        (Color::White, 2) => (4, 3, 2),
        (Color::Black, 62) => (60, 61, 62),
        (Color::Black, 58) => (60, 59, 58),
        _ => return false,
    };

    let opp = color.opposite();
    for &test_idx in &[start_idx, middle_idx, end_idx] {
        if is_square_attacked(board, Square::from_index(test_idx as u8), opp) {
            return false;
        }
    }

    true
}
