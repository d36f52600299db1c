//! Make/unmake: the 11-step mutation contract of SPEC_FULL.md §4.6, built on
//! `Board::place_piece`/`remove_piece` so every derived cache and the
//! Zobrist key stay exactly in lockstep with the mailbox. Unmake restores the
//! exact prior state from the `Undo` entry, no recomputation.

use crate::board::castle_bits::*;
use crate::board::{Board, Color, Piece};
use crate::hash::zobrist::{ep_file_key, xor_castling_rights_delta, zobrist_keys};
use crate::moves::movegen::{MoveList, generate_pseudo_legal};
use crate::moves::square_control::{in_check, is_legal_castling};
use crate::moves::types::{Move, NullMoveUndo, Undo};
use crate::square::Square;

#[inline(always)]
fn rook_castle_squares(king_to_idx: u8) -> Option<(Square, Square)> {
    match king_to_idx {
        6 => Some((Square::from_index(7), Square::from_index(5))),
        2 => Some((Square::from_index(0), Square::from_index(3))),
        62 => Some((Square::from_index(63), Square::from_index(61))),
        58 => Some((Square::from_index(56), Square::from_index(59))),
        _ => None,
    }
}

#[inline(always)]
fn rights_mask_to_clear_for_rook(color: Color, rook_sq: u8) -> u8 {
    match (color, rook_sq) {
        (Color::White, 0) => CASTLE_WQ,
        (Color::White, 7) => CASTLE_WK,
        (Color::Black, 56) => CASTLE_BQ,
        (Color::Black, 63) => CASTLE_BK,
        _ => 0,
    }
}

/// Applies `mv` to `board`, returning the entry needed to undo it.
pub fn make_move_basic(board: &mut Board, mv: Move) -> Undo {
    let color = board.side_to_move;
    let piece = mv.piece();
    let from = mv.from();
    let to = mv.to();

    let prev_ep_square = board.en_passant;
    let prev_castling_rights = board.castling_rights;
    let prev_halfmove_clock = board.halfmove_clock;
    let prev_fullmove_number = board.fullmove_number;
    let prev_zobrist = board.zobrist;

    if let Some(f) = ep_file_key(board.en_passant) {
        board.zobrist ^= f;
    }
    board.en_passant = None;

    let mut captured = None;
    if mv.is_en_passant() {
        let cap_sq = match color {
            Color::White => Square::from_file_rank(to.file(), to.rank() - 1),
            Color::Black => Square::from_file_rank(to.file(), to.rank() + 1),
        };
        captured = Some((color.opposite(), Piece::Pawn, cap_sq));
        board.remove_piece(color.opposite(), Piece::Pawn, cap_sq);
    } else if let Some(cap_piece) = mv.captured() {
        captured = Some((color.opposite(), cap_piece, to));
        board.remove_piece(color.opposite(), cap_piece, to);
    }

    let castling_rook = if mv.is_castling() {
        rook_castle_squares(to.index())
    } else {
        None
    };

    if piece == Piece::Pawn && mv.is_double_pawn_push() {
        let ep_sq = match color {
            Color::White => Square::from_file_rank(from.file(), from.rank() + 1),
            Color::Black => Square::from_file_rank(from.file(), from.rank() - 1),
        };
        board.en_passant = Some(ep_sq);
    }

    let mut mask_to_clear = 0u8;
    if piece == Piece::King {
        mask_to_clear |= match color {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }
    if piece == Piece::Rook {
        mask_to_clear |= rights_mask_to_clear_for_rook(color, from.index());
    }
    if let Some((cap_color, cap_piece, cap_sq)) = captured {
        if cap_piece == Piece::Rook {
            mask_to_clear |= rights_mask_to_clear_for_rook(cap_color, cap_sq.index());
        }
    }

    let old_rights = board.castling_rights;
    let new_rights = old_rights & !mask_to_clear;
    if new_rights != old_rights {
        board.castling_rights = new_rights;
        xor_castling_rights_delta(&mut board.zobrist, old_rights, new_rights);
    }

    board.remove_piece(color, piece, from);
    if let Some(promo) = mv.promotion() {
        board.place_piece(color, promo, to);
    } else {
        board.place_piece(color, piece, to);
    }

    if let Some((rook_from, rook_to)) = castling_rook {
        board.remove_piece(color, Piece::Rook, rook_from);
        board.place_piece(color, Piece::Rook, rook_to);
    }

    if mv.is_capture() || piece == Piece::Pawn {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock = prev_halfmove_clock + 1;
    }
    if color == Color::Black {
        board.fullmove_number = prev_fullmove_number + 1;
    }

    board.side_to_move = color.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;

    if let Some(f) = ep_file_key(board.en_passant) {
        board.zobrist ^= f;
    }

    let irreversible = mv.is_capture() || piece == Piece::Pawn;
    if irreversible {
        board.history.clear();
    }
    board.history.push(prev_zobrist);

    #[cfg(debug_assertions)]
    board.assert_hash();

    Undo {
        mv,
        prev_castling_rights,
        prev_en_passant: prev_ep_square,
        prev_halfmove_clock,
        prev_fullmove_number,
        prev_zobrist,
        captured,
        castling_rook,
    }
}

/// Restores `board` to exactly the state it had before `undo.mv` was made.
pub fn undo_move_basic(board: &mut Board, undo: Undo) {
    let mv = undo.mv;
    // The mover's color is the side NOT to move right now (make flipped it).
    let mover_color = board.side_to_move.opposite();

    let from = mv.from();
    let to = mv.to();

    if let Some(promo) = mv.promotion() {
        board.remove_piece(mover_color, promo, to);
        board.place_piece(mover_color, Piece::Pawn, from);
    } else {
        board.remove_piece(mover_color, mv.piece(), to);
        board.place_piece(mover_color, mv.piece(), from);
    }

    if let Some((cap_color, cap_piece, cap_sq)) = undo.captured {
        board.place_piece(cap_color, cap_piece, cap_sq);
    }

    if let Some((rook_from, rook_to)) = undo.castling_rook {
        board.remove_piece(mover_color, Piece::Rook, rook_to);
        board.place_piece(mover_color, Piece::Rook, rook_from);
    }

    board.side_to_move = mover_color;
    board.castling_rights = undo.prev_castling_rights;
    board.en_passant = undo.prev_en_passant;
    board.halfmove_clock = undo.prev_halfmove_clock;
    board.fullmove_number = undo.prev_fullmove_number;
    board.zobrist = undo.prev_zobrist;

    board.history.pop();

    #[cfg(debug_assertions)]
    board.assert_hash();
}

/// Passes the move without touching the board, for null-move pruning. Not
/// wired into the search loop (SPEC_FULL.md §4.6 Open Question), but
/// implemented and tested as a standalone primitive.
pub fn make_null_move(board: &mut Board) -> NullMoveUndo {
    let prev_ep_square = board.en_passant;
    let prev_halfmove_clock = board.halfmove_clock;
    let prev_zobrist = board.zobrist;

    board.history.push(board.zobrist);

    if let Some(f) = ep_file_key(board.en_passant) {
        board.zobrist ^= f;
    }
    board.en_passant = None;

    board.side_to_move = board.side_to_move.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;

    NullMoveUndo {
        prev_en_passant: prev_ep_square,
        prev_halfmove_clock,
        prev_zobrist,
    }
}

pub fn undo_null_move(board: &mut Board, undo: NullMoveUndo) {
    board.side_to_move = board.side_to_move.opposite();
    board.en_passant = undo.prev_en_passant;
    board.halfmove_clock = undo.prev_halfmove_clock;
    board.zobrist = undo.prev_zobrist;
    board.history.pop();
}

/// Generates every legal move via generate-and-test: generate pseudo-legal
/// moves into `scratch`, then make/check/unmake each one.
pub fn generate_legal(board: &mut Board, moves: &mut MoveList, scratch: &mut MoveList) {
    generate_pseudo_legal(board, scratch);
    moves.clear();

    for mv in scratch.iter().copied() {
        if mv.is_castling() && !is_legal_castling(board, mv) {
            continue;
        }
        let mover = board.side_to_move;
        let undo = make_move_basic(board, mv);
        let illegal = in_check(board, mover);
        undo_move_basic(board, undo);
        if !illegal {
            moves.push(mv);
        }
    }
}

/// Whether a single pseudo-legal move is legal (doesn't leave its own king in
/// check; for castling, also checks the king's path).
pub fn is_legal_move(board: &mut Board, mv: Move) -> bool {
    if mv.is_castling() {
        return is_legal_castling(board, mv);
    }
    let mover = board.side_to_move;
    let undo = make_move_basic(board, mv);
    let illegal = in_check(board, mover);
    undo_move_basic(board, undo);
    !illegal
}

/// Legal captures and promotions only, for quiescence search.
pub fn generate_legal_captures(board: &mut Board, moves: &mut MoveList, scratch: &mut MoveList) {
    crate::moves::movegen::generate_pseudo_legal_captures(board, scratch);
    moves.clear();
    for mv in scratch.iter().copied() {
        let mover = board.side_to_move;
        let undo = make_move_basic(board, mv);
        let illegal = in_check(board, mover);
        undo_move_basic(board, undo);
        if !illegal {
            moves.push(mv);
        }
    }
}
