//! Pseudo-legal move generation, walking the mailbox-120 grid per piece
//! kind. Legality filtering (does the move leave the mover's own king in
//! check?) lives in `execute::generate_legal` via generate-and-test, per
//! SPEC_FULL.md §4.5.

use crate::board::{Board, Color, Piece};
use crate::moves::types::Move;
use crate::square::{BISHOP_DIRS, KNIGHT_OFFSETS, KING_DIRS, ROOK_DIRS, Square};
use arrayvec::ArrayVec;

pub type MoveList = ArrayVec<Move, 256>;

const PROMOS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

#[inline(always)]
fn push_quiet_or_capture(
    board: &Board,
    from: Square,
    to: Square,
    piece: Piece,
    moves: &mut MoveList,
) {
    let captured = board.piece_type_at(to);
    moves.push(Move::encode(
        from,
        to,
        piece,
        captured,
        None,
        captured.is_some(),
        false,
        false,
        false,
    ));
}

fn generate_knight_moves(board: &Board, color: Color, moves: &mut MoveList, captures_only: bool) {
    for &from in &board.piece_list[color as usize][Piece::Knight as usize] {
        for &off in &KNIGHT_OFFSETS {
            if let Some(to) = from.try_step(off) {
                match board.piece_at(to) {
                    Some((c, _)) if c == color => continue,
                    Some(_) => push_quiet_or_capture(board, from, to, Piece::Knight, moves),
                    None if !captures_only => {
                        push_quiet_or_capture(board, from, to, Piece::Knight, moves)
                    }
                    None => {}
                }
            }
        }
    }
}

fn generate_sliding_moves(
    board: &Board,
    color: Color,
    piece: Piece,
    dirs: &[i32],
    moves: &mut MoveList,
    captures_only: bool,
) {
    for &from in &board.piece_list[color as usize][piece as usize] {
        for &dir in dirs {
            let mut cur = from;
            while let Some(to) = cur.try_step(dir) {
                match board.piece_at(to) {
                    None => {
                        if !captures_only {
                            push_quiet_or_capture(board, from, to, piece, moves);
                        }
                        cur = to;
                    }
                    Some((c, _)) => {
                        if c != color {
                            push_quiet_or_capture(board, from, to, piece, moves);
                        }
                        break;
                    }
                }
            }
        }
    }
}

fn generate_king_moves(board: &Board, color: Color, moves: &mut MoveList, captures_only: bool) {
    let from = board.king_square(color);
    for &off in &KING_DIRS {
        if let Some(to) = from.try_step(off) {
            match board.piece_at(to) {
                Some((c, _)) if c == color => continue,
                Some(_) => push_quiet_or_capture(board, from, to, Piece::King, moves),
                None if !captures_only => {
                    push_quiet_or_capture(board, from, to, Piece::King, moves)
                }
                None => {}
            }
        }
    }

    if captures_only {
        return;
    }

    let (kingside_right, queenside_right, rank) = match color {
        Color::White => (board.has_kingside_castle(color), board.has_queenside_castle(color), 0u8),
        Color::Black => (board.has_kingside_castle(color), board.has_queenside_castle(color), 7u8),
    };

    if kingside_right
        && board.piece_at(Square::from_file_rank(5, rank)).is_none()
        && board.piece_at(Square::from_file_rank(6, rank)).is_none()
    {
        moves.push(Move::encode(
            from,
            Square::from_file_rank(6, rank),
            Piece::King,
            None,
            None,
            false,
            true,
            false,
            false,
        ));
    }
    if queenside_right
        && board.piece_at(Square::from_file_rank(1, rank)).is_none()
        && board.piece_at(Square::from_file_rank(2, rank)).is_none()
        && board.piece_at(Square::from_file_rank(3, rank)).is_none()
    {
        moves.push(Move::encode(
            from,
            Square::from_file_rank(2, rank),
            Piece::King,
            None,
            None,
            false,
            true,
            false,
            false,
        ));
    }
}

fn push_pawn_move(
    from: Square,
    to: Square,
    captured: Option<Piece>,
    promotion: Option<Piece>,
    is_capture: bool,
    is_en_passant: bool,
    is_double_push: bool,
    moves: &mut MoveList,
) {
    moves.push(Move::encode(
        from,
        to,
        Piece::Pawn,
        captured,
        promotion,
        is_capture,
        false,
        is_en_passant,
        is_double_push,
    ));
}

fn generate_pawn_moves(board: &Board, color: Color, moves: &mut MoveList, captures_only: bool) {
    let (push_dir, start_rank, promo_rank, capture_dirs) = match color {
        Color::White => (crate::square::OFFSET_N, 1u8, 7u8, [
            crate::square::OFFSET_NE,
            crate::square::OFFSET_NW,
        ]),
        Color::Black => (crate::square::OFFSET_S, 6u8, 0u8, [
            crate::square::OFFSET_SE,
            crate::square::OFFSET_SW,
        ]),
    };

    for &from in &board.piece_list[color as usize][Piece::Pawn as usize] {
        if !captures_only {
            if let Some(one) = from.try_step(push_dir) {
                if board.piece_at(one).is_none() {
                    if one.rank() == promo_rank {
                        for &promo in &PROMOS {
                            push_pawn_move(from, one, None, Some(promo), false, false, false, moves);
                        }
                    } else {
                        push_pawn_move(from, one, None, None, false, false, false, moves);
                        if from.rank() == start_rank {
                            if let Some(two) = one.try_step(push_dir) {
                                if board.piece_at(two).is_none() {
                                    push_pawn_move(from, two, None, None, false, false, true, moves);
                                }
                            }
                        }
                    }
                }
            }
        }

        for &dir in &capture_dirs {
            let Some(to) = from.try_step(dir) else { continue };
            if Some(to) == board.en_passant_target() {
                push_pawn_move(from, to, Some(Piece::Pawn), None, true, true, false, moves);
                continue;
            }
            match board.piece_at(to) {
                Some((c, captured)) if c != color => {
                    if to.rank() == promo_rank {
                        for &promo in &PROMOS {
                            push_pawn_move(
                                from,
                                to,
                                Some(captured),
                                Some(promo),
                                true,
                                false,
                                false,
                                moves,
                            );
                        }
                    } else {
                        push_pawn_move(from, to, Some(captured), None, true, false, false, moves);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Every pseudo-legal move for the side to move: castling rights/path-clear
/// checked here, but whether the king actually passes through an attacked
/// square is left to `square_control::is_legal_castling`.
pub fn generate_pseudo_legal(board: &Board, moves: &mut MoveList) {
    moves.clear();
    let color = board.side_to_move;
    generate_pawn_moves(board, color, moves, false);
    generate_knight_moves(board, color, moves, false);
    generate_sliding_moves(board, color, Piece::Bishop, &BISHOP_DIRS, moves, false);
    generate_sliding_moves(board, color, Piece::Rook, &ROOK_DIRS, moves, false);
    generate_sliding_moves(board, color, Piece::Queen, &crate::square::QUEEN_DIRS, moves, false);
    generate_king_moves(board, color, moves, false);
}

/// Captures and promotions only, for quiescence search.
pub fn generate_pseudo_legal_captures(board: &Board, moves: &mut MoveList) {
    moves.clear();
    let color = board.side_to_move;
    generate_pawn_moves(board, color, moves, true);
    generate_knight_moves(board, color, moves, true);
    generate_sliding_moves(board, color, Piece::Bishop, &BISHOP_DIRS, moves, true);
    generate_sliding_moves(board, color, Piece::Rook, &ROOK_DIRS, moves, true);
    generate_sliding_moves(board, color, Piece::Queen, &crate::square::QUEEN_DIRS, moves, true);
    generate_king_moves(board, color, moves, true);
}
