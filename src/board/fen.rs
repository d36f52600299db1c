//! FEN parsing and emission. A boundary operation per SPEC_FULL.md §6/§7:
//! on failure the board is left untouched and the caller gets a typed
//! `FenError`, never a panic or a partially-applied position.

use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR, pc_index};
use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color};
use crate::square::Square;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount(usize),
    BadPlacement(String),
    BadSideToMove(String),
    BadCastling(String),
    BadEnPassant(String),
    BadClock(String),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount(n) => write!(f, "expected 6 FEN fields, got {n}"),
            FenError::BadPlacement(s) => write!(f, "unparseable piece placement: {s}"),
            FenError::BadSideToMove(s) => write!(f, "side to move must be 'w' or 'b', got {s}"),
            FenError::BadCastling(s) => write!(f, "castling field must be subset of KQkq or '-': {s}"),
            FenError::BadEnPassant(s) => write!(f, "en-passant target must be '-' or a rank-3/6 square: {s}"),
            FenError::BadClock(s) => write!(f, "expected an integer clock field, got {s}"),
        }
    }
}

impl std::error::Error for FenError {}

impl Board {
    /// Parses a standard 6-field FEN into `self`. On failure, `self` is left
    /// unchanged.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount(fields.len()));
        }

        let mut board = Board::new_empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadPlacement(fields[0].to_string()));
        }
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_from_top as u8;
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as u8;
                } else {
                    if (ch as u32) >= 128 || file >= 8 {
                        return Err(FenError::BadPlacement(fields[0].to_string()));
                    }
                    let (piece, color) = CHAR_TO_PC[ch as usize]
                        .ok_or_else(|| FenError::BadPlacement(fields[0].to_string()))?;
                    board.place_piece(color, piece, Square::from_file_rank(file, rank));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadPlacement(fields[0].to_string()));
            }
        }

        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        let mut rights = 0u8;
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                rights |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(FenError::BadCastling(fields[2].to_string())),
                };
            }
        }
        board.castling_rights = rights;

        board.en_passant = if fields[3] == "-" {
            None
        } else {
            let bytes = fields[3].as_bytes();
            if bytes.len() != 2 {
                return Err(FenError::BadEnPassant(fields[3].to_string()));
            }
            let (file_byte, rank_byte) = (bytes[0], bytes[1]);
            if !(b'a'..=b'h').contains(&file_byte) || !(b'1'..=b'8').contains(&rank_byte) {
                return Err(FenError::BadEnPassant(fields[3].to_string()));
            }
            let file = file_byte - b'a';
            let rank = rank_byte - b'1';
            if rank != 2 && rank != 5 {
                return Err(FenError::BadEnPassant(fields[3].to_string()));
            }
            Some(Square::from_file_rank(file, rank))
        };

        board.halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::BadClock(fields[4].to_string()))?;
        board.fullmove_number = fields[5]
            .parse()
            .map_err(|_| FenError::BadClock(fields[5].to_string()))?;

        board.refresh_zobrist();
        board.history.clear();

        *self = board;
        Ok(())
    }

    /// Emits the canonical 6-field FEN: no extra whitespace, castling
    /// letters in `KQkq` order.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank_from_top in 0..8u8 {
            let rank = 7 - rank_from_top;
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                match self.piece_at(Square::from_file_rank(file, rank)) {
                    None => empty_run += 1,
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push(PC_TO_CHAR[pc_index(piece, color)]);
                    }
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank_from_top != 7 {
                placement.push('/');
            }
        }

        let side = if self.side_to_move == Color::White { "w" } else { "b" };

        let mut castling = String::new();
        if self.castling_rights & CASTLE_WK != 0 {
            castling.push('K');
        }
        if self.castling_rights & CASTLE_WQ != 0 {
            castling.push('Q');
        }
        if self.castling_rights & CASTLE_BK != 0 {
            castling.push('k');
        }
        if self.castling_rights & CASTLE_BQ != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.en_passant {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{placement} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }
}
