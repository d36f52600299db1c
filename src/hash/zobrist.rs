//! Zobrist key tables and incremental-update helpers.
//!
//! Unlike the upstream engine this crate was grown from, initialization is
//! *always* deterministic: a fixed seed, not gated behind a Cargo feature.
//! The search and transposition-adjacent tests rely on identical positions
//! producing identical keys across runs and across machines.

use crate::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::square::Square;
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Fixed seed for reproducible keys, matching the original engine's
/// always-deterministic `init_zobrist`.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct ZobristKeys {
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// Indexed [White-kingside, White-queenside, Black-kingside, Black-queenside].
    pub castling: [u64; 4],
    pub ep_file: [u64; 8],
}

fn non_zero(rng: &mut StdRng) -> u64 {
    loop {
        let v = rng.next_u64();
        if v != 0 {
            return v;
        }
    }
}

fn make_zobrist_rng() -> StdRng {
    StdRng::seed_from_u64(ZOBRIST_SEED)
}

fn generate_zobrist_keys_with_rng(rng: &mut StdRng) -> ZobristKeys {
    let mut piece = [[[0u64; 64]; 6]; 2];
    for color_table in piece.iter_mut() {
        for piece_table in color_table.iter_mut() {
            for key in piece_table.iter_mut() {
                *key = non_zero(rng);
            }
        }
    }
    let side_to_move = non_zero(rng);
    let mut castling = [0u64; 4];
    for key in castling.iter_mut() {
        *key = non_zero(rng);
    }
    let mut ep_file = [0u64; 8];
    for key in ep_file.iter_mut() {
        *key = non_zero(rng);
    }
    ZobristKeys {
        piece,
        side_to_move,
        castling,
        ep_file,
    }
}

static ZOBRIST_KEYS: OnceCell<ZobristKeys> = OnceCell::new();

/// The process-wide Zobrist key table, lazily built on first use and
/// immutable thereafter. Safe to call from any number of concurrent engine
/// instances.
pub fn zobrist_keys() -> &'static ZobristKeys {
    ZOBRIST_KEYS.get_or_init(|| generate_zobrist_keys_with_rng(&mut make_zobrist_rng()))
}

/// XORs out `old` castling rights and XORs in `new`, bit by bit.
pub fn xor_castling_rights_delta(zobrist: &mut u64, old: u8, new: u8) {
    let keys = zobrist_keys();
    let delta = old ^ new;
    if delta & CASTLE_WK != 0 {
        *zobrist ^= keys.castling[0];
    }
    if delta & CASTLE_WQ != 0 {
        *zobrist ^= keys.castling[1];
    }
    if delta & CASTLE_BK != 0 {
        *zobrist ^= keys.castling[2];
    }
    if delta & CASTLE_BQ != 0 {
        *zobrist ^= keys.castling[3];
    }
}

/// The ep-file key for a given ep-square, XORed in unconditionally whenever
/// `ep_square` is set — no check for whether a capturing pawn exists. The
/// original engine's `Zobrist::compute()` does the same; a position's hash
/// must not depend on whether the ep capture happens to be available.
pub fn ep_file_key(ep_square: Option<Square>) -> Option<u64> {
    ep_square.map(|sq| zobrist_keys().ep_file[sq.file() as usize])
}
