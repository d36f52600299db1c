//! Square identifiers: a compact 0..=63 index for bitboards and piece-square
//! lookups, dual-mapped to a mailbox-120 grid so piece-motion loops can walk
//! off a ray without bounds-checking every step.
//!
//! The mailbox-120 board is a 10x12 grid (two sentinel files, two sentinel
//! ranks) with the 64 real squares occupying the interior. Directional
//! offsets (file/rank steps) land on an off-board sentinel the moment a walk
//! runs off the playable board, so move generation never needs a separate
//! bounds check.

use std::fmt;

/// Maps a mailbox-120 index to its 0..=63 square index, or -1 if the mailbox
/// slot is off-board.
#[rustfmt::skip]
const MAILBOX_120: [i8; 120] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1,  0,  1,  2,  3,  4,  5,  6,  7, -1,
    -1,  8,  9, 10, 11, 12, 13, 14, 15, -1,
    -1, 16, 17, 18, 19, 20, 21, 22, 23, -1,
    -1, 24, 25, 26, 27, 28, 29, 30, 31, -1,
    -1, 32, 33, 34, 35, 36, 37, 38, 39, -1,
    -1, 40, 41, 42, 43, 44, 45, 46, 47, -1,
    -1, 48, 49, 50, 51, 52, 53, 54, 55, -1,
    -1, 56, 57, 58, 59, 60, 61, 62, 63, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];

/// Maps a 0..=63 square index to its mailbox-120 slot.
#[rustfmt::skip]
const MAILBOX_64: [u8; 64] = [
    21, 22, 23, 24, 25, 26, 27, 28,
    31, 32, 33, 34, 35, 36, 37, 38,
    41, 42, 43, 44, 45, 46, 47, 48,
    51, 52, 53, 54, 55, 56, 57, 58,
    61, 62, 63, 64, 65, 66, 67, 68,
    71, 72, 73, 74, 75, 76, 77, 78,
    81, 82, 83, 84, 85, 86, 87, 88,
    91, 92, 93, 94, 95, 96, 97, 98,
];

pub const OFFSET_N: i32 = 10;
pub const OFFSET_S: i32 = -10;
pub const OFFSET_E: i32 = 1;
pub const OFFSET_W: i32 = -1;
pub const OFFSET_NE: i32 = 11;
pub const OFFSET_NW: i32 = 9;
pub const OFFSET_SE: i32 = -9;
pub const OFFSET_SW: i32 = -11;

pub const ROOK_DIRS: [i32; 4] = [OFFSET_N, OFFSET_S, OFFSET_E, OFFSET_W];
pub const BISHOP_DIRS: [i32; 4] = [OFFSET_NE, OFFSET_NW, OFFSET_SE, OFFSET_SW];
pub const QUEEN_DIRS: [i32; 8] = [
    OFFSET_N, OFFSET_S, OFFSET_E, OFFSET_W, OFFSET_NE, OFFSET_NW, OFFSET_SE, OFFSET_SW,
];
pub const KING_DIRS: [i32; 8] = QUEEN_DIRS;
pub const KNIGHT_OFFSETS: [i32; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];

/// A playable square, stored as an index-64 value (a1 = 0, h1 = 7, a8 = 56, h8 = 63).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    #[inline(always)]
    pub fn from_index(index: u8) -> Self {
        debug_assert!(index < 64, "square index out of range: {index}");
        Square(index)
    }

    #[inline(always)]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline(always)]
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline(always)]
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    /// This square's slot in the mailbox-120 grid.
    #[inline(always)]
    pub fn to_mailbox(self) -> i32 {
        MAILBOX_64[self.0 as usize] as i32
    }

    /// The square at a mailbox-120 slot, or `None` if the slot is off-board.
    #[inline(always)]
    pub fn from_mailbox(slot: i32) -> Option<Self> {
        if !(0..120).contains(&slot) {
            return None;
        }
        let idx = MAILBOX_120[slot as usize];
        if idx < 0 {
            None
        } else {
            Some(Square(idx as u8))
        }
    }

    /// Steps `offset` mailbox slots away, returning `None` if that lands
    /// off-board. This is the primitive every ray-walking generator and
    /// attack query uses instead of a manual bounds check.
    #[inline(always)]
    pub fn try_step(self, offset: i32) -> Option<Self> {
        Self::from_mailbox(self.to_mailbox() + offset)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{file}{rank}")
    }
}
