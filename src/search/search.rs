//! Iterative-deepening negamax alpha-beta with quiescence, per
//! SPEC_FULL.md §4.7. Deliberately does not carry a transposition table,
//! killer moves, history heuristic, SEE, futility/late-move pruning,
//! reductions, aspiration windows, or check extensions — none of those
//! appear in the algorithm `original_source/src/search.hpp`'s
//! `SimpleEngine` implements, and layering them on would replace "the
//! spec's alpha-beta" with "the teacher's alpha-beta" (see DESIGN.md).

use crate::board::Board;
use crate::moves::execute::{generate_legal, generate_legal_captures, make_move_basic, undo_move_basic};
use crate::moves::movegen::MoveList;
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use crate::search::eval::static_eval;
use crate::search::ordering::order_moves;
use std::time::{Duration, Instant};

pub const MATE_SCORE: i32 = 32000;
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;
pub const DRAW_SCORE: i32 = 0;
pub const MAX_PLY: usize = 100;
const NODE_CHECK_MASK: u64 = 1023;

/// Search stopping conditions. The sole external configuration surface for
/// the engine shell (SPEC_FULL.md §4.8).
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_depth: Option<i32>,
    pub max_time: Option<Duration>,
    pub max_nodes: Option<u64>,
    pub infinite: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_depth: None,
            max_time: None,
            max_nodes: None,
            infinite: false,
        }
    }
}

/// Polls elapsed wall-clock time at intervals; cheap enough to check every
/// `NODE_CHECK_MASK + 1` nodes without measurably slowing the search.
pub struct TimeManager {
    pub start_time: Instant,
    pub allotted: Option<Duration>,
    pub stop_signal: bool,
}

impl TimeManager {
    pub fn new(limit: Option<Duration>) -> Self {
        TimeManager {
            start_time: Instant::now(),
            allotted: limit,
            stop_signal: false,
        }
    }

    #[inline(always)]
    pub fn check_time(&mut self) {
        if self.stop_signal {
            return;
        }
        if let Some(limit) = self.allotted {
            if self.start_time.elapsed() >= limit {
                self.stop_signal = true;
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// A fixed-capacity principal-variation buffer, threaded through
/// `alpha_beta`'s recursion and rebuilt from the leaf upward.
#[derive(Clone, Copy)]
pub struct PVLine {
    pub moves: [Option<Move>; MAX_PLY],
    pub len: usize,
}

impl PVLine {
    pub fn new() -> Self {
        PVLine {
            moves: [None; MAX_PLY],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Prepends `mv` followed by `child`'s moves, truncated to capacity.
    pub fn add_move(&mut self, mv: Move, child: &PVLine) {
        self.moves[0] = Some(mv);
        let take = child.len.min(MAX_PLY - 1);
        self.moves[1..=take].copy_from_slice(&child.moves[..take]);
        self.len = take + 1;
    }

    pub fn as_slice(&self) -> &[Option<Move>] {
        &self.moves[..self.len]
    }
}

impl Default for PVLine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes_searched: u64,
    pub time_ms: u64,
    pub max_depth_reached: i32,
    pub score: i32,
}

pub fn quiescence(
    board: &mut Board,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    nodes: &mut u64,
    time: &mut TimeManager,
) -> i32 {
    if ply >= MAX_PLY {
        return static_eval(board);
    }

    let stand_pat = static_eval(board);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut captures = MoveList::new();
    let mut scratch = MoveList::new();
    generate_legal_captures(board, &mut captures, &mut scratch);
    order_moves(&mut captures, board);

    for mv in captures {
        *nodes += 1;
        if *nodes & NODE_CHECK_MASK == 0 {
            time.check_time();
        }
        if time.stop_signal {
            return alpha;
        }

        let undo = make_move_basic(board, mv);
        let score = -quiescence(board, ply + 1, -beta, -alpha, nodes, time);
        undo_move_basic(board, undo);

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

#[allow(clippy::too_many_arguments)]
pub fn alpha_beta(
    board: &mut Board,
    depth: i32,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    nodes: &mut u64,
    time: &mut TimeManager,
    pv_out: &mut PVLine,
) -> i32 {
    pv_out.clear();

    if *nodes & NODE_CHECK_MASK == 0 {
        time.check_time();
    }
    if time.stop_signal {
        return 0;
    }
    *nodes += 1;

    if ply > 0
        && (board.is_threefold()
            || board.halfmove_clock >= 100
            || crate::status::is_insufficient_material(board))
    {
        return DRAW_SCORE;
    }

    let in_check_now = in_check(board, board.side_to_move);
    if depth <= 0 && !in_check_now {
        return quiescence(board, ply, alpha, beta, nodes, time);
    }

    let mut legal = MoveList::new();
    let mut scratch = MoveList::new();
    generate_legal(board, &mut legal, &mut scratch);

    if legal.is_empty() {
        return if in_check_now {
            -MATE_SCORE + ply as i32
        } else {
            DRAW_SCORE
        };
    }

    order_moves(&mut legal, board);

    let mut best_score = -MATE_SCORE - 1;
    let mut child_pv = PVLine::new();

    for mv in legal {
        let undo = make_move_basic(board, mv);
        let score = -alpha_beta(board, depth - 1, ply + 1, -beta, -alpha, nodes, time, &mut child_pv);
        undo_move_basic(board, undo);

        if time.stop_signal {
            return 0;
        }

        if score > best_score {
            best_score = score;
            pv_out.add_move(mv, &child_pv);
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    best_score
}

/// Iterative deepening driver: repeatedly calls `alpha_beta` at increasing
/// depths until a `SearchLimits` bound is hit, keeping the last completed
/// iteration's PV and best move.
pub fn search(board: &mut Board, limits: SearchLimits) -> (Option<Move>, SearchStats) {
    let mut time = TimeManager::new(limits.max_time);
    let mut nodes = 0u64;
    let mut best_move = None;
    let mut max_depth_reached = 0;
    let mut best_score = 0;

    let target_depth = limits.max_depth.unwrap_or(if limits.infinite { MAX_PLY as i32 } else { 6 });

    for depth in 1..=target_depth {
        let mut pv = PVLine::new();
        let score = alpha_beta(board, depth, 0, -MATE_SCORE - 1, MATE_SCORE + 1, &mut nodes, &mut time, &mut pv);

        if time.stop_signal {
            break;
        }

        if let Some(mv) = pv.as_slice().first().copied().flatten() {
            best_move = Some(mv);
        }
        best_score = score;
        max_depth_reached = depth;

        if let Some(max_nodes) = limits.max_nodes {
            if nodes >= max_nodes {
                break;
            }
        }
    }

    let stats = SearchStats {
        nodes_searched: nodes,
        time_ms: time.elapsed().as_millis() as u64,
        max_depth_reached,
        score: best_score,
    };

    if best_move.is_none() {
        let mut legal = MoveList::new();
        let mut scratch = MoveList::new();
        generate_legal(board, &mut legal, &mut scratch);
        best_move = legal.first().copied();
    }

    (best_move, stats)
}
