//! Game-tree search.
//!
//! Iterative-deepening negamax alpha-beta with aspiration windows,
//! null-move pruning, late move reductions, futility/razoring, check
//! extension, a quiescence search at the horizon, and a transposition
//! table. All per-search mutable state lives in an explicit context
//! threaded through the recursion; there are no globals.

mod alphabeta;
mod constants;
mod ordering;
mod quiescence;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::tt::TranspositionTable;

use super::types::MAX_PLY;
use super::{Move, Piece};

pub use alphabeta::find_best_move;

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found, if any legal move exists
    pub best_move: Option<Move>,
    /// Score of the best move, side-to-move relative
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u32,
    /// Principal variation reconstructed from the transposition table
    pub pv: Vec<Move>,
}

/// Information about one completed iteration, for `info` output.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub hashfull: u32,
    pub pv: String,
}

/// Callback invoked after each completed iteration.
pub type InfoCallback<'a> = &'a dyn Fn(&SearchIterationInfo);

/// Tunable search parameters.
///
/// The margins behind `pruning_enabled` are speed heuristics; disabling
/// them must not change the best move at a fixed depth.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Master switch for null move, LMR, futility and razoring
    pub pruning_enabled: bool,
    /// Use aspiration windows around the previous iteration's score
    pub aspiration_enabled: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            pruning_enabled: true,
            aspiration_enabled: true,
        }
    }
}

/// Killer moves: the two most recent quiet beta-cutoff movers per ply.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[Move::NONE; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NONE, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NONE, |row| row[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[Move::NONE; 2]; MAX_PLY];
    }
}

/// History heuristic keyed by (piece, target square).
///
/// Cutoffs earn `depth * depth` credit; every tried quiet move bumps a
/// butterfly occurrence count that normalizes the credit, so moves that
/// are merely tried often do not drown out moves that actually refute.
pub struct HistoryTable {
    credit: [[i32; 64]; 6],
    tried: [[i32; 64]; 6],
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            credit: [[0; 64]; 6],
            tried: [[0; 64]; 6],
        }
    }

    #[must_use]
    pub fn score(&self, piece: Piece, to: usize) -> i32 {
        let credit = self.credit[piece.index()][to];
        let tried = self.tried[piece.index()][to];
        // Butterfly normalization: credit per occurrence. Capped so a
        // hot quiet move never outranks the killer/capture tiers.
        (((i64::from(credit) << 6) / i64::from(tried + 1)) as i32).min(100_000)
    }

    /// Credit a quiet move that caused a beta cutoff.
    pub fn update_cutoff(&mut self, piece: Piece, to: usize, depth: u32) {
        let bonus = (depth * depth) as i32;
        let entry = &mut self.credit[piece.index()][to];
        *entry = entry.saturating_add(bonus).min(1 << 20);
    }

    /// Count an attempted quiet move toward the butterfly denominator.
    pub fn update_tried(&mut self, piece: Piece, to: usize, depth: u32) {
        let entry = &mut self.tried[piece.index()][to];
        *entry = entry.saturating_add(depth as i32).min(1 << 20);
    }

    /// Halve everything between searches so stale bias fades.
    pub fn decay(&mut self) {
        for row in self.credit.iter_mut().chain(self.tried.iter_mut()) {
            for entry in row.iter_mut() {
                *entry >>= 1;
            }
        }
    }

    pub fn reset(&mut self) {
        self.credit = [[0; 64]; 6];
        self.tried = [[0; 64]; 6];
    }
}

/// Counter moves: the quiet reply that last refuted a move from
/// square A to square B.
pub struct CounterMoveTable {
    entries: Box<[[Move; 64]; 64]>,
}

impl Default for CounterMoveTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterMoveTable {
    #[must_use]
    pub fn new() -> Self {
        CounterMoveTable {
            entries: Box::new([[Move::NONE; 64]; 64]),
        }
    }

    #[must_use]
    pub fn get(&self, prev: Move) -> Move {
        if prev.is_none() {
            Move::NONE
        } else {
            self.entries[prev.from().as_index()][prev.to().as_index()]
        }
    }

    pub fn set(&mut self, prev: Move, counter: Move) {
        if !prev.is_none() {
            self.entries[prev.from().as_index()][prev.to().as_index()] = counter;
        }
    }

    pub fn reset(&mut self) {
        *self.entries = [[Move::NONE; 64]; 64];
    }
}

/// Search state that persists across `find_best_move` calls: the
/// transposition table and the move-ordering heuristics.
pub struct SearchState {
    pub tt: TranspositionTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub counter_moves: CounterMoveTable,
    pub params: SearchParams,
    /// Nodes visited by the last search (main + quiescence)
    pub nodes: u64,
    /// Deepest ply reached by the last search
    pub seldepth: u32,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            counter_moves: CounterMoveTable::new(),
            params: SearchParams::default(),
            nodes: 0,
            seldepth: 0,
        }
    }

    /// Prepare for a new top-level search: age the transposition table
    /// and fade the ordering heuristics.
    pub fn new_search(&mut self) {
        self.tt.new_search();
        self.history.decay();
        self.killers.reset();
        self.counter_moves.reset();
        self.nodes = 0;
        self.seldepth = 0;
    }

    /// Drop all cached knowledge (for `ucinewgame` and deterministic tests).
    pub fn reset(&mut self) {
        self.tt.clear();
        self.history.reset();
        self.killers.reset();
        self.counter_moves.reset();
        self.nodes = 0;
        self.seldepth = 0;
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(crate::tt::DEFAULT_TT_MB)
    }
}

/// Limits for one search.
pub struct SearchLimits {
    /// Maximum iterative-deepening depth
    pub max_depth: u32,
    /// Hard wall-clock deadline; the deepest completed iteration wins
    pub deadline: Option<Instant>,
    /// Node budget (0 = unlimited)
    pub node_limit: u64,
    /// Cooperative stop flag, polled at the time-check interval
    pub stop: Arc<AtomicBool>,
    /// Zobrist keys of the game line leading to (and including) the
    /// position being searched, for repetition detection across the
    /// game/search boundary
    pub game_history: Vec<u64>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_depth: 64,
            deadline: None,
            node_limit: 0,
            stop: Arc::new(AtomicBool::new(false)),
            game_history: Vec::new(),
        }
    }
}

impl SearchLimits {
    /// Depth-limited search.
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchLimits {
            max_depth,
            ..Default::default()
        }
    }

    /// Time-limited search.
    #[must_use]
    pub fn movetime(budget_ms: u64) -> Self {
        SearchLimits {
            deadline: Some(Instant::now() + std::time::Duration::from_millis(budget_ms)),
            ..Default::default()
        }
    }

    /// Attach the game line for repetition detection.
    #[must_use]
    pub fn with_history(mut self, history: Vec<u64>) -> Self {
        self.game_history = history;
        self
    }
}

/// Deadlines for an in-flight search, shared with the command layer.
pub struct SearchClock {
    start_time: Mutex<Instant>,
    deadline: Mutex<Option<Instant>>,
}

impl SearchClock {
    #[must_use]
    pub fn new(start_time: Instant, deadline: Option<Instant>) -> Self {
        SearchClock {
            start_time: Mutex::new(start_time),
            deadline: Mutex::new(deadline),
        }
    }

    pub fn reset(&self, start_time: Instant, deadline: Option<Instant>) {
        *self.start_time.lock() = start_time;
        *self.deadline.lock() = deadline;
    }

    #[must_use]
    pub fn snapshot(&self) -> (Instant, Option<Instant>) {
        (*self.start_time.lock(), *self.deadline.lock())
    }
}
