//! Search constants and tuned margins.
//!
//! The pruning margins and the reduction formula are empirically tuned
//! parameters, not correctness constraints; `SearchParams` can disable
//! the pruning layer entirely, which must never change the final best
//! move at a fixed depth.

// ============================================================================
// SEARCH LIMITS
// ============================================================================

/// Effectively infinite score bound (outside any real evaluation).
pub(crate) const INFINITY: i32 = 32_000;

/// Node-count interval between wall-clock checks. Power of two; the
/// check runs when `nodes & (interval - 1) == 0`.
pub(crate) const TIME_CHECK_INTERVAL: u64 = 2048;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores are searched earlier: TT move > good captures > killers
// > counter move > quiets by history > losing captures.

/// Hash move (from the transposition table) - always searched first
pub(crate) const TT_MOVE_SCORE: i32 = 1 << 20;

/// Base score for captures with a non-negative exchange
pub(crate) const GOOD_CAPTURE_SCORE: i32 = 200_000;

/// First killer move (quiet that caused a beta cutoff at the same ply)
pub(crate) const KILLER1_SCORE: i32 = 150_000;

/// Second killer move
pub(crate) const KILLER2_SCORE: i32 = 140_000;

/// Counter move (quiet that previously refuted the opponent's move)
pub(crate) const COUNTER_SCORE: i32 = 130_000;

/// Base score for captures that lose material; searched after quiets
pub(crate) const BAD_CAPTURE_SCORE: i32 = -200_000;

/// Depth at or above which captures are ordered by static exchange
/// evaluation instead of plain MVV-LVA.
pub(crate) const SEE_ORDERING_MIN_DEPTH: u32 = 4;

// ============================================================================
// PRUNING & REDUCTION PARAMETERS
// ============================================================================

/// Aspiration half-window around the previous iteration's score.
pub(crate) const ASPIRATION_WINDOW: i32 = 50;

/// Minimum depth for null-move pruning.
pub(crate) const NULL_MOVE_MIN_DEPTH: u32 = 3;

/// Null-move reduction: `2 + depth / 4`.
pub(crate) const NULL_MOVE_BASE_REDUCTION: u32 = 2;

/// Futility margins by remaining depth (index 0 unused).
pub(crate) const FUTILITY_MARGINS: [i32; 4] = [0, 150, 300, 500];

/// Razoring margin per remaining depth, applied at depth <= 2.
pub(crate) const RAZOR_MARGIN: i32 = 300;

/// Late move reductions start from this move index.
pub(crate) const LMR_MIN_MOVE: usize = 3;

/// Minimum depth for late move reductions.
pub(crate) const LMR_MIN_DEPTH: u32 = 3;

/// Reduction table dimensions (depth x move-index buckets).
pub(crate) const LMR_TABLE_MAX_DEPTH: usize = 32;
pub(crate) const LMR_TABLE_MAX_IDX: usize = 64;

/// Delta pruning margin for quiescence.
pub(crate) const DELTA_MARGIN: i32 = 200;

/// Quiescence recursion bound beyond the main-search horizon.
pub(crate) const MAX_QSEARCH_PLY: usize = 32;
