//! The alpha-beta driver: iterative deepening, aspiration windows, and
//! the recursive negamax node.

use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::tt::{Bound, MATE_SCORE, MATE_THRESHOLD};

use super::constants::{
    ASPIRATION_WINDOW, FUTILITY_MARGINS, INFINITY, LMR_MIN_DEPTH, LMR_MIN_MOVE,
    LMR_TABLE_MAX_DEPTH, LMR_TABLE_MAX_IDX, NULL_MOVE_BASE_REDUCTION, NULL_MOVE_MIN_DEPTH,
    RAZOR_MARGIN, TIME_CHECK_INTERVAL,
};
use super::{SearchIterationInfo, SearchLimits, SearchResult, SearchState};
use crate::board::types::MAX_PLY;
use crate::board::{Board, Move};

/// Sentinel returned up the stack once the search is aborted. Callers
/// must consult the `stopped` flag before using any child score, so the
/// sentinel value itself is never negated or compared.
pub(super) const ABORTED: i32 = i32::MIN + 1;

/// All mutable state of one search, threaded through the recursion.
pub(super) struct SearchContext<'a> {
    pub(super) board: &'a mut Board,
    pub(super) state: &'a mut SearchState,
    limits: &'a SearchLimits,
    start_time: Instant,
    pub(super) nodes: u64,
    pub(super) seldepth: u32,
    pub(super) stopped: bool,
    /// Zobrist keys of the line from the game root through the current
    /// node; pushed on make, truncated on unmake
    repetition: Vec<u64>,
    /// Pre-allocated per-ply board snapshots; unmake = restore
    pub(super) snapshots: Box<[Board; MAX_PLY]>,
    /// Move made at each ply, for the counter-move heuristic
    previous_move: [Move; MAX_PLY],
}

impl<'a> SearchContext<'a> {
    fn new(board: &'a mut Board, state: &'a mut SearchState, limits: &'a SearchLimits) -> Self {
        let mut repetition = limits.game_history.clone();
        if repetition.last() != Some(&board.hash()) {
            repetition.push(board.hash());
        }
        let snapshot = *board;
        SearchContext {
            board,
            state,
            limits,
            start_time: Instant::now(),
            nodes: 0,
            seldepth: 0,
            stopped: false,
            repetition,
            snapshots: Box::new([snapshot; MAX_PLY]),
            previous_move: [Move::NONE; MAX_PLY],
        }
    }

    /// Wall-clock, node-budget and stop-flag check, sampled at an
    /// interval so the overhead stays negligible.
    pub(super) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.limits.node_limit > 0 && self.nodes >= self.limits.node_limit {
            self.stopped = true;
            return true;
        }
        if self.nodes & (TIME_CHECK_INTERVAL - 1) == 0 {
            if self.limits.stop.load(Ordering::Relaxed) {
                self.stopped = true;
            } else if let Some(deadline) = self.limits.deadline {
                if Instant::now() >= deadline {
                    self.stopped = true;
                }
            }
        }
        self.stopped
    }

    /// Does the current position repeat an earlier one in this line?
    /// Only positions since the last irreversible move can repeat.
    pub(super) fn is_repetition(&self) -> bool {
        let key = self.board.hash();
        let reversible = self.board.halfmove_clock() as usize;
        let earlier = &self.repetition[..self.repetition.len().saturating_sub(1)];
        earlier.iter().rev().take(reversible).any(|&k| k == key)
    }

    /// Precomputed late-move reduction table.
    fn lmr_table() -> &'static [[u32; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH] {
        use std::sync::OnceLock;
        static TABLE: OnceLock<[[u32; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH]> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut t = [[0u32; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH];
            for (depth, row) in t.iter_mut().enumerate().skip(1) {
                for (idx, cell) in row.iter_mut().enumerate().skip(1) {
                    let val = (0.5 + (depth as f64).ln() * (idx as f64).ln() / 2.5).floor();
                    *cell = val.max(0.0) as u32;
                }
            }
            t
        })
    }

    fn lmr_reduction(depth: u32, move_idx: usize) -> u32 {
        let table = Self::lmr_table();
        let d = (depth as usize).min(LMR_TABLE_MAX_DEPTH - 1);
        let i = move_idx.min(LMR_TABLE_MAX_IDX - 1);
        table[d][i]
    }

    /// The recursive negamax node. Scores are from the mover's
    /// perspective and negated across the recursion boundary.
    #[allow(clippy::too_many_lines)]
    pub(super) fn alphabeta(
        &mut self,
        mut depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
        allow_null: bool,
    ) -> i32 {
        let is_root = ply == 0;
        let is_pv = beta > alpha + 1;

        self.nodes += 1;
        if ply as u32 + 1 > self.seldepth {
            self.seldepth = ply as u32 + 1;
        }

        if self.should_stop() {
            return ABORTED;
        }

        if ply >= MAX_PLY - 1 {
            return self.board.evaluate(alpha, beta);
        }

        // Draws inside the line: repetition and the fifty-move rule.
        // Rule-50 yields to checkmate delivered on the hundredth halfmove.
        if !is_root {
            if self.is_repetition() || self.board.is_insufficient_material() {
                return 0;
            }
            if self.board.is_fifty_move_draw()
                && !(self.board.is_in_check(self.board.side_to_move())
                    && self.board.generate_moves().is_empty())
            {
                return 0;
            }
        }

        // Mate distance pruning: even a forced mate from here cannot
        // beat a shorter one already found
        if !is_root {
            alpha = alpha.max(-MATE_SCORE + ply as i32);
            beta = beta.min(MATE_SCORE - ply as i32 - 1);
            if alpha >= beta {
                return alpha;
            }
        }

        let us = self.board.side_to_move();
        let in_check = !self.board.checkers(us).is_empty();

        // Check extension: don't let the horizon cut a forcing sequence
        if in_check {
            depth += 1;
        }

        let hash = self.board.hash();

        // Horizon: resolve tactics in quiescence and cache the verdict
        if depth == 0 {
            let score = self.quiesce(alpha, beta, ply, 0);
            if !self.stopped {
                let bound = if score <= alpha {
                    Bound::Upper
                } else if score >= beta {
                    Bound::Lower
                } else {
                    Bound::Exact
                };
                self.state.tt.store(hash, 0, score, bound, Move::NONE, ply);
            }
            return score;
        }

        // Transposition table: cut non-PV nodes on a usable hit, keep
        // the hash move for ordering either way
        if !is_root && !is_pv {
            if let Some(score) = self.state.tt.probe(hash, depth, alpha, beta, ply) {
                return score;
            }
        }
        let tt_move = self.state.tt.probe_move(hash).unwrap_or(Move::NONE);

        let pruning = self.state.params.pruning_enabled && !is_pv && !in_check;

        // Static eval drives the forward-pruning margins
        let eval = if in_check {
            -INFINITY
        } else {
            self.board.evaluate(alpha, beta)
        };

        // Razoring: hopeless shallow nodes drop straight to quiescence
        if pruning && depth <= 2 && alpha.abs() < MATE_THRESHOLD && eval + RAZOR_MARGIN * depth as i32 <= alpha
        {
            return self.quiesce(alpha, beta, ply, 0);
        }

        // Null move: if passing still beats beta, a real move will too.
        // Skipped in pawn endgames where zugzwang breaks the logic.
        if pruning
            && allow_null
            && depth >= NULL_MOVE_MIN_DEPTH
            && eval >= beta
            && self.board.has_non_pawn_material(us)
        {
            let reduction = NULL_MOVE_BASE_REDUCTION + depth / 4;
            self.snapshots[ply] = *self.board;
            self.board.make_null_move();
            self.repetition.push(self.board.hash());

            let score = -self.alphabeta(
                depth.saturating_sub(reduction + 1),
                -beta,
                -beta + 1,
                ply + 1,
                false,
            );

            self.repetition.pop();
            *self.board = self.snapshots[ply];

            if self.stopped {
                return ABORTED;
            }
            if score >= beta {
                // Never return unproven mate scores from a null search
                return beta.min(MATE_THRESHOLD - 1);
            }
        }

        let moves = self.board.generate_moves();
        if moves.is_empty() {
            return if in_check {
                -MATE_SCORE + ply as i32 // Checkmate, preferring shorter mates
            } else {
                0 // Stalemate
            };
        }

        let futility_prune = pruning
            && depth <= 3
            && alpha.abs() < MATE_THRESHOLD
            && eval + FUTILITY_MARGINS[depth as usize] <= alpha;

        let prev_move = if ply > 0 {
            self.previous_move[ply - 1]
        } else {
            Move::NONE
        };
        let mut scored = self.order_moves(&moves, tt_move, ply, prev_move, depth);

        let mut best_move = Move::NONE;
        let mut raised_alpha = false;
        let mut move_idx = 0;

        while let Some(pick) = scored.pick_best(move_idx) {
            let mv = pick.mv;
            let i = move_idx;
            move_idx += 1;

            let is_quiet = mv.is_quiet();

            // Futility: quiet late moves cannot lift a hopeless eval
            // above alpha; never applies to the first move
            if futility_prune && i > 0 && is_quiet {
                continue;
            }

            if is_quiet {
                self.state
                    .history
                    .update_tried(mv.piece(), mv.to().as_index(), depth);
            }

            self.snapshots[ply] = *self.board;
            self.board.make_move(mv);
            self.repetition.push(self.board.hash());
            self.previous_move[ply] = mv;

            let gives_check = !self
                .board
                .checkers(self.board.side_to_move())
                .is_empty();

            let mut score;
            if i == 0 {
                score = -self.alphabeta(depth - 1, -beta, -alpha, ply + 1, true);
            } else {
                // Late move reduction: quiet, unforcing, late in the
                // list - try a cheap null-window probe first
                let mut reduction = 0;
                if self.state.params.pruning_enabled
                    && depth >= LMR_MIN_DEPTH
                    && i >= LMR_MIN_MOVE
                    && is_quiet
                    && !in_check
                    && !gives_check
                {
                    reduction = Self::lmr_reduction(depth, i).min(depth - 1);
                }

                score = -self.alphabeta(
                    (depth - 1).saturating_sub(reduction),
                    -alpha - 1,
                    -alpha,
                    ply + 1,
                    true,
                );

                // Reduced probe looks promising: re-search at full depth
                if reduction > 0 && !self.stopped && score > alpha {
                    score = -self.alphabeta(depth - 1, -alpha - 1, -alpha, ply + 1, true);
                }

                // Null-window found an improvement inside a PV node:
                // re-search with the full window
                if is_pv && !self.stopped && score > alpha && score < beta {
                    score = -self.alphabeta(depth - 1, -beta, -alpha, ply + 1, true);
                }
            }

            self.repetition.pop();
            *self.board = self.snapshots[ply];

            if self.stopped {
                return ABORTED;
            }

            if score >= beta {
                // Fail high: credit the refutation and stop immediately
                if is_quiet {
                    self.state.killers.update(ply, mv);
                    self.state
                        .history
                        .update_cutoff(mv.piece(), mv.to().as_index(), depth);
                    self.state.counter_moves.set(prev_move, mv);
                }
                self.state.tt.store(hash, depth, beta, Bound::Lower, mv, ply);
                return beta;
            }

            if score > alpha {
                alpha = score;
                best_move = mv;
                raised_alpha = true;
            } else if best_move.is_none() {
                best_move = mv;
            }
        }

        let bound = if raised_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.state.tt.store(hash, depth, alpha, bound, best_move, ply);
        alpha
    }

    /// Rebuild the principal variation by replaying hash moves on a
    /// scratch copy of the board. Guards against collision cycles and
    /// verifies every move is legal before trusting it.
    fn extract_pv(&self, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        let mut seen = Vec::with_capacity(max_len);
        let mut board = *self.board;

        while pv.len() < max_len {
            let hash = board.hash();
            if seen.contains(&hash) {
                break;
            }
            seen.push(hash);

            let Some(mv) = self.state.tt.probe_move(hash) else {
                break;
            };
            if !board.is_legal_move(mv) {
                break;
            }
            pv.push(mv);
            board.make_move(mv);
        }

        pv
    }
}

/// Search `board` for the best move within `limits`.
///
/// Iterative deepening: each depth runs inside an aspiration window
/// centered on the previous score, re-searching the same depth at full
/// width on a window failure. A timeout always leaves the result of the
/// deepest fully completed iteration.
pub fn find_best_move(
    board: &mut Board,
    state: &mut SearchState,
    limits: &SearchLimits,
    on_iteration: Option<&dyn Fn(&SearchIterationInfo)>,
) -> SearchResult {
    state.new_search();

    let legal = board.generate_moves();
    if legal.is_empty() {
        return SearchResult {
            best_move: None,
            score: if board.is_in_check(board.side_to_move()) {
                -MATE_SCORE
            } else {
                0
            },
            depth: 0,
            pv: Vec::new(),
        };
    }

    let mut ctx = SearchContext::new(board, state, limits);
    let mut result = SearchResult {
        // Fall back to the first legal move if depth 1 never completes
        best_move: legal.first(),
        score: 0,
        depth: 0,
        pv: Vec::new(),
    };

    let mut score = 0i32;
    for depth in 1..=limits.max_depth {
        let aspiration = ctx.state.params.aspiration_enabled && depth >= 4;
        let (mut alpha, mut beta) = if aspiration {
            (score - ASPIRATION_WINDOW, score + ASPIRATION_WINDOW)
        } else {
            (-INFINITY, INFINITY)
        };

        let iteration_score = loop {
            let s = ctx.alphabeta(depth, alpha, beta, 0, true);
            if ctx.stopped {
                break None;
            }

            // Window failure: restore full-width bounds and retry the
            // same depth; full width cannot fail again
            if s <= alpha || s >= beta {
                alpha = -INFINITY;
                beta = INFINITY;
                continue;
            }
            break Some(s);
        };

        let Some(s) = iteration_score else {
            break; // Timed out mid-iteration; keep the last completed depth
        };
        score = s;

        // The root entry's hash move is the best move of this iteration
        let best = ctx
            .state
            .tt
            .probe_move(ctx.board.hash())
            .filter(|&mv| legal.contains(mv));
        if let Some(mv) = best {
            result.best_move = Some(mv);
        }
        result.score = score;
        result.depth = depth;
        result.pv = ctx.extract_pv(depth as usize);

        if let Some(callback) = on_iteration {
            let elapsed = ctx.start_time.elapsed();
            let time_ms = elapsed.as_millis() as u64;
            let nps = if time_ms > 0 {
                ctx.nodes * 1000 / time_ms
            } else {
                0
            };
            let mate_in = if score.abs() < MATE_THRESHOLD {
                None
            } else if score > 0 {
                Some((MATE_SCORE - score + 1) / 2)
            } else {
                Some(-((MATE_SCORE + score + 1) / 2))
            };
            let pv = result
                .pv
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            callback(&SearchIterationInfo {
                depth,
                seldepth: ctx.seldepth,
                score,
                mate_in,
                nodes: ctx.nodes,
                nps,
                time_ms,
                hashfull: ctx.state.tt.hashfull_per_mille(),
                pv,
            });
        }

        // A found mate cannot improve; stop early
        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    let (nodes, seldepth) = (ctx.nodes, ctx.seldepth);
    drop(ctx);
    state.nodes = nodes;
    state.seldepth = seldepth;
    result
}
