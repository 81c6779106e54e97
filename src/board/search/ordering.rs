//! Move ordering.
//!
//! Strong moves first keeps the alpha-beta tree narrow: hash move, then
//! winning captures (SEE at depth, MVV-LVA near the leaves), killers,
//! the counter move, quiets by normalized history, and losing captures
//! last. The scored list is consumed with `pick_best` selection, so only
//! the searched prefix is ever sorted.

use crate::board::types::{Move, MoveList, Piece, ScoredMoveList};
use crate::board::Board;

use super::alphabeta::SearchContext;
use super::constants::{
    BAD_CAPTURE_SCORE, COUNTER_SCORE, GOOD_CAPTURE_SCORE, KILLER1_SCORE, KILLER2_SCORE,
    SEE_ORDERING_MIN_DEPTH, TT_MOVE_SCORE,
};

/// Victim value for MVV-LVA; en passant always takes a pawn.
fn victim_value(board: &Board, mv: Move) -> i32 {
    if mv.is_en_passant() {
        Piece::Pawn.value()
    } else {
        board.piece_on(mv.to()).map_or(0, Piece::value)
    }
}

/// MVV-LVA: most valuable victim dominant, least valuable attacker as
/// the tie-break.
pub(super) fn mvv_lva(board: &Board, mv: Move) -> i32 {
    victim_value(board, mv) * 10 - mv.piece().value().min(2000)
}

impl SearchContext<'_> {
    /// Score every move in `moves` for this node.
    pub(super) fn order_moves(
        &self,
        moves: &MoveList,
        tt_move: Move,
        ply: usize,
        prev_move: Move,
        depth: u32,
    ) -> ScoredMoveList {
        let counter = self.state.counter_moves.get(prev_move);

        let mut scored = ScoredMoveList::new();
        for &mv in moves {
            let score = if mv == tt_move {
                TT_MOVE_SCORE
            } else if mv.is_capture() {
                self.capture_score(mv, depth)
            } else if mv.is_promotion() {
                // Quiet promotions rank with winning captures
                GOOD_CAPTURE_SCORE + mv.promotion().map_or(0, Piece::value)
            } else if mv == self.state.killers.primary(ply) {
                KILLER1_SCORE
            } else if mv == self.state.killers.secondary(ply) {
                KILLER2_SCORE
            } else if mv == counter {
                COUNTER_SCORE
            } else {
                self.state.history.score(mv.piece(), mv.to().as_index())
            };
            scored.push(mv, score);
        }
        scored
    }

    /// Captures: exchange-aware at depth, plain MVV-LVA close to the
    /// horizon where SEE would cost more than it saves.
    fn capture_score(&self, mv: Move, depth: u32) -> i32 {
        let board = &*self.board;
        if depth >= SEE_ORDERING_MIN_DEPTH {
            let see = board.see(mv.from(), mv.to());
            if see >= 0 {
                GOOD_CAPTURE_SCORE + mvv_lva(board, mv) + see / 10
            } else {
                BAD_CAPTURE_SCORE + see
            }
        } else {
            GOOD_CAPTURE_SCORE + mvv_lva(board, mv)
        }
    }

    /// Quiescence ordering: MVV-LVA only.
    pub(super) fn order_tactical_moves(&self, moves: &MoveList) -> ScoredMoveList {
        let mut scored = ScoredMoveList::new();
        for &mv in moves {
            scored.push(mv, mvv_lva(self.board, mv));
        }
        scored
    }
}
