//! Time budgeting for `go` commands.

use std::time::Duration;

use crate::board::Color;

use super::command::GoParams;

/// Safety slice kept back from the clock so we never flag on overhead.
const MOVE_OVERHEAD_MS: u64 = 30;

/// Fraction of the remaining clock spent on one move.
const MOVES_TO_GO_ESTIMATE: u64 = 25;

/// Compute the wall-clock budget for this move, if any.
///
/// `movetime` is obeyed exactly (minus overhead). With a running clock
/// the budget is remaining/25 plus half the increment. Depth-, node- and
/// infinite-limited searches get no deadline.
#[must_use]
pub fn compute_budget(params: &GoParams, side: Color) -> Option<Duration> {
    if params.infinite {
        return None;
    }

    if let Some(movetime) = params.movetime_ms {
        return Some(Duration::from_millis(
            movetime.saturating_sub(MOVE_OVERHEAD_MS).max(1),
        ));
    }

    let (time, inc) = match side {
        Color::White => (params.wtime_ms, params.winc_ms),
        Color::Black => (params.btime_ms, params.binc_ms),
    };

    let remaining = time?;
    let increment = inc.unwrap_or(0);
    let budget = (remaining / MOVES_TO_GO_ESTIMATE + increment / 2)
        .min(remaining.saturating_sub(MOVE_OVERHEAD_MS))
        .max(1);
    Some(Duration::from_millis(budget))
}
