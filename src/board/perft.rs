//! Perft: exhaustive legal-move tree counting for generator validation.

use super::Board;

impl Board {
    /// Count the leaf nodes of the legal move tree to `depth`.
    #[must_use]
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in &moves {
            let mut next = *self;
            next.make_move(*mv);
            nodes += next.perft(depth - 1);
        }

        nodes
    }

    /// Perft with per-root-move counts, for diffing against a reference.
    #[must_use]
    pub fn perft_divide(&self, depth: usize) -> Vec<(super::Move, u64)> {
        let mut results = Vec::new();
        for mv in &self.generate_moves() {
            let mut next = *self;
            next.make_move(*mv);
            let nodes = if depth <= 1 { 1 } else { next.perft(depth - 1) };
            results.push((*mv, nodes));
        }
        results
    }
}
