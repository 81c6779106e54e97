//! Static Exchange Evaluation (SEE).
//!
//! Evaluates the full capture sequence on a single square to decide
//! whether a capture wins, loses, or breaks even on material.

use super::attack_tables::slider_attacks;
use super::state::Board;
use super::types::{Bitboard, Piece, Square};

/// Piece values for SEE (simpler than eval values)
const SEE_VALUES: [i32; 6] = [
    100,   // Pawn
    320,   // Knight
    330,   // Bishop
    500,   // Rook
    900,   // Queen
    20000, // King
];

impl Board {
    /// Static Exchange Evaluation for a capture move.
    ///
    /// Returns the material balance after all exchanges on the target
    /// square, in centipawns, from the perspective of the side making the
    /// first capture. Positive = winning, negative = losing, zero = even.
    #[must_use]
    pub fn see(&self, from: Square, to: Square) -> i32 {
        let victim = match self.piece_at(to) {
            Some((_, piece)) => piece,
            None => {
                // En passant: the victim is a pawn beside the target
                if self.en_passant == Some(to) {
                    Piece::Pawn
                } else {
                    return 0; // Not a capture
                }
            }
        };

        let attacker = match self.piece_at(from) {
            Some((_, piece)) => piece,
            None => return 0,
        };

        self.see_impl(from, to, attacker, victim)
    }

    fn see_impl(&self, from: Square, to: Square, attacker: Piece, victim: Piece) -> i32 {
        // An exchange can involve at most every piece on the board
        const MAX_DEPTH: usize = 32;

        let mut gain = [0i32; MAX_DEPTH];
        let mut depth = 0;

        let mut side = self.side_to_move;
        let mut occupancy = self.all_occupied.0;
        let mut attackers = self.attackers_to(to, Bitboard(occupancy));

        gain[0] = SEE_VALUES[victim.index()];

        let mut current_attacker = attacker;
        let mut from_bb = Bitboard::from_square(from);

        loop {
            // Lift the attacker; captures by sliders may reveal an x-ray
            // attacker behind it
            occupancy ^= from_bb.0;
            attackers = Bitboard(attackers.0 & !from_bb.0);

            if matches!(current_attacker, Piece::Pawn | Piece::Bishop | Piece::Queen) {
                let revealed = slider_attacks(to.as_index(), occupancy, true)
                    & self.diagonal_sliders().0;
                attackers = Bitboard(attackers.0 | (revealed & occupancy));
            }
            if matches!(current_attacker, Piece::Rook | Piece::Queen) {
                let revealed = slider_attacks(to.as_index(), occupancy, false)
                    & self.straight_sliders().0;
                attackers = Bitboard(attackers.0 | (revealed & occupancy));
            }

            side = side.opponent();

            let side_attackers = Bitboard(attackers.0 & self.occupied[side.index()].0);
            if side_attackers.is_empty() {
                break;
            }

            depth += 1;
            if depth >= MAX_DEPTH {
                break;
            }

            let (lva_piece, lva_bb) = self.least_valuable_attacker(side_attackers, side.index());

            gain[depth] = SEE_VALUES[current_attacker.index()] - gain[depth - 1];

            // Neither continuing nor stopping can help: prune the tail
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            // The king may only recapture when nothing can answer
            if lva_piece == Piece::King {
                let opponent_attackers =
                    Bitboard(attackers.0 & self.occupied[side.opponent().index()].0);
                if !opponent_attackers.is_empty() {
                    break;
                }
            }

            current_attacker = lva_piece;
            from_bb = lva_bb;
        }

        // Minimax the gains back up the sequence
        while depth > 0 {
            depth -= 1;
            gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
        }

        gain[0]
    }

    /// Find the least valuable attacker from a set of attackers.
    /// Returns the piece type and a bitboard with just that piece.
    fn least_valuable_attacker(&self, attackers: Bitboard, color_idx: usize) -> (Piece, Bitboard) {
        for piece in Piece::ALL {
            let piece_attackers =
                Bitboard(attackers.0 & self.pieces[color_idx][piece.index()].0);
            if !piece_attackers.is_empty() {
                let single = Bitboard(piece_attackers.0 & piece_attackers.0.wrapping_neg());
                return (piece, single);
            }
        }

        // Unreachable when `attackers` is non-empty
        (Piece::Pawn, Bitboard::EMPTY)
    }
}
