//! Attack and pin queries: who attacks a square, which pieces are pinned,
//! and along which rays they may still move.

use super::attack_tables::{
    bishop_attacks, rook_attacks, BETWEEN, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
use super::state::Board;
use super::types::{bit_for_square, Bitboard, Color, Piece, Square};

/// Pins for the side to move at one node.
///
/// `rays[sq]` is only meaningful when `pinned` contains `sq`: the
/// inclusive segment between the king and the pinning slider (pinner
/// included, king excluded), which is exactly where the pinned piece may
/// still move.
pub(crate) struct PinState {
    pub(crate) pinned: Bitboard,
    pub(crate) rays: [Bitboard; 64],
}

impl PinState {
    #[inline]
    pub(crate) fn ray(&self, sq: usize) -> Bitboard {
        if self.pinned.0 & (1u64 << sq) != 0 {
            self.rays[sq]
        } else {
            Bitboard::ALL
        }
    }
}

impl Board {
    /// All pieces of either color attacking `sq` under the given
    /// occupancy. Callers mask the result by side.
    pub(crate) fn attackers_to(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let sq_idx = sq.as_index();
        let mut attackers = 0u64;

        // Pawns: look backwards from the target to find attacking pawns
        attackers |= PAWN_ATTACKS[1][sq_idx] & self.pieces[0][Piece::Pawn.index()].0;
        attackers |= PAWN_ATTACKS[0][sq_idx] & self.pieces[1][Piece::Pawn.index()].0;

        attackers |= KNIGHT_ATTACKS[sq_idx]
            & (self.pieces[0][Piece::Knight.index()].0 | self.pieces[1][Piece::Knight.index()].0);

        attackers |= KING_ATTACKS[sq_idx]
            & (self.pieces[0][Piece::King.index()].0 | self.pieces[1][Piece::King.index()].0);

        attackers |= bishop_attacks(sq_idx, occ.0) & self.diagonal_sliders().0;
        attackers |= rook_attacks(sq_idx, occ.0) & self.straight_sliders().0;

        Bitboard(attackers)
    }

    /// Is `sq` attacked by any piece of `by`, under the current occupancy?
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.is_square_attacked_with_occ(sq, by, self.all_occupied)
    }

    /// Attack test with an occupancy override. Used for king moves, where
    /// the king itself must be removed so it cannot hide behind its own
    /// square on a slider ray.
    pub(crate) fn is_square_attacked_with_occ(&self, sq: Square, by: Color, occ: Bitboard) -> bool {
        let sq_idx = sq.as_index();
        let c_idx = by.index();

        // A white pawn attacks like a black pawn's table from the target
        let pawn_sources = PAWN_ATTACKS[by.opponent().index()][sq_idx];
        if self.pieces[c_idx][Piece::Pawn.index()].0 & pawn_sources != 0 {
            return true;
        }

        if self.pieces[c_idx][Piece::Knight.index()].0 & KNIGHT_ATTACKS[sq_idx] != 0 {
            return true;
        }

        if self.pieces[c_idx][Piece::King.index()].0 & KING_ATTACKS[sq_idx] != 0 {
            return true;
        }

        let rook_like =
            self.pieces[c_idx][Piece::Rook.index()].0 | self.pieces[c_idx][Piece::Queen.index()].0;
        if rook_attacks(sq_idx, occ.0) & rook_like != 0 {
            return true;
        }

        let bishop_like = self.pieces[c_idx][Piece::Bishop.index()].0
            | self.pieces[c_idx][Piece::Queen.index()].0;
        if bishop_attacks(sq_idx, occ.0) & bishop_like != 0 {
            return true;
        }

        false
    }

    /// Opponent pieces giving check to `color`'s king.
    #[must_use]
    pub(crate) fn checkers(&self, color: Color) -> Bitboard {
        let king_sq = self.king_square(color);
        Bitboard(
            self.attackers_to(king_sq, self.all_occupied).0
                & self.occupied[color.opponent().index()].0,
        )
    }

    /// Is `color`'s king attacked?
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    /// X-ray attacks: the squares a rook on `sq` would reach if the given
    /// blockers were transparent, minus what it reaches with them present.
    fn xray_rook_attacks(occ: u64, blockers: u64, sq: usize) -> u64 {
        let attacks = rook_attacks(sq, occ);
        let blockers = blockers & attacks;
        attacks ^ rook_attacks(sq, occ ^ blockers)
    }

    fn xray_bishop_attacks(occ: u64, blockers: u64, sq: usize) -> u64 {
        let attacks = bishop_attacks(sq, occ);
        let blockers = blockers & attacks;
        attacks ^ bishop_attacks(sq, occ ^ blockers)
    }

    /// Compute the pinned pieces of `color` and their pin rays.
    ///
    /// A piece is pinned when an enemy slider reaches the king through
    /// exactly one own piece; the symmetric difference of the slider's
    /// attack sets with and without own blockers exposes those sliders.
    pub(crate) fn pin_state(&self, color: Color) -> PinState {
        let king_sq = self.king_square(color).as_index();
        let own = self.occupied[color.index()].0;
        let occ = self.all_occupied.0;
        let them = color.opponent().index();

        let enemy_rq =
            self.pieces[them][Piece::Rook.index()].0 | self.pieces[them][Piece::Queen.index()].0;
        let enemy_bq =
            self.pieces[them][Piece::Bishop.index()].0 | self.pieces[them][Piece::Queen.index()].0;

        let mut state = PinState {
            pinned: Bitboard::EMPTY,
            rays: [Bitboard::EMPTY; 64],
        };

        let pinners = Bitboard(
            (Self::xray_rook_attacks(occ, own, king_sq) & enemy_rq)
                | (Self::xray_bishop_attacks(occ, own, king_sq) & enemy_bq),
        );

        for pinner_idx in pinners.iter() {
            let pinner = pinner_idx.as_usize();
            let segment = BETWEEN[king_sq][pinner];
            let pinned_piece = segment & own;
            debug_assert_eq!(pinned_piece.count_ones(), 1);
            let pinned_sq = pinned_piece.trailing_zeros() as usize;
            state.pinned.0 |= pinned_piece;
            state.rays[pinned_sq] = Bitboard(segment | (1u64 << pinner));
        }

        state
    }

    /// All diagonal sliders (both colors).
    #[inline]
    pub(crate) fn diagonal_sliders(&self) -> Bitboard {
        Bitboard(
            self.pieces[0][Piece::Bishop.index()].0
                | self.pieces[0][Piece::Queen.index()].0
                | self.pieces[1][Piece::Bishop.index()].0
                | self.pieces[1][Piece::Queen.index()].0,
        )
    }

    /// All straight sliders (both colors).
    #[inline]
    pub(crate) fn straight_sliders(&self) -> Bitboard {
        Bitboard(
            self.pieces[0][Piece::Rook.index()].0
                | self.pieces[0][Piece::Queen.index()].0
                | self.pieces[1][Piece::Rook.index()].0
                | self.pieces[1][Piece::Queen.index()].0,
        )
    }

    /// Convenience: the en-passant victim square for a capture landing on
    /// `ep_target` by `color`.
    #[inline]
    pub(crate) fn en_passant_victim(ep_target: Square, color: Color) -> Square {
        Square(
            (ep_target.rank() as isize - color.pawn_direction()) as usize,
            ep_target.file(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_not_in_check() {
        let board = Board::new();
        assert!(!board.is_in_check(Color::White));
        assert!(!board.is_in_check(Color::Black));
        assert!(board.checkers(Color::White).is_empty());
    }

    #[test]
    fn rook_gives_check_on_open_file() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1");
        assert!(board.is_in_check(Color::Black));
        assert_eq!(board.checkers(Color::Black).popcount(), 1);
    }

    #[test]
    fn double_check_has_two_checkers() {
        // Rook on e1 and bishop on b5 both attack the e8 king
        let board = Board::from_fen("4k3/8/8/1B6/8/8/8/4RK2 b - - 0 1");
        let checkers = board.checkers(Color::Black);
        assert_eq!(checkers.popcount(), 2);
        assert!(checkers.more_than_one());
    }

    #[test]
    fn pinned_rook_has_file_ray() {
        // White rook on e4 pinned to the e1 king by a black rook on e8
        let board = Board::from_fen("4r1k1/8/8/8/4R3/8/8/4K3 w - - 0 1");
        let pins = board.pin_state(Color::White);
        let e4 = Square(3, 4);
        assert!(pins.pinned.contains(e4));
        let ray = pins.ray(e4.as_index());
        // The ray runs e2..e8 (pinner included, king excluded)
        assert!(ray.contains(Square(7, 4)), "pinner square in ray");
        assert!(ray.contains(Square(1, 4)));
        assert!(!ray.contains(Square(0, 4)), "king square not in ray");
        assert!(!ray.contains(Square(3, 3)), "off-file square not in ray");
    }

    #[test]
    fn diagonal_pin_detected() {
        // White knight on c3 pinned by the a5 bishop against the e1 king
        let board = Board::from_fen("6k1/8/8/b7/8/2N5/8/4K3 w - - 0 1");
        let pins = board.pin_state(Color::White);
        assert!(pins.pinned.contains(Square(2, 2)));
    }

    #[test]
    fn no_pin_through_two_pieces() {
        // Two white pieces between the rook and the king: neither pinned
        let board = Board::from_fen("4r1k1/8/8/4N3/4R3/8/8/4K3 w - - 0 1");
        let pins = board.pin_state(Color::White);
        assert!(pins.pinned.is_empty());
    }

    #[test]
    fn king_cannot_hide_behind_itself() {
        // Black king on e5 checked by rook on e1; e6 is still attacked
        // once the king is lifted off e5
        let board = Board::from_fen("8/8/8/4k3/8/8/8/4R1K1 b - - 0 1");
        let occ_without_king =
            Bitboard(board.all_occupied.0 ^ bit_for_square(Square(4, 4)).0);
        assert!(board.is_square_attacked_with_occ(Square(5, 4), Color::White, occ_without_king));
    }
}
