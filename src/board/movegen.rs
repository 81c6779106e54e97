//! Legal move generation.
//!
//! Moves are generated fully legal, with no make/unmake filtering:
//! pinned pieces are restricted to their pin rays, check evasions are
//! derived from the checker set, and king moves are tested against
//! attacks with the king lifted off its square. Double check generates
//! king moves only.

use super::attack_tables::{
    bishop_attacks, queen_attacks, rook_attacks, BETWEEN, KING_ATTACKS, KNIGHT_ATTACKS,
    PAWN_ATTACKS,
};
use super::legality::PinState;
use super::types::{
    bit_for_square, Bitboard, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES,
};
use super::Board;

/// What subset of legal moves to emit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum GenMode {
    /// Every legal move.
    All,
    /// Captures and promotions only (quiescence).
    TacticalOnly,
}

impl Board {
    /// Generate every legal move for the side to move.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        self.generate(GenMode::All)
    }

    /// Generate legal captures and promotions only.
    #[must_use]
    pub fn generate_tactical_moves(&self) -> MoveList {
        self.generate(GenMode::TacticalOnly)
    }

    pub(crate) fn generate(&self, mode: GenMode) -> MoveList {
        let mut moves = MoveList::new();
        let us = self.side_to_move;
        let them = us.opponent();
        let king_sq = self.king_square(us);
        let checkers = self.checkers(us);

        self.generate_king_moves(&mut moves, mode, us, king_sq);

        // In double check only the king may move
        if checkers.more_than_one() {
            return moves;
        }

        let enemy = self.occupied[them.index()];
        let empty = Bitboard(!self.all_occupied.0);

        // Single check: captures of the checker, or interpositions on the
        // checker's ray when it slides. Otherwise: any enemy / any empty.
        let (capture_mask, push_mask) = if checkers.is_empty() {
            (enemy, empty)
        } else {
            let checker_idx = checkers.lsb().as_usize();
            let checker_sq = Square::from_index_const(checker_idx);
            let blocks = match self.piece_at(checker_sq) {
                Some((_, piece)) if piece.is_slider() => {
                    Bitboard(BETWEEN[king_sq.as_index()][checker_idx] & empty.0)
                }
                _ => Bitboard::EMPTY,
            };
            (checkers, blocks)
        };

        let pins = self.pin_state(us);

        self.generate_pawn_moves(&mut moves, mode, us, &pins, capture_mask, push_mask);
        self.generate_knight_moves(&mut moves, mode, us, &pins, capture_mask, push_mask);
        self.generate_slider_moves(&mut moves, mode, us, &pins, capture_mask, push_mask);

        if checkers.is_empty() && mode == GenMode::All {
            self.generate_castling(&mut moves, us, king_sq);
        }

        moves
    }

    fn generate_king_moves(&self, moves: &mut MoveList, mode: GenMode, us: Color, king_sq: Square) {
        let them = us.opponent();
        let own = self.occupied[us.index()];
        let enemy = self.occupied[them.index()];
        let king_idx = king_sq.as_index();

        let mut targets = KING_ATTACKS[king_idx] & !own.0;
        if mode == GenMode::TacticalOnly {
            targets &= enemy.0;
        }

        // Lift the king off its square so it cannot shelter behind
        // itself on a slider ray
        let occ_without_king = Bitboard(self.all_occupied.0 ^ bit_for_square(king_sq).0);

        for to_idx in Bitboard(targets).iter() {
            let to = Square::from_index(to_idx);
            if self.is_square_attacked_with_occ(to, them, occ_without_king) {
                continue;
            }
            if enemy.contains(to) {
                moves.push(Move::capture(king_sq, to, Piece::King, us));
            } else {
                moves.push(Move::quiet(king_sq, to, Piece::King, us));
            }
        }
    }

    fn generate_knight_moves(
        &self,
        moves: &mut MoveList,
        mode: GenMode,
        us: Color,
        pins: &PinState,
        capture_mask: Bitboard,
        push_mask: Bitboard,
    ) {
        let enemy = self.occupied[us.opponent().index()];
        let allowed = match mode {
            GenMode::All => capture_mask.0 | push_mask.0,
            GenMode::TacticalOnly => capture_mask.0,
        };

        for from_idx in self.pieces[us.index()][Piece::Knight.index()].iter() {
            let from = Square::from_index(from_idx);
            // A pinned knight can never stay on its pin ray, so the
            // intersection is naturally empty
            let targets =
                KNIGHT_ATTACKS[from_idx.as_usize()] & allowed & pins.ray(from_idx.as_usize()).0;
            for to_idx in Bitboard(targets).iter() {
                let to = Square::from_index(to_idx);
                if enemy.contains(to) {
                    moves.push(Move::capture(from, to, Piece::Knight, us));
                } else {
                    moves.push(Move::quiet(from, to, Piece::Knight, us));
                }
            }
        }
    }

    fn generate_slider_moves(
        &self,
        moves: &mut MoveList,
        mode: GenMode,
        us: Color,
        pins: &PinState,
        capture_mask: Bitboard,
        push_mask: Bitboard,
    ) {
        let enemy = self.occupied[us.opponent().index()];
        let occ = self.all_occupied.0;
        let allowed = match mode {
            GenMode::All => capture_mask.0 | push_mask.0,
            GenMode::TacticalOnly => capture_mask.0,
        };

        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
            for from_idx in self.pieces[us.index()][piece.index()].iter() {
                let from = Square::from_index(from_idx);
                let sq = from_idx.as_usize();
                let attacks = match piece {
                    Piece::Bishop => bishop_attacks(sq, occ),
                    Piece::Rook => rook_attacks(sq, occ),
                    _ => queen_attacks(sq, occ),
                };
                let targets = attacks & allowed & pins.ray(sq).0;
                for to_idx in Bitboard(targets).iter() {
                    let to = Square::from_index(to_idx);
                    if enemy.contains(to) {
                        moves.push(Move::capture(from, to, piece, us));
                    } else {
                        moves.push(Move::quiet(from, to, piece, us));
                    }
                }
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn generate_pawn_moves(
        &self,
        moves: &mut MoveList,
        mode: GenMode,
        us: Color,
        pins: &PinState,
        capture_mask: Bitboard,
        push_mask: Bitboard,
    ) {
        let them = us.opponent();
        let enemy = self.occupied[them.index()];
        let dir = us.pawn_direction();
        let start_rank = us.pawn_start_rank();
        let promo_rank = us.pawn_promotion_rank();

        for from_idx in self.pieces[us.index()][Piece::Pawn.index()].iter() {
            let from = Square::from_index(from_idx);
            let allowed = pins.ray(from_idx.as_usize());

            // Captures (including capture-promotions)
            let capture_targets =
                PAWN_ATTACKS[us.index()][from_idx.as_usize()] & enemy.0 & capture_mask.0 & allowed.0;
            for to_idx in Bitboard(capture_targets).iter() {
                let to = Square::from_index(to_idx);
                if to.rank() == promo_rank {
                    for promo in PROMOTION_PIECES {
                        moves.push(Move::new_promotion(from, to, us, promo, true));
                    }
                } else {
                    moves.push(Move::capture(from, to, Piece::Pawn, us));
                }
            }

            // Pushes. The stepped-over square must be empty regardless of
            // the check-evasion mask; only the landing square must satisfy it.
            let one_rank = (from.rank() as isize + dir) as usize;
            let one = Square(one_rank, from.file());
            if self.is_square_empty(one) {
                let one_ok = push_mask.contains(one) && allowed.contains(one);
                if one.rank() == promo_rank {
                    if one_ok {
                        for promo in PROMOTION_PIECES {
                            moves.push(Move::new_promotion(from, one, us, promo, false));
                        }
                    }
                } else {
                    if one_ok && mode == GenMode::All {
                        moves.push(Move::quiet(from, one, Piece::Pawn, us));
                    }
                    if from.rank() == start_rank {
                        let two = Square((one_rank as isize + dir) as usize, from.file());
                        if self.is_square_empty(two)
                            && push_mask.contains(two)
                            && allowed.contains(two)
                            && mode == GenMode::All
                        {
                            moves.push(Move::double_push(from, two, us));
                        }
                    }
                }
            }

            // En passant
            if let Some(ep) = self.en_passant {
                if PAWN_ATTACKS[us.index()][from_idx.as_usize()] & bit_for_square(ep).0 != 0
                    && allowed.contains(ep)
                    && self.en_passant_is_legal(from, ep, us)
                {
                    let victim = Self::en_passant_victim(ep, us);
                    // Under check the capture must either take the checker
                    // or land on the blocking ray
                    if capture_mask.contains(victim) || push_mask.contains(ep) {
                        moves.push(Move::en_passant(from, ep, us));
                    }
                }
            }
        }
    }

    /// En passant removes two pawns from one rank in a single move, which
    /// no pin ray models. Re-test the king against enemy sliders with
    /// both pawns lifted and the capturer placed on the target square.
    fn en_passant_is_legal(&self, from: Square, ep: Square, us: Color) -> bool {
        let them = us.opponent();
        let victim = Self::en_passant_victim(ep, us);
        let king_idx = self.king_square(us).as_index();

        let occ = (self.all_occupied.0 ^ bit_for_square(from).0 ^ bit_for_square(victim).0)
            | bit_for_square(ep).0;

        let enemy_rq = self.pieces[them.index()][Piece::Rook.index()].0
            | self.pieces[them.index()][Piece::Queen.index()].0;
        if rook_attacks(king_idx, occ) & enemy_rq != 0 {
            return false;
        }

        let enemy_bq = self.pieces[them.index()][Piece::Bishop.index()].0
            | self.pieces[them.index()][Piece::Queen.index()].0;
        bishop_attacks(king_idx, occ) & enemy_bq == 0
    }

    fn generate_castling(&self, moves: &mut MoveList, us: Color, king_sq: Square) {
        let rank = us.back_rank();
        if king_sq != Square(rank, 4) {
            return;
        }
        let them = us.opponent();

        if self.castling.has(us, true)
            && self.is_square_empty(Square(rank, 5))
            && self.is_square_empty(Square(rank, 6))
            && self.piece_at(Square(rank, 7)) == Some((us, Piece::Rook))
            && !self.is_square_attacked(Square(rank, 5), them)
            && !self.is_square_attacked(Square(rank, 6), them)
        {
            moves.push(Move::castle(king_sq, Square(rank, 6), us));
        }

        if self.castling.has(us, false)
            && self.is_square_empty(Square(rank, 1))
            && self.is_square_empty(Square(rank, 2))
            && self.is_square_empty(Square(rank, 3))
            && self.piece_at(Square(rank, 0)) == Some((us, Piece::Rook))
            && !self.is_square_attacked(Square(rank, 2), them)
            && !self.is_square_attacked(Square(rank, 3), them)
        {
            moves.push(Move::castle(king_sq, Square(rank, 2), us));
        }
    }

    /// Checkmate: in check with no legal moves.
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.side_to_move) && self.generate_moves().is_empty()
    }

    /// Stalemate: not in check but no legal moves.
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.side_to_move) && self.generate_moves().is_empty()
    }

    /// Is this exact move legal here? Used to validate hash moves before
    /// they are trusted for the principal variation.
    #[must_use]
    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.generate_moves().contains(mv)
    }
}
