//! Move generator behavior: pins, check evasions, castling, en passant
//! and promotion edge cases.

use crate::board::{Board, Color, Piece, Square};

fn targets_of(board: &Board, from: Square) -> Vec<Square> {
    board
        .generate_moves()
        .iter()
        .filter(|m| m.from() == from)
        .map(|m| m.to())
        .collect()
}

#[test]
fn startpos_has_twenty_moves() {
    let board = Board::new();
    assert_eq!(board.generate_moves().len(), 20);
}

#[test]
fn pinned_rook_moves_only_on_the_pin_ray() {
    // White rook on e4 absolutely pinned by the rook on e8
    let board = Board::from_fen("4r1k1/8/8/8/4R3/8/8/4K3 w - - 0 1");
    let rook = Square(3, 4); // e4
    let mut targets = targets_of(&board, rook);
    targets.sort();

    let mut expected: Vec<Square> = (1..8)
        .filter(|&r| r != 3)
        .map(|r| Square(r, 4)) // e2..e8 except e4 itself
        .collect();
    expected.sort();

    assert_eq!(targets, expected, "pinned rook must stay on the e-file");
    // Capturing the pinner is among the moves
    assert!(targets.contains(&Square(7, 4)));
}

#[test]
fn pinned_knight_cannot_move_at_all() {
    // Knight on c3 pinned along a5-e1 by the bishop
    let board = Board::from_fen("6k1/8/8/b7/8/2N5/8/4K3 w - - 0 1");
    assert!(targets_of(&board, Square(2, 2)).is_empty());
}

#[test]
fn pinned_bishop_may_capture_its_pinner() {
    // Bishop on c3 pinned by the a5 bishop; sliding along the pin is fine
    let board = Board::from_fen("6k1/8/8/b7/8/2B5/8/4K3 w - - 0 1");
    let targets = targets_of(&board, Square(2, 2));
    assert!(targets.contains(&Square(4, 0)), "capture of the pinner");
    assert!(targets.contains(&Square(3, 1)));
    assert!(!targets.contains(&Square(3, 3)), "off-ray move must be gone");
}

#[test]
fn every_check_evasion_leaves_check() {
    let positions = [
        "4k3/8/8/8/8/8/8/4R1K1 b - - 0 1",
        "4k3/8/3N4/8/8/8/8/4K3 b - - 0 1",
        "4k3/3P4/8/8/8/8/8/4K3 b - - 0 1",
        "4k3/8/8/1B6/8/8/8/4RK2 b - - 0 1",
        "r3k3/8/8/8/Q7/8/8/4K3 b q - 0 1",
    ];
    for fen in positions {
        let board = Board::from_fen(fen);
        let us = board.side_to_move();
        assert!(board.is_in_check(us), "test position should be check: {fen}");
        let moves = board.generate_moves();
        assert!(!moves.is_empty(), "position is not mate: {fen}");
        for mv in &moves {
            let mut next = board;
            next.make_move(*mv);
            assert!(
                !next.is_in_check(us),
                "move {mv} does not resolve check in {fen}"
            );
        }
    }
}

#[test]
fn double_check_allows_only_king_moves() {
    // Rook on e1 and bishop on b5 give double check to the e8 king
    let board = Board::from_fen("4k3/8/8/1B6/8/8/8/4RK2 b - - 0 1");
    let moves = board.generate_moves();
    assert!(!moves.is_empty());
    for mv in &moves {
        assert_eq!(mv.piece(), Piece::King, "non-king move {mv} in double check");
    }
}

#[test]
fn single_check_includes_captures_and_blocks() {
    // Black queen on e7 checks along e; white can block, capture or move
    let board = Board::from_fen("4k3/4q3/8/8/8/8/3B4/R3K3 w - - 0 1");
    let moves = board.generate_moves();
    // Block with Be3 or Re1->? rook is on a1: Ra1-e1 is impossible (king
    // on e1); bishop d2-e3 blocks
    assert!(moves.iter().any(|m| m.from() == Square(1, 3) && m.to() == Square(2, 4)));
    // King steps off the file
    assert!(moves.iter().any(|m| m.piece() == Piece::King && m.to() == Square(0, 3)));
}

#[test]
fn king_cannot_retreat_along_the_checking_ray() {
    // Rook checks the e5 king from e1; e6 stays attacked behind the king
    let board = Board::from_fen("8/8/8/4k3/8/8/8/4R1K1 b - - 0 1");
    let moves = board.generate_moves();
    assert!(
        !moves.iter().any(|m| m.to() == Square(5, 4)),
        "retreating along the ray is still check"
    );
}

#[test]
fn castling_generated_only_with_clear_safe_path() {
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let castles: Vec<_> = board
        .generate_moves()
        .iter()
        .filter(|m| m.is_castle())
        .map(|m| m.to())
        .collect();
    assert!(castles.contains(&Square(0, 6)));
    assert!(castles.contains(&Square(0, 2)));

    // A rook eyeing f1 forbids kingside but not queenside
    let board = Board::from_fen("r4rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let castles: Vec<_> = board
        .generate_moves()
        .iter()
        .filter(|m| m.is_castle())
        .map(|m| m.to())
        .collect();
    assert!(!castles.contains(&Square(0, 6)), "f1 is attacked");
    assert!(castles.contains(&Square(0, 2)));

    // No castling while in check
    let board = Board::from_fen("4r3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    assert!(board.generate_moves().iter().all(|m| !m.is_castle()));

    // No castling without the right
    let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
    assert!(board.generate_moves().iter().all(|m| !m.is_castle()));
}

#[test]
fn promotion_emits_four_moves_per_target() {
    let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    let promos: Vec<_> = board
        .generate_moves()
        .iter()
        .filter(|m| m.from() == Square(6, 0))
        .copied()
        .collect();
    assert_eq!(promos.len(), 4);
    let mut pieces: Vec<_> = promos.iter().filter_map(|m| m.promotion()).collect();
    pieces.sort_by_key(|p| p.index());
    assert_eq!(
        pieces,
        vec![Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
    );
}

#[test]
fn capture_promotion_emits_four_capture_moves() {
    let board = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    let captures: Vec<_> = board
        .generate_moves()
        .iter()
        .filter(|m| m.from() == Square(6, 0) && m.to() == Square(7, 1))
        .copied()
        .collect();
    assert_eq!(captures.len(), 4);
    assert!(captures.iter().all(|m| m.is_capture() && m.is_promotion()));
}

#[test]
fn en_passant_only_exists_right_after_the_double_push() {
    let mut board = Board::new();
    board.make_move(board.parse_uci_move("e2e4").unwrap());
    board.make_move(board.parse_uci_move("a7a6").unwrap());
    board.make_move(board.parse_uci_move("e4e5").unwrap());
    board.make_move(board.parse_uci_move("d7d5").unwrap());
    // Immediately: exd6 en passant is available
    assert!(board.generate_moves().iter().any(|m| m.is_en_passant()));

    // One quiet pair later the opportunity is gone
    board.make_move(board.parse_uci_move("a2a3").unwrap());
    board.make_move(board.parse_uci_move("a6a5").unwrap());
    assert!(board.generate_moves().iter().all(|m| !m.is_en_passant()));
}

#[test]
fn en_passant_is_refused_when_it_exposes_the_king() {
    // White king a5, white pawn e5, black pawn d5 just pushed, black
    // rook h5: capturing en passant empties the rank between rook and king
    let board = Board::from_fen("8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 1");
    let moves = board.generate_moves();
    assert!(
        !moves
            .iter()
            .any(|m| m.is_en_passant() && m.from() == Square(4, 4)),
        "exd6 would expose the king on the fifth rank"
    );
}

#[test]
fn tactical_generation_is_exactly_captures_and_promotions() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
    ];
    for fen in fens {
        let board = Board::from_fen(fen);
        let all = board.generate_moves();
        let tactical = board.generate_tactical_moves();

        for mv in &tactical {
            assert!(mv.is_tactical(), "{mv} is not tactical in {fen}");
            assert!(all.contains(*mv), "{mv} not in the full legal list");
        }
        let expected = all.iter().filter(|m| m.is_tactical()).count();
        assert_eq!(tactical.len(), expected, "tactical move count in {fen}");
    }
}

#[test]
fn stalemate_and_checkmate_detection() {
    let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(stalemate.is_stalemate());
    assert!(!stalemate.is_checkmate());

    let mate = Board::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 2 3");
    assert!(mate.is_checkmate());
    assert!(!mate.is_stalemate());
}

#[test]
fn moves_round_trip_through_the_packed_encoding() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ];
    for fen in fens {
        let board = Board::from_fen(fen);
        for mv in &board.generate_moves() {
            let decoded = crate::board::Move::from_u32(mv.as_u32());
            assert_eq!(decoded.from(), mv.from());
            assert_eq!(decoded.to(), mv.to());
            assert_eq!(decoded.piece(), mv.piece());
            assert_eq!(decoded.side(), mv.side());
            assert_eq!(decoded.promotion(), mv.promotion());
            assert_eq!(decoded.is_capture(), mv.is_capture());
            assert_eq!(decoded.is_en_passant(), mv.is_en_passant());
            assert_eq!(decoded.is_castle(), mv.is_castle());
            assert_eq!(decoded.is_double_push(), mv.is_double_push());
            assert_eq!(decoded, *mv);
        }
    }
}

#[test]
fn side_field_matches_the_mover() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    for mv in &board.generate_moves() {
        assert_eq!(mv.side(), Color::Black);
    }
}
