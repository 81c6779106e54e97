//! End-to-end search tests through the public API.

use ferrite_chess::board::{find_best_move, Board, SearchLimits, SearchState};
use ferrite_chess::uci::format_uci_move;

#[test]
fn finds_mate_in_one_back_rank() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let mut state = SearchState::new(16);

    let result = find_best_move(&mut board, &mut state, &SearchLimits::depth(4), None);
    let mv = result.best_move.expect("should find a move");
    assert_eq!(format_uci_move(&mv), "e1e8", "Qe8# is the back rank mate");
}

#[test]
fn avoids_hanging_the_queen() {
    // Qf3-c6?? loses the queen to b7xc6
    let mut board = Board::from_fen(
        "r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3",
    );
    let mut state = SearchState::new(16);

    let result = find_best_move(&mut board, &mut state, &SearchLimits::depth(4), None);
    let mv = result.best_move.expect("should find a move");
    assert_ne!(format_uci_move(&mv), "f3c6", "must not hang the queen");
}

#[test]
fn captures_free_material() {
    // A queen en prise on d5 with no defenders
    let mut board = Board::from_fen("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1");
    let mut state = SearchState::new(16);

    let result = find_best_move(&mut board, &mut state, &SearchLimits::depth(5), None);
    let mv = result.best_move.expect("should find a move");
    assert_eq!(format_uci_move(&mv), "d2d5");
    assert!(result.score > 300, "should know it is winning: {}", result.score);
}

#[test]
fn check_evasion_search_returns_a_legal_evasion() {
    // White king in check from the h1 rook; only a couple of evasions
    let mut board = Board::from_fen("k7/8/8/8/8/8/8/K6r w - - 0 1");
    let legal = board.generate_moves();
    let mut state = SearchState::new(16);
    let result = find_best_move(&mut board, &mut state, &SearchLimits::depth(6), None);
    let mv = result.best_move.expect("should find a move");
    assert!(legal.contains(mv));
}

#[test]
fn deeper_search_still_returns_a_legal_move_from_complex_positions() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let legal = board.generate_moves();
    let mut state = SearchState::new(32);
    let result = find_best_move(&mut board, &mut state, &SearchLimits::depth(4), None);
    assert!(legal.contains(result.best_move.expect("legal move")));
    assert_eq!(result.depth, 4);
    assert!(state.nodes > 0);
}

#[test]
fn search_does_not_disturb_the_board() {
    let mut board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
    let fen_before = board.to_fen();
    let mut state = SearchState::new(16);
    let _ = find_best_move(&mut board, &mut state, &SearchLimits::depth(5), None);
    assert_eq!(board.to_fen(), fen_before, "search must restore every move it makes");
}

#[test]
fn iteration_callback_reports_increasing_depth() {
    use std::cell::RefCell;

    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let depths: RefCell<Vec<u32>> = RefCell::new(Vec::new());
    let callback = |info: &ferrite_chess::board::SearchIterationInfo| {
        depths.borrow_mut().push(info.depth);
    };

    let _ = find_best_move(&mut board, &mut state, &SearchLimits::depth(4), Some(&callback));

    let depths = depths.into_inner();
    assert_eq!(depths, vec![1, 2, 3, 4]);
}

#[cfg(feature = "serde")]
#[test]
fn moves_serialize_roundtrip() {
    let board = Board::new();
    let mv = board.parse_uci_move("e2e4").unwrap();
    let json = serde_json::to_string(&mv).unwrap();
    let back: ferrite_chess::board::Move = serde_json::from_str(&json).unwrap();
    assert_eq!(mv, back);
}
