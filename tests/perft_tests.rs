//! Perft through the public API, including the reference counts from the
//! standard initial position.

use ferrite_chess::board::Board;

#[test]
fn startpos_reference_counts() {
    let board = Board::new();
    assert_eq!(board.perft(1), 20);
    assert_eq!(board.perft(2), 400);
    assert_eq!(board.perft(3), 8902);
    assert_eq!(board.perft(4), 197_281);
}

#[test]
fn kiwipete_counts() {
    let board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    assert_eq!(board.perft(1), 48);
    assert_eq!(board.perft(2), 2039);
    assert_eq!(board.perft(3), 97_862);
}

#[test]
fn promotion_heavy_position() {
    let board = Board::from_fen("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1");
    assert_eq!(board.perft(1), 24);
    assert_eq!(board.perft(2), 496);
    assert_eq!(board.perft(3), 9483);
}

#[test]
fn perft_is_pure() {
    // Counting the tree must not disturb the position
    let board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    let fen_before = board.to_fen();
    let hash_before = board.hash();
    let _ = board.perft(3);
    assert_eq!(board.to_fen(), fen_before);
    assert_eq!(board.hash(), hash_before);
}
