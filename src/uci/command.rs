//! UCI command parsing.

use crate::board::Board;

/// Arguments of a `go` command.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub depth: Option<u32>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub nodes: Option<u64>,
    pub infinite: bool,
}

/// Parse the tokens following `go`.
pub fn parse_go(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 0;
    while i < parts.len() {
        let value = parts.get(i + 1).and_then(|v| v.parse::<u64>().ok());
        match parts[i] {
            "depth" => {
                params.depth = value.map(|v| v as u32);
                i += 2;
            }
            "movetime" => {
                params.movetime_ms = value;
                i += 2;
            }
            "wtime" => {
                params.wtime_ms = value;
                i += 2;
            }
            "btime" => {
                params.btime_ms = value;
                i += 2;
            }
            "winc" => {
                params.winc_ms = value;
                i += 2;
            }
            "binc" => {
                params.binc_ms = value;
                i += 2;
            }
            "nodes" => {
                params.nodes = value;
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    params
}

/// Apply a `position` command: rebuild the board and the Zobrist history
/// of the game line (for repetition detection inside the search).
///
/// Returns the history including the final position's key. Invalid moves
/// stop application and leave the board at the last valid position.
pub fn parse_position(board: &mut Board, parts: &[&str]) -> Vec<u64> {
    let mut i = 1;
    if parts.get(i) == Some(&"startpos") {
        *board = Board::new();
        i += 1;
    } else if parts.get(i) == Some(&"fen") {
        let end = (i + 7).min(parts.len());
        let fen = parts[i + 1..end].join(" ");
        match Board::try_from_fen(&fen) {
            Ok(parsed) => *board = parsed,
            Err(err) => {
                eprintln!("info string invalid fen: {err}");
                return vec![board.hash()];
            }
        }
        i = end;
    }

    let mut history = vec![board.hash()];
    if parts.get(i) == Some(&"moves") {
        i += 1;
        while i < parts.len() {
            match board.parse_uci_move(parts[i]) {
                Ok(mv) => {
                    board.make_move(mv);
                    history.push(board.hash());
                }
                Err(err) => {
                    eprintln!("info string rejected move {}: {err}", parts[i]);
                    break;
                }
            }
            i += 1;
        }
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_go_mixed_arguments() {
        let params = parse_go(&["depth", "9", "wtime", "60000", "winc", "500"]);
        assert_eq!(params.depth, Some(9));
        assert_eq!(params.wtime_ms, Some(60_000));
        assert_eq!(params.winc_ms, Some(500));
        assert!(!params.infinite);
    }

    #[test]
    fn parse_go_ignores_garbage() {
        let params = parse_go(&["depth", "x", "blah", "infinite"]);
        assert_eq!(params.depth, None);
        assert!(params.infinite);
    }

    #[test]
    fn position_startpos_with_moves() {
        let mut board = Board::new();
        let history = parse_position(&mut board, &["position", "startpos", "moves", "e2e4", "e7e5"]);
        assert_eq!(history.len(), 3);
        assert_eq!(*history.last().unwrap(), board.hash());
        assert!(board.to_fen().starts_with("rnbqkbnr/pppp1ppp/8/4p3/4P3"));
    }

    #[test]
    fn position_fen_form() {
        let mut board = Board::new();
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1";
        let mut parts = vec!["position", "fen"];
        parts.extend(fen.split_whitespace());
        parse_position(&mut board, &parts);
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn illegal_move_stops_application() {
        let mut board = Board::new();
        let history =
            parse_position(&mut board, &["position", "startpos", "moves", "e2e4", "e2e4"]);
        // The second e2e4 is illegal; board stays after the first
        assert_eq!(history.len(), 2);
        assert!(board.to_fen().contains("4P3"));
    }
}
