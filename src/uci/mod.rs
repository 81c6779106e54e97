//! UCI protocol front end.
//!
//! A blocking read-eval loop: the search is single-threaded and runs to
//! its budget inside `go`, so `stop` only matters for cleanup between
//! commands. Also understands `perft <depth>` and `d` for debugging.

pub mod command;
pub mod time;

use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::board::{
    find_best_move, Board, Move, SearchClock, SearchIterationInfo, SearchLimits, SearchState,
};
use crate::tt::DEFAULT_TT_MB;

use command::{parse_go, parse_position};

const ENGINE_NAME: &str = "ferrite";
const ENGINE_AUTHOR: &str = "ferrite contributors";

/// Format a move in coordinate notation for `bestmove` output.
#[must_use]
pub fn format_uci_move(mv: &Move) -> String {
    mv.to_string()
}

fn print_iteration(info: &SearchIterationInfo) {
    let score = match info.mate_in {
        Some(n) => format!("mate {n}"),
        None => format!("cp {}", info.score),
    };
    println!(
        "info depth {} seldepth {} score {} nodes {} nps {} hashfull {} time {} pv {}",
        info.depth,
        info.seldepth,
        score,
        info.nodes,
        info.nps,
        info.hashfull,
        info.time_ms,
        info.pv
    );
    #[cfg(feature = "logging")]
    log::debug!(
        "iteration depth={} score={} nodes={}",
        info.depth,
        info.score,
        info.nodes
    );
}

/// Run the UCI loop on stdin/stdout until `quit`.
pub fn run() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut board = Board::new();
    let mut state = SearchState::new(DEFAULT_TT_MB);
    let mut game_history: Vec<u64> = vec![board.hash()];
    let clock = SearchClock::new(Instant::now(), None);

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.trim().split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "uci" => {
                println!("id name {ENGINE_NAME}");
                println!("id author {ENGINE_AUTHOR}");
                println!(
                    "option name Hash type spin default {DEFAULT_TT_MB} min 1 max 4096"
                );
                println!("uciok");
            }
            "isready" => {
                println!("readyok");
            }
            "ucinewgame" => {
                board = Board::new();
                game_history = vec![board.hash()];
                state.reset();
            }
            "position" => {
                game_history = parse_position(&mut board, &parts);
            }
            "setoption" => {
                // "setoption name Hash value N"
                if let (Some(&"name"), Some(&"Hash"), Some(&"value"), Some(value)) =
                    (parts.get(1), parts.get(2), parts.get(3), parts.get(4))
                {
                    if let Ok(mb) = value.parse::<usize>() {
                        state.tt.resize(mb.clamp(1, 4096));
                    }
                }
            }
            "go" => {
                let params = parse_go(&parts[1..]);
                let budget = time::compute_budget(&params, board.side_to_move());
                let start = Instant::now();
                let deadline = budget.map(|b| start + b);
                clock.reset(start, deadline);

                let mut limits = SearchLimits::depth(params.depth.unwrap_or(64))
                    .with_history(game_history.clone());
                limits.deadline = deadline;
                limits.node_limit = params.nodes.unwrap_or(0);

                let result =
                    find_best_move(&mut board, &mut state, &limits, Some(&print_iteration));

                let (search_start, _) = clock.snapshot();
                println!(
                    "info string searched {} nodes in {} ms",
                    state.nodes,
                    search_start.elapsed().as_millis()
                );
                match result.best_move {
                    Some(mv) => println!("bestmove {}", format_uci_move(&mv)),
                    None => println!("bestmove 0000"),
                }
            }
            "stop" => {
                // Search runs synchronously inside `go`; nothing to halt here
            }
            "perft" => {
                let depth = parts
                    .get(1)
                    .and_then(|d| d.parse::<usize>().ok())
                    .unwrap_or(1);
                let start = Instant::now();
                let mut total = 0u64;
                for (mv, nodes) in board.perft_divide(depth) {
                    println!("{mv}: {nodes}");
                    total += nodes;
                }
                println!(
                    "\nNodes searched: {total} in {} ms",
                    start.elapsed().as_millis()
                );
            }
            "d" => {
                println!("{board}");
            }
            "quit" => break,
            other => {
                eprintln!("info string unknown command: {other}");
            }
        }
        let _ = stdout.flush();
    }
}
