//! Board and search unit tests.

mod movegen;
mod perft;
