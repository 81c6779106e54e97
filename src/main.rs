fn main() {
    ferrite_chess::uci::run();
}
