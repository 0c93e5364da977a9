use clap::Parser;
use lrgen::cli::{self, args::Options};

fn main() {
    let opts = Options::parse();

    if let Err(e) = cli::run(&opts) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
