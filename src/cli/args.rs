use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Command line options for the lrgen tool
pub struct Options {
    /// Grammar description file
    pub grammar: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
/// Commands for the lrgen tool
pub enum Commands {
    /// Summarizes the grammar and its parse tables
    Info {
        #[arg(short, long)]
        verbose: bool,
    },
    /// Outputs FIRST of a symbol
    First { symbol: String },
    /// Outputs FOLLOW of a non-terminal
    Follow { symbol: String },
    /// Outputs the canonical collection of LR(1) items
    Collection,
    /// Outputs the ACTION and GOTO tables
    Tables,
    /// Parses a file of whitespace-separated token names and outputs the
    /// resulting tree
    Check {
        #[arg(long)]
        input: String,

        #[arg(long)]
        indent: Option<usize>,
    },
}
