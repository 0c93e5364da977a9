pub mod args;
pub mod check;
pub mod collection;
pub mod common;
pub mod first;
pub mod follow;
pub mod info;
pub mod tables;
pub mod tree;
pub mod words;
use crate::errors::Result;
use args::{Commands, Options};
use common::Session;

/// Loads the grammar named in the options and runs the selected command.
/// With no command, outputs information about the grammar.
pub fn run(opts: &Options) -> Result<()> {
    let session = Session::load(&opts.grammar)?;

    match &opts.command {
        None => info::output(&session, false),
        Some(Commands::Info { verbose }) => info::output(&session, *verbose),
        Some(Commands::First { symbol }) => first::output(&session, symbol),
        Some(Commands::Follow { symbol }) => follow::output(&session, symbol),
        Some(Commands::Collection) => collection::output(&session),
        Some(Commands::Tables) => tables::output(&session),
        Some(Commands::Check { input, indent }) => {
            check::output(&session, input, indent.unwrap_or(2))?
        }
    }

    Ok(())
}
