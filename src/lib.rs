pub mod cli;
pub mod errors;
pub mod grammar;
pub mod parsers;
pub mod position;
