use super::common::{self, Session};
use crate::grammar::firstfollow::Builder;

/// Outputs FIRST(s)
pub fn output(session: &Session, s: &str) {
    let Some(symbol) = session.symbol(s) else {
        eprintln!("Unrecognized symbol '{}'", s);
        std::process::exit(1);
    };

    // Symbol ordering puts ϵ last
    let ff = Builder::new(session.parser.grammar());
    common::print_wrapped(ff.first(symbol).into_iter().map(|f| session.name(f)));
}
