use super::common::{self, Session};
use crate::grammar::firstfollow::Builder;

/// Outputs FOLLOW(nt)
pub fn output(session: &Session, nt: &str) {
    let Some(symbol) = session.symbol(nt).filter(|s| s.is_non_terminal()) else {
        eprintln!("Unrecognized non-terminal '{}'", nt);
        std::process::exit(1);
    };

    let ff = Builder::new(session.parser.grammar());
    common::print_wrapped(ff.follow(symbol).into_iter().map(|f| session.name(f)));
}
