use super::common::Session;
use crate::parsers::lr::clr::Action;

/// Outputs one line per state, holding its non-error actions followed by
/// its gotos
pub fn output(session: &Session) {
    let g = session.parser.grammar();
    let table = session.parser.table();
    let digits = (table.num_states().checked_ilog10().unwrap_or(0) + 1) as usize;

    for state in 0..table.num_states() {
        let mut line = format!("{:>w$}:", state, w = digits);

        for &t in g.terminals() {
            let action = table.action(state, t);
            if action != Action::Error {
                line.push_str(&format!(" {}={}", session.name(t), action));
            }
        }

        for &nt in g.non_terminals() {
            if let Some(to) = table.goto(state, nt) {
                line.push_str(&format!(" {}→{}", session.name(nt), to));
            }
        }

        println!("{}", line);
    }

    for c in table.conflicts() {
        eprintln!("{}", c);
    }
}
