use super::common::Session;

/// Outputs the canonical collection of LR(1) items, with the transitions
/// out of each state
pub fn output(session: &Session) {
    let automaton = session.parser.automaton();

    for (i, node) in automaton.nodes.iter().enumerate() {
        println!("I{}:", node.id);

        for item in &node.items {
            println!("{}", session.format_item(item));
        }

        for (&symbol, &to) in &node.arcs {
            println!("  on {} → I{}", session.name(symbol), to);
        }

        if i != automaton.len() - 1 {
            println!();
        }
    }
}
