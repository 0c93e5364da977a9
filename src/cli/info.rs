use super::common::{self, Session};

/// Outputs information about a grammar and its parse tables
pub fn output(session: &Session, verbose: bool) {
    let width = 24;
    let g = session.parser.grammar();
    let table = session.parser.table();
    let unresolved = table.conflicts().iter().filter(|c| !c.is_fatal()).count();

    println!(
        "{:w$}: {}",
        "Number of productions",
        g.num_productions(),
        w = width
    );
    println!(
        "{:w$}: {}",
        "Number of non-terminals",
        g.non_terminals().len(),
        w = width
    );
    println!(
        "{:w$}: {}",
        "Number of terminals",
        g.terminals().len(),
        w = width
    );
    println!(
        "{:w$}: {}",
        "Number of LR(1) states",
        table.num_states(),
        w = width
    );
    println!(
        "{:w$}: {}",
        "Unresolved conflicts",
        unresolved,
        w = width
    );
    println!(
        "{:w$}: {}",
        "Load errors",
        session.diagnostics.len(),
        w = width
    );
    println!(
        "{:w$}: {}",
        "LR(1)",
        !session.parser.has_conflicts() && session.diagnostics.is_empty(),
        w = width
    );

    if verbose {
        print_list(
            "Non-terminals",
            g.non_terminals().iter().map(|&nt| session.name(nt)),
            width,
        );
        print_list(
            "Terminals",
            g.terminals().iter().map(|&t| session.name(t)),
            width,
        );

        println!("Productions:");
        let digits = (g.num_productions().checked_ilog10().unwrap_or(0) + 1) as usize;
        for id in 0..g.num_productions() {
            println!("{:>w$}: {}", id, session.format_production(id), w = digits);
        }

        if !table.conflicts().is_empty() {
            println!("Conflicts:");
            for c in table.conflicts() {
                println!("  {}", c);
            }
        }
    }
}

/// Prints a labeled list of values, wrapping lines to fit
fn print_list(label: &str, values: impl Iterator<Item = String>, width: usize) {
    print!("{:w$}:", label, w = width);

    let mut line = String::new();
    for value in values {
        if !line.is_empty() && value.len() + 1 + line.len() > (common::LINE_LENGTH - width) {
            println!("{}", line);
            print!("{:w$} ", "", w = width);
            line = String::new();
        }
        line.push_str(&format!(" {}", value));
    }
    println!("{}", line);
}
