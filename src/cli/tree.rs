use crate::parsers::SemanticValue;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A labeled tree built by the join functions of a loaded grammar. Shifted
/// tokens are leaves holding their text; each reduction makes a node
/// labeled with the production's join function name.
pub enum Tree {
    Leaf(String),
    Node { label: String, children: Vec<Tree> },
}

impl SemanticValue for Tree {
    fn from_lexeme(text: &str) -> Self {
        Tree::Leaf(text.to_string())
    }
}

impl Tree {
    /// Returns the tree drawn one node per line, with children indented
    /// under their parent by the given number of columns
    pub fn render(&self, indent: usize) -> String {
        let mut out = String::new();
        let mut lasts: Vec<bool> = Vec::new();
        self.render_node(&mut out, &mut lasts, indent.max(1));
        out
    }

    fn render_node(&self, out: &mut String, lasts: &mut Vec<bool>, indent: usize) {
        let name = match self {
            Tree::Leaf(text) => format!("'{}'", text),
            Tree::Node { label, .. } => label.clone(),
        };

        if let Some((&last, rest)) = lasts.split_last() {
            out.push_str(&format_prefix(rest, indent));
            out.push_str(&format!(
                "{:─<w$}{}\n",
                list_item_symbol(last),
                name,
                w = indent
            ));
        } else {
            out.push_str(&name);
            out.push('\n');
        }

        if let Tree::Node { children, .. } = self {
            for (i, child) in children.iter().enumerate() {
                lasts.push(i == children.len() - 1);
                child.render_node(out, lasts, indent);
                lasts.pop();
            }
        }
    }
}

impl fmt::Display for Tree {
    /// Writes the tree as an s-expression
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tree::Leaf(text) => write!(f, "{}", text),
            Tree::Node { label, children } => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Returns the prefix of an output line. For each ancestor, a vertical line
/// is drawn if that ancestor still has children to come.
fn format_prefix(lasts: &[bool], indent: usize) -> String {
    let mut s = String::new();
    for &n in lasts {
        s.push_str(&format!("{:w$}", if n { "" } else { "│" }, w = indent));
    }
    s
}

fn list_item_symbol(last: bool) -> char {
    if last {
        '└'
    } else {
        '├'
    }
}
