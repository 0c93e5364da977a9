use super::lexer::GrammarLexer;
use super::token::{ALL, EQUALS, FUNC, REDUCE, SEMICOLON, SHIFT, TOK, VAR};
use super::{Grammar, Production, Symbol};
use crate::errors::{Error, Result};
use crate::parsers::lr::Parser;
use crate::parsers::SemanticValue;
use std::collections::BTreeSet;
use std::mem;
use std::sync::OnceLock;

const GRAM: Symbol = Symbol(5001);
const PLIST: Symbol = Symbol(5002);
const PROD: Symbol = Symbol(5003);
const SLIST: Symbol = Symbol(5004);
const SYM: Symbol = Symbol(5005);
const RUL: Symbol = Symbol(5006);
const TLIST: Symbol = Symbol(5007);

#[derive(Debug, Clone, PartialEq, Eq)]
/// A symbol referenced in a production body, by name
pub struct SymbolRef {
    pub name: String,
    pub non_terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A disambiguation clause as written
pub enum RuleSpec {
    AllReduce,
    AllShift,
    /// Shift on the listed tokens, reduce on any other
    ShiftOn(BTreeSet<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A production as written, before names are resolved
pub struct ProductionSpec {
    pub head: String,
    pub body: Vec<SymbolRef>,
    pub join: String,
    pub rule: Option<RuleSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The syntax tree fragment held by a [`GramValue`]
pub enum GramData {
    #[default]
    None,
    Symbol(SymbolRef),
    Symbols(Vec<SymbolRef>),
    Rule(RuleSpec),
    Tokens(BTreeSet<String>),
    Production(ProductionSpec),
    Productions(Vec<ProductionSpec>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The semantic value of the grammar description language: the text of a
/// shifted token, or the fragment built by a reduction
pub struct GramValue {
    pub text: String,
    pub data: GramData,
}

impl SemanticValue for GramValue {
    fn from_lexeme(text: &str) -> Self {
        GramValue {
            text: text.to_string(),
            data: GramData::None,
        }
    }
}

impl From<GramData> for GramValue {
    fn from(data: GramData) -> Self {
        GramValue {
            text: String::new(),
            data,
        }
    }
}

fn take(v: &mut [GramValue], i: usize) -> GramValue {
    v.get_mut(i).map(mem::take).unwrap_or_default()
}

fn join_copy(mut v: Vec<GramValue>) -> GramValue {
    take(&mut v, 0)
}

fn join_var(mut v: Vec<GramValue>) -> GramValue {
    let name = take(&mut v, 0).text;
    GramData::Symbol(SymbolRef {
        name,
        non_terminal: true,
    })
    .into()
}

fn join_tok(mut v: Vec<GramValue>) -> GramValue {
    let name = take(&mut v, 0).text;
    GramData::Symbol(SymbolRef {
        name,
        non_terminal: false,
    })
    .into()
}

fn join_all_reduce(_: Vec<GramValue>) -> GramValue {
    GramData::Rule(RuleSpec::AllReduce).into()
}

fn join_all_shift(_: Vec<GramValue>) -> GramValue {
    GramData::Rule(RuleSpec::AllShift).into()
}

fn join_shift_on(mut v: Vec<GramValue>) -> GramValue {
    match take(&mut v, 0).data {
        GramData::Tokens(tokens) => GramData::Rule(RuleSpec::ShiftOn(tokens)).into(),
        _ => GramData::Rule(RuleSpec::ShiftOn(BTreeSet::new())).into(),
    }
}

fn join_symbols(mut v: Vec<GramValue>) -> GramValue {
    let mut list = match take(&mut v, 0).data {
        GramData::Symbols(list) => list,
        _ => Vec::new(),
    };
    if let GramData::Symbol(s) = take(&mut v, 1).data {
        list.push(s);
    }
    GramData::Symbols(list).into()
}

fn join_empty_symbols(_: Vec<GramValue>) -> GramValue {
    GramData::Symbols(Vec::new()).into()
}

fn join_tokens(mut v: Vec<GramValue>) -> GramValue {
    let mut tokens = match take(&mut v, 0).data {
        GramData::Tokens(tokens) => tokens,
        _ => BTreeSet::new(),
    };
    tokens.insert(take(&mut v, 1).text);
    GramData::Tokens(tokens).into()
}

fn join_empty_tokens(_: Vec<GramValue>) -> GramValue {
    GramData::Tokens(BTreeSet::new()).into()
}

fn join_production(mut v: Vec<GramValue>) -> GramValue {
    let rule = match take(&mut v, 5).data {
        GramData::Rule(rule) => Some(rule),
        _ => None,
    };
    let body = match take(&mut v, 2).data {
        GramData::Symbols(body) => body,
        _ => Vec::new(),
    };

    GramData::Production(ProductionSpec {
        head: take(&mut v, 0).text,
        body,
        join: take(&mut v, 3).text,
        rule,
    })
    .into()
}

fn join_productions(mut v: Vec<GramValue>) -> GramValue {
    let mut list = match take(&mut v, 0).data {
        GramData::Productions(list) => list,
        _ => Vec::new(),
    };
    if let GramData::Production(p) = take(&mut v, 1).data {
        list.push(p);
    }
    GramData::Productions(list).into()
}

fn join_empty_productions(_: Vec<GramValue>) -> GramValue {
    GramData::Productions(Vec::new()).into()
}

/// Returns the grammar of the grammar description language
fn meta_grammar() -> Result<Grammar<GramValue>> {
    Grammar::new(vec![
        Production::new(Symbol::START, vec![GRAM], join_copy),
        Production::new(GRAM, vec![PLIST], join_copy),
        Production::new(PLIST, vec![PLIST, PROD], join_productions),
        Production::new(PLIST, vec![], join_empty_productions),
        Production::new(
            PROD,
            vec![VAR, EQUALS, SLIST, FUNC, SEMICOLON, RUL],
            join_production,
        ),
        Production::new(
            PROD,
            vec![VAR, EQUALS, SLIST, FUNC, SEMICOLON],
            join_production,
        ),
        Production::new(SLIST, vec![SLIST, SYM], join_symbols),
        Production::new(SLIST, vec![], join_empty_symbols),
        Production::new(SYM, vec![VAR], join_var),
        Production::new(SYM, vec![TOK], join_tok),
        Production::new(RUL, vec![ALL, REDUCE], join_all_reduce),
        Production::new(RUL, vec![ALL, SHIFT], join_all_shift),
        Production::new(RUL, vec![TLIST, SHIFT], join_shift_on),
        Production::new(TLIST, vec![TLIST, TOK], join_tokens),
        Production::new(TLIST, vec![], join_empty_tokens),
    ])
}

/// Returns the parser for the grammar description language, building it on
/// first use
pub fn meta_parser() -> Result<&'static Parser<GramValue>> {
    static META: OnceLock<Result<Parser<GramValue>>> = OnceLock::new();
    META.get_or_init(|| meta_grammar().map(Parser::new))
        .as_ref()
        .map_err(Clone::clone)
}

/// Parses a grammar description into a list of unresolved productions
pub fn parse(input: &str) -> Result<Vec<ProductionSpec>> {
    let value = meta_parser()?.parse(&mut GrammarLexer::new(input))?;

    match value.data {
        GramData::Productions(list) => Ok(list),
        other => Err(Error::InvalidGrammarFile(format!(
            "expected a list of productions, found {:?}",
            other
        ))),
    }
}
