//! The fixed context-free grammar mapping codons to expressions.
//!
//! ```text
//! <expr>    ::= <expr><op><expr> | (<expr><op><expr>) | <pre_op>(<expr>) | <var>
//! <op>      ::= + | - | * | /
//! <pre_op>  ::= sin | cos | exp | log
//! <var>     ::= x | <integer>
//! <integer> ::= 1.0 | 2.0 | 3.0 | 4.0 | 5.0 | 6.0 | 7.0 | 8.0 | 9.0
//! ```

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Unknown nonterminal <{0}>")]
    UnknownNonTerminal(String),

    #[error("Unterminated nonterminal marker in production \"{0}\"")]
    UnterminatedMarker(String),

    #[error("Nonterminal <{0}> has no production alternatives")]
    NoAlternatives(NonTerminal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    Expr,
    Op,
    PreOp,
    Var,
    Integer,
}

impl NonTerminal {
    pub const ALL: [NonTerminal; 5] = [
        NonTerminal::Expr,
        NonTerminal::Op,
        NonTerminal::PreOp,
        NonTerminal::Var,
        NonTerminal::Integer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Expr => "expr",
            NonTerminal::Op => "op",
            NonTerminal::PreOp => "pre_op",
            NonTerminal::Var => "var",
            NonTerminal::Integer => "integer",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, GrammarError> {
        Self::ALL
            .into_iter()
            .find(|nt| nt.name() == name)
            .ok_or_else(|| GrammarError::UnknownNonTerminal(name.to_string()))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Terminal(String),
    NonTerminal(NonTerminal),
}

pub type Production = Vec<Symbol>;

const STANDARD_TABLE: &[(&str, &[&str])] = &[
    (
        "expr",
        &["<expr><op><expr>", "(<expr><op><expr>)", "<pre_op>(<expr>)", "<var>"],
    ),
    ("op", &["+", "-", "*", "/"]),
    ("pre_op", &["sin", "cos", "exp", "log"]),
    ("var", &["x", "<integer>"]),
    (
        "integer",
        &["1.0", "2.0", "3.0", "4.0", "5.0", "6.0", "7.0", "8.0", "9.0"],
    ),
];

#[derive(Debug, Clone)]
pub struct Grammar {
    start: NonTerminal,
    start_symbol: Symbol,
    rules: [Vec<Production>; 5],
}

impl Grammar {
    /// The antiderivative grammar, starting at `<expr>`.
    pub fn standard() -> Result<Self, GrammarError> {
        Self::from_table("expr", STANDARD_TABLE)
    }

    /// Build a grammar from `(nonterminal, alternatives)` rows written in
    /// `<name>` marker notation. Every nonterminal must end up with at least
    /// one alternative.
    pub fn from_table(start: &str, table: &[(&str, &[&str])]) -> Result<Self, GrammarError> {
        let start = NonTerminal::from_name(start)?;
        let mut rules: [Vec<Production>; 5] = Default::default();

        for (name, alternatives) in table {
            let nt = NonTerminal::from_name(name)?;
            for alternative in alternatives.iter() {
                rules[nt.index()].push(parse_production(alternative)?);
            }
        }

        if let Some(empty) = NonTerminal::ALL
            .into_iter()
            .find(|nt| rules[nt.index()].is_empty())
        {
            return Err(GrammarError::NoAlternatives(empty));
        }

        Ok(Self {
            start,
            start_symbol: Symbol::NonTerminal(start),
            rules,
        })
    }

    pub fn start(&self) -> NonTerminal {
        self.start
    }

    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }

    pub fn alternatives(&self, nt: NonTerminal) -> &[Production] {
        &self.rules[nt.index()]
    }
}

fn parse_production(text: &str) -> Result<Production, GrammarError> {
    let mut symbols = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => {
                let close = rest
                    .find('>')
                    .ok_or_else(|| GrammarError::UnterminatedMarker(text.to_string()))?;
                let nt = NonTerminal::from_name(&rest[1..close])?;
                symbols.push(Symbol::NonTerminal(nt));
                rest = &rest[close + 1..];
            }
            Some(open) => {
                symbols.push(Symbol::Terminal(rest[..open].to_string()));
                rest = &rest[open..];
            }
            None => {
                symbols.push(Symbol::Terminal(rest.to_string()));
                rest = "";
            }
        }
    }

    Ok(symbols)
}
