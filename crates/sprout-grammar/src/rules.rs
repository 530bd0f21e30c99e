//! Rule IR: the tagged tree representing one grammar production.

use serde_json::{Value, json};

/// A single grammar production, fully formed at construction.
///
/// `Symbol` references other rules by name rather than by ownership edge,
/// which is what allows mutually recursive rules without a cyclic tree.
/// Names are resolved once, when the containing [`Grammar`](crate::Grammar)
/// is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Epsilon (matches empty input).
    Blank,
    /// Literal token.
    String(String),
    /// Literal token with reserved-word lexical handling.
    Keyword(String),
    /// Regex token.
    Pattern(String),
    /// Reference to another rule by name.
    Symbol(String),
    /// Ordered concatenation.
    Seq(Vec<Rule>),
    /// Ordered alternation; earlier members win on ambiguity.
    Choice(Vec<Rule>),
    /// Zero or more repetitions.
    Repeat(Box<Rule>),
    /// One or more repetitions.
    Repeat1(Box<Rule>),
    /// Force the content to be lexed as a single token.
    Token(Box<Rule>),
    /// Explicit error-recovery content.
    Error(Box<Rule>),
    /// Precedence hint.
    Prec { value: i32, content: Box<Rule> },
    /// Left-associative precedence hint.
    PrecLeft { value: i32, content: Box<Rule> },
    /// Right-associative precedence hint.
    PrecRight { value: i32, content: Box<Rule> },
}

impl Rule {
    /// The `type` tag this rule serializes under.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Blank => "BLANK",
            Rule::String(_) => "STRING",
            Rule::Keyword(_) => "KEYWORD",
            Rule::Pattern(_) => "PATTERN",
            Rule::Symbol(_) => "SYMBOL",
            Rule::Seq(_) => "SEQ",
            Rule::Choice(_) => "CHOICE",
            Rule::Repeat(_) => "REPEAT",
            Rule::Repeat1(_) => "REPEAT1",
            Rule::Token(_) => "TOKEN",
            Rule::Error(_) => "ERROR",
            Rule::Prec { .. } => "PREC",
            Rule::PrecLeft { .. } => "PREC_LEFT",
            Rule::PrecRight { .. } => "PREC_RIGHT",
        }
    }

    /// Serialize to the tagged JSON form consumed by the table generator.
    ///
    /// This is the inverse of [`build_rule`](crate::build_rule) for every
    /// well-formed rule tree.
    pub fn to_json(&self) -> Value {
        match self {
            Rule::Blank => json!({ "type": "BLANK" }),
            Rule::String(value) => json!({ "type": "STRING", "value": value }),
            Rule::Keyword(value) => json!({ "type": "KEYWORD", "value": value }),
            Rule::Pattern(value) => json!({ "type": "PATTERN", "value": value }),
            Rule::Symbol(name) => json!({ "type": "SYMBOL", "name": name }),
            Rule::Seq(members) => json!({
                "type": "SEQ",
                "members": members.iter().map(Rule::to_json).collect::<Vec<_>>(),
            }),
            Rule::Choice(members) => json!({
                "type": "CHOICE",
                "members": members.iter().map(Rule::to_json).collect::<Vec<_>>(),
            }),
            Rule::Repeat(content) => json!({ "type": "REPEAT", "content": content.to_json() }),
            Rule::Repeat1(content) => json!({ "type": "REPEAT1", "content": content.to_json() }),
            Rule::Token(content) => json!({ "type": "TOKEN", "content": content.to_json() }),
            Rule::Error(content) => json!({ "type": "ERROR", "content": content.to_json() }),
            Rule::Prec { value, content } => json!({
                "type": "PREC", "value": value, "content": content.to_json(),
            }),
            Rule::PrecLeft { value, content } => json!({
                "type": "PREC_LEFT", "value": value, "content": content.to_json(),
            }),
            Rule::PrecRight { value, content } => json!({
                "type": "PREC_RIGHT", "value": value, "content": content.to_json(),
            }),
        }
    }

    /// Visit every `Symbol` name in this tree, in source order.
    ///
    /// The first visit returning `Err` aborts the walk.
    pub fn visit_symbols<E>(&self, f: &mut impl FnMut(&str) -> Result<(), E>) -> Result<(), E> {
        match self {
            Rule::Blank | Rule::String(_) | Rule::Keyword(_) | Rule::Pattern(_) => Ok(()),
            Rule::Symbol(name) => f(name),
            Rule::Seq(members) | Rule::Choice(members) => {
                for member in members {
                    member.visit_symbols(f)?;
                }
                Ok(())
            }
            Rule::Repeat(content)
            | Rule::Repeat1(content)
            | Rule::Token(content)
            | Rule::Error(content)
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. } => content.visit_symbols(f),
        }
    }
}
