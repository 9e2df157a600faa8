//! Tokenizer for rule text.
//!
//! Token recognition uses `nom` combinators. At each position the token
//! classes are tried in a fixed order; a position matching none of them is
//! skipped, so the tokenizer itself never fails.

use std::fmt;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, one_of},
    combinator::{map, opt, recognize, value},
    sequence::pair,
};

/// A lexical token borrowed from the rule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// The `AND` keyword.
    And,
    /// The `OR` keyword.
    Or,
    /// A run matching `[<>=]=?`.
    Operator(&'a str),
    /// A maximal run of `[A-Za-z0-9_']`: identifier, integer, or quoted string.
    Atom(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::Operator(text) | Self::Atom(text) => f.write_str(text),
        }
    }
}

fn is_atom_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// Recognize a single token at the start of `input`.
///
/// Keywords are matched as prefixes before atoms, so `ORDER` yields `OR`
/// followed by the atom `DER`.
fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
        value(Token::And, tag("AND")),
        value(Token::Or, tag("OR")),
        map(recognize(pair(one_of("<>="), opt(char('=')))), Token::Operator),
        map(take_while1(is_atom_char), Token::Atom),
    ))(input)
}

/// Split rule text into tokens, dropping whitespace and any character that
/// belongs to no token class (including `.` and `-`).
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        if let Ok((next, tok)) = token(rest) {
            tokens.push(tok);
            rest = next;
        } else {
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
    }
    tokens
}
