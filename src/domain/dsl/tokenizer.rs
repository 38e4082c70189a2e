//! DSL tokenizer for syntax highlighting.
//!
//! Token classes are tried in a fixed order at each position: identifier,
//! number, string, bracket, arithmetic operator, comparison operator, delimiter.
//! Whitespace and characters no class accepts produce no token.
//!
//! [`LanguageDefinition`] exposes the same rules as regex sources so an editor
//! (Monarch or similar) can install an equivalent tokenizer.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Identifier,
    Number,
    String,
    Bracket,
    ArithmeticOperator,
    ComparisonOperator,
    Delimiter,
}

impl TokenClass {
    /// Order in which classes are tried.
    pub const ORDER: [TokenClass; 7] = [
        TokenClass::Identifier,
        TokenClass::Number,
        TokenClass::String,
        TokenClass::Bracket,
        TokenClass::ArithmeticOperator,
        TokenClass::ComparisonOperator,
        TokenClass::Delimiter,
    ];

    /// Editor token name.
    pub fn scope(&self) -> &'static str {
        match self {
            TokenClass::Identifier => "identifier",
            TokenClass::Number => "number",
            TokenClass::String => "string",
            TokenClass::Bracket => "delimiter.bracket",
            TokenClass::ArithmeticOperator => "operator.arithmetic",
            TokenClass::ComparisonOperator => "operator.comparison",
            TokenClass::Delimiter => "delimiter",
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            TokenClass::Identifier => "[A-Za-z_][A-Za-z0-9_]*",
            TokenClass::Number => "\\d+(\\.\\d+)?",
            TokenClass::String => "\"[^\"]*\"|'[^']*'",
            TokenClass::Bracket => "[()\\[\\]]",
            TokenClass::ArithmeticOperator => "[+\\-*/]",
            TokenClass::ComparisonOperator => "==|!=|>=|<=|>|<",
            TokenClass::Delimiter => ",",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub class: TokenClass,
    /// Byte offsets into the source line.
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRule {
    pub token: &'static str,
    pub regex: &'static str,
}

/// Declarative tokenizer description handed to an editor at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageDefinition {
    pub rules: Vec<TokenRule>,
}

impl LanguageDefinition {
    pub fn dsl() -> Self {
        Self {
            rules: TokenClass::ORDER
                .iter()
                .map(|c| TokenRule {
                    token: c.scope(),
                    regex: c.pattern(),
                })
                .collect(),
        }
    }
}

impl Default for LanguageDefinition {
    fn default() -> Self {
        Self::dsl()
    }
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Length in bytes of a match of `class` at the current position.
    fn match_len(&self, class: TokenClass) -> Option<usize> {
        let rest = self.remaining();
        let bytes = rest.as_bytes();
        let first = *bytes.first()?;
        match class {
            TokenClass::Identifier => {
                if !(first.is_ascii_alphabetic() || first == b'_') {
                    return None;
                }
                Some(
                    bytes
                        .iter()
                        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                        .count(),
                )
            }
            TokenClass::Number => {
                let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
                if int_len == 0 {
                    return None;
                }
                let frac = &bytes[int_len..];
                if frac.first() == Some(&b'.') {
                    let frac_len = frac[1..].iter().take_while(|b| b.is_ascii_digit()).count();
                    if frac_len > 0 {
                        return Some(int_len + 1 + frac_len);
                    }
                }
                Some(int_len)
            }
            TokenClass::String => {
                if first != b'"' && first != b'\'' {
                    return None;
                }
                rest[1..].find(first as char).map(|close| close + 2)
            }
            TokenClass::Bracket => matches!(first, b'(' | b')' | b'[' | b']').then_some(1),
            TokenClass::ArithmeticOperator => {
                matches!(first, b'+' | b'-' | b'*' | b'/').then_some(1)
            }
            TokenClass::ComparisonOperator => {
                if ["==", "!=", ">=", "<="].iter().any(|op| rest.starts_with(op)) {
                    Some(2)
                } else {
                    matches!(first, b'>' | b'<').then_some(1)
                }
            }
            TokenClass::Delimiter => (first == b',').then_some(1),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace();
            self.peek()?;
            let start = self.pos;
            for class in TokenClass::ORDER {
                if let Some(len) = self.match_len(class) {
                    self.pos += len;
                    return Some(Token {
                        class,
                        start,
                        end: self.pos,
                        text: self.input[start..self.pos].to_string(),
                    });
                }
            }
            self.advance();
        }
    }
}

/// Tokenize one line of DSL text.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}
