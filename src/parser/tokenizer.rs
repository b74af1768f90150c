// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tokenizer for the body of a `{ ... }` expression
//!
//! Identifiers and unescaped strings are zero-copy slices of the template.
//! Token positions are absolute offsets into the whole template so errors can
//! point at the right column.

use super::error::{ParseError, ParseResult};
use super::lexer::{is_identifier_continue, is_identifier_start};
use super::span::Spanned;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Token of the expression language
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'input> {
    /// Identifier: binding keyword, path segment or filter name
    Identifier(&'input str),
    /// Quoted string literal with escapes resolved
    String(Cow<'input, str>),
    /// Integer literal
    Integer(i64),
    /// Decimal literal
    Decimal(Decimal),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// Pipe `|`
    Pipe,
    /// Colon `:`
    Colon,
    /// Dot `.`
    Dot,
    /// Question mark `?`
    Question,
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "{name}"),
            Token::String(s) => write!(f, "'{s}'"),
            Token::Integer(i) => write!(f, "{i}"),
            Token::Decimal(d) => write!(f, "{d}"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Pipe => write!(f, "|"),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
            Token::Question => write!(f, "?"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// Tokenizer over one expression body
pub struct Tokenizer<'input> {
    input: &'input str,
    /// Offset of `input` inside the full template
    base: usize,
    /// Byte position inside `input`
    position: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a tokenizer for `input`, which starts at `base` in the template
    pub fn new(input: &'input str, base: usize) -> Self {
        Self {
            input,
            base,
            position: 0,
        }
    }

    /// Tokenize the whole body
    pub fn tokenize_all(mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.position..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn absolute(&self, local: usize) -> usize {
        self.base + local
    }

    fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }

        let start = self.position;
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let token = match c {
            '|' => self.single(Token::Pipe),
            ':' => self.single(Token::Colon),
            '.' => self.single(Token::Dot),
            '?' => self.single(Token::Question),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            '\'' | '"' => self.string(c)?,
            '0'..='9' => self.number()?,
            '-' if self.peek_char_at(1).is_some_and(|n| n.is_ascii_digit()) => self.number()?,
            c if is_identifier_start(c) => self.identifier(),
            '{' => {
                return Err(ParseError::NestedBrace {
                    position: self.absolute(start),
                });
            }
            other => {
                return Err(ParseError::InvalidCharacter {
                    character: other,
                    position: self.absolute(start),
                });
            }
        };

        Ok(Some(Spanned::new(
            token,
            self.absolute(start),
            self.absolute(self.position),
        )))
    }

    fn single(&mut self, token: Token<'input>) -> Token<'input> {
        self.advance();
        token
    }

    fn identifier(&mut self) -> Token<'input> {
        let input = self.input;
        let start = self.position;
        self.advance();
        while self.peek_char().is_some_and(is_identifier_continue) {
            self.advance();
        }

        match &input[start..self.position] {
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            name => Token::Identifier(name),
        }
    }

    fn number(&mut self) -> ParseResult<Token<'input>> {
        let start = self.position;
        if self.peek_char() == Some('-') {
            self.advance();
        }
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let is_decimal = self.peek_char() == Some('.')
            && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit());
        if is_decimal {
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.position];
        let invalid = || ParseError::InvalidNumber {
            value: text.to_string(),
            position: self.absolute(start),
        };

        if is_decimal {
            Decimal::from_str(text).map(Token::Decimal).map_err(|_| invalid())
        } else {
            text.parse::<i64>().map(Token::Integer).map_err(|_| invalid())
        }
    }

    fn string(&mut self, quote: char) -> ParseResult<Token<'input>> {
        let input = self.input;
        let start = self.position;
        self.advance();
        let content_start = self.position;
        let mut owned: Option<String> = None;

        loop {
            let Some(c) = self.advance() else {
                return Err(ParseError::UnclosedString {
                    position: self.absolute(start),
                });
            };

            if c == quote {
                let end = self.position - quote.len_utf8();
                return Ok(Token::String(match owned {
                    Some(s) => Cow::Owned(s),
                    None => Cow::Borrowed(&input[content_start..end]),
                }));
            }

            if c == '\\' {
                let escape_at = self.position - 1;
                let buffer =
                    owned.get_or_insert_with(|| input[content_start..escape_at].to_string());
                let Some(escaped) = self.advance() else {
                    return Err(ParseError::UnclosedString {
                        position: self.absolute(start),
                    });
                };
                buffer.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            } else if let Some(buffer) = owned.as_mut() {
                buffer.push(c);
            }
        }
    }
}
