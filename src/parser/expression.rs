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

//! Recursive descent parser for a single `{ ... }` expression body
//!
//! ```text
//! expression := pipeline ( '?' operand ':' operand )?
//! pipeline   := source ( '|' IDENT ( ':' operand )* )*
//! source     := 'Binding' path | 'ContextBinding' path | literal | '(' expression ')'
//! operand    := source
//! path       := IDENT ( '.' IDENT )*
//! ```
//!
//! Conditional arms are operands rather than pipelines, so the `:` separating
//! filter arguments never competes with the `:` of the ternary.

use super::error::{ParseError, ParseResult};
use super::lexer::TokenStream;
use super::tokenizer::{Token, Tokenizer};
use crate::ast::{ExpressionNode, LiteralValue, PathRoot, PipeCallData};
use smallvec::SmallVec;

/// Parse one expression body located at `body_start` in the template
pub fn parse_expression_body(body: &str, body_start: usize) -> ParseResult<ExpressionNode> {
    let tokens = Tokenizer::new(body, body_start).tokenize_all()?;
    let mut parser = ExpressionParser {
        stream: TokenStream::new(tokens, body_start + body.len()),
    };

    let expression = parser.expression()?;
    match parser.stream.peek() {
        Some(trailing) => Err(ParseError::UnexpectedToken {
            token: trailing.value.to_string(),
            position: trailing.start,
        }),
        None => Ok(expression),
    }
}

struct ExpressionParser<'input> {
    stream: TokenStream<'input>,
}

impl ExpressionParser<'_> {
    fn expression(&mut self) -> ParseResult<ExpressionNode> {
        let condition = self.pipeline()?;
        if self.stream.consume_if(&Token::Question).is_none() {
            return Ok(condition);
        }

        let when_true = self.source()?;
        if self.stream.consume_if(&Token::Colon).is_none() {
            return Err(ParseError::ExpectedToken {
                expected: "':' between conditional branches".to_string(),
                position: self.stream.current_offset(),
            });
        }
        let when_false = self.source()?;

        Ok(ExpressionNode::conditional(condition, when_true, when_false))
    }

    fn pipeline(&mut self) -> ParseResult<ExpressionNode> {
        let mut node = self.source()?;

        while self.stream.consume_if(&Token::Pipe).is_some() {
            let filter = match self.stream.peek().map(|t| &t.value) {
                Some(Token::Identifier(name)) => name.to_string(),
                _ => {
                    return Err(ParseError::EmptyFilterName {
                        position: self.stream.current_offset(),
                    });
                }
            };
            self.stream.next();

            let mut args = SmallVec::new();
            while self.stream.consume_if(&Token::Colon).is_some() {
                args.push(self.source()?);
            }

            node = ExpressionNode::PipeCall(Box::new(PipeCallData {
                source: node,
                filter,
                args,
            }));
        }

        Ok(node)
    }

    fn source(&mut self) -> ParseResult<ExpressionNode> {
        let position = self.stream.current_offset();
        let Some(token) = self.stream.next() else {
            return Err(ParseError::UnexpectedEndOfInput { position });
        };

        let literal = match token.value {
            Token::Identifier(keyword) => {
                return match PathRoot::from_keyword(keyword) {
                    Some(root) => self.path(root),
                    None => Err(ParseError::UnknownSource {
                        keyword: keyword.to_string(),
                        position,
                    }),
                };
            }
            Token::LeftParen => {
                let inner = self.expression()?;
                if self.stream.consume_if(&Token::RightParen).is_none() {
                    return Err(ParseError::ExpectedToken {
                        expected: "')'".to_string(),
                        position: self.stream.current_offset(),
                    });
                }
                return Ok(inner);
            }
            Token::String(s) => LiteralValue::String(s.into_owned()),
            Token::Integer(i) => LiteralValue::Integer(i),
            Token::Decimal(d) => LiteralValue::Decimal(d),
            Token::True => LiteralValue::Boolean(true),
            Token::False => LiteralValue::Boolean(false),
            Token::Null => LiteralValue::Null,
            other => {
                return Err(ParseError::UnexpectedToken {
                    token: other.to_string(),
                    position,
                });
            }
        };

        Ok(ExpressionNode::Literal(literal))
    }

    fn path(&mut self, root: PathRoot) -> ParseResult<ExpressionNode> {
        let mut segments: SmallVec<[String; 4]> = SmallVec::new();
        segments.push(self.path_segment(None)?);

        while let Some(dot) = self.stream.consume_if(&Token::Dot) {
            segments.push(self.path_segment(Some(dot.start))?);
        }

        Ok(ExpressionNode::PropertyPath { root, segments })
    }

    fn path_segment(&mut self, after_dot: Option<usize>) -> ParseResult<String> {
        let position = self.stream.current_offset();
        let segment = match self.stream.peek().map(|t| &t.value) {
            Some(Token::Identifier(name)) => name.to_string(),
            Some(Token::Dot) => {
                let message = if after_dot.is_some() {
                    "empty segment between '.' separators"
                } else {
                    "path cannot start with '.'"
                };
                return Err(ParseError::InvalidPath {
                    message: message.to_string(),
                    position,
                });
            }
            _ => {
                return Err(match after_dot {
                    Some(dot) => ParseError::InvalidPath {
                        message: "path cannot end with '.'".to_string(),
                        position: dot,
                    },
                    None => ParseError::ExpectedToken {
                        expected: "property name".to_string(),
                        position,
                    },
                });
            }
        };
        self.stream.next();
        Ok(segment)
    }
}
