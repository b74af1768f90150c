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

//! Splitting a template into literal text and `{ ... }` expression bodies

use super::error::{ParseError, ParseResult};

/// A top-level piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'input> {
    /// Literal text with `\{` and `\}` already unescaped
    Text(String),
    /// Raw expression body between the braces
    Expression {
        /// Text between `{` and `}`
        body: &'input str,
        /// Offset of `body` in the template
        body_start: usize,
    },
}

/// Split `source` into text and expression segments
///
/// Only `\{` and `\}` are escapes; any other backslash is kept verbatim, so
/// brace-free text always survives unchanged. Braces inside quoted strings of
/// an expression do not open or close anything.
pub fn split_template(source: &str) -> ParseResult<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => match chars.next_if(|(_, next)| matches!(next, '{' | '}')) {
                Some((_, brace)) => text.push(brace),
                None => text.push('\\'),
            },
            '}' => return Err(ParseError::UnexpectedCloseBrace { position: index }),
            '{' => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                let close = find_closing_brace(index, &mut chars)?;
                let body = &source[index + 1..close];
                if body.trim().is_empty() {
                    return Err(ParseError::EmptyExpression { position: index });
                }
                segments.push(Segment::Expression {
                    body,
                    body_start: index + 1,
                });
            }
            other => text.push(other),
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

fn find_closing_brace(
    open: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> ParseResult<usize> {
    // (quote char, its offset) while inside a string literal
    let mut quote: Option<(char, usize)> = None;
    let mut escaped = false;

    for (index, c) in chars.by_ref() {
        if let Some((q, _)) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some((c, index)),
            '{' => return Err(ParseError::NestedBrace { position: index }),
            '}' => return Ok(index),
            _ => {}
        }
    }

    match quote {
        Some((_, position)) => Err(ParseError::UnclosedString { position }),
        None => Err(ParseError::UnclosedBrace { position: open }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text() {
        assert_eq!(
            split_template("Hello world").unwrap(),
            vec![Segment::Text("Hello world".to_string())]
        );
    }

    #[test]
    fn test_mixed_segments() {
        assert_eq!(
            split_template("Hi {Binding Name}!").unwrap(),
            vec![
                Segment::Text("Hi ".to_string()),
                Segment::Expression {
                    body: "Binding Name",
                    body_start: 4
                },
                Segment::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaped_braces_and_backslashes() {
        assert_eq!(
            split_template(r"C:\temp \{x\}").unwrap(),
            vec![Segment::Text(r"C:\temp {x}".to_string())]
        );
    }

    #[test]
    fn test_braces_inside_strings() {
        assert_eq!(
            split_template("{Binding A|Default:'}'}").unwrap(),
            vec![Segment::Expression {
                body: "Binding A|Default:'}'",
                body_start: 1
            }]
        );
    }

    #[test]
    fn test_brace_errors() {
        assert_eq!(
            split_template("a {Binding B").unwrap_err(),
            ParseError::UnclosedBrace { position: 2 }
        );
        assert_eq!(
            split_template("a } b").unwrap_err(),
            ParseError::UnexpectedCloseBrace { position: 2 }
        );
        assert_eq!(
            split_template("{Binding {A}}").unwrap_err(),
            ParseError::NestedBrace { position: 9 }
        );
        assert_eq!(
            split_template("x { }").unwrap_err(),
            ParseError::EmptyExpression { position: 2 }
        );
        assert_eq!(
            split_template("{Binding A|Default:'x}").unwrap_err(),
            ParseError::UnclosedString { position: 19 }
        );
    }
}
