//! Lexical analysis utilities

use super::span::Spanned;
use super::tokenizer::Token;
use std::mem;

/// Check if a character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_start(c) || c == '_'
}

/// Check if a character can continue an identifier
pub fn is_identifier_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c)
}

/// Token stream with lookahead capability
#[derive(Debug)]
pub struct TokenStream<'input> {
    tokens: Vec<Spanned<Token<'input>>>,
    position: usize,
    /// Offset just past the expression body, reported on premature end
    end_offset: usize,
}

impl<'input> TokenStream<'input> {
    /// Create a new token stream
    pub fn new(tokens: Vec<Spanned<Token<'input>>>, end_offset: usize) -> Self {
        Self {
            tokens,
            position: 0,
            end_offset,
        }
    }

    /// Peek at the current token without consuming
    pub fn peek(&self) -> Option<&Spanned<Token<'input>>> {
        self.tokens.get(self.position)
    }

    /// Consume and return the current token
    pub fn next(&mut self) -> Option<Spanned<Token<'input>>> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Check if we're at the end of the stream
    pub fn is_eof(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Offset of the current token, or of the end of the body
    pub fn current_offset(&self) -> usize {
        self.peek().map(|t| t.start).unwrap_or(self.end_offset)
    }

    /// Check whether the current token has the same kind as `expected`
    pub fn at(&self, expected: &Token<'_>) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(&t.value) == mem::discriminant(expected))
    }

    /// Consume the current token if it has the same kind as `expected`
    pub fn consume_if(&mut self, expected: &Token<'_>) -> Option<Spanned<Token<'input>>> {
        if self.at(expected) {
            self.next()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('Z'));
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('0'));
        assert!(!is_identifier_start('-'));

        assert!(is_identifier_continue('a'));
        assert!(is_identifier_continue('0'));
        assert!(is_identifier_continue('_'));
        assert!(!is_identifier_continue('-'));
    }

    #[test]
    fn test_consume_if_matches_kind_only() {
        let tokens = vec![
            Spanned::new(Token::Identifier("Binding"), 1, 8),
            Spanned::new(Token::Pipe, 9, 10),
        ];
        let mut stream = TokenStream::new(tokens, 10);

        assert!(stream.consume_if(&Token::Pipe).is_none());
        assert!(stream.consume_if(&Token::Identifier("")).is_some());
        assert_eq!(stream.current_offset(), 9);
        assert!(stream.consume_if(&Token::Pipe).is_some());
        assert!(stream.is_eof());
        assert_eq!(stream.current_offset(), 10);
    }
}
