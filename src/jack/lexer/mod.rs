//! # HLL Tokenizer
//!
//! Streams characters from source text into [`Token`]s one at a time.
//! Comments (`// …` and `/* … */`, the latter possibly spanning lines)
//! and whitespace are skipped transparently.
//!
//! Unlike a batch tokenizer that hands back a `Vec<Token>` up front, this
//! one exposes the stateful interface the parser is built against:
//! [`Tokenizer::current`], [`Tokenizer::advance`], [`Tokenizer::has_more`],
//! [`Tokenizer::current_line`]. The first token is loaded eagerly during
//! construction so `current()` is valid immediately. Once the stream is
//! exhausted, `current()` returns `None` and `advance()` is a no-op.

pub mod cursor;


use crate::jack::error::{ErrorKind, JackError, Span};
use crate::jack::token::{lookup_reserved_word, Token, TokenKind, SYMBOLS};
use cursor::Cursor;

const MAX_INTEGER_CONSTANT: u32 = 32767;
const MAX_INTEGER_DIGITS: usize = 5;

pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    current: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Result<Self, JackError> {
        if source.is_empty() {
            return Err(JackError::new(
                ErrorKind::ParseError,
                "cannot tokenize an empty input stream",
                Span::new(1, 1),
            ));
        }
        let mut tokenizer = Self {
            cursor: Cursor::new(source),
            current: None,
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_line(&self) -> usize {
        self.cursor.current_pos().0
    }

    /// Advance to the next token, skipping whitespace and comments. A no-op
    /// once the stream is exhausted.
    pub fn advance(&mut self) -> Result<(), JackError> {
        loop {
            self.skip_whitespace();
            if self.cursor.is_at_end() {
                self.current = None;
                return Ok(());
            }

            let (sl, sc) = self.cursor.current_pos();
            let ch = self.cursor.peek().unwrap();

            if ch == '/' {
                match self.cursor.peek_at(1) {
                    Some('/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') => {
                        self.skip_block_comment(sl, sc)?;
                        continue;
                    }
                    _ => {
                        self.cursor.advance();
                        self.current = Some(Token {
                            kind: TokenKind::Symbol('/'),
                            span: Span::new(sl, sc),
                        });
                        return Ok(());
                    }
                }
            }

            if SYMBOLS.contains(ch) {
                self.cursor.advance();
                self.current = Some(Token {
                    kind: TokenKind::Symbol(ch),
                    span: Span::new(sl, sc),
                });
                return Ok(());
            }

            if ch.is_ascii_digit() {
                self.current = Some(self.lex_integer(sl, sc)?);
                return Ok(());
            }

            if ch == '"' {
                self.current = Some(self.lex_string(sl, sc)?);
                return Ok(());
            }

            if ch.is_ascii_alphabetic() || ch == '_' {
                self.current = Some(self.lex_word(sl, sc));
                return Ok(());
            }

            return Err(JackError::new(
                ErrorKind::ParseError,
                format!("unexpected character '{ch}'"),
                Span::new(sl, sc),
            ));
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.peek(), Some(c) if c.is_whitespace()) {
            self.cursor.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        self.cursor.advance(); // first '/'
        self.cursor.advance(); // second '/'
        while !matches!(self.cursor.peek(), None | Some('\n')) {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self, sl: usize, sc: usize) -> Result<(), JackError> {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(JackError::new(
                        ErrorKind::ParseError,
                        "unterminated block comment",
                        Span::new(sl, sc),
                    ))
                }
                Some('*') if self.cursor.peek_at(1) == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    return Ok(());
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_integer(&mut self, sl: usize, sc: usize) -> Result<Token, JackError> {
        let mut digits = String::new();
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_digit()) {
            digits.push(self.cursor.advance().unwrap());
            if digits.len() > MAX_INTEGER_DIGITS {
                return Err(JackError::new(
                    ErrorKind::ParseError,
                    format!("integer constant '{digits}' exceeds {MAX_INTEGER_DIGITS} digits"),
                    Span::new(sl, sc),
                ));
            }
        }
        let value: u32 = digits.parse().expect("digits are ascii decimal");
        if value > MAX_INTEGER_CONSTANT {
            return Err(JackError::new(
                ErrorKind::ParseError,
                format!("integer constant {value} exceeds {MAX_INTEGER_CONSTANT}"),
                Span::new(sl, sc),
            ));
        }
        Ok(Token {
            kind: TokenKind::IntegerConstant(value as u16),
            span: Span::new(sl, sc),
        })
    }

    fn lex_string(&mut self, sl: usize, sc: usize) -> Result<Token, JackError> {
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(JackError::new(
                        ErrorKind::ParseError,
                        "unterminated string constant: reached end of file",
                        Span::new(sl, sc),
                    ))
                }
                Some('\n') => {
                    return Err(JackError::new(
                        ErrorKind::ParseError,
                        "unterminated string constant: reached end of line",
                        Span::new(sl, sc),
                    ))
                }
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }
        Ok(Token {
            kind: TokenKind::StringConstant(value),
            span: Span::new(sl, sc),
        })
    }

    fn lex_word(&mut self, sl: usize, sc: usize) -> Token {
        let mut word = String::new();
        while matches!(self.cursor.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            word.push(self.cursor.advance().unwrap());
        }
        let kind = lookup_reserved_word(&word).unwrap_or(TokenKind::Identifier(word));
        Token {
            kind,
            span: Span::new(sl, sc),
        }
    }
}
