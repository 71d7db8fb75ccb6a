use thiserror::Error;

use crate::ast::{Span, Spanned, Token};

/// Errors raised while tokenizing query text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
}

pub struct Lexer {
    /// Characters with their byte offsets into the source
    input: Vec<(usize, char)>,
    len: usize,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.char_indices().collect(),
            len: input.len(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).map(|(_, c)| *c)
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).map(|(_, c)| *c)
    }

    /// Byte offset of the current character
    fn offset(&self) -> usize {
        self.input
            .get(self.position)
            .map(|(o, _)| *o)
            .unwrap_or(self.len)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a quoted literal. A quote is escaped by doubling it
    /// (`'it''s'`); backslashes are ordinary characters.
    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.offset();
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    if self.current_char() == Some(quote) {
                        result.push(quote);
                        self.advance();
                    } else {
                        return Ok(result);
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { offset: start })
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if !is_float && let Ok(n) = number.parse::<i64>() {
            return Token::Integer(n);
        }
        // integers too large for i64
        Token::Float(number.parse::<f64>().unwrap_or(f64::INFINITY))
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn double(&mut self, token: Token) -> Token {
        self.advance();
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace();
        let start = self.offset();

        let token = match self.current_char() {
            None => Token::Eof,
            Some(',') => self.single(Token::Comma),
            Some('.') => self.single(Token::Dot),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('+') => self.single(Token::Plus),
            Some('-') => self.single(Token::Minus),
            Some('*') => self.single(Token::Star),
            Some('/') => self.single(Token::Slash),
            Some('%') => self.single(Token::Percent),
            Some('=') => self.single(Token::Eq),
            Some('!') if self.peek_char(1) == Some('=') => self.double(Token::NotEq),
            Some('>') if self.peek_char(1) == Some('=') => self.double(Token::GtEq),
            Some('>') => self.single(Token::Gt),
            Some('<') if self.peek_char(1) == Some('=') => self.double(Token::LtEq),
            Some('<') => self.single(Token::Lt),
            Some(q @ ('\'' | '"')) => Token::String(self.read_string(q)?),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let word = self.read_identifier();
                Token::from_word(&word)
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_control() => {
                return Err(LexError::UnexpectedChar { ch, offset: start });
            }
            Some(ch) => self.single(Token::Symbol(ch)),
        };

        Ok(Spanned {
            token,
            span: Span {
                start,
                end: self.offset(),
            },
        })
    }

    /// Tokenizes the whole input. The trailing [`Token::Eof`] is not included.
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            if spanned.token == Token::Eof {
                return Ok(tokens);
            }
            tokens.push(spanned);
        }
    }
}

#[test]
fn test_keywords_any_case() {
    let mut lexer = Lexer::new("select From wHeRe and OR like");
    assert_eq!(lexer.next_token().unwrap().token, Token::Select);
    assert_eq!(lexer.next_token().unwrap().token, Token::From);
    assert_eq!(lexer.next_token().unwrap().token, Token::Where);
    assert_eq!(lexer.next_token().unwrap().token, Token::And);
    assert_eq!(lexer.next_token().unwrap().token, Token::Or);
    assert_eq!(lexer.next_token().unwrap().token, Token::Like);
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
}

#[test]
fn test_spans_are_byte_offsets() {
    let tokens = Lexer::new("é = 'x'").tokenize().unwrap();
    assert_eq!(tokens[0].span, Span { start: 0, end: 2 });
    assert_eq!(tokens[1].span, Span { start: 3, end: 4 });
    assert_eq!(tokens[2].span, Span { start: 5, end: 8 });
}
