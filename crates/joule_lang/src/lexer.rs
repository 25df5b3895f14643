//! Source-to-token scanning.
//!
//! The lexer walks the source buffer once, left to right, producing a flat
//! token sequence terminated by a single [`TokenKind::Eof`] plus a list of
//! lexical errors. It never raises: on an unrecognized character it records
//! an error and resynchronizes by skipping just that character.
//!
//! Character classes are ASCII-only, per the source file conventions: a
//! non-ASCII byte outside a string literal is always `UnknownChar`.

use crate::diagnostic::{Diagnostic, ErrorKind, Stage};
use crate::token::{Token, TokenKind};
use joule_base::{Position, Span};

/// A cursor over the source text that tracks byte offset plus line/column
/// as it scans, so every emitted [`Span`] is accurate without a second pass.
struct Cursor<'src> {
    source: &'src str,
    chars: std::str::Chars<'src>,
    pos: Position,
}

impl<'src> Cursor<'src> {
    fn new(source: &'src str) -> Self {
        Cursor { source, chars: source.chars(), pos: Position::start() }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    /// Consumes the current character, advancing `pos` by its byte length
    /// and bumping line/column according to whether it was a newline.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.source[start..end]
    }
}

/// Scans `source` into a token sequence and a list of lexical errors.
///
/// The returned sequence always ends in exactly one [`TokenKind::Eof`],
/// even for an empty or all-comment input.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    loop {
        skip_whitespace_and_comments(&mut cursor);
        let start = cursor.pos;
        let Some(c) = cursor.peek() else {
            tokens.push(Token::new(TokenKind::Eof, Span::point(start)));
            break;
        };

        if is_ident_start(c) {
            tokens.push(scan_identifier(&mut cursor, start));
        } else if c.is_ascii_digit() {
            match scan_number(&mut cursor, start) {
                Ok(token) => tokens.push(token),
                Err(diag) => errors.push(diag),
            }
        } else if c == '"' {
            match scan_string(&mut cursor, start) {
                Ok(token) => tokens.push(token),
                Err(diag) => errors.push(diag),
            }
        } else if let Some(token) = scan_operator_or_punct(&mut cursor, start) {
            tokens.push(token);
        } else {
            cursor.advance();
            errors.push(Diagnostic::new(
                Stage::Lex,
                ErrorKind::UnknownChar,
                format!("unexpected character '{}'", c),
                Span::point(start),
            ));
        }
    }

    (tokens, errors)
}

fn skip_whitespace_and_comments(cursor: &mut Cursor) {
    loop {
        match cursor.peek() {
            Some(c) if c == ' ' || c == '\t' || c == '\r' || c == '\n' => {
                cursor.advance();
            }
            Some('/') if cursor.peek_next() == Some('/') => {
                cursor.eat_while(|c| c != '\n');
            }
            _ => break,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scan_identifier(cursor: &mut Cursor, start: Position) -> Token {
    let start_offset = start.offset;
    cursor.advance();
    cursor.eat_while(is_ident_continue);
    let lexeme = cursor.slice(start_offset, cursor.pos.offset);
    let span = Span::new(start, cursor.pos);
    let kind = TokenKind::keyword(lexeme).unwrap_or_else(|| TokenKind::Identifier(lexeme.to_string()));
    Token::new(kind, span)
}

fn scan_number(cursor: &mut Cursor, start: Position) -> Result<Token, Diagnostic> {
    let start_offset = start.offset;
    cursor.eat_while(|c| c.is_ascii_digit());
    if cursor.peek() == Some('.') && cursor.peek_next().map_or(false, |c| c.is_ascii_digit()) {
        cursor.advance();
        cursor.eat_while(|c| c.is_ascii_digit());
    }
    let lexeme = cursor.slice(start_offset, cursor.pos.offset);
    let span = Span::new(start, cursor.pos);
    match lexeme.parse::<f64>() {
        Ok(value) => Ok(Token::new(TokenKind::Number { lexeme: lexeme.to_string(), value }, span)),
        Err(_) => Err(Diagnostic::new(
            Stage::Lex,
            ErrorKind::MalformedNumber,
            format!("malformed number literal '{}'", lexeme),
            span,
        )),
    }
}

fn scan_string(cursor: &mut Cursor, start: Position) -> Result<Token, Diagnostic> {
    cursor.advance(); // opening quote
    let mut value = String::new();
    loop {
        match cursor.peek() {
            None | Some('\n') => {
                return Err(Diagnostic::new(
                    Stage::Lex,
                    ErrorKind::UnterminatedString,
                    "unterminated string literal".to_string(),
                    Span::point(start),
                ));
            }
            Some('"') => {
                cursor.advance();
                break;
            }
            Some('\\') if cursor.peek_next() == Some('"') => {
                cursor.advance();
                cursor.advance();
                value.push('"');
            }
            Some(c) => {
                cursor.advance();
                value.push(c);
            }
        }
    }
    let span = Span::new(start, cursor.pos);
    Ok(Token::new(TokenKind::String(value), span))
}

/// Longest-match scan of operators and punctuation. Two-character operators
/// are attempted before their one-character prefixes.
fn scan_operator_or_punct(cursor: &mut Cursor, start: Position) -> Option<Token> {
    let c = cursor.peek()?;
    let two_char = |a: char, b: char| c == a && cursor.peek_next() == Some(b);

    let kind = if two_char('=', '=') {
        cursor.advance();
        cursor.advance();
        TokenKind::EqEq
    } else if two_char('!', '=') {
        cursor.advance();
        cursor.advance();
        TokenKind::BangEq
    } else if two_char('<', '=') {
        cursor.advance();
        cursor.advance();
        TokenKind::LtEq
    } else if two_char('>', '=') {
        cursor.advance();
        cursor.advance();
        TokenKind::GtEq
    } else if two_char('&', '&') {
        cursor.advance();
        cursor.advance();
        TokenKind::AmpAmp
    } else if two_char('|', '|') {
        cursor.advance();
        cursor.advance();
        TokenKind::PipePipe
    } else {
        let single = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Eq,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            _ => return None,
        };
        cursor.advance();
        single
    };

    let span = Span::new(start, cursor.pos);
    Some(Token::new(kind, span))
}
