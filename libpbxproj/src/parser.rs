//! Phase 2: Value Parser
//!
//! Recursive descent over the significant tokens of a document:
//!
//! ```text
//! document := Header (mapping | array)
//! value    := mapping | array | Identifier
//! mapping  := '{' (Identifier '=' value ';')* '}'
//! array    := '(' (value ',')* ')'
//! ```
//!
//! Whitespace, comments, and line ends are dropped before the grammar sees
//! them. One token of lookahead is kept in `pending`.

use std::io::BufRead;

use log::{debug, trace, warn};

use crate::error::{ParseContext, ParseError, Result};
use crate::options::ParseOptions;
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::value::{Mapping, Value};

/// Single-use parser for one document.
pub struct Parser<R> {
    tokenizer: Tokenizer<R>,
    pending: Option<Token>,
    options: ParseOptions,
    depth: usize,
}

impl<R: BufRead> Parser<R> {
    /// Parser with default options and no filename.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default(), ParseContext::default())
    }

    pub fn with_options(reader: R, options: ParseOptions, ctx: ParseContext) -> Self {
        Self::from_tokenizer(Tokenizer::with_context(reader, ctx), options)
    }

    pub fn from_tokenizer(tokenizer: Tokenizer<R>, options: ParseOptions) -> Self {
        Self {
            tokenizer,
            pending: None,
            options,
            depth: 0,
        }
    }

    /// Parse the whole document and return its root value.
    pub fn parse(mut self) -> Result<Value> {
        debug!(
            "parsing {}",
            self.tokenizer.context().filename.as_deref().unwrap_or("<input>")
        );
        self.parse_header()?;
        let kind = self.peek()?.kind;
        let root = match kind {
            TokenKind::OpenBrace => self.parse_mapping()?,
            TokenKind::OpenParen => self.parse_array()?,
            _ => {
                let found = self.token()?;
                return Err(self.unexpected("'{' or '('", found));
            }
        };
        debug!(
            "parsed {} root from {} lines",
            root.kind(),
            self.tokenizer.line()
        );
        Ok(root)
    }

    /// Next significant token, left in place.
    fn peek(&mut self) -> Result<&Token> {
        let token = match self.pending.take() {
            Some(token) => token,
            None => self.advance()?,
        };
        Ok(self.pending.insert(token))
    }

    /// Next significant token, consumed.
    fn token(&mut self) -> Result<Token> {
        match self.pending.take() {
            Some(token) => Ok(token),
            None => self.advance(),
        }
    }

    fn advance(&mut self) -> Result<Token> {
        loop {
            let token = self.tokenizer.next_token()?;
            if !token.kind.is_trivia() {
                return Ok(token);
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token> {
        let token = self.token()?;
        if token.kind != kind {
            return Err(self.unexpected(expected, token));
        }
        Ok(token)
    }

    fn unexpected(&self, expected: &'static str, found: Token) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            location: self.tokenizer.context().locate_token(&found),
            found,
        }
    }

    /// The header must be the very first token, before any trivia.
    fn parse_header(&mut self) -> Result<()> {
        let token = self.tokenizer.next_token()?;
        if token.kind != TokenKind::Header {
            return Err(ParseError::MissingHeader {
                location: self.tokenizer.context().locate_token(&token),
                found: token,
            });
        }
        Ok(())
    }

    /// Track one more level of nesting, opened by `open`.
    fn enter(&mut self, open: &Token) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ParseError::TooDeeplyNested {
                max_depth: self.options.max_depth,
                location: self.tokenizer.context().locate_token(open),
            });
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        let kind = self.peek()?.kind;
        match kind {
            TokenKind::OpenBrace => self.parse_mapping(),
            TokenKind::OpenParen => self.parse_array(),
            TokenKind::Identifier => {
                let token = self.token()?;
                Ok(Value::String(unquote(&token.literal)))
            }
            _ => {
                let found = self.token()?;
                Err(self.unexpected("'{', '(' or a string", found))
            }
        }
    }

    fn parse_mapping(&mut self) -> Result<Value> {
        let open = self.expect(TokenKind::OpenBrace, "'{'")?;
        self.enter(&open)?;
        trace!("mapping at {}:{}", open.line, open.pos + 1);

        let mut mapping = Mapping::new();
        loop {
            if self.peek()?.kind == TokenKind::CloseBrace {
                self.token()?;
                break;
            }

            let key_token = self.expect(TokenKind::Identifier, "a key or '}'")?;
            self.expect(TokenKind::Equals, "'='")?;
            let value = self.parse_value()?;
            self.expect(TokenKind::Semicolon, "';'")?;

            let key = unquote(&key_token.literal);
            if mapping.contains_key(&key) {
                let location = self.tokenizer.context().locate_token(&key_token);
                if self.options.reject_duplicate_keys {
                    return Err(ParseError::DuplicateKey { key, location });
                }
                warn!("duplicate key {:?} at {} overwrites earlier value", key, location);
            }
            mapping.insert(key, value);
        }

        self.depth -= 1;
        Ok(Value::Mapping(mapping))
    }

    fn parse_array(&mut self) -> Result<Value> {
        let open = self.expect(TokenKind::OpenParen, "'('")?;
        self.enter(&open)?;
        trace!("array at {}:{}", open.line, open.pos + 1);

        let mut array = Vec::new();
        loop {
            if self.peek()?.kind == TokenKind::CloseParen {
                self.token()?;
                break;
            }

            let value = self.parse_value()?;
            self.expect(TokenKind::Comma, "','")?;
            array.push(value);
        }

        self.depth -= 1;
        Ok(Value::Array(array))
    }
}

/// Strip the quotes from a quoted literal and resolve its escapes.
/// Bare identifiers are returned unchanged.
pub fn unquote(literal: &str) -> String {
    match literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => unescape(inner),
        None => literal.to_string(),
    }
}

fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('b') => result.push('\x08'),
            Some('f') => result.push('\x0c'),
            Some('a') => result.push('\x07'),
            Some('v') => result.push('\x0b'),
            Some('U') => match read_hex4(&mut chars) {
                Some(unit) => result.push(decode_utf16_escape(unit, &mut chars)),
                None => result.push('U'),
            },
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

/// Consume exactly four hex digits, or nothing.
fn read_hex4(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    let lookahead: String = chars.clone().take(4).collect();
    if lookahead.len() != 4 || !lookahead.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u32::from_str_radix(&lookahead, 16).ok()?;
    for _ in 0..4 {
        chars.next();
    }
    Some(unit)
}

/// Turn a `\Uxxxx` code unit into a char, pairing surrogates written as two escapes.
fn decode_utf16_escape(unit: u32, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> char {
    if (0xD800..0xDC00).contains(&unit) {
        let mut probe = chars.clone();
        if probe.next() == Some('\\') && probe.next() == Some('U') {
            if let Some(low) = read_hex4(&mut probe) {
                if (0xDC00..0xE000).contains(&low) {
                    *chars = probe;
                    let cp = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER);
                }
            }
        }
    }
    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
}
