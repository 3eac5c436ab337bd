//! Phase 1: Tokenizer
//!
//! The tokenizer pulls physical lines from a reader and splits them into
//! tokens, one per call. Runs are classified in priority order:
//! - the `// !$*UTF8*$!` header line
//! - whitespace
//! - `/* ... */` comments (may span lines)
//! - bare identifiers
//! - quoted strings (may span lines)
//! - single-character punctuation
//!
//! Every physical line ends with an `EndOfLine` token, except the header
//! line, which is consumed whole.

use std::io::BufRead;

use crate::error::{ParseContext, ParseError, Result};
use crate::token::{Token, TokenKind, HEADER};

/// Streaming tokenizer over a buffered reader.
pub struct Tokenizer<R> {
    reader: R,
    ctx: ParseContext,
    /// Characters of the current physical line, terminator stripped.
    buffer: Vec<char>,
    index: usize,
    /// 1-based number of the current line; 0 before the first read.
    line: usize,
    /// Whether `buffer` still has to be scanned (including its EndOfLine).
    in_line: bool,
    /// Input exhausted; only EndOfFile from here on.
    finished: bool,
    /// Iterator adapter has yielded its last item.
    stopped: bool,
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

/// Characters allowed in an unquoted identifier.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '$' | '/' | '.' | '_' | '-')
}

impl<R: BufRead> Tokenizer<R> {
    /// Create a tokenizer without a filename for error messages.
    pub fn new(reader: R) -> Self {
        Self::with_context(reader, ParseContext::default())
    }

    /// Create a tokenizer whose errors are qualified by the context's filename.
    pub fn with_context(reader: R, ctx: ParseContext) -> Self {
        Self {
            reader,
            ctx,
            buffer: Vec::new(),
            index: 0,
            line: 0,
            in_line: false,
            finished: false,
            stopped: false,
        }
    }

    /// The parse context errors are reported against.
    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    /// Number of physical lines read so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Produce the next token.
    ///
    /// Once the input is exhausted this keeps returning `EndOfFile`.
    pub fn next_token(&mut self) -> Result<Token> {
        if !self.in_line {
            if self.finished || !self.fetch_line()? {
                self.finished = true;
                return Ok(Token::bare(TokenKind::EndOfFile, self.line, 0));
            }
            if self.is_header_line() {
                self.in_line = false;
                return Ok(Token::new(TokenKind::Header, HEADER, self.line, 0));
            }
        }

        let start = self.index;
        let c = match self.peek() {
            Some(c) => c,
            None => {
                self.in_line = false;
                return Ok(Token::bare(TokenKind::EndOfLine, self.line, start));
            }
        };

        if is_whitespace(c) {
            return Ok(self.scan_whitespace());
        }
        if self.peek_comment() {
            return self.scan_comment();
        }
        if is_identifier_char(c) {
            return Ok(self.scan_identifier());
        }
        if c == '"' {
            return self.scan_string();
        }

        self.index += 1;
        if let Some(kind) = TokenKind::punctuation(c) {
            return Ok(Token::bare(kind, self.line, start));
        }

        let token = Token::new(TokenKind::Illegal, &c.to_string(), self.line, start);
        Err(ParseError::IllegalCharacter {
            location: self.ctx.locate_token(&token),
            token,
        })
    }

    /// Read the next physical line into the buffer. Returns `false` at end of input.
    fn fetch_line(&mut self) -> Result<bool> {
        let mut raw = Vec::new();
        if self.reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(false);
        }
        if raw.last() == Some(&b'\n') {
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
        }
        self.line += 1;
        let text =
            String::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8 { line: self.line })?;
        self.buffer = text.chars().collect();
        self.index = 0;
        self.in_line = true;
        Ok(true)
    }

    fn is_header_line(&self) -> bool {
        self.buffer.len() == HEADER.len() && self.buffer.iter().copied().eq(HEADER.chars())
    }

    fn peek(&self) -> Option<char> {
        self.buffer.get(self.index).copied()
    }

    fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        Some(c)
    }

    fn peek_comment(&self) -> bool {
        self.buffer.get(self.index) == Some(&'/') && self.buffer.get(self.index + 1) == Some(&'*')
    }

    fn scan_whitespace(&mut self) -> Token {
        let start = self.index;
        while self.peek().is_some_and(is_whitespace) {
            self.index += 1;
        }
        let text: String = self.buffer[start..self.index].iter().collect();
        Token::new(TokenKind::Whitespace, &text, self.line, start)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        while let Some(c) = self.peek() {
            if !is_identifier_char(c) || self.peek_comment() {
                break;
            }
            self.index += 1;
        }
        let text: String = self.buffer[start..self.index].iter().collect();
        Token::new(TokenKind::Identifier, &text, self.line, start)
    }

    fn scan_comment(&mut self) -> Result<Token> {
        let (line, pos) = (self.line, self.index);
        let mut text = String::from("/*");
        self.index += 2;

        loop {
            match self.read() {
                Some(c) => {
                    text.push(c);
                    // "/*/" is not a closed comment
                    if text.len() >= 4 && text.ends_with("*/") {
                        return Ok(Token::new(TokenKind::Comment, &text, line, pos));
                    }
                }
                None => {
                    if !self.fetch_line()? {
                        self.in_line = false;
                        self.finished = true;
                        return Err(ParseError::UnterminatedComment(self.ctx.locate(line, pos)));
                    }
                    text.push('\n');
                }
            }
        }
    }

    fn scan_string(&mut self) -> Result<Token> {
        let (line, pos) = (self.line, self.index);
        let mut text = String::from("\"");
        self.index += 1;
        let mut escaped = false;

        loop {
            match self.read() {
                Some(c) => {
                    text.push(c);
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        return Ok(Token::new(TokenKind::Identifier, &text, line, pos));
                    }
                }
                None => {
                    if !self.fetch_line()? {
                        self.in_line = false;
                        self.finished = true;
                        return Err(ParseError::UnterminatedString(self.ctx.locate(line, pos)));
                    }
                    text.push('\n');
                    escaped = false;
                }
            }
        }
    }
}

/// Yields tokens up to (not including) `EndOfFile`, or up to and including
/// the first error.
impl<R: BufRead> Iterator for Tokenizer<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::EndOfFile => {
                self.stopped = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.stopped = true;
                Some(Err(e))
            }
        }
    }
}

/// Split a whole document into tokens, excluding the final `EndOfFile`.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Tokenizer::new(input.as_bytes()).collect()
}
