//! Tokens produced by the tokenizer.

use std::fmt;

/// The format's encoding marker, which must be the first line of a document.
pub const HEADER: &str = "// !$*UTF8*$!";

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Input exhausted. Returned repeatedly once reached.
    EndOfFile,
    /// End of a physical line.
    EndOfLine,
    /// Run of spaces and tabs.
    Whitespace,
    /// `/* ... */` block comment, verbatim.
    Comment,
    /// The `// !$*UTF8*$!` line.
    Header,
    /// Bare word or quoted string, verbatim.
    Identifier,
    OpenBrace,
    CloseBrace,
    Equals,
    Semicolon,
    Comma,
    OpenParen,
    CloseParen,
    /// A character outside the format's alphabet.
    Illegal,
}

impl TokenKind {
    /// Returns `true` for tokens that carry no grammatical meaning.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::EndOfLine
        )
    }

    /// Punctuation kind for a single character, if any.
    pub fn punctuation(c: char) -> Option<TokenKind> {
        match c {
            '{' => Some(TokenKind::OpenBrace),
            '}' => Some(TokenKind::CloseBrace),
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            '=' => Some(TokenKind::Equals),
            ';' => Some(TokenKind::Semicolon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        }
    }
}

/// A single classified lexical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. Empty for punctuation and end markers.
    pub literal: String,
    /// 1-based line on which the token starts.
    pub line: usize,
    /// 0-based offset of the token's first character within its line.
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: &str, line: usize, pos: usize) -> Self {
        Self {
            kind,
            literal: literal.to_string(),
            line,
            pos,
        }
    }

    /// A token without literal text.
    pub fn bare(kind: TokenKind, line: usize, pos: usize) -> Self {
        Self {
            kind,
            literal: String::new(),
            line,
            pos,
        }
    }

    /// Returns `true` if the identifier was written in double quotes.
    pub fn is_quoted(&self) -> bool {
        self.kind == TokenKind::Identifier && self.literal.starts_with('"')
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Comment | TokenKind::Identifier | TokenKind::Illegal => {
                write!(f, "{:?}({:?})", self.kind, self.literal)
            }
            kind => write!(f, "{:?}", kind),
        }
    }
}
