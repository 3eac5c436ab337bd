//! Reader and writer for the old-style plist format of Xcode `.pbxproj` files.
//!
//! A document is the `// !$*UTF8*$!` header line followed by one root value,
//! a `{ key = value; }` mapping or a `( value, )` array. Values nest freely;
//! leaves are bare or quoted strings.
//!
//! # Parsing Pipeline
//!
//! 1. **Tokenizer**: Pulls physical lines from a reader and classifies runs
//!    of characters into tokens (whitespace, comments, header, identifiers,
//!    punctuation).
//!
//! 2. **Parser**: Drops insignificant tokens and builds a [`Value`] tree by
//!    recursive descent with one token of lookahead.
//!
//! The inverse, [`encode`], turns a tree back into text that parses to the
//! same tree.
//!
//! # Options
//!
//! Every entry point that does not take a [`ParseOptions`] parses with
//! `ParseOptions::default()`. The environment is only consulted through an
//! explicit [`ParseOptions::from_env`].

mod encode;
mod error;
mod options;
mod parser;
mod project;
mod token;
mod tokenizer;
mod value;

use std::io::BufRead;

pub use encode::{encode, encode_document, Format};
pub use error::{Location, ParseContext, ParseError, Result};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use parser::{unquote, Parser};
pub use project::Project;
pub use token::{Token, TokenKind, HEADER};
pub use tokenizer::{tokenize, Tokenizer};
pub use value::{Mapping, Value};

/// Parse a pbxproj document from a string.
///
/// # Example
///
/// ```
/// use libpbxproj::parse;
///
/// let value = parse("// !$*UTF8*$!\n{a = b;}\n").unwrap();
/// assert_eq!(value.get("a").and_then(|v| v.as_str()), Some("b"));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_filename(input, None)
}

/// Parse a pbxproj document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    let ctx = ParseContext::new(filename);
    Parser::with_options(input.as_bytes(), ParseOptions::default(), ctx).parse()
}

/// Parse a pbxproj document from a buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Value> {
    Parser::new(reader).parse()
}
