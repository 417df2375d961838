use std::{fmt::Display, sync::Arc};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid variable name ({name})")]
#[diagnostic(
    code(jabberwock::invalid_name),
    help("variable names may only contain the letters `a-z` and `A-Z`")
)]
pub struct InvalidNameError {
    #[source_code]
    src: Arc<NamedSource<String>>,

    #[label("this name")]
    bad_name: SourceSpan,

    pub name: String,
}

impl InvalidNameError {
    pub fn new(src: Arc<NamedSource<String>>, token: Token<'_>) -> Self {
        InvalidNameError {
            src,
            bad_name: token.span(),
            name: token.literal.to_string(),
        }
    }
}

/// True iff `token` is one or more ASCII letters and nothing else.
pub fn is_identifier(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphabetic())
}

/// True iff `token` is one or more of `-`, `*` and `?`.
pub fn is_valid_literal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| matches!(b, b'-' | b'*' | b'?'))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub literal: &'de str,
    /// Byte offset of the token in the whole input.
    pub offset: usize,
}

impl Token<'_> {
    pub fn span(&self) -> SourceSpan {
        SourceSpan::from(self.offset..self.offset + self.literal.len())
    }

    pub fn is_identifier(&self) -> bool {
        is_identifier(self.literal)
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literal)
    }
}

/// Characters that separate tokens: space, tab, vertical tab, form feed and
/// line breaks.
pub fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0B' | '\x0C' | '\r' | '\n')
}

/// Splits one line of input into separator delimited tokens.
///
/// The first token is always the text before the first separator, so an
/// empty line or one that starts with a separator yields an empty first
/// token.
pub struct Lexer<'de> {
    rest: &'de str,
    byte: usize,
    first: bool,
}

impl<'de> Lexer<'de> {
    /// `byte` is the offset of `line` in the whole input, so token spans
    /// point into the whole input rather than the line.
    pub fn new(line: &'de str, byte: usize) -> Self {
        Lexer {
            rest: line,
            byte,
            first: true,
        }
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Token<'de>;

    fn next(&mut self) -> Option<Self::Item> {
        if std::mem::take(&mut self.first) && !self.rest.starts_with(|c: char| !is_separator(c)) {
            return Some(Token {
                literal: &self.rest[..0],
                offset: self.byte,
            });
        }

        let trimmed = self.rest.trim_start_matches(is_separator);
        self.byte += self.rest.len() - trimmed.len();
        self.rest = trimmed;
        if self.rest.is_empty() {
            return None;
        }

        let end = self.rest.find(is_separator).unwrap_or(self.rest.len());
        let literal = &self.rest[..end];
        let token = Token {
            literal,
            offset: self.byte,
        };
        self.byte += end;
        self.rest = &self.rest[end..];
        Some(token)
    }
}

/// Splits input into lines ending at `\n`, `\r\n` or a lone `\r`, paired
/// with their byte offset. Terminators are not part of the line and a final
/// terminator does not start another line.
pub struct Lines<'de> {
    rest: &'de str,
    byte: usize,
}

impl<'de> Lines<'de> {
    pub fn new(input: &'de str) -> Self {
        Lines {
            rest: input,
            byte: 0,
        }
    }
}

impl<'de> Iterator for Lines<'de> {
    type Item = (usize, &'de str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let end = self.rest.find(['\r', '\n']).unwrap_or(self.rest.len());
        let line = &self.rest[..end];
        let terminator = match &self.rest[end..] {
            t if t.starts_with("\r\n") => 2,
            "" => 0,
            _ => 1,
        };
        let offset = self.byte;
        self.byte += end + terminator;
        self.rest = &self.rest[end + terminator..];
        Some((offset, line))
    }
}
