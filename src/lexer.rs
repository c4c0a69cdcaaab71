//! Splitting of a raw line into whitespace-delimited argument tokens.
//!
//! Tokens are borrowed byte slices of the [`RawLine`] they came from; no token
//! text is copied. The borrow checker enforces that a [`TokenList`] never
//! outlives its line. All delimiters are ASCII, so splitting on bytes never
//! cuts a multi-byte character in half.

use crate::error::{Result, ShellError};
use crate::reader::RawLine;
use std::borrow::Cow;
use std::ffi::OsStr;

/// Initial capacity of the token array, and the step it grows by.
pub const TOKEN_BUFFER_SIZE: usize = 64;

/// Bytes separating tokens: space, tab, carriage return, newline and bell.
pub const DELIMITERS: [u8; 5] = [b' ', b'\t', b'\r', b'\n', 0x07];

pub fn is_delimiter(byte: u8) -> bool {
    DELIMITERS.contains(&byte)
}

/// Views a token as an OS string for paths and argument vectors.
///
/// On Unix this borrows the bytes as they are. Elsewhere non-UTF-8 bytes
/// are replaced, since there is no byte-level OS string.
#[cfg(unix)]
pub fn to_os_str(token: &[u8]) -> Cow<'_, OsStr> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(OsStr::from_bytes(token))
}

#[cfg(not(unix))]
pub fn to_os_str(token: &[u8]) -> Cow<'_, OsStr> {
    match String::from_utf8_lossy(token) {
        Cow::Borrowed(text) => Cow::Borrowed(OsStr::new(text)),
        Cow::Owned(text) => Cow::Owned(text.into()),
    }
}

/// Ordered, non-empty, delimiter-free views into a [`RawLine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList<'a> {
    tokens: Vec<&'a [u8]>,
}

impl<'a> TokenList<'a> {
    /// The command name, or `None` for a blank line.
    pub fn first(&self) -> Option<&'a [u8]> {
        self.tokens.first().copied()
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'a [u8]] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn as_slice(&self) -> &[&'a [u8]] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.tokens.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord { begin: usize },
}

struct LexingFSM<'a> {
    line: &'a [u8],
    state: LexingState,
    tokens: Vec<&'a [u8]>,
}

impl<'a> LexingFSM<'a> {
    fn new(line: &'a [u8]) -> Result<Self> {
        let mut tokens = Vec::new();
        grow(&mut tokens)?;
        Ok(Self {
            line,
            state: LexingState::Start,
            tokens,
        })
    }

    fn make_tokens(mut self) -> Result<TokenList<'a>> {
        let line = self.line;
        for (pos, &byte) in line.iter().enumerate() {
            match self.state {
                LexingState::Start => self.handle_start(pos, byte),
                LexingState::ReadingWord { begin } => self.handle_word(begin, pos, byte)?,
            }
        }

        if let LexingState::ReadingWord { begin } = self.state {
            self.push(&line[begin..])?;
        }

        Ok(TokenList {
            tokens: self.tokens,
        })
    }

    fn handle_start(&mut self, pos: usize, byte: u8) {
        if !is_delimiter(byte) {
            self.state = LexingState::ReadingWord { begin: pos };
        }
    }

    fn handle_word(&mut self, begin: usize, pos: usize, byte: u8) -> Result<()> {
        if is_delimiter(byte) {
            let line = self.line;
            self.push(&line[begin..pos])?;
            self.state = LexingState::Start;
        }
        Ok(())
    }

    fn push(&mut self, token: &'a [u8]) -> Result<()> {
        if self.tokens.len() == self.tokens.capacity() {
            grow(&mut self.tokens)?;
        }
        self.tokens.push(token);
        Ok(())
    }
}

fn grow(tokens: &mut Vec<&[u8]>) -> Result<()> {
    tokens
        .try_reserve_exact(TOKEN_BUFFER_SIZE)
        .map_err(|_| ShellError::Allocation {
            what: "token array",
        })
}

/// Splits `line` into tokens separated by runs of [`DELIMITERS`].
///
/// A line made only of delimiters yields an empty list.
pub fn split_into_tokens(line: &RawLine) -> Result<TokenList<'_>> {
    LexingFSM::new(line.as_bytes())?.make_tokens()
}
