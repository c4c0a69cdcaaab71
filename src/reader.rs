//! Acquisition of one raw command line from the interactive input stream.

use crate::error::{Result, ShellError};
use std::io::{BufRead, ErrorKind};

/// Initial capacity of the line buffer, and the step it grows by.
pub const LINE_BUFFER_SIZE: usize = 1024;

/// One line of user input, without its terminator.
///
/// The bytes are kept exactly as read; no encoding is assumed, so file names
/// that are not valid UTF-8 reach the launched program unchanged.
///
/// A `RawLine` is owned by a single loop iteration. The tokens produced by
/// [`crate::lexer::split_into_tokens`] borrow from it, so it has to stay alive
/// until the iteration is done with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLine {
    bytes: Vec<u8>,
}

impl RawLine {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl From<&[u8]> for RawLine {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

impl From<&str> for RawLine {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}

/// Reads command lines byte by byte from a buffered stream.
pub struct LineReader<R> {
    input: R,
    exhausted: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            exhausted: false,
        }
    }

    /// Returns true once end of stream has been observed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Reads characters until `\n` or end of stream and returns them as a line.
    ///
    /// The buffer starts at [`LINE_BUFFER_SIZE`] bytes and grows by the same
    /// amount whenever it fills up, so lines of any length are captured whole.
    /// Hitting end of stream before any byte yields an empty line, not an error.
    pub fn read_line(&mut self) -> Result<RawLine> {
        let mut buffer: Vec<u8> = Vec::new();
        grow(&mut buffer)?;

        loop {
            let Some(byte) = self.read_byte()? else {
                self.exhausted = true;
                break;
            };
            if byte == b'\n' {
                break;
            }
            if buffer.len() == buffer.capacity() {
                grow(&mut buffer)?;
            }
            buffer.push(byte);
        }

        Ok(RawLine { bytes: buffer })
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        loop {
            let available = match self.input.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ShellError::Io(e)),
            };
            let Some(&byte) = available.first() else {
                return Ok(None);
            };
            self.input.consume(1);
            return Ok(Some(byte));
        }
    }
}

fn grow(buffer: &mut Vec<u8>) -> Result<()> {
    buffer
        .try_reserve_exact(LINE_BUFFER_SIZE)
        .map_err(|_| ShellError::Allocation {
            what: "line buffer",
        })
}
