use thiserror::Error;

/// Errors the interactive loop cannot recover from.
///
/// Everything that goes wrong while *executing* a command is reported on the
/// error stream and swallowed by the dispatcher. Only these variants make the
/// shell itself terminate with a failure status.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Growing the line buffer or the token array failed.
    #[error("allocation error: cannot grow {what}")]
    Allocation { what: &'static str },

    /// The prompt could not be written or the command stream could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;
