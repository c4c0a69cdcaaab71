use crate::env::Environment;
use crate::lexer::TokenList;
use anyhow::Result;
use std::fmt::Display;
use std::io::Write;

/// Tag prefixed to every message the shell writes to its error stream.
pub const PROGRAM_TAG: &str = "CSHELL";

/// Outcome of every command execution, consumed by the read-eval loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Read and run another command.
    Continue,
    /// Leave the loop and terminate the shell.
    Stop,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// Implemented by built-ins via a blanket impl and by external commands.
/// Failures of the command itself are reported on `stderr` by the command;
/// an `Err` is reserved for the case where even that reporting failed.
pub trait ExecutableCommand {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Continuation>;
}

/// Factory that turns a parsed command line into an executable command.
///
/// Returns `None` when the factory doesn't handle the command named by the
/// first token.
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        tokens: &TokenList<'_>,
    ) -> Option<Box<dyn ExecutableCommand>>;
}

/// Writes `CSHELL: <message>` to the error stream.
///
/// `{:#}` is used so that an [`anyhow::Error`] shows its whole context chain.
pub fn report(stderr: &mut dyn Write, message: impl Display) -> std::io::Result<()> {
    writeln!(stderr, "{PROGRAM_TAG}: {message:#}")
}
