use crate::command::{CommandFactory, Continuation, report};
use crate::env::Environment;
use crate::error::Result;
use crate::external::ExternalCommand;
use crate::lexer::{self, TokenList};
use crate::reader::LineReader;
use crate::registry::BuiltinRegistry;
use std::io::{BufRead, Write};
use tracing::{debug, error};

/// Text shown before every line read.
pub const PROMPT: &str = "> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: builtins and `ExternalCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal interactive interpreter: builtins run in-process, anything else
/// is launched as a child process.
///
/// Example
/// ```
/// use cshell::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// sh.repl(&b"help\nexit\n"[..], &mut out, &mut err).unwrap();
/// assert!(String::from_utf8(out).unwrap().contains("  exit\n"));
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: BuiltinRegistry,
    launcher: Box<dyn CommandFactory>,
}

impl Interpreter {
    /// Create an interpreter from a builtin table and a fallback launcher.
    pub fn new(builtins: BuiltinRegistry, launcher: Box<dyn CommandFactory>) -> Self {
        Self {
            env: Environment::new(builtins.names()),
            builtins,
            launcher,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run one parsed command line.
    ///
    /// A blank line does nothing. A first token naming a builtin runs that
    /// builtin; anything else goes to the launcher. Command failures are
    /// reported on `stderr` and never escape this call.
    pub fn dispatch(
        &mut self,
        tokens: &TokenList<'_>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Continuation {
        let Some(name) = tokens.first() else {
            return Continuation::Continue;
        };

        let shown = String::from_utf8_lossy(name);
        let command = match self.builtins.lookup(name) {
            Some(entry) => {
                debug!(command = %shown, "running builtin");
                entry.factory.try_create(&self.env, tokens)
            }
            None => {
                debug!(command = %shown, args = tokens.args().len(), "launching external command");
                self.launcher.try_create(&self.env, tokens)
            }
        };
        let Some(command) = command else {
            return Continuation::Continue;
        };

        match command.execute(stdout, stderr, &mut self.env) {
            Ok(signal) => signal,
            Err(e) => {
                error!("command {shown} failed: {e:#}");
                if let Err(write_err) = report(stderr, &e) {
                    error!("cannot report failure of {shown}: {write_err}");
                }
                Continuation::Continue
            }
        }
    }

    /// The read-eval loop.
    ///
    /// Prompts, reads a line, tokenizes it and dispatches it until a command
    /// returns [`Continuation::Stop`] or `input` is exhausted. Returns an error
    /// only for failures the shell cannot survive: allocation failure while
    /// growing a buffer, or an I/O error on the prompt or input stream.
    pub fn repl<R: BufRead>(
        &mut self,
        input: R,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        let mut reader = LineReader::new(input);
        loop {
            write!(stdout, "{PROMPT}")?;
            stdout.flush()?;

            let line = reader.read_line()?;
            let signal = {
                let tokens = lexer::split_into_tokens(&line)?;
                self.dispatch(&tokens, stdout, stderr)
            };
            drop(line);

            if signal == Continuation::Stop {
                debug!("exit requested");
                return Ok(());
            }
            if reader.is_exhausted() {
                debug!("input exhausted");
                return Ok(());
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the builtins `cd`, `help`, `exit` and the
    /// external command launcher.
    fn default() -> Self {
        Self::new(
            BuiltinRegistry::default(),
            Box::new(Factory::<ExternalCommand>::default()),
        )
    }
}
