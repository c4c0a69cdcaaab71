//! A minimal interactive command interpreter.
//!
//! Each cycle prints a prompt, reads one line, splits it into whitespace
//! separated tokens and either runs a builtin (`cd`, `help`, `exit`) in-process
//! or launches the named program as a child process and waits for it.
//!
//! The main entry point is [`Interpreter`]; [`Interpreter::repl`] drives the
//! loop over any buffered input and output streams, so it can be used with the
//! process's standard streams as well as with in-memory buffers.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod lexer;
pub mod reader;
pub mod registry;
#[cfg(test)]
mod testing;

pub use command::{Continuation, PROGRAM_TAG};
pub use error::ShellError;
pub use interpreter::{Interpreter, PROMPT};
