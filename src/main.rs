use argh::FromArgs;
use cshell::{Interpreter, PROGRAM_TAG};
use std::io;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A minimal interactive command interpreter reading commands from standard input.
struct Args {
    #[argh(switch, short = 'v')]
    /// log debug diagnostics to standard error.
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let mut shell = Interpreter::default();
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    match shell.repl(stdin, &mut stdout, &mut stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e}");
            eprintln!("{PROGRAM_TAG}: {e}");
            ExitCode::FAILURE
        }
    }
}
