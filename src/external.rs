use crate::command::{CommandFactory, Continuation, ExecutableCommand, report};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::lexer::{TokenList, to_os_str};
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use tracing::debug;

/// Command that is not a builtin: a program started as a child process.
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: OsString, args: Vec<OsString>) -> Self {
        Self { program, args }
    }

    /// Starts the program and blocks until it has exited or been killed.
    ///
    /// `argv[0]` is the program token itself; bare names are looked up in PATH.
    /// The child inherits the shell's standard streams.
    pub fn launch(&self, env: &Environment) -> Result<ChildStatus> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&env.current_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| self.program.to_string_lossy().into_owned())?;
        debug!(pid = child.id(), program = ?self.program, "spawned child");

        let status = wait_for_termination(child)?;
        debug!(program = ?self.program, %status, "child terminated");
        Ok(status)
    }
}

/// Catch-all launcher: any non-empty command line becomes an external command.
impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        _env: &Environment,
        tokens: &TokenList<'_>,
    ) -> Option<Box<dyn ExecutableCommand>> {
        let (program, args) = tokens.as_slice().split_first()?;
        Some(Box::new(ExternalCommand::new(
            to_os_str(program).into_owned(),
            args.iter().map(|arg| to_os_str(arg).into_owned()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Continuation> {
        // Whatever the shell printed so far must appear before the child's output.
        stdout.flush()?;
        if let Err(e) = self.launch(env) {
            report(stderr, e)?;
        }
        Ok(Continuation::Continue)
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// Normal exit with the given code.
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
}

impl fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildStatus::Exited(code) => write!(f, "exited with code {code}"),
            ChildStatus::Signaled(signal) => write!(f, "killed by signal {signal}"),
        }
    }
}

/// Waits on `child` until it has exited or been killed by a signal.
///
/// Stopped, continued and traced states are transient and never returned.
#[cfg(unix)]
fn wait_for_termination(child: Child) -> Result<ChildStatus> {
    use nix::errno::Errno;
    use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(child.id() as i32);
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ChildStatus::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(ChildStatus::Signaled(signal as i32));
            }
            Ok(other) => debug!(?other, "child not terminated yet, waiting again"),
            Err(Errno::EINTR) => continue,
            Err(errno) => {
                return Err(std::io::Error::from(errno)).context("waiting for child process");
            }
        }
    }
}

#[cfg(not(unix))]
fn wait_for_termination(mut child: Child) -> Result<ChildStatus> {
    let status = child.wait().context("waiting for child process")?;
    Ok(match status.code() {
        Some(code) => ChildStatus::Exited(code),
        None => ChildStatus::Signaled(-1),
    })
}
