use crate::command::{CommandFactory, Continuation, ExecutableCommand, report};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::lexer::{TokenList, to_os_str};
use anyhow::{Context, Result, anyhow};
use std::env;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are built straight from the tokens after their name and executed
/// directly in-process without spawning a child process. No token is treated
/// as an option: `exit --help` exits and `cd -x` tries to enter `-x`.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "help" or "cd".
    fn name() -> &'static str;

    /// Builds the command from its arguments; tokens it doesn't use are ignored.
    fn from_args(args: &[&[u8]]) -> Self;

    /// Executes the command against the shell's output stream and environment.
    ///
    /// An `Err` is reported on the error stream by the caller and the loop
    /// continues; only the returned [`Continuation`] can stop the shell.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Continuation> {
        match <T as BuiltinCommand>::execute(*self, stdout, env) {
            Ok(signal) => Ok(signal),
            Err(e) => {
                report(stderr, e)?;
                Ok(Continuation::Continue)
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        tokens: &TokenList<'_>,
    ) -> Option<Box<dyn ExecutableCommand>> {
        if tokens.first()? != T::name().as_bytes() {
            return None;
        }
        Some(Box::new(T::from_args(tokens.args())))
    }
}

/// Change the current working directory of the shell.
pub struct Cd {
    /// Directory to switch to; absolute or relative to the current directory.
    pub target: Option<PathBuf>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[&[u8]]) -> Self {
        Self {
            target: args.first().map(|arg| PathBuf::from(to_os_str(arg).into_owned())),
        }
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation> {
        let Some(target) = self.target else {
            return Err(anyhow!("Expected argument to \"cd\""));
        };

        env::set_current_dir(&target)
            .with_context(|| format!("cd: {}", target.display()))?;
        env.current_dir = env::current_dir().unwrap_or_else(|_| env.current_dir.join(&target));
        Ok(Continuation::Continue)
    }
}

/// Print a short usage banner and the list of built-in commands.
pub struct Help;

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn from_args(_args: &[&[u8]]) -> Self {
        Help
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<Continuation> {
        writeln!(stdout, "CSHELL - a minimal command interpreter")?;
        writeln!(stdout, "Type program names and arguments, then hit enter.")?;
        writeln!(stdout, "The following are built in:")?;
        for name in &env.builtins {
            writeln!(stdout, "  {name}")?;
        }
        writeln!(stdout, "Use the man command for information on other programs.")?;
        Ok(Continuation::Continue)
    }
}

/// Exit the shell. Arguments are ignored; the shell always exits successfully.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(_args: &[&[u8]]) -> Self {
        Exit
    }

    fn execute(self, _stdout: &mut dyn Write, _env: &mut Environment) -> Result<Continuation> {
        Ok(Continuation::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::RawLine;
    use crate::testing::lock_current_dir;
    use std::fs;

    fn test_env() -> Environment {
        Environment::new(vec!["cd", "help", "exit"])
    }

    /// Runs a builtin through its boxed form, the way the dispatcher does.
    fn run(cmd: Box<dyn ExecutableCommand>, env: &mut Environment) -> (Continuation, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let signal = cmd.execute(&mut out, &mut err, env).unwrap();
        (
            signal,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn create<T: BuiltinCommand + 'static>(line: &str, env: &Environment) -> Option<Box<dyn ExecutableCommand>> {
        let line = RawLine::from(line);
        let tokens = crate::lexer::split_into_tokens(&line).unwrap();
        Factory::<T>::default().try_create(env, &tokens)
    }

    #[test]
    fn test_help_lists_builtins_in_order() {
        let mut env = test_env();
        let (signal, out, err) = run(Box::new(Help), &mut env);

        assert_eq!(signal, Continuation::Continue);
        assert!(err.is_empty());
        let listed: Vec<&str> = out
            .lines()
            .filter_map(|l| l.strip_prefix("  "))
            .collect();
        assert_eq!(listed, vec!["cd", "help", "exit"]);
    }

    #[test]
    fn test_help_output_is_identical_each_time() {
        let mut env = test_env();
        let (_, first, _) = run(Box::new(Help), &mut env);
        let (_, second, _) = run(create::<Help>("help", &env).unwrap(), &mut env);
        let (_, third, _) = run(create::<Help>("help x", &env).unwrap(), &mut env);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_exit_stops_silently() {
        let mut env = test_env();
        let cmd = create::<Exit>("exit 2", &env).unwrap();
        let (signal, out, err) = run(cmd, &mut env);
        assert_eq!(signal, Continuation::Stop);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_cd_without_argument_is_usage_error() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();
        let mut env = test_env();

        let (signal, out, err) = run(Box::new(Cd { target: None }), &mut env);

        assert_eq!(signal, Continuation::Continue);
        assert!(out.is_empty());
        assert_eq!(err, "CSHELL: Expected argument to \"cd\"\n");
        assert_eq!(env::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_cd_nonexistent_path_reports_system_error() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();
        let mut env = test_env();

        let cmd = create::<Cd>("cd /nonexistent-path-xyz", &env).unwrap();
        let (signal, _, err) = run(cmd, &mut env);

        assert_eq!(signal, Continuation::Continue);
        assert!(err.starts_with("CSHELL: cd: /nonexistent-path-xyz: "), "{err}");
        assert_eq!(env::current_dir().unwrap(), orig);
        assert_eq!(env.current_dir, orig);
    }

    #[test]
    fn test_cd_changes_process_and_env_dir() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let canonical = fs::canonicalize(temp.path()).unwrap();
        let mut env = test_env();

        let cmd = create::<Cd>(&format!("cd {} ignored", canonical.display()), &env).unwrap();
        let (signal, _, err) = run(cmd, &mut env);
        let now = fs::canonicalize(env::current_dir().unwrap()).unwrap();
        env::set_current_dir(&orig).unwrap();

        assert_eq!(signal, Continuation::Continue);
        assert!(err.is_empty(), "{err}");
        assert_eq!(now, canonical);
        assert_eq!(fs::canonicalize(&env.current_dir).unwrap(), canonical);
    }

    #[test]
    fn test_factory_ignores_other_names() {
        let env = test_env();
        assert!(create::<Cd>("help", &env).is_none());
        assert!(create::<Help>("HELP", &env).is_none());
        assert!(create::<Help>("", &env).is_none());
    }

    #[test]
    fn test_exit_stops_whatever_the_arguments() {
        let mut env = test_env();
        for line in ["exit", "exit help", "exit --help", "exit -x", "exit -h 3"] {
            let cmd = create::<Exit>(line, &env).unwrap();
            let (signal, out, err) = run(cmd, &mut env);
            assert_eq!(signal, Continuation::Stop, "{line}");
            assert!(out.is_empty(), "{line}: {out}");
            assert!(err.is_empty(), "{line}: {err}");
        }
    }

    #[test]
    fn test_help_ignores_flag_like_arguments() {
        let mut env = test_env();
        let (_, expected, _) = run(Box::new(Help), &mut env);
        for line in ["help -v", "help help", "help --help"] {
            let cmd = create::<Help>(line, &env).unwrap();
            let (signal, out, err) = run(cmd, &mut env);
            assert_eq!(signal, Continuation::Continue);
            assert_eq!(out, expected, "{line}");
            assert!(err.is_empty(), "{line}: {err}");
        }
    }

    #[test]
    fn test_cd_into_directory_named_help() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let target = fs::canonicalize(temp.path()).unwrap().join("help");
        fs::create_dir(&target).unwrap();
        env::set_current_dir(temp.path()).unwrap();
        let mut env = test_env();

        let cmd = create::<Cd>("cd help", &env).unwrap();
        let (signal, out, err) = run(cmd, &mut env);
        let now = fs::canonicalize(env::current_dir().unwrap()).unwrap();
        env::set_current_dir(&orig).unwrap();

        assert_eq!(signal, Continuation::Continue);
        assert!(out.is_empty(), "{out}");
        assert!(err.is_empty(), "{err}");
        assert_eq!(now, target);
    }

    #[test]
    fn test_cd_dash_argument_is_a_path() {
        let _lock = lock_current_dir();
        let orig = env::current_dir().unwrap();
        let mut env = test_env();

        let cmd = create::<Cd>("cd -x", &env).unwrap();
        let (signal, out, err) = run(cmd, &mut env);

        assert_eq!(signal, Continuation::Continue);
        assert!(out.is_empty());
        assert!(err.starts_with("CSHELL: cd: -x: "), "{err}");
        assert_eq!(env::current_dir().unwrap(), orig);
    }
}
