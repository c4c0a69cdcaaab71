use std::env as stdenv;
use std::path::PathBuf;

/// Interpreter-level view of the process state commands run in.
///
/// The environment contains:
/// - `current_dir`: the working directory external commands are started in.
///   Only the `cd` builtin changes it, together with the process-wide one.
/// - `builtins`: names of the registered builtins, in registration order,
///   so that `help` can list them.
#[derive(Debug, Clone)]
pub struct Environment {
    pub current_dir: PathBuf,
    pub builtins: Vec<&'static str>,
}

impl Environment {
    /// Capture the current working directory of the process.
    pub fn new(builtins: Vec<&'static str>) -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            builtins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_captures_process_dir() {
        let _lock = crate::testing::lock_current_dir();
        let env = Environment::new(vec!["cd"]);
        assert_eq!(env.current_dir, stdenv::current_dir().unwrap());
        assert_eq!(env.builtins, vec!["cd"]);
    }
}
