use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the process environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: a map of environment variables used for `$NAME` expansion and passed to
///   external commands.
/// - `current_dir`: the working directory for command execution.
/// - `should_exit`: set by the `exit` builtin so the interactive loop stops.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
        }
    }

    /// An environment with no variables, rooted at the process working directory.
    ///
    /// Unlike [`Environment::new`], lookups never fall back to the process environment.
    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: stdenv::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            should_exit: false,
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Value used by `$NAME` expansion: the variable, or the empty string when unset.
    pub fn lookup(&self, key: &str) -> String {
        self.get_var(key).unwrap_or_default()
    }

    /// The current user's home directory.
    ///
    /// `HOME` wins when set. When it is unset the platform's notion of the home directory is
    /// used; when it is set but empty there is no home directory.
    pub fn home_dir(&self) -> Result<PathBuf> {
        match self.get_var("HOME") {
            Some(home) if home.is_empty() => Err(anyhow!("HOME is empty")),
            Some(home) => Ok(PathBuf::from(home)),
            None => dirs::home_dir().ok_or_else(|| anyhow!("HOME is not set")),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::empty();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);
        assert_eq!(env.lookup("SOME_RANDOM_ENV_VAR_12345"), "");

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
        assert_eq!(env.lookup("KEY"), "VALUE");
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_home_dir_prefers_home_var() {
        let mut env = Environment::empty();
        env.set_var("HOME", "/some/where");
        assert_eq!(env.home_dir().unwrap(), PathBuf::from("/some/where"));
    }

    #[test]
    fn test_home_dir_empty_home_is_an_error() {
        let mut env = Environment::empty();
        env.set_var("HOME", "");
        assert!(env.home_dir().is_err());
    }
}
