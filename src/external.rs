use crate::command::{ExitCode, RedirectTarget};
use crate::env::Environment;
use crate::error::{LaunchError, ResolveError};
use crate::io_adapters::ProcessStdio;
use std::ffi::OsStr;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tracing::{debug, warn};

/// Command that is not a builtin.
pub(crate) struct ExternalCommand {
    program: PathBuf,
    /// Name as typed, passed to the child as `argv[0]`.
    name: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub(crate) fn new(program: PathBuf, name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program,
            name: name.into(),
            args,
        }
    }

    /// Opens the redirect target, spawns the program and waits for it to finish.
    ///
    /// Stdin is inherited from the interpreter; stdout and stderr are inherited unless
    /// `redirect` covers them. `cancel` is polled only while the child runs;
    /// when it resolves the child is killed and reaped, and its signal exit is returned like any
    /// other exit code.
    pub(crate) async fn run<C>(
        self,
        redirect: Option<&RedirectTarget>,
        env: &Environment,
        cancel: C,
    ) -> Result<ExitCode, LaunchError>
    where
        C: Future<Output = ()>,
    {
        let stdio = ProcessStdio::for_target(redirect)?;
        let mut command = tokio::process::Command::new(&self.program);
        #[cfg(unix)]
        command.arg0(&self.name);
        let mut child = command
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(stdio.stdout)
            .stderr(stdio.stderr)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        debug!(program = %self.program.display(), pid = ?child.id(), "spawned");

        let status = tokio::select! {
            status = child.wait() => status,
            () = cancel => {
                debug!(pid = ?child.id(), "interrupt received, killing child");
                if let Err(e) = child.start_kill() {
                    warn!("failed to kill {}: {e}", self.program.display());
                }
                child.wait().await
            }
        }
        .map_err(|source| LaunchError::Wait {
            program: self.program.clone(),
            source,
        })?;

        debug!(program = %self.program.display(), %status, "child exited");
        Ok(match status.code() {
            Some(x) => x,
            None => terminated_by_signal(status),
        })
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    1
}

enum Candidate {
    Executable,
    NotExecutable,
    Missing,
}

fn inspect(path: &Path) -> Candidate {
    let Ok(meta) = path.metadata() else {
        return Candidate::Missing;
    };
    if !meta.is_file() {
        return Candidate::Missing;
    }
    if is_executable(&meta) {
        Candidate::Executable
    } else {
        Candidate::NotExecutable
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

/// Resolve a command name the way a typical shell would.
///
/// Behavior:
/// - A name containing a path separator (`/bin/sh`, `./foo`, `bin/sh`) is checked as given.
/// - A bare name is searched for in each directory of `search_paths` (PATH), in order; the first
///   executable regular file wins.
/// - If only non-executable matches exist the result is [`ResolveError::PermissionDenied`].
/// - An empty name, or no match at all, is [`ResolveError::NotFound`].
pub fn find_command_path(search_paths: &OsStr, name: &str) -> Result<PathBuf, ResolveError> {
    if name.is_empty() {
        return Err(ResolveError::NotFound(name.to_string()));
    }

    let path = Path::new(name);
    if path.components().count() > 1 || path.is_absolute() {
        return match inspect(path) {
            Candidate::Executable => Ok(path.to_path_buf()),
            Candidate::NotExecutable => Err(ResolveError::PermissionDenied(name.to_string())),
            Candidate::Missing => Err(ResolveError::NotFound(name.to_string())),
        };
    }

    let mut denied = false;
    for dir in std::env::split_paths(search_paths) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(name);
        match inspect(&candidate) {
            Candidate::Executable => {
                debug!(name, path = %candidate.display(), "resolved on PATH");
                return Ok(candidate);
            }
            Candidate::NotExecutable => denied = true,
            Candidate::Missing => {}
        }
    }

    if denied {
        Err(ResolveError::PermissionDenied(name.to_string()))
    } else {
        Err(ResolveError::NotFound(name.to_string()))
    }
}
