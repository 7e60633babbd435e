use crate::command::{RedirectTarget, TargetStream};
use crate::error::RedirectError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::process::Stdio;
use tracing::{debug, warn};

/// Opens (creating if needed) the file a redirection points at.
///
/// The file is truncated unless the target asks for append. New files get mode `0666` before
/// the umask, like files created by a shell.
pub(crate) fn open_target(target: &RedirectTarget) -> Result<File, RedirectError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if target.append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }

    debug!(file = %target.file, append = target.append, stream = ?target.stream, "opening redirect target");
    options.open(&target.file).map_err(|source| RedirectError::Open {
        file: target.file.clone(),
        source,
    })
}

fn share(file: &File, target: &RedirectTarget) -> Result<File, RedirectError> {
    file.try_clone().map_err(|source| RedirectError::Share {
        file: target.file.clone(),
        source,
    })
}

/// Output and error writers bound to a builtin for the duration of one call.
///
/// Without a redirect both writers are the interpreter's own stdout/stderr. With one, the
/// covered stream(s) write to the target file instead. Nothing global is swapped: dropping the
/// value flushes and closes the file, so the interpreter's streams are back in effect however the
/// builtin returned.
pub(crate) struct BoundStreams {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl BoundStreams {
    pub(crate) fn inherit() -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    pub(crate) fn for_target(target: Option<&RedirectTarget>) -> Result<Self, RedirectError> {
        let Some(target) = target else {
            return Ok(Self::inherit());
        };

        let file = open_target(target)?;
        let streams = match target.stream {
            TargetStream::Stdout => Self {
                out: Box::new(file),
                err: Box::new(io::stderr()),
            },
            TargetStream::Stderr => Self {
                out: Box::new(io::stdout()),
                err: Box::new(file),
            },
            TargetStream::Both => Self {
                out: Box::new(share(&file, target)?),
                err: Box::new(file),
            },
        };
        Ok(streams)
    }

    /// Both writers at once, for handing to a builtin.
    pub(crate) fn pair(&mut self) -> (&mut dyn Write, &mut dyn Write) {
        (&mut *self.out, &mut *self.err)
    }
}

impl Drop for BoundStreams {
    fn drop(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!("failed to flush command output: {e}");
        }
        if let Err(e) = self.err.flush() {
            warn!("failed to flush command error output: {e}");
        }
    }
}

/// Standard stream bindings for a child process. Stdin is always inherited.
pub(crate) struct ProcessStdio {
    pub(crate) stdout: Stdio,
    pub(crate) stderr: Stdio,
}

impl ProcessStdio {
    pub(crate) fn inherit() -> Self {
        Self {
            stdout: Stdio::inherit(),
            stderr: Stdio::inherit(),
        }
    }

    pub(crate) fn for_target(target: Option<&RedirectTarget>) -> Result<Self, RedirectError> {
        let Some(target) = target else {
            return Ok(Self::inherit());
        };

        let file = open_target(target)?;
        let stdio = match target.stream {
            TargetStream::Stdout => Self {
                stdout: Stdio::from(file),
                stderr: Stdio::inherit(),
            },
            TargetStream::Stderr => Self {
                stdout: Stdio::inherit(),
                stderr: Stdio::from(file),
            },
            TargetStream::Both => Self {
                stdout: Stdio::from(share(&file, target)?),
                stderr: Stdio::from(file),
            },
        };
        Ok(stdio)
    }
}
