use crate::command::ExitCode;
use crate::env::Environment;
use crate::external::find_command_path;
use anyhow::{Context, Result, anyhow};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process against the interpreter's [`Environment`]. They never spawn a
/// process and are not interruptible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
    Pwd,
    Cd,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Exit,
        Builtin::Echo,
        Builtin::Type,
        Builtin::Pwd,
        Builtin::Cd,
    ];

    /// Canonical name of the command, e.g. "echo" or "cd".
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Echo => "echo",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    /// Executes the builtin using the provided output streams and environment.
    ///
    /// A failing builtin reports its diagnostic on `err` and returns 1.
    pub(crate) fn run(
        self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
        env: &mut Environment,
    ) -> ExitCode {
        debug!(builtin = self.name(), ?args, "running builtin");
        let result = match self {
            Builtin::Exit => exit(env),
            Builtin::Echo => echo(args, out),
            Builtin::Type => type_of(args, out, env),
            Builtin::Pwd => pwd(out),
            Builtin::Cd => cd(args, env),
        };

        match result {
            Ok(code) => code,
            Err(e) => {
                if let Err(write_err) = writeln!(err, "{e:#}") {
                    tracing::warn!("failed to report {} error: {write_err}", self.name());
                }
                1
            }
        }
    }
}

/// Asks the interactive loop to stop; the interpreter then exits with status 0.
fn exit(env: &mut Environment) -> Result<ExitCode> {
    env.should_exit = true;
    Ok(0)
}

fn echo(args: &[String], out: &mut dyn Write) -> Result<ExitCode> {
    writeln!(out, "{}", args.join(" "))?;
    Ok(0)
}

fn type_of(args: &[String], out: &mut dyn Write, env: &Environment) -> Result<ExitCode> {
    if args.is_empty() {
        writeln!(out)?;
        return Ok(0);
    }

    let search_paths = OsString::from(env.lookup("PATH"));
    let mut status = 0;
    for name in args {
        if Builtin::from_name(name).is_some() {
            writeln!(out, "{name} is a shell builtin")?;
            status = 0;
            continue;
        }
        match find_command_path(&search_paths, name) {
            Ok(path) => {
                writeln!(out, "{name} is {}", path.display())?;
                status = 0;
            }
            Err(_) => {
                writeln!(out, "{name}: not found")?;
                status = 1;
            }
        }
    }
    Ok(status)
}

fn pwd(out: &mut dyn Write) -> Result<ExitCode> {
    let current_dir = std::env::current_dir().context("pwd")?;
    writeln!(out, "{}", current_dir.display())?;
    Ok(0)
}

fn cd(args: &[String], env: &mut Environment) -> Result<ExitCode> {
    let arg = args.first().map(String::as_str).unwrap_or("~");

    let target = match arg.strip_prefix('~') {
        Some(rest) => {
            let home = env
                .home_dir()
                .map_err(|_| anyhow!("cd: {arg}: Error finding HOME variable"))?;
            let mut joined = home.into_os_string();
            joined.push(rest);
            PathBuf::from(joined)
        }
        None => PathBuf::from(arg),
    };

    let new_dir = if target.is_absolute() {
        target
    } else {
        env.current_dir.join(target)
    };

    std::env::set_current_dir(&new_dir)
        .map_err(|_| anyhow!("cd: {arg}: No such file or directory"))?;
    env.current_dir = std::env::current_dir().unwrap_or(new_dir);
    Ok(0)
}
