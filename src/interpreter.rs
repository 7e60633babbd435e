use crate::builtin::Builtin;
use crate::command::{EXIT_NOT_FOUND, EXIT_PERMISSION_DENIED, ExitCode, Invocation};
use crate::config::Config;
use crate::env::Environment;
use crate::error::ResolveError;
use crate::external::{ExternalCommand, find_command_path};
use crate::input::{InputEvent, LineReader};
use crate::io_adapters::BoundStreams;
use crate::parser::{LineOutcome, parse_line};
use std::ffi::OsString;
use std::future::Future;
use tracing::{debug, info, warn};

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter owns an [`Environment`] (variables and working directory) and remembers the
/// status of the last command it dispatched. Lines are handed to it either one at a time through
/// [`Interpreter::execute_line`] or from a [`LineReader`] through [`Interpreter::repl`].
///
/// Example
/// ```no_run
/// use minishell::Interpreter;
/// # async fn demo() {
/// let mut sh = Interpreter::default();
/// sh.execute_line("echo hello world").await;
/// assert_eq!(sh.last_status(), 0);
/// # }
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
    last_status: ExitCode,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Interpreter {
    /// Create an interpreter that sees the process environment.
    pub fn new(config: Config) -> Self {
        Self::with_environment(config, Environment::new())
    }

    pub fn with_environment(config: Config, env: Environment) -> Self {
        Self {
            env,
            config,
            last_status: 0,
        }
    }

    /// Status of the most recently dispatched command; 0 before any command ran.
    pub fn last_status(&self) -> ExitCode {
        self.last_status
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// True once `exit` has run. [`Interpreter::repl`] stops by itself; callers driving
    /// [`Interpreter::execute_line`] should stop feeding lines.
    pub fn exit_requested(&self) -> bool {
        self.env.should_exit
    }

    /// Parses `text` and runs it if it forms a complete command.
    ///
    /// Returns the parse outcome. For [`LineOutcome::Incomplete`] nothing ran and the caller is
    /// expected to append the next physical line and try again. A syntax error is printed on
    /// stdout and leaves the last status untouched. External commands run here cannot be
    /// interrupted; use [`Interpreter::repl`] for that.
    ///
    /// `exit` only marks the interpreter as finished; check [`Interpreter::exit_requested`]
    /// after each line.
    pub async fn execute_line(&mut self, text: &str) -> LineOutcome {
        let outcome = parse_line(text, |name| self.env.get_var(name));
        match &outcome {
            LineOutcome::Ready(invocation) => {
                self.dispatch(invocation.clone(), std::future::pending()).await;
            }
            LineOutcome::Invalid(err) => println!("{err}"),
            LineOutcome::Empty | LineOutcome::Incomplete(_) => {}
        }
        outcome
    }

    /// Runs one command and records its status.
    ///
    /// Builtins take precedence over PATH. `cancel` is only consulted while an external process
    /// runs; when it resolves the process is killed.
    pub async fn dispatch<C>(&mut self, invocation: Invocation, cancel: C)
    where
        C: Future<Output = ()>,
    {
        debug!(command = %invocation.command, args = ?invocation.arguments, redirect = ?invocation.redirect_target, "dispatching");

        if let Some(builtin) = Builtin::from_name(&invocation.command) {
            self.last_status = self.run_builtin(builtin, &invocation);
            if builtin == Builtin::Cd && self.last_status == 0 && self.config.list_after_cd {
                self.list_current_dir(cancel).await;
            }
            return;
        }

        self.last_status = self.run_external(invocation, cancel).await;
    }

    fn run_builtin(&mut self, builtin: Builtin, invocation: &Invocation) -> ExitCode {
        let mut streams = match BoundStreams::for_target(invocation.redirect_target.as_ref()) {
            Ok(streams) => streams,
            Err(e) => {
                eprintln!("{e}");
                return 1;
            }
        };
        let (out, err) = streams.pair();
        builtin.run(&invocation.arguments, out, err, &mut self.env)
    }

    async fn run_external<C>(&mut self, invocation: Invocation, cancel: C) -> ExitCode
    where
        C: Future<Output = ()>,
    {
        let search_paths = OsString::from(self.env.lookup("PATH"));
        let program = match find_command_path(&search_paths, &invocation.command) {
            Ok(program) => program,
            Err(e) => {
                println!("{e}");
                return match e {
                    ResolveError::NotFound(_) => EXIT_NOT_FOUND,
                    ResolveError::PermissionDenied(_) => EXIT_PERMISSION_DENIED,
                };
            }
        };

        let redirect = invocation.redirect_target;
        let command = ExternalCommand::new(program, invocation.command, invocation.arguments);
        match command.run(redirect.as_ref(), &self.env, cancel).await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{e}");
                1
            }
        }
    }

    /// Shows the new working directory after `cd`. The listing does not change the status.
    async fn list_current_dir<C>(&mut self, cancel: C)
    where
        C: Future<Output = ()>,
    {
        let search_paths = OsString::from(self.env.lookup("PATH"));
        let program = match find_command_path(&search_paths, "ls") {
            Ok(program) => program,
            Err(e) => {
                warn!("cannot list directory: {e}");
                return;
            }
        };
        let command = ExternalCommand::new(program, "ls", Vec::new());
        match command.run(None, &self.env, cancel).await {
            Ok(0) => {}
            Ok(code) => debug!(code, "ls exited with non-zero status"),
            Err(e) => warn!("cannot list directory: {e}"),
        }
    }

    /// Interactive read-eval-print loop.
    ///
    /// One line is requested from `input` at a time. A line that leaves a quote or escape open
    /// is kept and the next one is requested with the continuation prompt; the joined text is
    /// re-lexed from scratch each time. Ctrl-C while waiting for input drops the pending text and
    /// starts over at the primary prompt. Ctrl-C while an external command runs is delivered to
    /// that command only.
    ///
    /// Returns the status the process should exit with: 0 after `exit` or end of input, 1 when
    /// input could not be read.
    pub async fn repl(&mut self, mut input: LineReader) -> ExitCode {
        let mut pending = String::new();
        let mut awaiting_line = false;

        loop {
            if !awaiting_line {
                let prompt = if pending.is_empty() {
                    &self.config.prompt
                } else {
                    &self.config.continuation_prompt
                };
                if !input.request(prompt) {
                    eprintln!("Error reading input: line reader stopped");
                    return 1;
                }
                awaiting_line = true;
            }

            let event = tokio::select! {
                event = input.next_event() => {
                    awaiting_line = false;
                    event
                }
                () = interrupted() => InputEvent::Interrupted,
            };

            match event {
                InputEvent::Line(line) => {
                    pending.push_str(&line);
                    pending.push('\n');
                    match parse_line(&pending, |name| self.env.get_var(name)) {
                        LineOutcome::Incomplete(state) => {
                            debug!(?state, "waiting for continuation line");
                            continue;
                        }
                        LineOutcome::Empty => {}
                        LineOutcome::Invalid(err) => println!("{err}"),
                        LineOutcome::Ready(invocation) => {
                            self.dispatch(invocation, interrupted()).await;
                        }
                    }
                    pending.clear();
                    if self.exit_requested() {
                        info!("exit requested");
                        return 0;
                    }
                }
                InputEvent::Interrupted => {
                    debug!(discarded = pending.len(), "interrupted");
                    pending.clear();
                    println!();
                }
                InputEvent::Eof => {
                    println!();
                    return 0;
                }
                InputEvent::Failed(cause) => {
                    eprintln!("Error reading input: {cause}");
                    return 1;
                }
            }
        }
    }
}

/// Resolves on the next Ctrl-C delivered to the process.
///
/// A fresh listener only sees interrupts that arrive after it was created, so a Ctrl-C that
/// killed a child is not seen again by the prompt.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for interrupts: {e}");
        std::future::pending::<()>().await;
    }
}
