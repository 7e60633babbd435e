//! A small interactive command interpreter.
//!
//! Input lines are split into words by a quoting/escaping state machine ([`lexer`]), the
//! non-literal words go through `$NAME` expansion ([`expand`]), and the resulting word list is
//! split into a command invocation plus an optional output redirection ([`parser`]). The
//! [`Interpreter`] then runs the invocation either as one of the builtins (`exit`, `echo`,
//! `type`, `pwd`, `cd`) or as an external program found on `PATH`.
//!
//! The interactive loop lives in [`Interpreter::repl`]: a reader thread feeds lines through a
//! bounded channel so the loop can race input against Ctrl-C, keep reading while quoting is left
//! open, and forward interrupts to a running child instead of to itself.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod expand;
mod external;
pub mod input;
mod interpreter;
mod io_adapters;
pub mod lexer;
pub mod parser;

pub use builtin::Builtin;
pub use config::Config;
pub use external::find_command_path;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
