use minishell::input::{EditorSource, LineReader};
use minishell::{Config, Interpreter};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config: Config = argh::from_env();
    init_logging();

    let source = match EditorSource::new(!config.no_history) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            return ExitCode::FAILURE;
        }
    };
    let reader = match LineReader::spawn(source) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let status = Interpreter::new(config).repl(reader).await;
    ExitCode::from(u8::try_from(status).unwrap_or(1))
}
