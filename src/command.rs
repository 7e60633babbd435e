//! Values passed from the parser to the dispatcher.

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Status reported when a command name resolves to nothing.
pub const EXIT_NOT_FOUND: ExitCode = 127;

/// Status reported when a command was found but cannot be executed.
pub const EXIT_PERMISSION_DENIED: ExitCode = 126;

/// Which of the command's output streams a redirection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStream {
    /// `>`, `1>`, `>>`, `1>>`
    Stdout,
    /// `2>`, `2>>`
    Stderr,
    /// `&>`, `&>>`
    Both,
}

/// Destination of a redirected stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub stream: TargetStream,
    pub file: String,
    /// Append to `file` instead of truncating it.
    pub append: bool,
}

/// A fully expanded command line, ready to be dispatched exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub arguments: Vec<String>,
    pub redirect_target: Option<RedirectTarget>,
}

impl Invocation {
    /// Invocation without redirection.
    pub fn new(command: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            command: command.into(),
            arguments,
            redirect_target: None,
        }
    }
}

/// Maps a redirection operator word to its stream and append flag.
///
/// Only whole words are operators; `a>b` or `>file` are plain words.
pub fn parse_operator(word: &str) -> Option<(TargetStream, bool)> {
    let op = match word {
        ">" | "1>" => (TargetStream::Stdout, false),
        ">>" | "1>>" => (TargetStream::Stdout, true),
        "2>" => (TargetStream::Stderr, false),
        "2>>" => (TargetStream::Stderr, true),
        "&>" => (TargetStream::Both, false),
        "&>>" => (TargetStream::Both, true),
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        gt           = { ">",   TargetStream::Stdout, false },
        one_gt       = { "1>",  TargetStream::Stdout, false },
        gtgt         = { ">>",  TargetStream::Stdout, true },
        one_gtgt     = { "1>>", TargetStream::Stdout, true },
        two_gt       = { "2>",  TargetStream::Stderr, false },
        two_gtgt     = { "2>>", TargetStream::Stderr, true },
        amp_gt       = { "&>",  TargetStream::Both,   false },
        amp_gtgt     = { "&>>", TargetStream::Both,   true },
    )]
    fn recognises_operator(word: &str, stream: TargetStream, append: bool) {
        assert_eq!(parse_operator(word), Some((stream, append)));
    }

    #[test]
    fn compound_words_are_not_operators() {
        for word in [">out", "2>&1", "3>", "<", "a>b", ">>>", ""] {
            assert_eq!(parse_operator(word), None, "{word:?}");
        }
    }
}
