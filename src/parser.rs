//! Turning a raw (possibly multi-line) command line into an [`Invocation`].
//!
//! The line is lexed, each non-literal token is expanded, and the expanded word list is then
//! scanned for a redirection operator. Operators are only recognised as standalone words after
//! expansion, so `echo a>b` passes `a>b` through as an ordinary argument.

use crate::command::{Invocation, RedirectTarget, parse_operator};
use crate::error::SyntaxError;
use crate::expand::expand_all;
use crate::lexer::{LexState, lex};
use tracing::debug;

/// What the caller should do with the text read so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line, or every word expanded to nothing.
    Empty,
    /// A quote or escape is still open; read another line and call again with the concatenation.
    Incomplete(LexState),
    Ready(Invocation),
    Invalid(SyntaxError),
}

/// Lexes, expands and splits `text`.
///
/// `text` is everything read for the current command so far, including the line terminators
/// between physical lines. Trailing terminators are ignored, so a line ending in a backslash
/// stays incomplete until the next line arrives.
pub fn parse_line<F>(text: &str, lookup: F) -> LineOutcome
where
    F: Fn(&str) -> Option<String>,
{
    let text = text.trim_start().trim_end_matches(['\n', '\r']);
    if text.trim().is_empty() {
        return LineOutcome::Empty;
    }

    let parsed = lex(text, LexState::default());
    if !parsed.is_complete() {
        debug!(state = ?parsed.state, "line is incomplete");
        return LineOutcome::Incomplete(parsed.state);
    }

    let words = expand_all(&parsed.tokens, lookup);
    if words.is_empty() {
        return LineOutcome::Empty;
    }

    match split(words) {
        Ok(invocation) => LineOutcome::Ready(invocation),
        Err(err) => LineOutcome::Invalid(err),
    }
}

/// Splits an expanded word list into command, arguments and redirect target.
///
/// The first word is always the command name. The first operator among the remaining words
/// takes the word after it as the target file; anything after that file is ignored, since only
/// one redirection per line is supported.
pub fn split(argv: Vec<String>) -> Result<Invocation, SyntaxError> {
    let mut words = argv.into_iter();
    let command = words.next().ok_or(SyntaxError::EmptyCommand)?;

    let mut arguments = Vec::new();
    while let Some(word) = words.next() {
        let Some((stream, append)) = parse_operator(&word) else {
            arguments.push(word);
            continue;
        };

        let file = words
            .next()
            .ok_or(SyntaxError::MissingRedirectTarget { operator: word })?;

        let ignored: Vec<String> = words.by_ref().collect();
        if !ignored.is_empty() {
            debug!(?ignored, "ignoring words after redirect target");
        }

        return Ok(Invocation {
            command,
            arguments,
            redirect_target: Some(RedirectTarget {
                stream,
                file,
                append,
            }),
        });
    }

    Ok(Invocation::new(command, arguments))
}
