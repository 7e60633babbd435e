//! `$NAME` expansion of non-literal tokens.

use crate::lexer::Token;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// A `$` followed by an identifier: a letter or underscore, then letters, digits, underscores.
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([\p{L}_][\p{L}\p{Nd}_]*)").expect("constant regex pattern is valid")
});

/// Expands every `$NAME` reference in `token` using `lookup`.
///
/// Literal tokens are returned unchanged. Unset variables expand to the empty string.
/// A `$` that does not start an identifier (`$`, `$1`, `$-`) stays as written.
pub fn expand<F>(token: &Token, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if token.is_literal {
        return token.value.clone();
    }

    VAR_PATTERN
        .replace_all(&token.value, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

/// Expands all tokens into the final word list.
///
/// Words that expand to nothing are dropped rather than kept as empty arguments.
pub fn expand_all<F>(tokens: &[Token], lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    tokens
        .iter()
        .map(|token| expand(token, &lookup))
        .filter(|word| !word.is_empty())
        .collect()
}
