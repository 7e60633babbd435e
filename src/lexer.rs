//! A module implementing lexical analysis (tokenization) for the command line.
//!
//! The lexer is a character-at-a-time state machine. Its quote/escape condition is kept in an
//! explicit [`LexState`] value so that a caller holding an incomplete line (open quote, trailing
//! backslash) can read another physical line and lex the concatenation again.

use tracing::trace;

/// A word produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    /// Set when the word came from single quotes or contains an escaped `$` or backtick.
    /// Literal tokens are never variable-expanded.
    pub is_literal: bool,
}

impl Token {
    pub fn new(value: impl Into<String>, is_literal: bool) -> Self {
        Self {
            value: value.into(),
            is_literal,
        }
    }
}

/// Quote and escape condition carried from one character (or chunk) to the next.
///
/// At most one of `in_single_quote` / `in_double_quote` is set at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexState {
    pub in_single_quote: bool,
    pub in_double_quote: bool,
    pub escape_pending: bool,
}

impl LexState {
    /// True when no quote is open and no escape is waiting for its character.
    pub fn is_complete(&self) -> bool {
        !self.escape_pending && !self.in_single_quote && !self.in_double_quote
    }
}

/// Output of one lexing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub tokens: Vec<Token>,
    pub state: LexState,
}

impl ParsedLine {
    /// An incomplete line needs another physical line appended before it can run.
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

struct LexingFSM {
    state: LexState,
    tokens: Vec<Token>,
    buffer: String,
    literal: bool,
}

impl LexingFSM {
    fn new(state: LexState) -> Self {
        LexingFSM {
            state,
            tokens: Vec::new(),
            buffer: String::new(),
            // Resuming inside single quotes means the pending word is already literal.
            literal: state.in_single_quote,
        }
    }

    fn feed(&mut self, ch: char) {
        if self.state.escape_pending {
            self.handle_escaped(ch);
            return;
        }

        match ch {
            '\\' => self.handle_backslash(),
            '"' => self.handle_double_quote(),
            '\'' => self.handle_single_quote(),
            ' ' => self.handle_space(),
            c => self.buffer.push(c),
        }
    }

    fn handle_escaped(&mut self, ch: char) {
        self.state.escape_pending = false;

        // Backslash-newline is a line continuation: both characters vanish.
        if ch == '\n' {
            return;
        }

        if ch == '$' || ch == '`' {
            self.literal = true;
        }

        if self.state.in_double_quote && !matches!(ch, '$' | '`' | '\\' | '"') {
            self.buffer.push('\\');
        }
        self.buffer.push(ch);
    }

    fn handle_backslash(&mut self) {
        if self.state.in_single_quote {
            self.buffer.push('\\');
        } else {
            self.state.escape_pending = true;
        }
    }

    fn handle_double_quote(&mut self) {
        if self.state.in_single_quote {
            self.buffer.push('"');
        } else {
            self.state.in_double_quote = !self.state.in_double_quote;
        }
    }

    fn handle_single_quote(&mut self) {
        if self.state.in_double_quote {
            self.buffer.push('\'');
            return;
        }

        self.state.in_single_quote = !self.state.in_single_quote;
        if self.state.in_single_quote {
            self.literal = true;
        }
    }

    fn handle_space(&mut self) {
        if self.state.in_single_quote || self.state.in_double_quote {
            self.buffer.push(' ');
        } else {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.push(Token {
                value: std::mem::take(&mut self.buffer),
                is_literal: self.literal,
            });
        }
        self.literal = false;
    }

    fn finish(mut self) -> ParsedLine {
        self.flush();
        ParsedLine {
            tokens: self.tokens,
            state: self.state,
        }
    }
}

/// Splits `chunk` into tokens, starting from the quote/escape condition `state_in`.
///
/// The returned [`ParsedLine::state`] tells whether the text left a quote or escape open.
/// Lexing never fails; incompleteness is reported through the state instead.
pub fn lex(chunk: &str, state_in: LexState) -> ParsedLine {
    let mut fsm = LexingFSM::new(state_in);
    for ch in chunk.chars() {
        fsm.feed(ch);
    }
    let parsed = fsm.finish();
    trace!(?parsed, "lexed chunk");
    parsed
}
