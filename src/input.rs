//! Reading input lines on a dedicated thread.
//!
//! Line editing blocks, so it runs on its own OS thread. The interactive loop asks for one line
//! at a time with [`LineReader::request`] and receives the result through a bounded channel,
//! which lets it wait on the next line and on Ctrl-C at the same time.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// What the reader produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// One physical line, without its terminator.
    Line(String),
    /// Ctrl-C while the line was being edited.
    Interrupted,
    /// End of input.
    Eof,
    /// The input stream cannot be read any more.
    Failed(String),
}

impl InputEvent {
    fn ends_input(&self) -> bool {
        matches!(self, InputEvent::Eof | InputEvent::Failed(_))
    }
}

/// Anything that can produce input lines for a prompt.
pub trait LineSource: Send + 'static {
    fn read_line(&mut self, prompt: &str) -> InputEvent;
}

/// Terminal line editor with in-memory history.
///
/// When stdin is not a terminal, lines are read as-is and no prompt is shown.
pub struct EditorSource {
    editor: DefaultEditor,
    history: bool,
}

impl EditorSource {
    pub fn new(history: bool) -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            history,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> InputEvent {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if self.history && !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to record history entry: {e}");
                    }
                }
                InputEvent::Line(line)
            }
            Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
            Err(ReadlineError::Eof) => InputEvent::Eof,
            Err(err) => InputEvent::Failed(err.to_string()),
        }
    }
}

/// Handle to the reader thread.
pub struct LineReader {
    requests: std_mpsc::Sender<String>,
    events: mpsc::Receiver<InputEvent>,
}

impl LineReader {
    /// Starts the reader thread for `source`.
    pub fn spawn<S: LineSource>(source: S) -> std::io::Result<Self> {
        let (requests_tx, requests_rx) = std_mpsc::channel();
        let (events_tx, events_rx) = mpsc::channel(1);

        thread::Builder::new()
            .name("line-reader".to_string())
            .spawn(move || reader_loop(source, requests_rx, events_tx))?;

        Ok(Self {
            requests: requests_tx,
            events: events_rx,
        })
    }

    /// Asks for the next line, showing `prompt`. Returns false once the reader has stopped.
    pub fn request(&self, prompt: &str) -> bool {
        self.requests.send(prompt.to_string()).is_ok()
    }

    /// Waits for the result of an earlier [`request`](Self::request).
    ///
    /// A reader that went away without reporting why is treated as end of input.
    pub async fn next_event(&mut self) -> InputEvent {
        self.events.recv().await.unwrap_or(InputEvent::Eof)
    }
}

fn reader_loop<S: LineSource>(
    mut source: S,
    requests: std_mpsc::Receiver<String>,
    events: mpsc::Sender<InputEvent>,
) {
    while let Ok(prompt) = requests.recv() {
        let event = source.read_line(&prompt);
        let done = event.ends_input();
        if events.blocking_send(event).is_err() || done {
            break;
        }
    }
    debug!("line reader stopped");
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays a fixed list of events and records the prompts it was asked with.
    pub(crate) struct ScriptedSource {
        events: VecDeque<InputEvent>,
        pub(crate) prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedSource {
        pub(crate) fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
            Self {
                events: events.into_iter().collect(),
                prompts: Arc::default(),
            }
        }

        pub(crate) fn lines(lines: &[&str]) -> Self {
            Self::new(lines.iter().map(|l| InputEvent::Line(l.to_string())))
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self, prompt: &str) -> InputEvent {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.events.pop_front().unwrap_or(InputEvent::Eof)
        }
    }

    #[tokio::test]
    async fn delivers_one_event_per_request() {
        let source = ScriptedSource::lines(&["first", "second"]);
        let prompts = source.prompts.clone();
        let mut reader = LineReader::spawn(source).unwrap();

        assert!(reader.request("$ "));
        assert_eq!(reader.next_event().await, InputEvent::Line("first".to_string()));
        assert!(reader.request(". "));
        assert_eq!(reader.next_event().await, InputEvent::Line("second".to_string()));
        assert!(reader.request("$ "));
        assert_eq!(reader.next_event().await, InputEvent::Eof);

        assert_eq!(*prompts.lock().unwrap(), ["$ ", ". ", "$ "]);
    }

    #[tokio::test]
    async fn reader_stops_after_failure() {
        let source = ScriptedSource::new([InputEvent::Failed("broken pipe".to_string())]);
        let mut reader = LineReader::spawn(source).unwrap();

        assert!(reader.request("$ "));
        assert_eq!(
            reader.next_event().await,
            InputEvent::Failed("broken pipe".to_string())
        );
        // The thread is gone; further reads look like end of input.
        reader.request("$ ");
        assert_eq!(reader.next_event().await, InputEvent::Eof);
    }
}
