//! Console and remote sinks
//!
//! Both traits give every method a no-op default, so a sink only
//! implements the capabilities it actually has.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::detection::DisplayContext;
use crate::level::Level;
use crate::payload::Arg;
use crate::style::StyleSpec;

/// Marker that applies the next [`Arg::Style`] to the text after it.
pub const STYLE_MARKER: &str = "%c";

/// One formatted console write.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleEntry {
    pub level: Level,
    pub args: Vec<Arg>,
}

impl ConsoleEntry {
    #[must_use]
    pub fn new(level: Level, args: Vec<Arg>) -> Self {
        Self { level, args }
    }

    /// Whether any argument is a style token.
    pub fn is_styled(&self) -> bool {
        self.args.iter().any(|a| matches!(a, Arg::Style(_)))
    }

    /// All non-style arguments joined by spaces, style markers removed.
    pub fn plain_text(&self) -> String {
        self.args
            .iter()
            .filter_map(|arg| match arg {
                Arg::Style(_) => None,
                Arg::Text(text) => {
                    Some(text.strip_prefix(STYLE_MARKER).unwrap_or(text).to_string())
                }
                Arg::Value(value) => Some(value.to_string()),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Destination for formatted entries.
pub trait ConsoleSink: Send + Sync {
    fn log(&self, _entry: &ConsoleEntry) {}
    fn info(&self, _entry: &ConsoleEntry) {}
    fn warn(&self, _entry: &ConsoleEntry) {}
    fn error(&self, _entry: &ConsoleEntry) {}
    fn debug(&self, _entry: &ConsoleEntry) {}
    fn trace(&self, _entry: &ConsoleEntry) {}
}

/// Optional transport mirroring entries elsewhere.
///
/// Receives the caller's prepend and message (or the end placeholder),
/// never the formatted header.
pub trait RemoteSink: Send + Sync {
    fn log(&self, _prepend: &Arg, _message: &Arg) {}
    fn info(&self, _prepend: &Arg, _message: &Arg) {}
    fn error(&self, _prepend: &Arg, _message: &Arg) {}
    fn debug(&self, _prepend: &Arg, _message: &Arg) {}

    /// Stack text from the remote side, used for full-stack context.
    fn trace(&self) -> Option<String> {
        None
    }
}

/// A console with no capabilities at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConsole;

impl ConsoleSink for NoopConsole {}

/// Renders entries as lines on a terminal stream (stderr by default).
pub struct TermConsole {
    writer: Mutex<Box<dyn Write + Send>>,
    context: DisplayContext,
}

impl TermConsole {
    /// Stderr with automatic detection
    #[must_use]
    pub fn new() -> Self {
        Self::with_context(DisplayContext::detect())
    }

    /// Stderr with explicit rich/plain rendering
    #[must_use]
    pub fn with_context(context: DisplayContext) -> Self {
        Self::with_writer(io::stderr(), context)
    }

    /// Create with custom writer (for testing)
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(writer: W, context: DisplayContext) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            context,
        }
    }

    pub fn context(&self) -> DisplayContext {
        self.context
    }

    /// Render an entry to a single string.
    pub fn render(&self, entry: &ConsoleEntry) -> String {
        let mut parts = Vec::with_capacity(entry.args.len());
        let mut args = entry.args.iter().peekable();

        while let Some(arg) = args.next() {
            match arg {
                Arg::Text(text) => match text.strip_prefix(STYLE_MARKER) {
                    Some(rest) => {
                        let style = match args.peek() {
                            Some(Arg::Style(token)) => {
                                args.next();
                                Some(token.as_str())
                            }
                            _ => None,
                        };
                        parts.push(self.apply_style(rest, style));
                    }
                    None => parts.push(text.clone()),
                },
                // A style with no marker in front of it has nothing to apply to
                Arg::Style(_) => {}
                Arg::Value(value) => parts.push(value.to_string()),
            }
        }

        parts.join(" ")
    }

    fn apply_style(&self, text: &str, style: Option<&str>) -> String {
        match style {
            Some(token) if self.context.is_rich() => StyleSpec::parse(token)
                .to_console_style()
                .force_styling(true)
                .apply_to(text)
                .to_string(),
            _ => text.to_string(),
        }
    }

    fn write_entry(&self, entry: &ConsoleEntry) {
        let mut line = self.render(entry);
        line.push('\n');
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.flush();
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TermConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermConsole")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl ConsoleSink for TermConsole {
    fn log(&self, entry: &ConsoleEntry) {
        self.write_entry(entry);
    }

    fn info(&self, entry: &ConsoleEntry) {
        self.write_entry(entry);
    }

    fn warn(&self, entry: &ConsoleEntry) {
        self.write_entry(entry);
    }

    fn error(&self, entry: &ConsoleEntry) {
        self.write_entry(entry);
    }

    fn debug(&self, entry: &ConsoleEntry) {
        self.write_entry(entry);
    }

    fn trace(&self, entry: &ConsoleEntry) {
        self.write_entry(entry);
    }
}
