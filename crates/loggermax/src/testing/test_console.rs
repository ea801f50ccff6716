//! TestConsole for capturing output in tests
//!
//! A console sink that records every entry it receives and the line it
//! would have written, instead of writing to stderr.

use std::io::Write;
use std::sync::{Arc, Mutex};

use strip_ansi_escapes::strip;

use crate::detection::DisplayContext;
use crate::sink::{ConsoleEntry, ConsoleSink, TermConsole};

/// Which console method received an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Log,
    Info,
    Warn,
    Error,
    Debug,
    Trace,
}

/// A console sink that captures output for testing
///
/// Clones share the same buffer, so one clone can be handed to a logger
/// while another is used for assertions.
#[derive(Clone)]
pub struct TestConsole {
    inner: Arc<TermConsole>,
    buffer: Arc<Mutex<TestBuffer>>,
}

#[derive(Debug, Default)]
struct TestBuffer {
    /// Entries in arrival order
    entries: Vec<(ConsoleMethod, ConsoleEntry)>,
    /// Lines with ANSI codes stripped
    lines: Vec<String>,
    /// Lines with ANSI codes preserved
    raw_lines: Vec<String>,
}

impl TestConsole {
    /// Create a test console that renders plain lines
    #[must_use]
    pub fn new() -> Self {
        Self::new_inner(DisplayContext::Plain)
    }

    /// Create a test console that renders styled lines
    #[must_use]
    pub fn new_rich() -> Self {
        Self::new_inner(DisplayContext::Rich)
    }

    fn new_inner(context: DisplayContext) -> Self {
        let buffer = Arc::new(Mutex::new(TestBuffer::default()));
        let writer = BufferWriter(buffer.clone());
        Self {
            inner: Arc::new(TermConsole::with_writer(writer, context)),
            buffer,
        }
    }

    /// Check if the console renders styled output
    #[must_use]
    pub fn is_rich(&self) -> bool {
        self.inner.context().is_rich()
    }

    /// Every entry received, with the method it arrived on
    #[must_use]
    pub fn entries(&self) -> Vec<(ConsoleMethod, ConsoleEntry)> {
        self.buffer
            .lock()
            .map(|b| b.entries.clone())
            .unwrap_or_default()
    }

    /// Entries that arrived on one method
    #[must_use]
    pub fn entries_for(&self, method: ConsoleMethod) -> Vec<ConsoleEntry> {
        self.entries()
            .into_iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, e)| e)
            .collect()
    }

    /// Number of writes across all methods
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.buffer.lock().map(|b| b.entries.len()).unwrap_or(0)
    }

    /// Get all captured output (ANSI codes stripped)
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.lines.clone())
            .unwrap_or_default()
    }

    /// Get all captured output (with ANSI codes)
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.raw_lines.clone())
            .unwrap_or_default()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let output = self.output_string().to_lowercase();
        output.contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert the number of console writes
    ///
    /// # Panics
    ///
    /// Panics if the write count doesn't match expected.
    pub fn assert_write_count(&self, expected: usize) {
        let actual = self.write_count();
        assert_eq!(
            actual, expected,
            "Expected {} writes but got {}. Actual output:\n{}",
            expected, actual, self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.entries.clear();
            buf.lines.clear();
            buf.raw_lines.clear();
        }
    }

    fn record(&self, method: ConsoleMethod, entry: &ConsoleEntry) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.entries.push((method, entry.clone()));
        }
    }
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TestConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestConsole")
            .field("is_rich", &self.is_rich())
            .field("write_count", &self.write_count())
            .finish()
    }
}

impl ConsoleSink for TestConsole {
    fn log(&self, entry: &ConsoleEntry) {
        self.record(ConsoleMethod::Log, entry);
        self.inner.log(entry);
    }

    fn info(&self, entry: &ConsoleEntry) {
        self.record(ConsoleMethod::Info, entry);
        self.inner.info(entry);
    }

    fn warn(&self, entry: &ConsoleEntry) {
        self.record(ConsoleMethod::Warn, entry);
        self.inner.warn(entry);
    }

    fn error(&self, entry: &ConsoleEntry) {
        self.record(ConsoleMethod::Error, entry);
        self.inner.error(entry);
    }

    fn debug(&self, entry: &ConsoleEntry) {
        self.record(ConsoleMethod::Debug, entry);
        self.inner.debug(entry);
    }

    fn trace(&self, entry: &ConsoleEntry) {
        self.record(ConsoleMethod::Trace, entry);
        self.inner.trace(entry);
    }
}

/// Remove ANSI codes from one line.
///
/// `strip` drops tabs along with the escape sequences, so each
/// tab-separated segment is stripped on its own.
fn strip_keeping_tabs(line: &str) -> String {
    line.split('\t')
        .map(|segment| String::from_utf8_lossy(&strip(segment)).into_owned())
        .collect::<Vec<_>>()
        .join("\t")
}

/// Writer that captures to a buffer
struct BufferWriter(Arc<Mutex<TestBuffer>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let s = String::from_utf8_lossy(buf);

        if let Ok(mut buffer) = self.0.lock() {
            buffer.raw_lines.extend(s.lines().map(String::from));

            buffer.lines.extend(s.lines().map(strip_keeping_tabs));
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
