//! Call-site context taken from the current backtrace.
//!
//! The backtrace is captured with [`std::backtrace::Backtrace`], rendered,
//! and parsed back into [`Frame`]s. The first frame that belongs neither to
//! the runtime nor to this crate's emission path is the caller.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::OnceLock;

use regex::Regex;

use crate::text::{to_title_case, x_index_of};

/// Label used when no caller frame (or no location for it) was found.
pub const UNKNOWN_CALLER: &str = "____ [unknown]";

/// Text shown in place of a stack when none could be captured.
pub const STACK_UNAVAILABLE: &str = "[stack unavailable]";

/// Symbol prefixes that never count as the caller.
const RUNTIME_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "test::",
    "log::",
    "__rust",
    "rust_begin_unwind",
    "__libc",
    "_start",
];

/// This crate's own emission path.
const INTERNAL_PREFIXES: &[&str] = &[
    "loggermax::stack::",
    "loggermax::formatter::",
    "loggermax::logger::Logger",
];

/// One parsed backtrace frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub symbol: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Frame {
    fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.trim().to_string(),
            file: None,
            line: None,
            column: None,
        }
    }

    /// File name after the last path separator, if a location is known.
    pub fn file_name(&self) -> Option<&str> {
        let file = self.file.as_deref()?;
        Some(file.rsplit(['/', '\\']).next().unwrap_or(file))
    }

    /// `____ [<file>:<line>:<col>]`, or the unknown label.
    pub fn short_label(&self) -> String {
        let Some(name) = self.file_name() else {
            return UNKNOWN_CALLER.to_string();
        };
        let mut location = name.to_string();
        if let Some(line) = self.line {
            location.push_str(&format!(":{line}"));
            if let Some(column) = self.column {
                location.push_str(&format!(":{column}"));
            }
        }
        format!("____ [{}]", location.replace(')', ""))
    }

    /// Title-cased module token between the first two `::` of the symbol.
    ///
    /// Trait impl symbols (`<a::B as c::D>::m`) use the self type's path.
    pub fn module_name(&self) -> Option<String> {
        let path = self_type_path(&self.symbol);
        let symbol = path.as_str();
        let end = x_index_of("::", symbol, 2);
        if end == 0 {
            return None;
        }
        let start = x_index_of("::", symbol, 1) + 2;
        let token = symbol.get(start..end)?;
        if token.is_empty() {
            return None;
        }
        Some(to_title_case(token))
    }

    fn is_runtime(&self) -> bool {
        let symbol = self.symbol.trim_start_matches('<');
        RUNTIME_PREFIXES.iter().any(|p| symbol.starts_with(p))
    }

    fn is_internal(&self) -> bool {
        let symbol = self.symbol.trim_start_matches('<');
        INTERNAL_PREFIXES.iter().any(|p| symbol.starts_with(p))
    }
}

/// `<a::B as c::D>::m` becomes `a::B::m`; plain paths are returned as is.
fn self_type_path(symbol: &str) -> String {
    let Some(inner) = symbol.strip_prefix('<') else {
        return symbol.to_string();
    };
    let end = inner
        .find(" as ")
        .or_else(|| inner.find('>'))
        .unwrap_or(inner.len());
    let method = inner.rfind(">::").map_or("", |i| &inner[i + 1..]);
    format!("{}{method}", &inner[..end])
}

fn frame_regex() -> &'static Regex {
    static FRAME: OnceLock<Regex> = OnceLock::new();
    FRAME.get_or_init(|| {
        Regex::new(r"^\s*\d+:\s+(.+)$").expect("frame pattern is a valid static regex")
    })
}

fn location_regex() -> &'static Regex {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    LOCATION.get_or_init(|| {
        Regex::new(r"^\s*at\s+(.+?):(\d+)(?::(\d+))?\s*$")
            .expect("location pattern is a valid static regex")
    })
}

/// Parse the text form of a [`Backtrace`] into frames.
///
/// Inlined symbols are printed without an index and become frames of
/// their own. Lines that fit neither shape are ignored.
pub fn parse_frames(trace: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in trace.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = location_regex().captures(line) {
            if let Some(frame) = frames.last_mut() {
                frame.file = Some(caps[1].to_string());
                frame.line = caps[2].parse().ok();
                frame.column = caps.get(3).and_then(|m| m.as_str().parse().ok());
            }
        } else if let Some(caps) = frame_regex().captures(line) {
            frames.push(Frame::new(&caps[1]));
        } else if line.starts_with(char::is_whitespace) {
            frames.push(Frame::new(line));
        }
    }
    frames
}

/// The first frame outside the runtime and this crate's emission path.
pub fn caller_frame(frames: &[Frame]) -> Option<&Frame> {
    frames.iter().find(|f| !f.is_runtime() && !f.is_internal())
}

/// Context attached to one emitted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackContext {
    /// One-line caller label.
    Caller { label: String, module: Option<String> },
    /// Whole stack text.
    Full { text: String, module: Option<String> },
    /// The platform could not produce a backtrace.
    Unavailable,
}

impl StackContext {
    /// Capture the context of the current call.
    ///
    /// With `full_stack`, `remote_trace` is asked first and its text used
    /// in place of the local stack when it returns `Some`.
    pub fn capture<F>(full_stack: bool, remote_trace: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        let backtrace = Backtrace::force_capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return match full_stack.then(remote_trace).flatten() {
                Some(text) => StackContext::Full { text, module: None },
                None => StackContext::Unavailable,
            };
        }
        Self::from_trace(&backtrace.to_string(), full_stack, remote_trace)
    }

    /// Build a context from already rendered backtrace text.
    pub fn from_trace<F>(trace: &str, full_stack: bool, remote_trace: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if trace.trim().is_empty() {
            return StackContext::Unavailable;
        }
        let frames = parse_frames(trace);
        let caller = caller_frame(&frames);
        let module = caller.and_then(Frame::module_name);

        if full_stack {
            let text = remote_trace().unwrap_or_else(|| trace.to_string());
            return StackContext::Full { text, module };
        }

        let label = caller
            .map(Frame::short_label)
            .unwrap_or_else(|| UNKNOWN_CALLER.to_string());
        StackContext::Caller { label, module }
    }

    /// Text placed as the final argument of an entry.
    pub fn text(&self) -> &str {
        match self {
            StackContext::Caller { label, .. } => label,
            StackContext::Full { text, .. } => text,
            StackContext::Unavailable => STACK_UNAVAILABLE,
        }
    }

    pub fn module(&self) -> Option<&str> {
        match self {
            StackContext::Caller { module, .. } | StackContext::Full { module, .. } => {
                module.as_deref()
            }
            StackContext::Unavailable => None,
        }
    }

    /// Whether a stack was obtained, which enables header styling.
    pub fn is_usable(&self) -> bool {
        !matches!(self, StackContext::Unavailable)
    }
}
