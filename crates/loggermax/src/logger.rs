//! The leveled logger.
//!
//! # Usage
//!
//! ```ignore
//! use loggermax::{LogOptions, Logger};
//! use serde_json::json;
//!
//! let logger = Logger::builder().debug_enabled(true).build();
//!
//! logger.info("server started");
//! logger.data(("config: ", json!({"port": 8080})));
//! logger.error_with("lost connection", LogOptions::new().full_stack(false));
//!
//! // Or route the `log` facade through it
//! Logger::builder().build().init().ok();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{LevelFilter, Metadata, Record};

use crate::config::LoggerConfig;
use crate::detection::DisplayContext;
use crate::formatter::LogFormatter;
use crate::level::{Level, RemoteMethod};
use crate::payload::Payload;
use crate::sink::{ConsoleEntry, ConsoleSink, RemoteSink, TermConsole};
use crate::stack::StackContext;

/// Per-call overrides of the level defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Full stack text instead of the one-line caller label
    pub full_stack: Option<bool>,
    /// Pretty-print structured payloads inline
    pub expand: Option<bool>,
}

impl LogOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn full_stack(mut self, full_stack: bool) -> Self {
        self.full_stack = Some(full_stack);
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = Some(expand);
        self
    }
}

/// Leveled console logger.
///
/// `warn` and `error` always emit. Every other level is a no-op while the
/// debug flag is off.
pub struct Logger {
    console: Arc<dyn ConsoleSink>,
    remote: Option<Arc<dyn RemoteSink>>,
    formatter: LogFormatter,
    debug: AtomicBool,
    prefer_remote_trace: bool,
}

impl Logger {
    /// Logger on stderr with defaults (debug off).
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Logger on stderr configured from `config`.
    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        LoggerBuilder::from_config(config).build()
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub fn set_debug_enabled(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn log(&self, payload: impl Into<Payload>) {
        self.emit(Level::Log, payload.into(), LogOptions::default());
    }

    pub fn log_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Log, payload.into(), options);
    }

    pub fn info(&self, payload: impl Into<Payload>) {
        self.emit(Level::Info, payload.into(), LogOptions::default());
    }

    pub fn info_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Info, payload.into(), options);
    }

    /// Always emits, debug or not.
    pub fn warn(&self, payload: impl Into<Payload>) {
        self.emit(Level::Warn, payload.into(), LogOptions::default());
    }

    pub fn warn_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Warn, payload.into(), options);
    }

    /// Always emits, debug or not. Shows the full stack unless told otherwise.
    pub fn error(&self, payload: impl Into<Payload>) {
        self.emit(Level::Error, payload.into(), LogOptions::default());
    }

    pub fn error_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Error, payload.into(), options);
    }

    /// Structured dump; expands payloads unless told otherwise.
    pub fn data(&self, payload: impl Into<Payload>) {
        self.emit(Level::Data, payload.into(), LogOptions::default());
    }

    pub fn data_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Data, payload.into(), options);
    }

    pub fn shout(&self, payload: impl Into<Payload>) {
        self.emit(Level::Shout, payload.into(), LogOptions::default());
    }

    pub fn shout_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Shout, payload.into(), options);
    }

    pub fn track(&self, payload: impl Into<Payload>) {
        self.emit(Level::Track, payload.into(), LogOptions::default());
    }

    pub fn track_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Track, payload.into(), options);
    }

    pub fn loaded(&self, payload: impl Into<Payload>) {
        self.emit(Level::Loaded, payload.into(), LogOptions::default());
    }

    pub fn loaded_with(&self, payload: impl Into<Payload>, options: LogOptions) {
        self.emit(Level::Loaded, payload.into(), options);
    }

    /// Emit at a level chosen at runtime.
    pub fn emit(&self, level: Level, payload: Payload, options: LogOptions) {
        if level.is_gated() && !self.debug_enabled() {
            return;
        }

        let full_stack = options.full_stack.unwrap_or(level.default_full_stack());
        let expand = options.expand.unwrap_or(level.default_expand());

        let context = StackContext::capture(full_stack, || self.remote_trace());
        let entry = self
            .formatter
            .format(level, level.style(), &payload, &context, expand);
        self.console.log(&entry);

        self.forward(level, &payload);
    }

    fn remote_trace(&self) -> Option<String> {
        if !self.prefer_remote_trace {
            return None;
        }
        self.remote.as_ref().and_then(|remote| remote.trace())
    }

    fn forward(&self, level: Level, payload: &Payload) {
        let Some(remote) = &self.remote else {
            return;
        };
        let prepend = payload.prepend_arg();
        let message = payload.message_arg();

        match level.remote_method() {
            RemoteMethod::Log => remote.log(&prepend, &message),
            RemoteMethod::Info => remote.info(&prepend, &message),
            RemoteMethod::Debug => remote.debug(&prepend, &message),
            RemoteMethod::Error => {
                remote.error(&prepend, &message);
                let _ = remote.trace();
            }
            RemoteMethod::ConsoleWarn => {
                self.console
                    .warn(&ConsoleEntry::new(level, vec![prepend, message]));
            }
        }
    }

    /// Install as the global `log` backend.
    ///
    /// The installed logger is returned so its debug flag stays reachable.
    /// Returns an error if a logger has already been set.
    ///
    /// The logger is leaked to get a `'static` reference. A failed install
    /// leaks it as well, so call this once at startup.
    pub fn init(self) -> Result<&'static Logger, log::SetLoggerError> {
        let logger: &'static Logger = Box::leak(Box::new(self));
        log::set_logger(logger)?;
        // Gating happens per call against the debug flag
        log::set_max_level(LevelFilter::Trace);
        Ok(logger)
    }

    /// Install as the global `log` backend, ignoring errors if already set.
    ///
    /// Leaks `self` when a logger is already installed; see [`Logger::init`].
    pub fn try_init(self) -> Option<&'static Logger> {
        self.init().ok()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("debug_enabled", &self.debug_enabled())
            .field("has_remote", &self.has_remote())
            .field("prefer_remote_trace", &self.prefer_remote_trace)
            .finish_non_exhaustive()
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        !Level::from(metadata.level()).is_gated() || self.debug_enabled()
    }

    fn log(&self, record: &Record) {
        if !log::Log::enabled(self, record.metadata()) {
            return;
        }
        let payload = Payload::TextWithText(
            format!("{}: ", record.target()),
            record.args().to_string(),
        );
        self.emit(Level::from(record.level()), payload, LogOptions::default());
    }

    fn flush(&self) {}
}

/// Builder for configuring a [`Logger`].
pub struct LoggerBuilder {
    console: Option<Arc<dyn ConsoleSink>>,
    remote: Option<Arc<dyn RemoteSink>>,
    debug: bool,
    prefer_remote_trace: bool,
    context: Option<DisplayContext>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            console: None,
            remote: None,
            debug: false,
            prefer_remote_trace: true,
            context: None,
        }
    }

    /// Seed the builder from a config.
    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new()
            .debug_enabled(config.debug)
            .prefer_remote_trace(config.prefer_remote_trace)
            .context(config.resolve_context())
    }

    /// Console sink to write entries to (default: stderr).
    #[must_use]
    pub fn console(mut self, console: Arc<dyn ConsoleSink>) -> Self {
        self.console = Some(console);
        self
    }

    /// Remote sink mirroring every emitted entry.
    #[must_use]
    pub fn remote(mut self, remote: Arc<dyn RemoteSink>) -> Self {
        self.remote = Some(remote);
        self
    }

    #[must_use]
    pub fn debug_enabled(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    #[must_use]
    pub fn prefer_remote_trace(mut self, prefer: bool) -> Self {
        self.prefer_remote_trace = prefer;
        self
    }

    /// Rendering mode for the default stderr console.
    #[must_use]
    pub fn context(mut self, context: DisplayContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn build(self) -> Logger {
        let console = match self.console {
            Some(console) => console,
            None => {
                let context = self.context.unwrap_or_else(DisplayContext::detect);
                Arc::new(TermConsole::with_context(context))
            }
        };

        Logger {
            console,
            remote: self.remote,
            formatter: LogFormatter::new(),
            debug: AtomicBool::new(self.debug),
            prefer_remote_trace: self.prefer_remote_trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Arg, END_PLACEHOLDER};
    use crate::testing::{ConsoleMethod, RemoteCall, TestConsole, TestRemote};
    use serde_json::json;

    fn logger(debug: bool) -> (Logger, TestConsole, TestRemote) {
        let console = TestConsole::new();
        let remote = TestRemote::new();
        let logger = Logger::builder()
            .console(Arc::new(console.clone()))
            .remote(Arc::new(remote.clone()))
            .debug_enabled(debug)
            .build();
        (logger, console, remote)
    }

    fn last_arg(console: &TestConsole) -> String {
        let entries = console.entries_for(ConsoleMethod::Log);
        entries
            .last()
            .and_then(|e| e.args.last())
            .map(Arg::to_plain)
            .unwrap_or_default()
    }

    fn call_level(logger: &Logger, level: Level) {
        match level {
            Level::Log => logger.log("m"),
            Level::Info => logger.info("m"),
            Level::Warn => logger.warn("m"),
            Level::Error => logger.error("m"),
            Level::Data => logger.data("m"),
            Level::Shout => logger.shout("m"),
            Level::Track => logger.track("m"),
            Level::Loaded => logger.loaded("m"),
        }
    }

    #[test]
    fn test_gated_levels_silent_when_debug_off() {
        let (logger, console, remote) = logger(false);
        for level in [
            Level::Log,
            Level::Info,
            Level::Data,
            Level::Shout,
            Level::Track,
            Level::Loaded,
        ] {
            call_level(&logger, level);
        }
        console.assert_write_count(0);
        assert!(remote.calls().is_empty());
    }

    #[test]
    fn test_every_level_writes_once_when_debug_on() {
        for level in Level::ALL {
            let (logger, console, remote) = logger(true);
            call_level(&logger, level);
            assert_eq!(console.entries_for(ConsoleMethod::Log).len(), 1, "{level:?}");
            let forwarded = remote.writes().len() + console.entries_for(ConsoleMethod::Warn).len();
            assert_eq!(forwarded, 1, "{level:?}");
        }
    }

    #[test]
    fn test_warn_and_error_emit_when_debug_off() {
        let (logger, console, _remote) = logger(false);
        logger.warn("careful");
        logger.error("bad thing");
        assert_eq!(console.entries_for(ConsoleMethod::Log).len(), 2);
        console.assert_contains("[#][WARN]");
        console.assert_contains("careful");
        console.assert_contains("[#][ERROR]");
        console.assert_contains("bad thing");
    }

    #[test]
    fn test_toggle_affects_only_later_calls() {
        let (logger, console, _remote) = logger(false);
        logger.set_debug_enabled(true);
        assert!(logger.debug_enabled());
        logger.info("first");
        logger.set_debug_enabled(false);
        logger.info("second");
        console.assert_write_count(1);
        console.assert_contains("first");
        console.assert_not_contains("second");
    }

    #[test]
    fn test_missing_message_forwards_placeholder() {
        let (logger, _console, remote) = logger(true);
        logger.log("only prepend");
        assert_eq!(
            remote.writes(),
            vec![RemoteCall::Log(
                Arg::Text("only prepend".into()),
                Arg::Text(END_PLACEHOLDER.into())
            )]
        );
    }

    #[test]
    fn test_message_forwarded_when_present() {
        let (logger, _console, remote) = logger(true);
        logger.info(("user: ", json!({"id": 1})));
        assert_eq!(
            remote.writes(),
            vec![RemoteCall::Info(Arg::Text("user: ".into()), Arg::Value(json!({"id": 1})))]
        );
    }

    #[test]
    fn test_data_forwards_to_remote_debug() {
        let (logger, _console, remote) = logger(true);
        logger.data(json!([1, 2]));
        assert!(matches!(remote.writes()[0], RemoteCall::Debug(Arg::Value(_), _)));
    }

    #[test]
    fn test_warn_forwards_to_console_warn() {
        let (logger, console, remote) = logger(false);
        logger.warn(("disk", "almost full"));
        assert!(remote.calls().is_empty());
        let warned = console.entries_for(ConsoleMethod::Warn);
        assert_eq!(
            warned[0].args,
            vec![Arg::Text("disk".into()), Arg::Text("almost full".into())]
        );
    }

    #[test]
    fn test_warn_without_remote_writes_once() {
        let console = TestConsole::new();
        let logger = Logger::builder().console(Arc::new(console.clone())).build();
        logger.warn("careful");
        console.assert_write_count(1);
    }

    #[test]
    fn test_error_forwards_then_traces() {
        let (logger, _console, remote) = logger(false);
        logger.error_with("boom", LogOptions::new().full_stack(false));
        assert_eq!(
            remote.calls(),
            vec![
                RemoteCall::Error(Arg::Text("boom".into()), Arg::Text(END_PLACEHOLDER.into())),
                RemoteCall::Trace,
            ]
        );
    }

    #[test]
    fn test_error_defaults_to_full_stack() {
        let console = TestConsole::new();
        let logger = Logger::builder()
            .console(Arc::new(console.clone()))
            .remote(Arc::new(TestRemote::with_trace("remote stack")))
            .build();
        logger.error("bad thing");
        assert_eq!(last_arg(&console), "remote stack");
    }

    #[test]
    fn test_other_levels_default_to_short_stack() {
        let console = TestConsole::new();
        let logger = Logger::builder()
            .console(Arc::new(console.clone()))
            .remote(Arc::new(TestRemote::with_trace("remote stack")))
            .debug_enabled(true)
            .build();
        logger.log("hello");
        logger.warn("careful");
        assert_ne!(last_arg(&console), "remote stack");
        logger.log_with("again", LogOptions::new().full_stack(true));
        assert_eq!(last_arg(&console), "remote stack");
    }

    #[test]
    fn test_remote_trace_can_be_ignored() {
        let console = TestConsole::new();
        let logger = Logger::builder()
            .console(Arc::new(console.clone()))
            .remote(Arc::new(TestRemote::with_trace("remote stack")))
            .prefer_remote_trace(false)
            .build();
        logger.error("bad thing");
        assert_ne!(last_arg(&console), "remote stack");
    }

    #[test]
    fn test_data_defaults_to_expand() {
        let (logger, console, _remote) = logger(true);
        logger.data(json!({"a": 1, "b": [2, 3]}));
        let entry = &console.entries_for(ConsoleMethod::Log)[0];
        let lead = entry.args[0].to_plain();
        assert!(lead.contains("\t\"a\": 1"));
        assert!(lead.contains("\t\"b\": [\n\t\t2,\n\t\t3\n\t]"));
    }

    #[test]
    fn test_log_does_not_expand_by_default() {
        let (logger, console, _remote) = logger(true);
        logger.log(json!({"a": 1}));
        let entry = &console.entries_for(ConsoleMethod::Log)[0];
        assert!(entry.args.contains(&Arg::Value(json!({"a": 1}))));
        logger.log_with(json!({"a": 1}), LogOptions::new().expand(true));
        let entry = &console.entries_for(ConsoleMethod::Log)[1];
        assert!(entry.args[0].to_plain().contains("\t\"a\": 1"));
    }

    #[test]
    fn test_header_labels() {
        let (logger, console, _remote) = logger(true);
        logger.track("t");
        logger.loaded("l");
        logger.shout("s");
        console.assert_contains("[#][TRACKING]");
        console.assert_contains("[#][LOADED]");
        console.assert_contains("[#][SHOUT]");
    }

    #[test]
    fn test_log_facade_enabled_follows_debug_flag() {
        let (logger, _console, _remote) = logger(false);
        let meta = |level| log::Metadata::builder().level(level).target("app").build();
        assert!(log::Log::enabled(&logger, &meta(log::Level::Error)));
        assert!(log::Log::enabled(&logger, &meta(log::Level::Warn)));
        assert!(!log::Log::enabled(&logger, &meta(log::Level::Info)));
        logger.set_debug_enabled(true);
        assert!(log::Log::enabled(&logger, &meta(log::Level::Trace)));
    }

    #[test]
    fn test_log_facade_record_is_emitted() {
        let (logger, console, remote) = logger(true);
        log::Log::log(
            &logger,
            &Record::builder()
                .args(format_args!("listening on {}", 8080))
                .level(log::Level::Info)
                .target("server")
                .build(),
        );
        console.assert_contains("[#][INFO]");
        console.assert_contains("server: ");
        console.assert_contains("listening on 8080");
        assert!(matches!(remote.writes()[0], RemoteCall::Info(..)));
    }

    #[test]
    fn test_log_facade_respects_gating() {
        let (logger, console, _remote) = logger(false);
        log::Log::log(
            &logger,
            &Record::builder()
                .args(format_args!("hidden"))
                .level(log::Level::Debug)
                .target("app")
                .build(),
        );
        console.assert_write_count(0);
    }

    #[test]
    fn test_minimal_console_does_not_crash() {
        let remote = TestRemote::new();
        let logger = Logger::builder()
            .console(Arc::new(crate::sink::NoopConsole))
            .remote(Arc::new(remote.clone()))
            .debug_enabled(true)
            .build();
        for level in Level::ALL {
            call_level(&logger, level);
        }
        assert_eq!(remote.writes().len(), 7);
    }

    #[test]
    fn test_independent_loggers() {
        let (a, console_a, _) = logger(true);
        let (b, console_b, _) = logger(false);
        a.info("from a");
        b.info("from b");
        console_a.assert_write_count(1);
        console_b.assert_write_count(0);
    }

    #[test]
    fn test_from_config_seeds_flag() {
        let logger = Logger::from_config(&LoggerConfig::new().with_debug(true).plain_mode());
        assert!(logger.debug_enabled());
        assert!(!logger.has_remote());
    }
}
