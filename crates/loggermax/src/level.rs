//! Log levels and their fixed presentation.

use std::fmt;

/// One of the eight leveled logging categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// General purpose output.
    Log,
    /// Informational output.
    Info,
    /// Warnings. Never silenced by the debug flag.
    Warn,
    /// Errors. Never silenced by the debug flag.
    Error,
    /// Structured data dumps, expanded by default.
    Data,
    /// Emphasized output.
    Shout,
    /// Muted tracking output.
    Track,
    /// Load/initialization notices.
    Loaded,
}

/// Where a level forwards its entry when a remote sink is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMethod {
    Log,
    Info,
    Debug,
    /// Remote `error` followed by a remote `trace`.
    Error,
    /// Goes to the console sink's own `warn`, not the remote.
    ConsoleWarn,
}

impl Level {
    /// All levels in declaration order.
    pub const ALL: [Level; 8] = [
        Level::Log,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Data,
        Level::Shout,
        Level::Track,
        Level::Loaded,
    ];

    /// Uppercase label placed in the entry header.
    pub fn label(self) -> &'static str {
        match self {
            Level::Log => "LOG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Data => "DATA",
            Level::Shout => "SHOUT",
            Level::Track => "TRACKING",
            Level::Loaded => "LOADED",
        }
    }

    /// CSS-like style token applied to the header.
    pub fn style(self) -> &'static str {
        match self {
            Level::Log => "color: green",
            Level::Info => "color: blue",
            Level::Warn => "color: orange",
            Level::Error => "background-color: maroon; font-weight: bold; color: white",
            Level::Data => "color: hotpink",
            Level::Shout => "color: red; font-weight: bold; font-size: 125%;",
            Level::Track => "color: grey",
            Level::Loaded => "color: purple",
        }
    }

    /// Whether the debug flag gates this level.
    pub fn is_gated(self) -> bool {
        !matches!(self, Level::Warn | Level::Error)
    }

    pub fn default_full_stack(self) -> bool {
        matches!(self, Level::Error)
    }

    pub fn default_expand(self) -> bool {
        matches!(self, Level::Data)
    }

    pub fn remote_method(self) -> RemoteMethod {
        match self {
            Level::Log | Level::Shout | Level::Track | Level::Loaded => RemoteMethod::Log,
            Level::Info => RemoteMethod::Info,
            Level::Warn => RemoteMethod::ConsoleWarn,
            Level::Error => RemoteMethod::Error,
            Level::Data => RemoteMethod::Debug,
        }
    }

    /// Parse a level name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "log" => Some(Level::Log),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "data" => Some(Level::Data),
            "shout" => Some(Level::Shout),
            "track" | "tracking" => Some(Level::Track),
            "loaded" => Some(Level::Loaded),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Log,
            log::Level::Trace => Level::Track,
        }
    }
}
