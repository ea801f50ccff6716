#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod detection;
pub mod formatter;
pub mod level;
pub mod logger;
pub mod payload;
pub mod sink;
pub mod stack;
pub mod style;
pub mod testing; // Test utilities
pub mod text;

pub use config::{ConfigError, LoggerConfig};
pub use detection::DisplayContext;
pub use formatter::LogFormatter;
pub use level::Level;
pub use logger::{LogOptions, Logger, LoggerBuilder};
pub use payload::{Arg, END_PLACEHOLDER, Payload};
pub use sink::{ConsoleEntry, ConsoleSink, NoopConsole, RemoteSink, TermConsole};
pub use stack::StackContext;
pub use text::{to_title_case, x_index_of};
