//! Testing utilities for loggermax output
//!
//! Provides `TestConsole` and `TestRemote` for capturing and asserting on
//! what a [`Logger`](crate::Logger) writes.

mod test_console;
mod test_remote;

pub use test_console::{ConsoleMethod, TestConsole};
pub use test_remote::{RemoteCall, TestRemote};
