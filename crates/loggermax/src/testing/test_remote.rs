//! TestRemote for capturing forwarded calls in tests

use std::sync::{Arc, Mutex};

use crate::payload::Arg;
use crate::sink::RemoteSink;

/// One call received by a [`TestRemote`]
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Log(Arg, Arg),
    Info(Arg, Arg),
    Error(Arg, Arg),
    Debug(Arg, Arg),
    Trace,
}

impl RemoteCall {
    /// The forwarded message, if this call carries one
    pub fn message(&self) -> Option<&Arg> {
        match self {
            RemoteCall::Log(_, m)
            | RemoteCall::Info(_, m)
            | RemoteCall::Error(_, m)
            | RemoteCall::Debug(_, m) => Some(m),
            RemoteCall::Trace => None,
        }
    }
}

/// A remote sink that records what it receives
///
/// Clones share the same call list.
#[derive(Debug, Clone, Default)]
pub struct TestRemote {
    calls: Arc<Mutex<Vec<RemoteCall>>>,
    trace_text: Option<String>,
}

impl TestRemote {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A remote whose `trace()` returns `text`
    #[must_use]
    pub fn with_trace(text: impl Into<String>) -> Self {
        Self {
            calls: Arc::default(),
            trace_text: Some(text.into()),
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Calls other than trace requests
    #[must_use]
    pub fn writes(&self) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, RemoteCall::Trace))
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn push(&self, call: RemoteCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl RemoteSink for TestRemote {
    fn log(&self, prepend: &Arg, message: &Arg) {
        self.push(RemoteCall::Log(prepend.clone(), message.clone()));
    }

    fn info(&self, prepend: &Arg, message: &Arg) {
        self.push(RemoteCall::Info(prepend.clone(), message.clone()));
    }

    fn error(&self, prepend: &Arg, message: &Arg) {
        self.push(RemoteCall::Error(prepend.clone(), message.clone()));
    }

    fn debug(&self, prepend: &Arg, message: &Arg) {
        self.push(RemoteCall::Debug(prepend.clone(), message.clone()));
    }

    fn trace(&self) -> Option<String> {
        self.push(RemoteCall::Trace);
        self.trace_text.clone()
    }
}
