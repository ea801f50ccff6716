//! Rich/plain rendering detection
//!
//! Decides whether the terminal console sink should emit ANSI styling.

use console::Term;

/// How the terminal sink renders styled headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayContext {
    /// Plain output, style tokens dropped
    Plain,
    /// ANSI styled output
    #[default]
    Rich,
}

impl DisplayContext {
    /// Auto-detect the display context from environment
    #[must_use]
    pub fn detect() -> Self {
        if should_enable_rich() {
            Self::Rich
        } else {
            Self::Plain
        }
    }

    #[must_use]
    pub fn is_rich(&self) -> bool {
        matches!(self, Self::Rich)
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// Determine if styled output should be enabled on stderr
#[must_use]
pub fn should_enable_rich() -> bool {
    // Explicit enable always wins
    if std::env::var("LOGGERMAX_FORCE_COLOR").is_ok() {
        return true;
    }

    if std::env::var("LOGGERMAX_PLAIN").is_ok() || std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    Term::stderr().features().colors_supported()
}
