//! Entry formatting: header construction and payload dispatch.

use crate::level::Level;
use crate::payload::{Arg, Payload, to_tabbed_json};
use crate::sink::{ConsoleEntry, STYLE_MARKER};
use crate::stack::StackContext;

/// Builds console entries for one level call.
///
/// The formatter is stateless; [`Logger`](crate::Logger) decides whether
/// a call emits and where the entry goes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFormatter;

impl LogFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// `[#][<LABEL>][<Module>] ` or `[#][<LABEL>] `, with the style marker
    /// in front when the context is usable.
    pub fn header(&self, level: Level, context: &StackContext) -> String {
        let marker = if context.is_usable() { STYLE_MARKER } else { "" };
        match context.module() {
            Some(module) => format!("{marker}[#][{}][{module}] ", level.label()),
            None => format!("{marker}[#][{}] ", level.label()),
        }
    }

    /// Format `payload` into the argument list of one console write.
    pub fn format(
        &self,
        level: Level,
        style: &str,
        payload: &Payload,
        context: &StackContext,
        expand: bool,
    ) -> ConsoleEntry {
        let header = self.header(level, context);

        let (lead, body): (String, Option<Arg>) = match payload {
            Payload::Text(prepend) => (header, Some(Arg::Text(prepend.clone()))),
            Payload::Structured(value) if expand => (header + &to_tabbed_json(value), None),
            Payload::Structured(value) => (header, Some(Arg::Value(value.clone()))),
            Payload::TextWithStructured(prepend, value) if expand => {
                (header + prepend, Some(Arg::Text(to_tabbed_json(value))))
            }
            Payload::TextWithStructured(prepend, value) => {
                (header + prepend, Some(Arg::Value(value.clone())))
            }
            Payload::TextWithText(prepend, message) => {
                (header + prepend, Some(Arg::Text(message.clone())))
            }
        };

        let mut args = Vec::with_capacity(4);
        args.push(Arg::Text(lead));
        if context.is_usable() {
            args.push(Arg::Style(style.to_string()));
        }
        args.extend(body);
        args.push(Arg::Text(context.text().to_string()));

        ConsoleEntry::new(level, args)
    }
}
