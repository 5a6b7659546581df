//! User-visible error reporting
//!
//! Backend failures are turned into a one-line message and handed to a
//! [`Notifier`]. The TUI shows them as toasts; the CLI and tests record or
//! log them.

use chrono::{DateTime, Local};
use std::sync::Mutex;

use crate::error::ConsoleError;

/// Shown instead of a status line when no response was received
pub const NOT_RESPONDING_MESSAGE: &str =
    "Inventory service is not responding. Please review the console log for further details";

/// Receives user-visible error messages
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Format the message reported for a failed backend call
pub fn format_error_report(err: &ConsoleError, now: DateTime<Local>) -> String {
    let timestamp = now.to_rfc2822();
    match err {
        ConsoleError::Transport(_) => format!("{timestamp} {NOT_RESPONDING_MESSAGE}"),
        ConsoleError::Status { code, text } => format!("{timestamp} Status [{code}] {text}"),
        other => format!("{timestamp} {other}"),
    }
}

/// Log `err` and raise exactly one notification for it
pub fn report_error(notifier: &dyn Notifier, context: &str, err: &ConsoleError) {
    tracing::debug!("[{}] Backend error: {:?}", context, err);
    notifier.error(&format_error_report(err, Local::now()));
}

/// Notifier that forwards to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Notifier that keeps every message; drained by the caller
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Remove and return all pending messages
    pub fn drain(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
