//! Shared state for a single CLI invocation

use std::sync::Arc;

use chrono::Local;
use inventory_console::notify::{RecordingNotifier, format_error_report};
use inventory_console::{Config, ConsoleError, GraphLauncher, InventoryApi};

use crate::error::CliError;

/// Service handle, configuration and the notifier collecting error reports
pub struct Context {
    pub api: Arc<dyn InventoryApi>,
    pub config: Config,
    pub notifier: RecordingNotifier,
}

impl Context {
    pub fn new(api: Arc<dyn InventoryApi>, config: Config) -> Self {
        Self {
            api,
            config,
            notifier: RecordingNotifier::new(),
        }
    }

    pub fn graph_launcher(&self) -> GraphLauncher {
        GraphLauncher::new(self.config.graph.clone())
    }

    /// Turn a failed call into the error printed to the operator.
    ///
    /// Calls made through the view state have already reported the failure;
    /// that report is used as is. Direct service calls are formatted the
    /// same way here.
    pub fn fail(&self, err: ConsoleError) -> CliError {
        match self.notifier.drain().pop() {
            Some(report) => CliError(report),
            None => CliError(format_error_report(&err, Local::now())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_console::notify::{NOT_RESPONDING_MESSAGE, Notifier};
    use inventory_console::testing::MockInventory;

    #[test]
    fn test_fail_prefers_existing_report() {
        let ctx = Context::new(Arc::new(MockInventory::new()), Config::default());
        ctx.notifier.error("already reported");

        let err = ctx.fail(ConsoleError::Transport("refused".into()));
        assert_eq!(err.0, "already reported");
        assert!(ctx.notifier.is_empty());
    }

    #[test]
    fn test_fail_formats_unreported_error() {
        let ctx = Context::new(Arc::new(MockInventory::new()), Config::default());
        let err = ctx.fail(ConsoleError::Transport("refused".into()));
        assert!(err.0.ends_with(NOT_RESPONDING_MESSAGE));
    }
}
