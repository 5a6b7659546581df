pub mod commands;
pub mod context;
pub mod error;
pub mod output;

pub use commands::{ConfigCommand, MetricsCommand, ResourcesCommand, StatusCommand, TypesCommand};
pub use context::Context;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, truncate_string};
