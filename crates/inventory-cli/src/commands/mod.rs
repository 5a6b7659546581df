pub mod config;
pub mod metrics;
pub mod resources;
pub mod status;
pub mod types;

pub use config::ConfigCommand;
pub use metrics::MetricsCommand;
pub use resources::ResourcesCommand;
pub use status::StatusCommand;
pub use types::TypesCommand;

use std::io::Write;

use crate::error::CliResult;

/// Ask a yes/no question on the terminal; only `y` confirms
pub(crate) fn confirm(question: &str) -> CliResult<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
