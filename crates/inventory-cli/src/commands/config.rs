use std::path::Path;

use clap::Parser;
use inventory_console::Config;

use crate::error::CliResult;
use crate::output::{OutputFormat, new_table};

#[derive(Parser)]
pub struct ConfigCommand {
    #[clap(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Parser)]
pub enum ConfigSubcommand {
    #[clap(about = "Show current configuration")]
    Show,
}

impl ConfigCommand {
    pub async fn execute(&self, config: &Config, config_path: Option<&Path>, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            ConfigSubcommand::Show => Self::show(config, config_path, format),
        }
    }

    fn show(config: &Config, config_path: Option<&Path>, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "server": {
                        "protocol": config.server.protocol,
                        "host": config.server.host,
                        "port": config.server.port,
                        "base_path": config.server.base_path,
                        "timeout_secs": config.server.timeout_secs,
                        "base_url": config.server.base_url(),
                    },
                    "graph": {
                        "base_url": config.graph.base_url,
                        "range_input": config.graph.range_input,
                    },
                    "console": {
                        "confirm_deletes": config.console.confirm_deletes,
                        "notification_secs": config.console.notification_secs,
                        "data_dir": config.console.data_dir.display().to_string(),
                    }
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                match config_path {
                    Some(path) => println!("Configuration from: {}", path.display()),
                    None => println!("Configuration: (default search path)"),
                }
                println!("==============================\n");

                println!("[Server]");
                let mut server_table = new_table(["Setting", "Value"]);
                server_table.add_row(["protocol", config.server.protocol.as_str()]);
                server_table.add_row(["host", config.server.host.as_str()]);
                server_table.add_row(["port", &config.server.port.to_string()]);
                server_table.add_row(["base_path", config.server.base_path.as_str()]);
                server_table.add_row(["timeout_secs", &config.server.timeout_secs.to_string()]);
                server_table.add_row(["base_url", &config.server.base_url()]);
                println!("{server_table}\n");

                println!("[Graph]");
                let mut graph_table = new_table(["Setting", "Value"]);
                graph_table.add_row(["base_url", config.graph.base_url.as_str()]);
                graph_table.add_row(["range_input", config.graph.range_input.as_str()]);
                println!("{graph_table}\n");

                println!("[Console]");
                let mut console_table = new_table(["Setting", "Value"]);
                console_table.add_row([
                    "confirm_deletes",
                    &config.console.confirm_deletes.to_string(),
                ]);
                console_table.add_row([
                    "notification_secs",
                    &config.console.notification_secs.to_string(),
                ]);
                console_table.add_row([
                    "data_dir",
                    &config.console.data_dir.display().to_string(),
                ]);
                println!("{console_table}");
            }
        }

        Ok(())
    }
}
