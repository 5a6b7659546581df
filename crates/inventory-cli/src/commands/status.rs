use clap::Parser;

use crate::context::Context;
use crate::error::CliResult;
use crate::output::{OutputFormat, new_table};

#[derive(Parser)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, ctx: &Context, format: OutputFormat) -> CliResult<()> {
        let status = ctx.api.status().await.map_err(|e| ctx.fail(e))?;

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
            OutputFormat::Table => {
                let mut table = new_table(["Key", "Value"]);
                table.add_row(["server", ctx.config.server.base_url().as_str()]);
                for (key, value) in &status {
                    let value = match value {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    table.add_row([key.clone(), value]);
                }
                println!("{table}");
            }
        }
        Ok(())
    }
}
