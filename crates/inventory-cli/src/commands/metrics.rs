use clap::{Parser, Subcommand};
use inventory_console::graph::UrlOpener;
use inventory_console::model::sort_metrics;

use crate::context::Context;
use crate::error::CliResult;
use crate::output::{OutputFormat, new_table};

#[derive(Parser)]
pub struct MetricsCommand {
    #[clap(subcommand)]
    pub command: MetricsSubcommand,
}

#[derive(Subcommand)]
pub enum MetricsSubcommand {
    #[clap(about = "List the metrics of a resource with their graph URLs")]
    List(ListArgs),

    #[clap(about = "Print the graph URL of one metric")]
    Graph(GraphArgs),
}

#[derive(Parser)]
pub struct ListArgs {
    #[clap(help = "Resource ID")]
    pub resource_id: String,
}

#[derive(Parser)]
pub struct GraphArgs {
    #[clap(help = "Resource ID")]
    pub resource_id: String,

    #[clap(help = "Metric display name")]
    pub metric: String,
}

/// Opener for a terminal: the URL is printed for the operator to follow
struct PrintOpener;

impl UrlOpener for PrintOpener {
    fn open(&self, url: &str) {
        println!("{url}");
    }
}

impl MetricsCommand {
    pub async fn execute(&self, ctx: &Context, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            MetricsSubcommand::List(args) => Self::list(ctx, args, format).await,
            MetricsSubcommand::Graph(args) => Self::graph(ctx, args, format).await,
        }
    }

    async fn list(ctx: &Context, args: &ListArgs, format: OutputFormat) -> CliResult<()> {
        let resource = ctx
            .api
            .resource(&args.resource_id)
            .await
            .map_err(|e| ctx.fail(e))?;
        let mut metrics = resource.metrics;
        sort_metrics(&mut metrics);
        let launcher = ctx.graph_launcher();

        match format {
            OutputFormat::Json => {
                let output: Vec<_> = metrics
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "name": m.display_name,
                            "family": m.family,
                            "unit": m.unit,
                            "graph_url": launcher.url_for(m),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if metrics.is_empty() {
                    println!("Resource {} has no metrics.", args.resource_id);
                    return Ok(());
                }
                let mut table = new_table(["Name", "Family", "Unit", "Graph"]);
                for metric in &metrics {
                    table.add_row([
                        metric.display_name.clone(),
                        metric.family.clone().unwrap_or_else(|| "-".to_string()),
                        metric.unit.clone().unwrap_or_else(|| "-".to_string()),
                        launcher
                            .url_for(metric)
                            .unwrap_or_else(|| "(no family/labels)".to_string()),
                    ]);
                }
                println!("{table}");
            }
        }
        Ok(())
    }

    async fn graph(ctx: &Context, args: &GraphArgs, format: OutputFormat) -> CliResult<()> {
        let resource = ctx
            .api
            .resource(&args.resource_id)
            .await
            .map_err(|e| ctx.fail(e))?;
        let metric = resource
            .metrics
            .iter()
            .find(|m| m.display_name == args.metric)
            .ok_or_else(|| {
                format!(
                    "Resource {} has no metric named {}",
                    args.resource_id, args.metric
                )
            })?;
        let launcher = ctx.graph_launcher();

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "name": metric.display_name,
                    "graph_url": launcher.url_for(metric),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if launcher.launch(metric, &PrintOpener).is_none() {
                    println!(
                        "Unable to show graph for metric [{}]. No family and/or no labels.",
                        metric.display_name
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_console::Config;
    use inventory_console::model::{Metric, Resource};
    use inventory_console::testing::MockInventory;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_graph_unknown_metric() {
        let resource = Resource::new("s1", "alpha", "Server").with_metric(Metric::new("Heap"));
        let api = Arc::new(MockInventory::new().with_roots(vec![resource]));
        let ctx = Context::new(api, Config::default());

        let command = MetricsCommand {
            command: MetricsSubcommand::Graph(GraphArgs {
                resource_id: "s1".to_string(),
                metric: "CPU".to_string(),
            }),
        };
        let err = command.execute(&ctx, OutputFormat::Table).await.unwrap_err();
        assert_eq!(err.0, "Resource s1 has no metric named CPU");
    }

    #[tokio::test]
    async fn test_graph_without_labels_is_not_an_error() {
        let resource = Resource::new("s1", "alpha", "Server")
            .with_metric(Metric::new("Heap").with_family("jvm_heap"));
        let api = Arc::new(MockInventory::new().with_roots(vec![resource]));
        let ctx = Context::new(api, Config::default());

        let command = MetricsCommand {
            command: MetricsSubcommand::Graph(GraphArgs {
                resource_id: "s1".to_string(),
                metric: "Heap".to_string(),
            }),
        };
        command.execute(&ctx, OutputFormat::Table).await.unwrap();
    }
}
