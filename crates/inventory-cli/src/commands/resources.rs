use clap::{Parser, Subcommand};
use inventory_console::model::sort_resources;
use inventory_console::tree::{NodePath, ResourceTree, TreeNode};

use crate::commands::confirm;
use crate::context::Context;
use crate::error::CliResult;
use crate::output::{OutputFormat, new_table, resources_json, resources_table};

#[derive(Parser)]
pub struct ResourcesCommand {
    #[clap(subcommand)]
    pub command: ResourcesSubcommand,
}

#[derive(Subcommand)]
pub enum ResourcesSubcommand {
    #[clap(about = "List root resources")]
    Roots,

    #[clap(about = "List the direct children of a resource")]
    Children(IdArgs),

    #[clap(about = "Show resource details")]
    Show(IdArgs),

    #[clap(about = "Print the resource tree")]
    Tree(TreeArgs),

    #[clap(about = "Delete a resource")]
    Delete(DeleteArgs),
}

#[derive(Parser)]
pub struct IdArgs {
    #[clap(help = "Resource ID")]
    pub id: String,
}

#[derive(Parser)]
pub struct TreeArgs {
    #[clap(
        long,
        short,
        default_value = "1",
        help = "Number of levels below the roots to expand"
    )]
    pub depth: usize,
}

#[derive(Parser)]
pub struct DeleteArgs {
    #[clap(help = "Resource ID to delete")]
    pub id: String,

    #[clap(long, short, help = "Skip confirmation prompt")]
    pub force: bool,
}

impl ResourcesCommand {
    pub async fn execute(&self, ctx: &Context, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            ResourcesSubcommand::Roots => Self::roots(ctx, format).await,
            ResourcesSubcommand::Children(args) => Self::children(ctx, args, format).await,
            ResourcesSubcommand::Show(args) => Self::show(ctx, args, format).await,
            ResourcesSubcommand::Tree(args) => Self::tree(ctx, args, format).await,
            ResourcesSubcommand::Delete(args) => Self::delete(ctx, args, format).await,
        }
    }

    async fn roots(ctx: &Context, format: OutputFormat) -> CliResult<()> {
        let mut tree = ResourceTree::new();
        let roots = tree
            .load_roots(ctx.api.as_ref(), &ctx.notifier)
            .await
            .map_err(|e| ctx.fail(e))?;
        let resources: Vec<_> = roots.iter().map(|n| n.resource.clone()).collect();

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&resources_json(&resources))?);
            }
            OutputFormat::Table => {
                if resources.is_empty() {
                    println!("No root resources found.");
                    return Ok(());
                }
                println!("{}", resources_table(&resources));
                println!("\nTotal: {} root resources", resources.len());
            }
        }
        Ok(())
    }

    async fn children(ctx: &Context, args: &IdArgs, format: OutputFormat) -> CliResult<()> {
        let mut children = ctx.api.children(&args.id).await.map_err(|e| ctx.fail(e))?;
        sort_resources(&mut children);

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&resources_json(&children))?);
            }
            OutputFormat::Table => {
                if children.is_empty() {
                    println!("Resource {} has no children.", args.id);
                    return Ok(());
                }
                println!("{}", resources_table(&children));
                println!("\nTotal: {} children", children.len());
            }
        }
        Ok(())
    }

    async fn show(ctx: &Context, args: &IdArgs, format: OutputFormat) -> CliResult<()> {
        let resource = ctx.api.resource(&args.id).await.map_err(|e| ctx.fail(e))?;

        match format {
            OutputFormat::Json => println!("{}", resource.to_pretty_json()),
            OutputFormat::Table => {
                let mut table = new_table(["Field", "Value"]);
                table.add_row(["ID", resource.id.as_str()]);
                table.add_row(["Name", resource.name.as_str()]);
                table.add_row(["Type", resource.type_id()]);
                table.add_row(["Feed", resource.feed_id.as_deref().unwrap_or("-")]);
                table.add_row(["Parent", resource.parent_id.as_deref().unwrap_or("-")]);
                table.add_row(["Children", &resource.children.len().to_string()]);
                for (key, value) in &resource.properties {
                    table.add_row([format!("property: {key}"), value.clone()]);
                }
                for (key, value) in &resource.config {
                    table.add_row([format!("config: {key}"), value.clone()]);
                }
                println!("{table}");

                let mut metrics = resource.metrics.clone();
                inventory_console::model::sort_metrics(&mut metrics);
                if !metrics.is_empty() {
                    println!("\n[Metrics]");
                    let mut metrics_table = new_table(["Name", "Family", "Unit"]);
                    for metric in &metrics {
                        metrics_table.add_row([
                            metric.display_name.as_str(),
                            metric.family.as_deref().unwrap_or("-"),
                            metric.unit.as_deref().unwrap_or("-"),
                        ]);
                    }
                    println!("{metrics_table}");
                }
            }
        }
        Ok(())
    }

    async fn tree(ctx: &Context, args: &TreeArgs, format: OutputFormat) -> CliResult<()> {
        let tree = expand_tree(ctx, args.depth).await?;

        match format {
            OutputFormat::Json => {
                let nodes: Vec<_> = tree.roots().iter().map(node_json).collect();
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            }
            OutputFormat::Table => {
                let lines = render_tree(&tree);
                if lines.is_empty() {
                    println!("No root resources found.");
                }
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }

    async fn delete(ctx: &Context, args: &DeleteArgs, format: OutputFormat) -> CliResult<()> {
        let resource = ctx.api.resource(&args.id).await.map_err(|e| ctx.fail(e))?;

        let needs_confirmation = ctx.config.console.confirm_deletes && !args.force;
        if needs_confirmation {
            match format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "id": resource.id,
                        "deleted": false,
                        "confirmation_required": true,
                        "message": "Use --force to confirm deletion",
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    return Ok(());
                }
                OutputFormat::Table => {
                    if !confirm(&format!("Delete resource {}?", resource.label()))? {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }
            }
        }

        ResourceTree::new()
            .delete_resource(&resource, ctx.api.as_ref(), &ctx.notifier)
            .await
            .map_err(|e| ctx.fail(e))?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({ "id": resource.id, "deleted": true });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => println!("Deleted resource {}", resource.id),
        }
        Ok(())
    }
}

/// Load the roots and expand `depth` levels below them
pub async fn expand_tree(ctx: &Context, depth: usize) -> CliResult<ResourceTree> {
    let mut tree = ResourceTree::new();
    tree.load_roots(ctx.api.as_ref(), &ctx.notifier)
        .await
        .map_err(|e| ctx.fail(e))?;

    for level in 0..depth {
        let paths: Vec<NodePath> = tree
            .visible_rows()
            .into_iter()
            .filter(|row| row.depth == level)
            .map(|row| row.path)
            .collect();
        for path in paths {
            tree.expand_node(&path, ctx.api.as_ref(), &ctx.notifier)
                .await
                .map_err(|e| ctx.fail(e))?;
        }
    }
    Ok(tree)
}

/// Indented tree lines. Unfetched nodes are marked `+`, fetched ones `-`.
pub fn render_tree(tree: &ResourceTree) -> Vec<String> {
    tree.visible_rows()
        .into_iter()
        .map(|row| {
            let marker = if row.node.lazy_load {
                "+"
            } else if row.node.children.is_empty() {
                " "
            } else {
                "-"
            };
            format!("{}{} {}", "  ".repeat(row.depth), marker, row.node.text)
        })
        .collect()
}

fn node_json(node: &TreeNode) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": node.resource.id,
        "text": node.text,
    });
    if !node.lazy_load {
        value["children"] = node.children.iter().map(node_json).collect();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_console::Config;
    use inventory_console::model::Resource;
    use inventory_console::testing::MockInventory;
    use std::sync::Arc;

    fn context(api: MockInventory) -> Context {
        Context::new(Arc::new(api), Config::default())
    }

    #[tokio::test]
    async fn test_expand_tree_to_depth() {
        let api = MockInventory::new()
            .with_roots(vec![Resource::new("s1", "alpha", "Server")])
            .with_children("s1", vec![Resource::new("ds1", "ExampleDS", "Datasource")]);
        let ctx = context(api);

        let tree = expand_tree(&ctx, 1).await.unwrap();
        assert_eq!(
            render_tree(&tree),
            vec!["- [Server] alpha", "  + [Datasource] ExampleDS"]
        );
    }

    #[tokio::test]
    async fn test_expand_tree_depth_zero_only_roots() {
        let api = MockInventory::new().with_roots(vec![Resource::new("s1", "alpha", "Server")]);
        let ctx = context(api);

        let tree = expand_tree(&ctx, 0).await.unwrap();
        assert_eq!(render_tree(&tree), vec!["+ [Server] alpha"]);
    }

    #[tokio::test]
    async fn test_expand_tree_reports_failure_once() {
        let ctx = context(MockInventory::new().failing_transport());
        let err = expand_tree(&ctx, 2).await.err().unwrap();
        assert!(err.0.contains("not responding"));
        assert!(ctx.notifier.is_empty());
    }

    #[test]
    fn test_node_json_omits_unfetched_children() {
        let node = TreeNode::from_resource(Resource::new("s1", "alpha", "Server"));
        let json = node_json(&node);
        assert_eq!(json["text"], "[Server] alpha");
        assert!(json.get("children").is_none());
    }
}
