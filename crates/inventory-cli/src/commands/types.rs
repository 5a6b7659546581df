use clap::{Parser, Subcommand};
use inventory_console::TypeCatalog;
use inventory_console::model::ResourceType;

use crate::commands::confirm;
use crate::context::Context;
use crate::error::CliResult;
use crate::output::{OutputFormat, new_table};

#[derive(Parser)]
pub struct TypesCommand {
    #[clap(subcommand)]
    pub command: TypesSubcommand,
}

#[derive(Subcommand)]
pub enum TypesSubcommand {
    #[clap(about = "List resource types")]
    List(ListArgs),

    #[clap(about = "Show a resource type")]
    Show(ShowArgs),

    #[clap(about = "Delete a resource type")]
    Delete(DeleteArgs),
}

#[derive(Parser)]
pub struct ListArgs {
    #[clap(long, short, help = "Only types whose ID contains this text")]
    pub filter: Option<String>,

    #[clap(long, short, help = "Match the filter case-insensitively")]
    pub ignore_case: bool,
}

#[derive(Parser)]
pub struct ShowArgs {
    #[clap(help = "Resource type ID")]
    pub id: String,
}

#[derive(Parser)]
pub struct DeleteArgs {
    #[clap(help = "Resource type ID to delete")]
    pub id: String,

    #[clap(long, help = "Skip confirmation prompt")]
    pub force: bool,
}

impl TypesCommand {
    pub async fn execute(&self, ctx: &Context, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            TypesSubcommand::List(args) => Self::list(ctx, args, format).await,
            TypesSubcommand::Show(args) => Self::show(ctx, args, format).await,
            TypesSubcommand::Delete(args) => Self::delete(ctx, args, format).await,
        }
    }

    async fn list(ctx: &Context, args: &ListArgs, format: OutputFormat) -> CliResult<()> {
        let mut catalog = TypeCatalog::new();
        catalog
            .load_types(ctx.api.as_ref(), &ctx.notifier)
            .await
            .map_err(|e| ctx.fail(e))?;
        let types = catalog.apply_filter(args.filter.as_deref(), args.ignore_case);

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(types)?),
            OutputFormat::Table => {
                if types.is_empty() {
                    println!("No resource types found.");
                    return Ok(());
                }
                println!("{}", types_table(types));
                println!("\nTotal: {} resource types", types.len());
            }
        }
        Ok(())
    }

    async fn show(ctx: &Context, args: &ShowArgs, format: OutputFormat) -> CliResult<()> {
        let mut catalog = TypeCatalog::new();
        catalog
            .load_types(ctx.api.as_ref(), &ctx.notifier)
            .await
            .map_err(|e| ctx.fail(e))?;
        let resource_type = catalog
            .find(&args.id)
            .ok_or_else(|| format!("Resource type not found: {}", args.id))?;

        match format {
            OutputFormat::Json => println!("{}", resource_type.to_pretty_json()),
            OutputFormat::Table => {
                println!("{}", types_table(std::slice::from_ref(resource_type)));
                if !resource_type.properties.is_empty() {
                    println!("\n[Properties]");
                    let mut table = new_table(["Name", "Value"]);
                    for (name, value) in &resource_type.properties {
                        table.add_row([name, value]);
                    }
                    println!("{table}");
                }
            }
        }
        Ok(())
    }

    async fn delete(ctx: &Context, args: &DeleteArgs, format: OutputFormat) -> CliResult<()> {
        if ctx.config.console.confirm_deletes && !args.force {
            match format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "id": args.id,
                        "deleted": false,
                        "confirmation_required": true,
                        "message": "Use --force to confirm deletion",
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    return Ok(());
                }
                OutputFormat::Table => {
                    if !confirm(&format!("Delete resource type {}?", args.id))? {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }
            }
        }

        let mut catalog = TypeCatalog::new();
        let remaining = catalog
            .delete_type(&args.id, ctx.api.as_ref(), &ctx.notifier)
            .await
            .map_err(|e| ctx.fail(e))?
            .len();

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "id": args.id,
                    "deleted": true,
                    "remaining": remaining,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("Deleted resource type {} ({} remaining)", args.id, remaining)
            }
        }
        Ok(())
    }
}

/// One row per type: ID, operations, metadata entries
pub fn types_table(types: &[ResourceType]) -> comfy_table::Table {
    let mut table = new_table(["ID", "Operations", "Metadata"]);
    for resource_type in types {
        let operations: Vec<_> = resource_type
            .operations
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        table.add_row([
            resource_type.id.clone(),
            if operations.is_empty() {
                "-".to_string()
            } else {
                operations.join(", ")
            },
            resource_type.metadata_len().to_string(),
        ]);
    }
    table
}
