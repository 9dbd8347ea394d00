use clap::Subcommand;
use serde_json::json;

use crate::cli::config::ClientContext;
use crate::cli::utils::{output_collection, output_success};
use crate::cli::OutputFormat;
use crate::filter::Filter;
use crate::models::{GroceryInput, GroceryItem, RecordId};
use crate::services::{GroceryService, RecordCollection};

#[derive(Subcommand)]
pub enum GroceryCommands {
    #[command(about = "List the pantry inventory")]
    List {
        #[arg(long, help = "Case-insensitive substring of the item name")]
        search: Option<String>,
        #[arg(long, default_value = "all", help = "all, expiring-today or expired")]
        filter: String,
        #[arg(long, help = "Sort as KEY-DIR, e.g. name-asc, quantity-desc, expiration_date-asc")]
        sort: Option<String>,
    },

    #[command(about = "Add an item to the inventory")]
    Add {
        #[arg(long, help = "Item name")]
        name: String,
        #[arg(long, help = "Quantity")]
        quantity: String,
        #[arg(long = "expires", help = "Expiration date (YYYY-MM-DD)")]
        expiration_date: String,
    },

    #[command(about = "Replace an item; omitted fields keep their current value")]
    Update {
        #[arg(help = "Item ID")]
        id: String,
        #[arg(long, help = "Item name")]
        name: Option<String>,
        #[arg(long, help = "Quantity")]
        quantity: Option<String>,
        #[arg(long = "expires", help = "Expiration date (YYYY-MM-DD)")]
        expiration_date: Option<String>,
    },

    #[command(about = "Delete an item")]
    Delete {
        #[arg(help = "Item ID")]
        id: String,
    },

    #[command(about = "Show items expiring soon and already expired")]
    Expirations,
}

fn render(item: &GroceryItem) -> String {
    let quantity = item
        .quantity
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let expires = item
        .expiration_date
        .map(|d| d.format("%m-%d-%Y").to_string())
        .unwrap_or_else(|| "no date".to_string());
    format!("[{}] {} - {} - {}", item.id, item.name, quantity, expires)
}

pub async fn handle(cmd: GroceryCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = crate::config::config();
    let ctx = ClientContext::from_config(config)?;
    ctx.require_login()?;
    let service = GroceryService::new(&ctx.gateway, &ctx.auth);

    match cmd {
        GroceryCommands::List { search, filter, sort } => {
            // Parse the view before fetching so a bad flag costs no request
            let filter = Filter::parse(
                search.as_deref().unwrap_or_default(),
                &filter,
                sort.as_deref().unwrap_or_default(),
            )?;
            let groceries = RecordCollection::new(service.list(None).await?);
            let shown = groceries.view_with(&filter)?;
            output_collection(&output_format, "groceries", &shown, groceries.len(), render)
        }
        GroceryCommands::Add { name, quantity, expiration_date } => {
            let input = GroceryInput::from_form(&name, &quantity, &expiration_date)?;
            let created = service.create(&input).await?;
            output_success(
                &output_format,
                &format!("Added {}", render(&created)),
                Some(json!({ "grocery": created })),
            )
        }
        GroceryCommands::Update { id, name, quantity, expiration_date } => {
            let id: RecordId = id.parse()?;
            let mut groceries = RecordCollection::new(service.list(None).await?);
            let current = groceries
                .get(&id)
                .ok_or_else(|| anyhow::anyhow!("Grocery '{}' not found", id))?;

            let name = name.unwrap_or_else(|| current.name.clone());
            let quantity = quantity
                .or_else(|| current.quantity.as_ref().map(ToString::to_string))
                .unwrap_or_default();
            let expiration_date = expiration_date
                .or_else(|| current.expiration_date.map(|d| d.format("%Y-%m-%d").to_string()))
                .unwrap_or_default();

            let input = GroceryInput::from_form(&name, &quantity, &expiration_date)?;
            let updated = service.update(&id, &input).await?;
            let message = format!("Updated {}", render(&updated));
            groceries.upsert(updated);
            output_success(
                &output_format,
                &message,
                groceries.get(&id).map(|g| json!({ "grocery": g })),
            )
        }
        GroceryCommands::Delete { id } => {
            let id: RecordId = id.parse()?;
            service.delete(&id).await?;
            output_success(
                &output_format,
                &format!("Deleted grocery {}", id),
                Some(json!({ "id": id })),
            )
        }
        GroceryCommands::Expirations => {
            let report = service.check_expirations().await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text => {
                    println!("Expiring soon:");
                    if report.expiring_soon.is_empty() {
                        println!("  (none)");
                    }
                    for item in &report.expiring_soon {
                        println!("  {}", render(item));
                    }
                    println!("Expired:");
                    if report.expired.is_empty() {
                        println!("  (none)");
                    }
                    for item in &report.expired {
                        println!("  {}", render(item));
                    }
                }
            }
            Ok(())
        }
    }
}
