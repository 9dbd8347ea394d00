use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::config::ClientContext;
use crate::cli::utils::{output_collection, output_success};
use crate::cli::OutputFormat;
use crate::filter::Filter;
use crate::models::{Recipe, RecipeInput, RecordId};
use crate::services::{RecipeService, RecordCollection};

#[derive(Args, Debug, Default)]
pub struct NutritionArgs {
    #[arg(long)]
    pub calories: Option<f64>,
    #[arg(long)]
    pub protein: Option<f64>,
    #[arg(long)]
    pub carbs: Option<f64>,
    #[arg(long)]
    pub fat: Option<f64>,
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    #[command(about = "List your recipes")]
    List {
        #[arg(long, help = "Case-insensitive substring of the title or ingredients")]
        search: Option<String>,
        #[arg(long, help = "Sort as KEY-DIR, e.g. title-asc, calories-desc")]
        sort: Option<String>,
    },

    #[command(about = "Add a recipe")]
    Add {
        #[arg(long, help = "Recipe title")]
        title: String,
        #[arg(long, default_value = "", help = "Ingredients")]
        ingredients: String,
        #[arg(long, default_value = "", help = "Instructions")]
        instructions: String,
        #[command(flatten)]
        nutrition: NutritionArgs,
    },

    #[command(about = "Replace a recipe; omitted fields keep their current value")]
    Update {
        #[arg(help = "Recipe ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        ingredients: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[command(flatten)]
        nutrition: NutritionArgs,
    },

    #[command(about = "Delete a recipe")]
    Delete {
        #[arg(help = "Recipe ID")]
        id: String,
    },
}

fn render(recipe: &Recipe) -> String {
    format!(
        "[{}] {} - {} kcal, {}g protein, {}g carbs, {}g fat",
        recipe.id, recipe.title, recipe.calories, recipe.protein, recipe.carbs, recipe.fat
    )
}

pub async fn handle(cmd: RecipeCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = crate::config::config();
    let ctx = ClientContext::from_config(config)?;
    ctx.require_login()?;
    let service = RecipeService::new(&ctx.gateway, &ctx.auth);

    match cmd {
        RecipeCommands::List { search, sort } => {
            let filter = Filter::parse(
                search.as_deref().unwrap_or_default(),
                "all",
                sort.as_deref().unwrap_or_default(),
            )?;
            let recipes = RecordCollection::new(service.list().await?);
            let shown = recipes.view_with(&filter)?;
            output_collection(&output_format, "recipes", &shown, recipes.len(), render)
        }
        RecipeCommands::Add { title, ingredients, instructions, nutrition } => {
            let input = RecipeInput {
                title,
                ingredients,
                instructions,
                calories: nutrition.calories.unwrap_or(0.0),
                protein: nutrition.protein.unwrap_or(0.0),
                carbs: nutrition.carbs.unwrap_or(0.0),
                fat: nutrition.fat.unwrap_or(0.0),
            };
            let created = service.create(&input).await?;
            output_success(
                &output_format,
                &format!("Added {}", render(&created)),
                Some(json!({ "recipe": created })),
            )
        }
        RecipeCommands::Update { id, title, ingredients, instructions, nutrition } => {
            let id: RecordId = id.parse()?;
            let mut recipes = RecordCollection::new(service.list().await?);
            let current = recipes
                .get(&id)
                .ok_or_else(|| anyhow::anyhow!("Recipe '{}' not found", id))?;

            let mut input = RecipeInput::from(current);
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(ingredients) = ingredients {
                input.ingredients = ingredients;
            }
            if let Some(instructions) = instructions {
                input.instructions = instructions;
            }
            input.calories = nutrition.calories.unwrap_or(input.calories);
            input.protein = nutrition.protein.unwrap_or(input.protein);
            input.carbs = nutrition.carbs.unwrap_or(input.carbs);
            input.fat = nutrition.fat.unwrap_or(input.fat);

            let updated = service.update(&id, &input).await?;
            let message = format!("Updated {}", render(&updated));
            recipes.upsert(updated);
            output_success(
                &output_format,
                &message,
                recipes.get(&id).map(|r| json!({ "recipe": r })),
            )
        }
        RecipeCommands::Delete { id } => {
            let id: RecordId = id.parse()?;
            service.delete(&id).await?;
            output_success(
                &output_format,
                &format!("Deleted recipe {}", id),
                Some(json!({ "id": id })),
            )
        }
    }
}
