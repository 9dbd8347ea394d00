use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{string_or_empty, RecordId};
use crate::error::ClientError;
use crate::filter::{FieldValue, Queryable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecordId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub ingredients: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub instructions: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub calories: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub protein: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub fat: f64,
}

// Missing, null, empty or non-numeric values all read as 0
fn number_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

impl Queryable for Recipe {
    const SORT_KEYS: &'static [&'static str] =
        &["title", "ingredients", "calories", "protein", "carbs", "fat"];

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.ingredients.as_str()]
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "title" => Some(FieldValue::Text(self.title.clone())),
            "ingredients" => Some(FieldValue::Text(self.ingredients.clone())),
            "calories" => Some(FieldValue::Number(self.calories)),
            "protein" => Some(FieldValue::Number(self.protein)),
            "carbs" => Some(FieldValue::Number(self.carbs)),
            "fat" => Some(FieldValue::Number(self.fat)),
            _ => None,
        }
    }
}

/// Create/update body. Nutrition values left unset are sent as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeInput {
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl RecipeInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::required("title"));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ClientError::validation(field, "Must be a non-negative number"));
            }
        }
        Ok(())
    }
}

impl From<&Recipe> for RecipeInput {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            calories: recipe.calories,
            protein: recipe.protein,
            carbs: recipe.carbs,
            fat: recipe.fat,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeList {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecipeBody {
    Wrapped { recipe: Recipe },
    Bare(Recipe),
}

impl RecipeBody {
    pub(crate) fn into_recipe(self) -> Recipe {
        match self {
            RecipeBody::Wrapped { recipe } => recipe,
            RecipeBody::Bare(recipe) => recipe,
        }
    }
}
