use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{optional_date, parse_date, required_date, string_or_empty, RecordId};
use crate::error::ClientError;
use crate::filter::{FieldValue, Queryable};

/// Quantities come back either as JSON numbers or as whatever text was typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl Quantity {
    /// Numeric input becomes a JSON number, anything else is kept as text.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Quantity::Number(n.into());
        }
        match trimmed.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            Some(n) => Quantity::Number(n),
            None => Quantity::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => n.as_f64(),
            Quantity::Text(s) => s.trim().parse().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Quantity::Text(s) if s.trim().is_empty())
    }

    fn sort_value(&self) -> FieldValue {
        match (self.as_f64(), self) {
            (Some(n), _) => FieldValue::Number(n),
            (None, Quantity::Text(s)) => FieldValue::Text(s.clone()),
            (None, Quantity::Number(n)) => FieldValue::Text(n.to_string()),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: RecordId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default, with = "optional_date")]
    pub expiration_date: Option<NaiveDate>,
}

impl Queryable for GroceryItem {
    const SORT_KEYS: &'static [&'static str] = &["name", "quantity", "expiration_date"];

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "quantity" => self.quantity.as_ref().map(Quantity::sort_value),
            "expiration_date" => self.expiration_date.map(FieldValue::Date),
            _ => None,
        }
    }

    fn category_date(&self) -> Option<NaiveDate> {
        self.expiration_date
    }
}

/// Create/update body. Updates replace the whole record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroceryInput {
    pub name: String,
    pub quantity: Quantity,
    #[serde(serialize_with = "required_date::serialize")]
    pub expiration_date: NaiveDate,
}

impl GroceryInput {
    /// Builds an input from raw form values, rejecting blanks and unreadable dates.
    pub fn from_form(name: &str, quantity: &str, expiration_date: &str) -> Result<Self, ClientError> {
        if name.trim().is_empty() {
            return Err(ClientError::required("name"));
        }
        if quantity.trim().is_empty() {
            return Err(ClientError::required("quantity"));
        }
        if expiration_date.trim().is_empty() {
            return Err(ClientError::required("expiration_date"));
        }
        let date = parse_date(expiration_date).ok_or_else(|| {
            ClientError::validation(
                "expiration_date",
                format!("Invalid date '{}', expected YYYY-MM-DD", expiration_date.trim()),
            )
        })?;

        Ok(Self {
            name: name.trim().to_string(),
            quantity: Quantity::from_input(quantity),
            expiration_date: date,
        })
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::required("name"));
        }
        if self.quantity.is_blank() {
            return Err(ClientError::required("quantity"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroceryList {
    #[serde(default)]
    pub groceries: Vec<GroceryItem>,
}

/// Create/update responses, either bare or wrapped in `{ "grocery": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum GroceryBody {
    Wrapped { grocery: GroceryItem },
    Bare(GroceryItem),
}

impl GroceryBody {
    pub(crate) fn into_item(self) -> GroceryItem {
        match self {
            GroceryBody::Wrapped { grocery } => grocery,
            GroceryBody::Bare(item) => item,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpirationReport {
    #[serde(rename = "expiringSoonGroceries", default)]
    pub expiring_soon: Vec<GroceryItem>,
    #[serde(rename = "expiredGroceries", default)]
    pub expired: Vec<GroceryItem>,
}
