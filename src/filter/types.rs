use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::FilterError;

/// Categorical filters applied before the search term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    #[default]
    All,
    ExpiringToday,
    Expired,
}

impl FromStr for FilterMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "" | "all" | "none" => Ok(FilterMode::All),
            "expiring-today" | "today" => Ok(FilterMode::ExpiringToday),
            "expired" => Ok(FilterMode::Expired),
            other => Err(FilterError::InvalidFilterMode(other.to_string())),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterMode::All => "all",
            FilterMode::ExpiringToday => "expiring-today",
            FilterMode::Expired => "expired",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

impl FilterOrderInfo {
    pub fn new(column: impl Into<String>, sort: SortDirection) -> Self {
        Self { column: column.into(), sort }
    }
}

/// The (search term, filter mode, sort key, sort direction) tuple a list is rendered through.
///
/// A default view is the identity: every record, original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryView {
    pub search: String,
    pub mode: FilterMode,
    pub order: Option<FilterOrderInfo>,
}

impl QueryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn order(mut self, column: impl Into<String>, sort: SortDirection) -> Self {
        self.order = Some(FilterOrderInfo::new(column, sort));
        self
    }

    pub fn is_identity(&self) -> bool {
        self.search.trim().is_empty() && self.mode == FilterMode::All && self.order.is_none()
    }
}

/// A single sortable field value pulled out of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    // Mixed kinds under one key: numbers, then dates, then text
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Number(_) => 0,
            FieldValue::Date(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }

    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => locale_compare(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Case-folded comparison with the raw text as tiebreak, so "apple" sits next to "Apple".
///
/// Not accent-aware: folded text compares by code point, so "Éclair" sorts after "Zucchini".
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Records the presentation pipeline can search, categorize and sort.
pub trait Queryable {
    /// Keys accepted by `field`; anything else is rejected before sorting.
    const SORT_KEYS: &'static [&'static str];

    /// Text fields searched by the search term.
    fn search_fields(&self) -> Vec<&str>;

    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Date used by the categorical filters, if the record has one.
    fn category_date(&self) -> Option<NaiveDate> {
        None
    }
}
