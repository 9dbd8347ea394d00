use chrono::NaiveDate;

use super::types::{FilterMode, Queryable};

pub struct FilterWhere;

impl FilterWhere {
    /// Categorical predicate. Dates compare at MM-DD-YYYY granularity; time of day never reaches here.
    pub fn matches_mode<T: Queryable>(record: &T, mode: FilterMode, today: NaiveDate) -> bool {
        match mode {
            FilterMode::All => true,
            FilterMode::ExpiringToday => record.category_date().is_some_and(|d| d == today),
            FilterMode::Expired => record.category_date().is_some_and(|d| d < today),
        }
    }

    /// Lowercased needle, or `None` when the term is blank and searching is a no-op.
    pub fn normalize_search(term: &str) -> Option<String> {
        if term.trim().is_empty() {
            None
        } else {
            Some(term.to_lowercase())
        }
    }

    /// True when any designated search field contains the lowercased needle.
    pub fn matches_search<T: Queryable>(record: &T, needle: &str) -> bool {
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
