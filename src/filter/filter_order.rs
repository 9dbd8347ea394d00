use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{FilterOrderInfo, Queryable, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parses "title-asc", "calories desc" or a bare "name".
    /// Blank input and the "none" placeholder mean no sort.
    pub fn parse(spec: &str) -> Result<Option<FilterOrderInfo>, FilterError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let (column, direction) = match tokens.as_slice() {
            [single] => match single.rsplit_once('-') {
                Some((col, dir)) => (col, Some(dir)),
                None => (*single, None),
            },
            [col, dir] => (*col, Some(*dir)),
            _ => return Err(FilterError::InvalidSortSpec(trimmed.to_string())),
        };

        let column = column.to_ascii_lowercase();
        if column.is_empty() {
            return Err(FilterError::InvalidSortSpec(trimmed.to_string()));
        }
        if column == "none" {
            return Ok(None);
        }

        let sort = match direction {
            None => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(d) => return Err(FilterError::InvalidSortDirection(d.to_string())),
        };

        Ok(Some(FilterOrderInfo { column, sort }))
    }

    pub fn validate<T: Queryable>(info: &FilterOrderInfo) -> Result<(), FilterError> {
        if T::SORT_KEYS.contains(&info.column.as_str()) {
            Ok(())
        } else {
            Err(FilterError::UnknownSortKey(info.column.clone()))
        }
    }

    /// A record missing the sort field counts as the minimum value:
    /// first when ascending, last when descending.
    pub fn compare<T: Queryable>(a: &T, b: &T, info: &FilterOrderInfo) -> Ordering {
        let ordering = match (a.field(&info.column), b.field(&info.column)) {
            (Some(x), Some(y)) => x.compare(&y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        info.sort.apply(ordering)
    }
}
