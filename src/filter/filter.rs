use chrono::{Local, NaiveDate};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterMode, QueryView, Queryable};

/// The presentation pipeline: category filter, then search, then stable sort.
///
/// Output borrows from the source slice, which is never reordered or mutated,
/// so the same source can be run through any number of views.
pub struct Filter {
    view: QueryView,
    today: Option<NaiveDate>,
}

impl Filter {
    pub fn new(view: QueryView) -> Self {
        Self { view, today: None }
    }

    pub fn parse(search: &str, mode: &str, order: &str) -> Result<Self, FilterError> {
        let mode: FilterMode = mode.parse()?;
        let order = FilterOrder::parse(order)?;
        Ok(Self::new(QueryView {
            search: search.to_string(),
            mode,
            order,
        }))
    }

    /// Pins the date the categorical filters treat as "today".
    pub fn today(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    pub fn view(&self) -> &QueryView {
        &self.view
    }

    pub fn apply<'a, T: Queryable>(&self, records: &'a [T]) -> Result<Vec<&'a T>, FilterError> {
        if let Some(ref order) = self.view.order {
            FilterOrder::validate::<T>(order)?;
        }

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let needle = FilterWhere::normalize_search(&self.view.search);

        let mut out: Vec<&T> = records
            .iter()
            .filter(|r| FilterWhere::matches_mode(*r, self.view.mode, today))
            .filter(|r| match needle {
                Some(ref n) => FilterWhere::matches_search(*r, n),
                None => true,
            })
            .collect();

        // sort_by is stable
        if let Some(ref order) = self.view.order {
            out.sort_by(|a, b| FilterOrder::compare(*a, *b, order));
        }

        if crate::config::CONFIG.logging.debug_logging {
            tracing::debug!(
                search = %self.view.search,
                mode = %self.view.mode,
                order = ?self.view.order.as_ref().map(|o| format!("{} {}", o.column, o.sort.as_str())),
                total = records.len(),
                shown = out.len(),
                "applied query view"
            );
        }

        Ok(out)
    }
}

/// Runs `records` through `view` against the local calendar date.
pub fn present<'a, T: Queryable>(records: &'a [T], view: &QueryView) -> Result<Vec<&'a T>, FilterError> {
    Filter::new(view.clone()).apply(records)
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(QueryView::default())
    }
}
