use crate::filter::{Filter, FilterError, QueryView, Queryable};
use crate::models::{GroceryItem, Recipe, RecordId};

pub trait Identified {
    fn id(&self) -> &RecordId;
}

impl Identified for GroceryItem {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Identified for Recipe {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// The in-memory copy of a server collection a page works from.
///
/// Mutations merge the server's response; the last response for an id wins.
/// Views are computed from the full collection every time.
#[derive(Debug, Clone)]
pub struct RecordCollection<T> {
    records: Vec<T>,
}

impl<T> Default for RecordCollection<T> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<T: Identified + Queryable> RecordCollection<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    /// Swaps in a freshly fetched collection.
    pub fn replace(&mut self, records: Vec<T>) {
        self.records = records;
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn upsert(&mut self, record: T) {
        match self.records.iter().position(|r| r.id().matches(record.id())) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<T> {
        let index = self.records.iter().position(|r| r.id().matches(id))?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.records.iter().find(|r| r.id().matches(id))
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn view(&self, view: &QueryView) -> Result<Vec<&T>, FilterError> {
        Filter::new(view.clone()).apply(&self.records)
    }

    pub fn view_with(&self, filter: &Filter) -> Result<Vec<&T>, FilterError> {
        filter.apply(&self.records)
    }
}
