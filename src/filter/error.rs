use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),

    #[error("Invalid sort spec: {0}")]
    InvalidSortSpec(String),

    #[error("Invalid filter mode: {0}")]
    InvalidFilterMode(String),
}
