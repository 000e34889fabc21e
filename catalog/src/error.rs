use crate::persistence::PersistenceError;

/// Rejected user input. The catalog is never mutated when this is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title can not be empty")]
    EmptyTitle,
    #[error("Maximum {max} characters allowed for the title (got {len})")]
    TitleTooLong { len: usize, max: usize },
    #[error("Address can not be empty")]
    EmptyAddress,
    #[error("Invalid position ({lat}, {lng})")]
    InvalidCoords { lat: f64, lng: f64 },
}

/// Persisted data that cannot be turned back into stores.
#[derive(Debug, thiserror::Error)]
pub enum DeserializationError {
    #[error("malformed store data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown store category: {0:?}")]
    UnknownCategory(String),
    #[error("{category} record is missing its {field} field")]
    MissingAttribute {
        category: &'static str,
        field: &'static str,
    },
    #[error("{category} record carries a foreign {field} field")]
    MismatchedAttribute {
        category: &'static str,
        field: &'static str,
    },
}

/// Any failure raised by the catalog core.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
