//! Error types for FHIR resources

use crate::core::validation::ValidationOutcome;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Expected a JSON object for {0}")]
    ExpectedObject(String),

    #[error("Missing resourceType property")]
    MissingResourceType,

    #[error("Unexpected resourceType: expected {expected}, got {found}")]
    ResourceTypeMismatch { expected: String, found: String },

    #[error("Invalid field value: {0}")]
    InvalidFieldValue(String),

    #[error("{field}: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Choice group '{group}' already holds '{existing}', refusing to also set '{attempted}'")]
    ChoiceConflict {
        group: String,
        existing: String,
        attempted: String,
    },

    #[error("'{key}' is not a member of choice group '{group}'")]
    UnknownChoiceMember { group: String, key: String },

    #[error("{type_name} failed validation: {}", .outcome.summary())]
    Validation {
        type_name: String,
        outcome: ValidationOutcome,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Attach the property path at which a nested decode failed.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Error::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
