//! Error types for the schema catalog

use std::path::PathBuf;
use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while building or querying schemas
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Data definition not found by qualified name
    #[error("schema not found: {name}")]
    SchemaNotFound { name: String },

    /// Field not found on a data definition
    #[error("field '{field}' not found in schema {schema}")]
    FieldNotFound { schema: String, field: String },

    /// Field missing or not a relation
    #[error("relation '{relation}' not found in schema {schema}")]
    RelationNotFound { schema: String, relation: String },

    /// Two data definitions share a qualified name
    #[error("duplicate schema name: {name}")]
    DuplicateSchema { name: String },

    /// Two fields of one data definition share a name
    #[error("duplicate field '{field}' in schema {schema}")]
    DuplicateField { schema: String, field: String },

    /// Malformed qualified name
    #[error("invalid schema name '{name}': {message}")]
    InvalidName { name: String, message: String },

    /// Schema directory missing
    #[error("schema directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SchemaError {
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound { name: name.into() }
    }

    pub fn field_not_found(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            schema: schema.into(),
            field: field.into(),
        }
    }

    pub fn relation_not_found(schema: impl Into<String>, relation: impl Into<String>) -> Self {
        Self::RelationNotFound {
            schema: schema.into(),
            relation: relation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::schema_not_found("products.product");
        assert_eq!(err.to_string(), "schema not found: products.product");
    }

    #[test]
    fn test_relation_error() {
        let err = SchemaError::relation_not_found("products.substitute", "product");
        assert!(err.to_string().contains("products.substitute"));
        assert!(err.to_string().contains("'product'"));
    }
}
