//! Error types for view construction and lookup

use thiserror::Error;
use viewdefs_schema::{EntityId, SchemaError};

/// Result type for view operations
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors that can occur while building the view catalog or serving it
#[derive(Debug, Error)]
pub enum ViewError {
    /// Schema lookup failed (missing data definition, field or relation)
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Column references a field its element's schema does not have
    #[error("column '{column}' references unknown field '{field}' of schema {schema}")]
    UnknownField {
        column: String,
        schema: String,
        field: String,
    },

    /// Column declared without any field
    #[error("column '{column}' must reference at least one field")]
    EmptyColumn { column: String },

    /// Path expression is malformed or does not follow relations
    #[error("invalid expression \"{expression}\": {message}")]
    InvalidExpression { expression: String, message: String },

    /// Parent binding does not resolve consistently
    #[error("invalid parent binding of element '{element}' to '{parent}': {message}")]
    InvalidParentBinding {
        element: String,
        parent: String,
        message: String,
    },

    /// Unknown grid option or unparseable option value
    #[error("invalid option '{option}' on element '{element}': {message}")]
    InvalidOption {
        element: String,
        option: String,
        message: String,
    },

    /// Two elements of one view share a name
    #[error("duplicate element name '{element}' in view {view}")]
    DuplicateElementName { view: String, element: String },

    /// Two factories produced views with the same name
    #[error("duplicate view name: {name}")]
    DuplicateViewName { name: String },

    /// View name is malformed or violates the registry configuration
    #[error("invalid view name '{name}': {message}")]
    InvalidViewName { name: String, message: String },

    /// Navigation target not registered (strict navigation only)
    #[error("element '{element}' of view {view} navigates to unknown view {target}")]
    DanglingNavigation {
        view: String,
        element: String,
        target: String,
    },

    /// View not registered
    #[error("view not found: {name}")]
    ViewNotFound { name: String },

    /// Element not present in the view
    #[error("element '{element}' not found in view {view}")]
    ElementNotFound { view: String, element: String },

    /// The data-access collaborator failed
    #[error("data access failed for {entity_type}#{id}: {message}")]
    DataAccess {
        entity_type: String,
        id: EntityId,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ViewError {
    /// Create an invalid expression error
    pub fn invalid_expression(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidExpression {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create an invalid parent binding error
    pub fn invalid_parent(
        element: impl Into<String>,
        parent: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParentBinding {
            element: element.into(),
            parent: parent.into(),
            message: message.into(),
        }
    }

    /// Create an invalid option error
    pub fn invalid_option(
        element: impl Into<String>,
        option: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            element: element.into(),
            option: option.into(),
            message: message.into(),
        }
    }

    /// Whether this error can only arise while building the catalog.
    ///
    /// Startup-fatal errors abort registration; the rest are per-request
    /// outcomes the caller turns into a normal negative response.
    pub fn is_startup_fatal(&self) -> bool {
        !matches!(
            self,
            Self::ViewNotFound { .. } | Self::ElementNotFound { .. } | Self::DataAccess { .. }
        )
    }
}
