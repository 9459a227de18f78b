//! Declarative view definitions
//!
//! `viewdefs` composes grids and forms bound to data definitions into named
//! views, checks them against a `SchemaProvider` once, and serves them from
//! an immutable registry.
//!
//! # Architecture
//!
//! - **Check once, read many**: columns, expressions and parent bindings are validated while building
//! - **Closed element types**: an element is a `Grid` or a `Form`; shared attributes live in one base
//! - **Pre-parsed expressions**: `fields['a'].fields['b']` paths are parsed at construction and replayed per render
//! - **Explicit registry**: `ViewRegistry::register` returns an owned value; there is no global state
//!
//! # Example
//!
//! ```
//! use viewdefs::standard::{standard_catalog, standard_views};
//! use viewdefs::ViewRegistry;
//!
//! let catalog = standard_catalog().unwrap();
//! let registry = ViewRegistry::register(&catalog, standard_views()).unwrap();
//! let view = registry.get_view("products.productGridView").unwrap();
//! assert_eq!(view.header(), Some("Products:"));
//! ```

pub mod builder;
pub mod column;
pub mod crud;
pub mod element;
pub mod error;
pub mod expression;
pub mod registry;
pub mod standard;
pub mod value;
pub mod view;

pub use builder::{form, grid, ElementBuilder, FormBuilder, GridBuilder, ViewBuilder};
pub use column::{resolve, ColumnDefinition, ColumnResolver};
pub use crud::{delete_entities, DataAccess};
pub use element::{
    FormDefinition, GridDefinition, GridOption, GridOptions, ParentBinding, ViewElementDefinition,
};
pub use error::{Result, ViewError};
pub use expression::FieldPath;
pub use registry::{NavigationIssue, RegistryConfig, ViewFactory, ViewFactoryFn, ViewRegistry};
pub use value::CellValue;
pub use view::ViewDefinition;
