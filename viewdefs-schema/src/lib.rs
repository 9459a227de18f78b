//! Schema catalog for view definitions
//!
//! `viewdefs-schema` owns the entity-type metadata that view definitions bind
//! to: data definitions (qualified name plus fields), field types including
//! relations to other data definitions, and the live `EntityInstance` values a
//! renderer resolves columns against.
//!
//! # Architecture
//!
//! - **Provider boundary**: view construction only sees the `SchemaProvider` trait
//! - **YAML on disk**: one `.yaml` file per data definition under `entities/`
//! - **Build once**: a `SchemaCatalog` is validated when built and never mutated
//! - **Default seeding**: `with_defaults()` writes defaults that don't exist, preserves customizations

pub mod catalog;
pub mod entity;
pub mod error;
pub mod provider;
pub mod types;

pub use catalog::{SchemaCatalog, SchemaCatalogBuilder, SchemaDefaults};
pub use entity::{EntityId, EntityInstance, FieldValue, Relation};
pub use error::{Result, SchemaError};
pub use provider::SchemaProvider;
pub use types::{validate_qualified_name, DataDefinition, FieldDef, FieldType, SelectOption};
