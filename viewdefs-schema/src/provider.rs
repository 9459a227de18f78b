//! The lookup boundary view construction depends on.

use std::sync::Arc;

use crate::error::Result;
use crate::types::DataDefinition;

/// Supplies data definitions by qualified name.
///
/// Definitions are handed out as shared `Arc`s: the provider owns them and
/// view elements only hold references.
pub trait SchemaProvider: Send + Sync {
    /// Look up a data definition, failing with `SchemaNotFound`.
    fn get_schema(&self, qualified_name: &str) -> Result<Arc<DataDefinition>>;

    /// Follow a relation field of `schema` to the related data definition.
    fn get_relation(&self, schema: &DataDefinition, relation: &str) -> Result<Arc<DataDefinition>> {
        let target = schema.get_relation(relation)?;
        self.get_schema(target)
    }
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for Arc<P> {
    fn get_schema(&self, qualified_name: &str) -> Result<Arc<DataDefinition>> {
        (**self).get_schema(qualified_name)
    }
}
