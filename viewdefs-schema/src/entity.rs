//! Live entity values.
//!
//! An `EntityInstance` is what the data-access layer hands to a renderer: the
//! scalar values of one record plus its relations. A relation is either loaded
//! (the related record is materialized inline) or unloaded (only its id is
//! known). Fields that were never fetched are simply absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Primary key of a persisted entity.
pub type EntityId = u64;

/// A related entity, materialized or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum Relation {
    Loaded { entity: Box<EntityInstance> },
    Unloaded { id: EntityId },
}

/// The value held by one field of an entity.
///
/// Serialized with an explicit tag, `{"scalar": ..}` or `{"relation": ..}`, so
/// a scalar object can never be mistaken for a relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum FieldValue {
    Relation(Relation),
    Scalar(serde_json::Value),
}

/// One record of a data definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Qualified name of the data definition this record belongs to.
    pub schema: String,
    #[serde(default)]
    pub values: BTreeMap<String, FieldValue>,
}

impl EntityInstance {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            id: None,
            schema: schema.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set a scalar field.
    pub fn with_value(
        mut self,
        field: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.values.insert(field.into(), FieldValue::Scalar(value.into()));
        self
    }

    /// Set a relation field to a materialized entity.
    pub fn with_loaded(mut self, field: impl Into<String>, entity: EntityInstance) -> Self {
        self.values.insert(
            field.into(),
            FieldValue::Relation(Relation::Loaded {
                entity: Box::new(entity),
            }),
        );
        self
    }

    /// Set a relation field whose target has not been fetched.
    pub fn with_unloaded(mut self, field: impl Into<String>, id: EntityId) -> Self {
        self.values.insert(field.into(), FieldValue::Relation(Relation::Unloaded { id }));
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// The related entity behind `field`, if that relation is loaded.
    pub fn related(&self, field: &str) -> Option<&EntityInstance> {
        match self.values.get(field) {
            Some(FieldValue::Relation(Relation::Loaded { entity })) => Some(entity),
            _ => None,
        }
    }
}
