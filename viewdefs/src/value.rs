//! Values produced when a column is resolved against an entity.

use viewdefs_schema::{EntityId, EntityInstance, FieldValue, Relation};

/// What a renderer gets for one cell.
///
/// Borrowed from the entity instance; nothing is copied or cached.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'e> {
    /// A scalar read from the entity.
    Value(&'e serde_json::Value),
    /// A relation field read directly whose target is loaded.
    Entity(&'e EntityInstance),
    /// A relation field read directly whose target is not loaded.
    Reference(EntityId),
    /// Per-field values of a composite column, in declared order.
    Composite(Vec<CellValue<'e>>),
    /// Related data is not loaded, or the field was never fetched.
    Unavailable,
}

impl<'e> CellValue<'e> {
    /// Read one field of `entity` as it is.
    pub fn read(entity: &'e EntityInstance, field: &str) -> Self {
        match entity.get(field) {
            Some(FieldValue::Scalar(value)) => CellValue::Value(value),
            Some(FieldValue::Relation(Relation::Loaded { entity })) => CellValue::Entity(entity),
            Some(FieldValue::Relation(Relation::Unloaded { id })) => CellValue::Reference(*id),
            None => CellValue::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, CellValue::Unavailable)
    }

    pub fn as_value(&self) -> Option<&'e serde_json::Value> {
        match self {
            CellValue::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Plain text for display. Unavailable cells render blank.
    ///
    /// Strings render without quotes, related entities as `#<id>` (or blank
    /// when unsaved), composite parts are joined by a space.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Value(serde_json::Value::String(s)) => s.clone(),
            CellValue::Value(serde_json::Value::Null) => String::new(),
            CellValue::Value(other) => other.to_string(),
            CellValue::Entity(entity) => entity.id.map(|id| format!("#{id}")).unwrap_or_default(),
            CellValue::Reference(id) => format!("#{id}"),
            CellValue::Composite(parts) => parts
                .iter()
                .map(CellValue::display_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            CellValue::Unavailable => String::new(),
        }
    }
}
