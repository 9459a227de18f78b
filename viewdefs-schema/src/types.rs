//! Core schema types: field definitions and data definitions.
//!
//! All types serialize to/from YAML via serde. A `DataDefinition` is the
//! description of one entity type (its qualified name plus its fields), and a
//! `FieldDef` describes one named, typed attribute. Relations are fields whose
//! type points at another data definition by qualified name.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SchemaError};

/// A single option in a select field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub order: i32,
}

/// The type of a field: primitive, or a relation to another entity type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    Select {
        options: Vec<SelectOption>,
    },
    /// Points at a single entity of another data definition.
    Relation {
        entity: String,
    },
}

impl FieldType {
    /// Qualified name of the related data definition, for relation fields.
    pub fn relation_target(&self) -> Option<&str> {
        match self {
            FieldType::Relation { entity } => Some(entity),
            _ => None,
        }
    }
}

/// A field definition: the schema for a single named attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_: FieldType,
    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    /// A plain text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// A relation field pointing at `entity`.
    pub fn relation(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldType::Relation {
                entity: entity.into(),
            },
        )
    }

    pub fn new(name: impl Into<String>, type_: FieldType) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_,
            required: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_relation(&self) -> bool {
        self.type_.relation_target().is_some()
    }
}

/// A data definition: the schema of one entity type.
///
/// Identified by a qualified name of the form `<plugin>.<entity>`
/// (e.g. `products.substitute`). Fields keep declaration order; lookups by
/// name go through an index built on construction and on deserialization.
#[derive(Debug, Clone)]
pub struct DataDefinition {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl DataDefinition {
    /// Create an empty data definition. The name must be qualified.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_qualified_name(&name)?;
        Ok(Self {
            name,
            description: None,
            fields: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Create a data definition with `fields` in declaration order.
    pub fn from_fields(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDef>,
    ) -> Result<Self> {
        let mut def = Self::new(name)?;
        for field in fields {
            def.push_field(field)?;
        }
        Ok(def)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field. Field names are unique within a definition.
    pub fn with_field(mut self, field: FieldDef) -> Result<Self> {
        self.push_field(field)?;
        Ok(self)
    }

    fn push_field(&mut self, field: FieldDef) -> Result<()> {
        if self.index.contains_key(&field.name) {
            return Err(SchemaError::DuplicateField {
                schema: self.name.clone(),
                field: field.name,
            });
        }
        self.index.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The plugin part of the qualified name (`products` in `products.product`).
    pub fn plugin(&self) -> &str {
        self.name.split_once('.').map_or("", |(plugin, _)| plugin)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Result<&FieldDef> {
        self.find_field(name)
            .ok_or_else(|| SchemaError::field_not_found(&self.name, name))
    }

    /// Like `get_field`, for callers that treat absence as a normal outcome.
    pub fn find_field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Qualified name of the data definition a relation field points at.
    ///
    /// Fails with `RelationNotFound` when the field is missing or is not a
    /// relation.
    pub fn get_relation(&self, name: &str) -> Result<&str> {
        self.find_field(name)
            .and_then(|f| f.type_.relation_target())
            .ok_or_else(|| SchemaError::relation_not_found(&self.name, name))
    }

    /// Fields that are relations, in declaration order.
    pub fn relation_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_relation())
    }
}

impl PartialEq for DataDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.fields == other.fields
    }
}

/// On-disk shape of a data definition.
#[derive(Serialize, Deserialize)]
struct DataDefinitionRepr {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    fields: Vec<FieldDef>,
}

impl Serialize for DataDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        DataDefinitionRepr {
            name: self.name.clone(),
            description: self.description.clone(),
            fields: self.fields.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = DataDefinitionRepr::deserialize(deserializer)?;
        let mut def = DataDefinition::new(repr.name).map_err(serde::de::Error::custom)?;
        def.description = repr.description;
        for field in repr.fields {
            def.push_field(field).map_err(serde::de::Error::custom)?;
        }
        Ok(def)
    }
}

/// Qualified names are `<plugin>.<entity>`, both parts non-empty identifiers.
pub fn validate_qualified_name(name: &str) -> Result<()> {
    let invalid = |message: &str| SchemaError::InvalidName {
        name: name.to_string(),
        message: message.to_string(),
    };

    let (plugin, entity) = name
        .split_once('.')
        .ok_or_else(|| invalid("expected <plugin>.<entity>"))?;
    if plugin.is_empty() || entity.is_empty() {
        return Err(invalid("plugin and entity parts must be non-empty"));
    }
    if entity.contains('.') {
        return Err(invalid("only one '.' separator is allowed"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(invalid("only ASCII letters, digits and '_' are allowed"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substitute() -> DataDefinition {
        DataDefinition::new("products.substitute")
            .unwrap()
            .with_field(FieldDef::text("number").required())
            .unwrap()
            .with_field(FieldDef::text("name"))
            .unwrap()
            .with_field(FieldDef::new("priority", FieldType::Integer))
            .unwrap()
            .with_field(FieldDef::relation("product", "products.product"))
            .unwrap()
    }

    #[test]
    fn get_field_and_relation() {
        let def = substitute();
        assert_eq!(def.get_field("name").unwrap().name, "name");
        assert_eq!(def.get_relation("product").unwrap(), "products.product");
        assert_eq!(def.plugin(), "products");
    }

    #[test]
    fn missing_field_is_reported_with_schema() {
        let def = substitute();
        let err = def.get_field("ean").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'ean' not found in schema products.substitute"
        );
    }

    #[test]
    fn scalar_field_is_not_a_relation() {
        let def = substitute();
        assert!(matches!(
            def.get_relation("name"),
            Err(SchemaError::RelationNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_field_rejected() {
        let err = DataDefinition::new("products.product")
            .unwrap()
            .with_field(FieldDef::text("name"))
            .unwrap()
            .with_field(FieldDef::text("name"))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn unqualified_names_rejected() {
        assert!(DataDefinition::new("product").is_err());
        assert!(DataDefinition::new(".product").is_err());
        assert!(DataDefinition::new("a.b.c").is_err());
        assert!(DataDefinition::new("products.sub stitute").is_err());
        assert!(DataDefinition::new("core.dictionaryItem").is_ok());
    }

    #[test]
    fn relation_fields_keep_declaration_order() {
        let def = substitute();
        let names: Vec<&str> = def.relation_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["product"]);
        let all: Vec<&str> = def.field_names().collect();
        assert_eq!(all, vec!["number", "name", "priority", "product"]);
    }

    #[test]
    fn data_definition_yaml_uses_kind_tags() {
        let yaml = serde_yaml_ng::to_string(&substitute()).unwrap();
        assert!(yaml.contains("kind: relation"));
        assert!(yaml.contains("entity: products.product"));
        assert!(yaml.contains("type:"));
        assert!(!yaml.contains("type_:"));
        assert!(!yaml.contains("index"));
    }

    #[test]
    fn deserialized_definition_rebuilds_index() {
        let yaml = r#"
name: users.user
fields:
  - name: userName
    type: { kind: text }
    required: true
  - name: userGroup
    type: { kind: relation, entity: users.group }
"#;
        let def: DataDefinition = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(def.get_field("userName").unwrap().required);
        assert_eq!(def.get_relation("userGroup").unwrap(), "users.group");
    }

    #[test]
    fn deserialize_rejects_duplicate_fields() {
        let yaml = r#"
name: users.user
fields:
  - name: email
    type: { kind: text }
  - name: email
    type: { kind: text }
"#;
        assert!(serde_yaml_ng::from_str::<DataDefinition>(yaml).is_err());
    }
}
