//! Grid columns and their resolution against entities.

use serde::Serialize;
use viewdefs_schema::{DataDefinition, EntityInstance, FieldDef, SchemaProvider};

use crate::error::{Result, ViewError};
use crate::expression::FieldPath;
use crate::value::CellValue;

/// One column of a grid.
///
/// `name` is the display identifier and need not match a field name (a
/// `login` column may be backed by `userName`). `fields` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    name: String,
    fields: Vec<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<FieldPath>,
}

impl ColumnDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn expression(&self) -> Option<&FieldPath> {
        self.expression.as_ref()
    }

    /// More than one backing field and no expression.
    pub fn is_composite(&self) -> bool {
        self.expression.is_none() && self.fields.len() > 1
    }

    /// The value to display for this column on `entity`.
    ///
    /// With an expression, the path is walked over the loaded relation graph.
    /// Without one, the first field is read directly (a relation field yields
    /// the related entity or its reference). Composite columns yield
    /// `CellValue::Composite` with one part per field.
    pub fn resolve<'e>(&self, entity: &'e EntityInstance) -> CellValue<'e> {
        if let Some(path) = &self.expression {
            return path.evaluate(entity);
        }
        match self.fields.as_slice() {
            [field] => CellValue::read(entity, &field.name),
            _ => CellValue::Composite(self.resolve_fields(entity)),
        }
    }

    /// Raw per-field values in declared order, ignoring any expression.
    pub fn resolve_fields<'e>(&self, entity: &'e EntityInstance) -> Vec<CellValue<'e>> {
        self.fields
            .iter()
            .map(|field| CellValue::read(entity, &field.name))
            .collect()
    }
}

/// Builds columns against a schema provider.
///
/// Field names and expressions are checked here, once; resolving a built
/// column never consults the schema again.
pub struct ColumnResolver<'p> {
    provider: &'p dyn SchemaProvider,
}

impl<'p> ColumnResolver<'p> {
    pub fn new(provider: &'p dyn SchemaProvider) -> Self {
        Self { provider }
    }

    /// Build a column over `fields` of `schema`, optionally displayed through
    /// a path expression rooted at `schema`.
    ///
    /// With an expression, a listed field may also belong to a schema reached
    /// by one of its hops; the first schema along the path that has it wins.
    pub fn make_column(
        &self,
        schema: &DataDefinition,
        name: &str,
        fields: &[&str],
        expression: Option<&str>,
    ) -> Result<ColumnDefinition> {
        if fields.is_empty() {
            return Err(ViewError::EmptyColumn {
                column: name.to_string(),
            });
        }

        let mut reached = Vec::new();
        let expression = match expression {
            Some(source) => {
                let path = FieldPath::parse(source)?;
                reached = path.check(name, schema, self.provider)?;
                Some(path)
            }
            None => None,
        };

        // Expression columns may list fields of any schema along the path.
        let fields = fields
            .iter()
            .map(|field| {
                std::iter::once(schema)
                    .chain(reached.iter().map(|s| &**s))
                    .find_map(|s| s.find_field(field))
                    .cloned()
                    .ok_or_else(|| ViewError::UnknownField {
                        column: name.to_string(),
                        schema: schema.name().to_string(),
                        field: field.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ColumnDefinition {
            name: name.to_string(),
            fields,
            expression,
        })
    }

    /// A column named after, and backed by, a single field.
    pub fn field_column(&self, schema: &DataDefinition, field: &str) -> Result<ColumnDefinition> {
        self.make_column(schema, field, &[field], None)
    }
}

/// Resolve `column` against `entity`. Same as `ColumnDefinition::resolve`.
pub fn resolve<'e>(column: &ColumnDefinition, entity: &'e EntityInstance) -> CellValue<'e> {
    column.resolve(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use viewdefs_schema::{FieldType, SchemaCatalog};

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_definitions([
            DataDefinition::from_fields(
                "users.group",
                [FieldDef::text("name"), FieldDef::text("role")],
            )
            .unwrap(),
            DataDefinition::from_fields(
                "users.user",
                [
                    FieldDef::text("userName"),
                    FieldDef::text("firstName"),
                    FieldDef::text("lastName"),
                    FieldDef::new("active", FieldType::Boolean),
                    FieldDef::relation("userGroup", "users.group"),
                ],
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn renamed_column_reads_backing_field() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let column = ColumnResolver::new(&catalog)
            .make_column(&user, "login", &["userName"], None)
            .unwrap();

        let entity = EntityInstance::new("users.user").with_value("userName", "jdoe");
        assert_eq!(column.name(), "login");
        assert_eq!(column.resolve(&entity), CellValue::Value(&json!("jdoe")));
    }

    #[test]
    fn relation_field_without_expression_returns_raw_reference() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let column = ColumnResolver::new(&catalog)
            .field_column(&user, "userGroup")
            .unwrap();

        let unloaded = EntityInstance::new("users.user").with_unloaded("userGroup", 2);
        assert_eq!(column.resolve(&unloaded), CellValue::Reference(2));

        let group = EntityInstance::new("users.group").with_id(2);
        let loaded = EntityInstance::new("users.user").with_loaded("userGroup", group.clone());
        assert_eq!(column.resolve(&loaded), CellValue::Entity(&group));
    }

    #[test]
    fn expression_column_walks_relation() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let column = ColumnResolver::new(&catalog)
            .make_column(
                &user,
                "userGroup",
                &["userGroup"],
                Some("fields['userGroup'].fields['name']"),
            )
            .unwrap();

        let group = EntityInstance::new("users.group").with_value("name", "Admins");
        let loaded = EntityInstance::new("users.user").with_loaded("userGroup", group);
        let unloaded = EntityInstance::new("users.user").with_unloaded("userGroup", 1);

        assert_eq!(column.resolve(&loaded).display_text(), "Admins");
        assert_eq!(resolve(&column, &unloaded), CellValue::Unavailable);
    }

    #[test]
    fn composite_column_exposes_per_field_values() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let column = ColumnResolver::new(&catalog)
            .make_column(&user, "fullName", &["firstName", "lastName"], None)
            .unwrap();
        assert!(column.is_composite());

        let entity = EntityInstance::new("users.user")
            .with_value("firstName", "Jane")
            .with_value("lastName", "Doe");
        let first = json!("Jane");
        let last = json!("Doe");
        assert_eq!(
            column.resolve_fields(&entity),
            vec![CellValue::Value(&first), CellValue::Value(&last)]
        );
        assert_eq!(column.resolve(&entity).display_text(), "Jane Doe");
    }

    #[test]
    fn unknown_field_is_named() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let err = ColumnResolver::new(&catalog)
            .make_column(&user, "email", &["email"], None)
            .unwrap_err();
        match err {
            ViewError::UnknownField { field, schema, .. } => {
                assert_eq!(field, "email");
                assert_eq!(schema, "users.user");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_field_list_rejected() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        assert!(matches!(
            ColumnResolver::new(&catalog).make_column(&user, "nothing", &[], None),
            Err(ViewError::EmptyColumn { .. })
        ));
    }

    #[test]
    fn expression_checked_at_construction() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let err = ColumnResolver::new(&catalog)
            .make_column(
                &user,
                "userGroup",
                &["userGroup"],
                Some("fields['userGroup'].fields['title']"),
            )
            .unwrap_err();
        assert!(matches!(err, ViewError::UnknownField { ref field, .. } if field == "title"));
    }

    #[test]
    fn expression_column_may_list_fields_reached_through_relations() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let column = ColumnResolver::new(&catalog)
            .make_column(
                &user,
                "role",
                &["role"],
                Some("fields['userGroup'].fields['role']"),
            )
            .unwrap();
        assert_eq!(column.fields()[0], FieldDef::text("role"));

        let group = EntityInstance::new("users.group").with_value("role", "admin");
        let entity = EntityInstance::new("users.user").with_loaded("userGroup", group);
        assert_eq!(column.resolve(&entity).display_text(), "admin");
    }

    #[test]
    fn plain_column_may_not_list_related_fields() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let err = ColumnResolver::new(&catalog)
            .make_column(&user, "role", &["role"], None)
            .unwrap_err();
        assert!(matches!(err, ViewError::UnknownField { ref field, .. } if field == "role"));
    }

    #[test]
    fn expression_root_must_exist_on_column_schema() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let err = ColumnResolver::new(&catalog)
            .make_column(
                &user,
                "vendor",
                &["userName"],
                Some("fields['vendor'].fields['name']"),
            )
            .unwrap_err();
        match err {
            ViewError::UnknownField { field, schema, .. } => {
                assert_eq!(field, "vendor");
                assert_eq!(schema, "users.user");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serializes_expression_as_literal() {
        let catalog = catalog();
        let user = catalog.get_schema("users.user").unwrap();
        let resolver = ColumnResolver::new(&catalog);
        let plain = resolver.field_column(&user, "active").unwrap();
        let derived = resolver
            .make_column(
                &user,
                "userGroup",
                &["userGroup"],
                Some("fields['userGroup'].fields['name']"),
            )
            .unwrap();

        let plain = serde_json::to_value(&plain).unwrap();
        assert!(plain.get("expression").is_none());
        assert_eq!(plain["fields"][0]["type"]["kind"], "boolean");

        let derived = serde_json::to_value(&derived).unwrap();
        assert_eq!(derived["expression"], "fields['userGroup'].fields['name']");
    }
}
