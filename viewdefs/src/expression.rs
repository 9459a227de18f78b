//! Column path expressions.
//!
//! An expression such as `fields['product'].fields['name']` names a chain of
//! relation hops ending in a leaf field. It is parsed into segments once, checked
//! against the schema once when the column is built, and then replayed against
//! entity instances on every render.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use viewdefs_schema::{DataDefinition, EntityInstance, FieldValue, Relation, SchemaProvider};

use crate::error::{Result, ViewError};
use crate::value::CellValue;

const SEGMENT_OPEN: &str = "fields[";

/// A parsed path expression: zero or more relation hops plus a leaf field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    source: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse `fields['a'].fields['b']...`. Single or double quotes are accepted.
    pub fn parse(expression: &str) -> Result<Self> {
        let fail = |at: usize, message: &str| {
            ViewError::invalid_expression(expression, format!("{message} at offset {at}"))
        };

        let bytes = expression.as_bytes();
        let len = bytes.len();
        let mut segments = Vec::new();
        let mut i = 0;

        loop {
            if !expression[i..].starts_with(SEGMENT_OPEN) {
                return Err(fail(i, "expected fields['<name>']"));
            }
            i += SEGMENT_OPEN.len();

            let quote = match bytes.get(i) {
                Some(&q) if q == b'\'' || q == b'"' => q,
                _ => return Err(fail(i, "expected a quoted field name")),
            };
            i += 1;

            let start = i;
            while i < len && bytes[i] != quote {
                if !(bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    return Err(fail(i, "invalid character in field name"));
                }
                i += 1;
            }
            if i == len {
                return Err(fail(start, "unterminated field name"));
            }
            if i == start {
                return Err(fail(start, "empty field name"));
            }
            segments.push(expression[start..i].to_string());
            i += 1; // closing quote

            if bytes.get(i) != Some(&b']') {
                return Err(fail(i, "expected ']'"));
            }
            i += 1;

            if i == len {
                break;
            }
            if bytes[i] != b'.' {
                return Err(fail(i, "expected '.'"));
            }
            i += 1;
        }

        Ok(Self {
            source: expression.to_string(),
            segments,
        })
    }

    /// The expression exactly as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Relation fields followed before the leaf, outermost first.
    pub fn hops(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The field read at the end of the path.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The first segment, read on the column's own schema.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Check every segment against the schemas it walks through and return
    /// the schemas reached by the hops, outermost first.
    ///
    /// Each hop must be a relation field of the current schema; the leaf must
    /// be a field of the schema reached by the last hop.
    pub(crate) fn check(
        &self,
        column: &str,
        root: &DataDefinition,
        provider: &dyn SchemaProvider,
    ) -> Result<Vec<Arc<DataDefinition>>> {
        let unknown = |schema: &DataDefinition, field: &str| ViewError::UnknownField {
            column: column.to_string(),
            schema: schema.name().to_string(),
            field: field.to_string(),
        };

        let mut reached: Vec<Arc<DataDefinition>> = Vec::new();
        for hop in self.hops() {
            let schema = reached.last().map_or(root, |s| &**s);
            let field = schema.find_field(hop).ok_or_else(|| unknown(schema, hop))?;
            if !field.is_relation() {
                return Err(ViewError::invalid_expression(
                    &self.source,
                    format!("'{hop}' of {} is not a relation", schema.name()),
                ));
            }
            let next = provider.get_relation(schema, hop)?;
            reached.push(next);
        }

        let schema = reached.last().map_or(root, |s| &**s);
        if schema.find_field(self.leaf()).is_none() {
            return Err(unknown(schema, self.leaf()));
        }
        Ok(reached)
    }

    /// Walk the path over `entity` and read the leaf.
    ///
    /// A hop whose relation is absent or not loaded stops the walk with
    /// `CellValue::Unavailable`.
    pub fn evaluate<'e>(&self, entity: &'e EntityInstance) -> CellValue<'e> {
        let mut current = entity;
        for hop in self.hops() {
            match current.get(hop) {
                Some(FieldValue::Relation(Relation::Loaded { entity })) => current = entity,
                _ => return CellValue::Unavailable,
            }
        }
        CellValue::read(current, self.leaf())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        FieldPath::parse(&source).map_err(serde::de::Error::custom)
    }
}
