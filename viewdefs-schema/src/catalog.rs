//! SchemaCatalog, the in-memory `SchemaProvider`.
//!
//! A catalog is built once, either from definitions handed over in code or
//! from YAML files under an `entities/` directory, and is read-only afterward.
//! Building checks that every relation points at a definition in the catalog.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{Result, SchemaError};
use crate::provider::SchemaProvider;
use crate::types::DataDefinition;

/// A collection of default data definitions.
///
/// Passed to `SchemaCatalogBuilder::with_defaults()`. On open, defaults whose
/// file doesn't already exist on disk are written; edited files are preserved.
pub struct SchemaDefaults {
    definitions: Vec<DataDefinition>,
}

impl SchemaDefaults {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Add a default data definition.
    pub fn definition(mut self, def: DataDefinition) -> Self {
        self.definitions.push(def);
        self
    }

    pub fn definitions(&self) -> &[DataDefinition] {
        &self.definitions
    }
}

impl Default for SchemaDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a disk-backed `SchemaCatalog`. Created by `SchemaCatalog::open()`.
pub struct SchemaCatalogBuilder {
    root: PathBuf,
    defaults: Option<SchemaDefaults>,
}

impl SchemaCatalogBuilder {
    /// Provide default data definitions, seeded when their file is missing.
    pub fn with_defaults(mut self, defaults: SchemaDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Build the catalog: create the directory, seed defaults, load from disk.
    pub async fn build(self) -> Result<SchemaCatalog> {
        let entities_dir = self.root.join("entities");
        fs::create_dir_all(&entities_dir).await?;

        if let Some(defaults) = self.defaults {
            seed_defaults(&entities_dir, &defaults).await?;
        }

        let definitions = load_definitions(&entities_dir).await?;
        let catalog = SchemaCatalog::from_definitions(definitions)?;

        debug!(
            root = %self.root.display(),
            schemas = catalog.len(),
            "schema catalog opened"
        );

        Ok(catalog)
    }
}

/// Write default definitions that don't already have a file.
async fn seed_defaults(entities_dir: &Path, defaults: &SchemaDefaults) -> Result<()> {
    for def in &defaults.definitions {
        let path = definition_path(entities_dir, def.name());
        if !path.exists() {
            let yaml = serde_yaml_ng::to_string(def)?;
            atomic_write(&path, yaml.as_bytes()).await?;
            debug!(name = %def.name(), "seeded default schema");
        }
    }
    Ok(())
}

/// Read every `.yaml` file in `entities/`, in file-name order.
async fn load_definitions(entities_dir: &Path) -> Result<Vec<DataDefinition>> {
    if !entities_dir.is_dir() {
        return Err(SchemaError::NotInitialized {
            path: entities_dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(entities_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut definitions = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path).await?;
        match serde_yaml_ng::from_str::<DataDefinition>(&content) {
            Ok(def) => definitions.push(def),
            Err(e) => {
                warn!(?path, %e, "skipping invalid schema definition");
            }
        }
    }
    Ok(definitions)
}

fn definition_path(entities_dir: &Path, name: &str) -> PathBuf {
    entities_dir.join(format!("{name}.yaml"))
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

/// Immutable set of data definitions, indexed by qualified name.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    definitions: Vec<Arc<DataDefinition>>,
    index: HashMap<String, usize>,
}

impl SchemaCatalog {
    /// Open or create a schema directory. Returns a builder for optional configuration.
    ///
    /// ```rust,ignore
    /// let catalog = SchemaCatalog::open(path)
    ///     .with_defaults(my_defaults())
    ///     .build()
    ///     .await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> SchemaCatalogBuilder {
        SchemaCatalogBuilder {
            root: root.into(),
            defaults: None,
        }
    }

    /// Build a catalog from definitions already in memory.
    ///
    /// Fails on duplicate qualified names and on relations whose target is
    /// not part of the set.
    pub fn from_definitions(definitions: impl IntoIterator<Item = DataDefinition>) -> Result<Self> {
        let mut catalog = Self::default();
        for def in definitions {
            if catalog.index.contains_key(def.name()) {
                return Err(SchemaError::DuplicateSchema {
                    name: def.name().to_string(),
                });
            }
            catalog
                .index
                .insert(def.name().to_string(), catalog.definitions.len());
            catalog.definitions.push(Arc::new(def));
        }
        catalog.check_relations()?;
        Ok(catalog)
    }

    fn check_relations(&self) -> Result<()> {
        for def in &self.definitions {
            for field in def.relation_fields() {
                let Some(target) = field.type_.relation_target() else {
                    continue;
                };
                if !self.index.contains_key(target) {
                    tracing::error!(
                        schema = %def.name(),
                        field = %field.name,
                        %target,
                        "relation points at unknown schema"
                    );
                    return Err(SchemaError::schema_not_found(target));
                }
            }
        }
        Ok(())
    }

    /// All definitions in load order.
    pub fn all(&self) -> impl Iterator<Item = &DataDefinition> {
        self.definitions.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl SchemaProvider for SchemaCatalog {
    fn get_schema(&self, qualified_name: &str) -> Result<Arc<DataDefinition>> {
        self.index
            .get(qualified_name)
            .map(|&i| Arc::clone(&self.definitions[i]))
            .ok_or_else(|| SchemaError::schema_not_found(qualified_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDef;
    use tempfile::TempDir;

    fn product() -> DataDefinition {
        DataDefinition::new("products.product")
            .unwrap()
            .with_field(FieldDef::text("number"))
            .unwrap()
            .with_field(FieldDef::text("name"))
            .unwrap()
    }

    fn substitute() -> DataDefinition {
        DataDefinition::new("products.substitute")
            .unwrap()
            .with_field(FieldDef::text("name"))
            .unwrap()
            .with_field(FieldDef::relation("product", "products.product"))
            .unwrap()
    }

    #[test]
    fn lookup_by_qualified_name() {
        let catalog = SchemaCatalog::from_definitions([product(), substitute()]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get_schema("products.product").unwrap().name(),
            "products.product"
        );
        assert!(matches!(
            catalog.get_schema("products.missing"),
            Err(SchemaError::SchemaNotFound { .. })
        ));
    }

    #[test]
    fn provider_follows_relations() {
        let catalog = SchemaCatalog::from_definitions([product(), substitute()]).unwrap();
        let sub = catalog.get_schema("products.substitute").unwrap();
        let target = catalog.get_relation(&sub, "product").unwrap();
        assert_eq!(target.name(), "products.product");
        assert!(catalog.get_relation(&sub, "name").is_err());
    }

    #[test]
    fn dangling_relation_is_fatal() {
        let err = SchemaCatalog::from_definitions([substitute()]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::SchemaNotFound { ref name } if name == "products.product"
        ));
    }

    #[test]
    fn duplicate_schema_is_fatal() {
        let err = SchemaCatalog::from_definitions([product(), product()]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateSchema { .. }));
    }

    #[tokio::test]
    async fn open_creates_entities_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("schemas");
        let catalog = SchemaCatalog::open(&root).build().await.unwrap();
        assert!(root.join("entities").is_dir());
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn defaults_are_seeded_and_loaded() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("schemas");
        let defaults = SchemaDefaults::new()
            .definition(product())
            .definition(substitute());

        let catalog = SchemaCatalog::open(&root)
            .with_defaults(defaults)
            .build()
            .await
            .unwrap();

        assert!(root.join("entities/products.product.yaml").is_file());
        assert!(root.join("entities/products.substitute.yaml").is_file());
        assert_eq!(*catalog.get_schema("products.substitute").unwrap(), substitute());
    }

    #[tokio::test]
    async fn seeding_preserves_edited_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("schemas");
        std::fs::create_dir_all(root.join("entities")).unwrap();
        std::fs::write(
            root.join("entities/products.product.yaml"),
            "name: products.product\nfields:\n  - name: ean\n    type: { kind: text }\n",
        )
        .unwrap();

        let catalog = SchemaCatalog::open(&root)
            .with_defaults(SchemaDefaults::new().definition(product()))
            .build()
            .await
            .unwrap();

        let def = catalog.get_schema("products.product").unwrap();
        assert!(def.find_field("ean").is_some());
        assert!(def.find_field("number").is_none());
    }

    #[tokio::test]
    async fn invalid_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("schemas");
        std::fs::create_dir_all(root.join("entities")).unwrap();
        std::fs::write(root.join("entities/broken.yaml"), "name: [").unwrap();
        std::fs::write(root.join("entities/notes.txt"), "ignored").unwrap();

        let catalog = SchemaCatalog::open(&root)
            .with_defaults(SchemaDefaults::new().definition(product()))
            .build()
            .await
            .unwrap();

        assert_eq!(catalog.len(), 1);
    }
}
