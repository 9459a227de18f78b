//! Building the registry the commands operate on.

use std::path::Path;

use viewdefs::standard::{standard_catalog, standard_views};
use viewdefs::{RegistryConfig, Result, ViewRegistry};
use viewdefs_schema::SchemaCatalog;

/// Build the stock views against `schemas` (or the stock schemas) with the
/// configuration in `config` (or the defaults).
pub async fn load_registry(schemas: Option<&Path>, config: Option<&Path>) -> Result<ViewRegistry> {
    let catalog = match schemas {
        Some(dir) => SchemaCatalog::open(dir).build().await?,
        None => standard_catalog()?,
    };
    let config = match config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    tracing::debug!(schemas = catalog.len(), ?config, "building view registry");
    ViewRegistry::register_with_config(&catalog, standard_views(), &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use viewdefs::ViewError;

    #[tokio::test]
    async fn test_stock_schemas_by_default() {
        let registry = load_registry(None, None).await.unwrap();
        assert_eq!(registry.len(), 13);
    }

    #[tokio::test]
    async fn test_empty_schema_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = load_registry(Some(temp.path()), None).await.unwrap_err();
        assert!(matches!(err, ViewError::Schema(_)));
        assert!(err.is_startup_fatal());
    }

    #[tokio::test]
    async fn test_config_file_applies() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("viewdefs.yaml");
        std::fs::write(&config, "require_view_header: true\n").unwrap();

        let err = load_registry(None, Some(&config)).await.unwrap_err();
        assert!(matches!(err, ViewError::InvalidViewName { .. }));
    }
}
