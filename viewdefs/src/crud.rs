//! Deleting records shown by a view element.
//!
//! The registry only knows which schema an element is bound to; the actual
//! delete goes through a `DataAccess` implementation supplied by the caller.

use async_trait::async_trait;
use tracing::debug;
use viewdefs_schema::EntityId;

use crate::error::Result;
use crate::registry::ViewRegistry;

/// Entity persistence used by the delete helper.
///
/// Implementations report failures as `ViewError::DataAccess`.
#[async_trait]
pub trait DataAccess: Send + Sync {
    /// Delete one record of `entity_type` (a qualified schema name).
    async fn delete(&self, entity_type: &str, id: EntityId) -> Result<()>;
}

/// Delete `ids` from the schema bound to `element` of `view`, in order.
///
/// Returns the number of records deleted. An empty `ids` slice makes no calls.
/// Stops at the first failed delete.
pub async fn delete_entities(
    registry: &ViewRegistry,
    access: &dyn DataAccess,
    view: &str,
    element: &str,
    ids: &[EntityId],
) -> Result<usize> {
    let entity_type = registry.data_definition_for(view, element)?.name();
    for &id in ids {
        access.delete(entity_type, id).await?;
        debug!(%entity_type, id, "deleted entity");
    }
    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{grid, ViewBuilder};
    use crate::error::ViewError;
    use crate::registry::ViewFactoryFn;
    use crate::view::ViewDefinition;
    use std::sync::Mutex;
    use viewdefs_schema::{DataDefinition, FieldDef, SchemaCatalog, SchemaProvider};

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, EntityId)>>,
        fail_on: Option<EntityId>,
    }

    #[async_trait]
    impl DataAccess for Recorder {
        async fn delete(&self, entity_type: &str, id: EntityId) -> Result<()> {
            if self.fail_on == Some(id) {
                return Err(ViewError::DataAccess {
                    entity_type: entity_type.to_string(),
                    id,
                    message: "locked".into(),
                });
            }
            self.calls.lock().unwrap().push((entity_type.to_string(), id));
            Ok(())
        }
    }

    fn registry() -> ViewRegistry {
        fn dictionaries(provider: &dyn SchemaProvider) -> crate::Result<ViewDefinition> {
            let dictionary = provider.get_schema("core.dictionary")?;
            Ok(ViewBuilder::new("core.dictionaryGridView")?
                .with_element(grid("dictionaries", dictionary))?
                .build())
        }
        let catalog = SchemaCatalog::from_definitions([DataDefinition::from_fields(
            "core.dictionary",
            [FieldDef::text("name")],
        )
        .unwrap()])
        .unwrap();
        let factories: [ViewFactoryFn; 1] = [dictionaries];
        ViewRegistry::register(&catalog, factories).unwrap()
    }

    #[tokio::test]
    async fn deletes_each_id_on_bound_schema() {
        let registry = registry();
        let access = Recorder::default();
        let deleted = delete_entities(
            &registry,
            &access,
            "core.dictionaryGridView",
            "dictionaries",
            &[5, 3],
        )
        .await
        .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(
            *access.calls.lock().unwrap(),
            vec![
                ("core.dictionary".to_string(), 5),
                ("core.dictionary".to_string(), 3)
            ]
        );
    }

    #[tokio::test]
    async fn empty_list_makes_no_calls() {
        let registry = registry();
        let access = Recorder::default();
        let deleted = delete_entities(
            &registry,
            &access,
            "core.dictionaryGridView",
            "dictionaries",
            &[],
        )
        .await
        .unwrap();
        assert_eq!(deleted, 0);
        assert!(access.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_view_is_recoverable() {
        let registry = registry();
        let access = Recorder::default();
        let err = delete_entities(&registry, &access, "core.missingView", "dictionaries", &[1])
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::ViewNotFound { .. }));
        assert!(!err.is_startup_fatal());
        assert!(access.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let registry = registry();
        let access = Recorder {
            fail_on: Some(2),
            ..Default::default()
        };
        let err = delete_entities(
            &registry,
            &access,
            "core.dictionaryGridView",
            "dictionaries",
            &[1, 2, 3],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ViewError::DataAccess { id: 2, .. }));
        assert_eq!(access.calls.lock().unwrap().len(), 1);
    }
}
