//! A named tree of elements.

use serde::Serialize;

use crate::element::ViewElementDefinition;

/// A view: qualified name (`<module>.<viewName>`), optional header, and its
/// elements in rendering order.
///
/// Views are assembled by `ViewBuilder` and owned by the registry; once
/// registered they are never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ViewDefinition {
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) header: Option<String>,
    pub(crate) elements: Vec<ViewElementDefinition>,
}

impl ViewDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module part of the name (`products` in `products.productGridView`).
    pub fn module(&self) -> &str {
        self.name.split_once('.').map_or("", |(module, _)| module)
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn elements(&self) -> &[ViewElementDefinition] {
        &self.elements
    }

    pub fn element(&self, name: &str) -> Option<&ViewElementDefinition> {
        self.elements.iter().find(|e| e.name() == name)
    }

    /// Qualified schema name behind `element`, used to address deletes.
    pub fn data_definition_name(&self, element: &str) -> Option<&str> {
        self.element(element).map(|e| e.data_definition().name())
    }

    /// `(element, target view)` for every element with a drill-down link.
    pub fn navigation_links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.elements
            .iter()
            .filter_map(|e| e.corresponding_view_name().map(|target| (e.name(), target)))
    }
}
