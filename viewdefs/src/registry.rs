//! The build-once catalog of views.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use viewdefs_schema::{DataDefinition, SchemaProvider};

use crate::error::{Result, ViewError};
use crate::view::ViewDefinition;

/// Produces one view from the schema provider.
///
/// Any plain function or closure of the right shape is a factory.
pub trait ViewFactory {
    fn build(&self, provider: &dyn SchemaProvider) -> Result<ViewDefinition>;
}

impl<F> ViewFactory for F
where
    F: Fn(&dyn SchemaProvider) -> Result<ViewDefinition>,
{
    fn build(&self, provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
        self(provider)
    }
}

/// Function-pointer factory, the shape of the stock view constructors.
pub type ViewFactoryFn = fn(&dyn SchemaProvider) -> Result<ViewDefinition>;

/// Registration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Fail registration when a drill-down link targets an unregistered view.
    pub strict_navigation: bool,
    /// Fail registration for views without a header.
    pub require_view_header: bool,
}

impl RegistryConfig {
    /// Load settings from a YAML file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml_ng::from_str(&text)?)
    }
}

/// A drill-down link that does not close cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NavigationIssue {
    /// The target view is not registered.
    MissingTarget {
        view: String,
        element: String,
        target: String,
    },
    /// The target view exists but no element of it links back.
    NoBackLink {
        view: String,
        element: String,
        target: String,
    },
}

impl NavigationIssue {
    pub fn is_missing_target(&self) -> bool {
        matches!(self, NavigationIssue::MissingTarget { .. })
    }
}

impl fmt::Display for NavigationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationIssue::MissingTarget {
                view,
                element,
                target,
            } => write!(f, "{view}/{element} -> {target}: target view is not registered"),
            NavigationIssue::NoBackLink {
                view,
                element,
                target,
            } => write!(f, "{view}/{element} -> {target}: no link back to {view}"),
        }
    }
}

/// Every registered view, keyed by name.
///
/// Built once by [`ViewRegistry::register`] and never mutated afterwards, so
/// a shared reference (or an `Arc<ViewRegistry>`) can be read from any number
/// of threads without locking.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: HashMap<String, ViewDefinition>,
    navigation: Vec<NavigationIssue>,
}

impl ViewRegistry {
    /// Build every view with the default configuration.
    pub fn register<F, I>(provider: &dyn SchemaProvider, factories: I) -> Result<Self>
    where
        F: ViewFactory,
        I: IntoIterator<Item = F>,
    {
        Self::register_with_config(provider, factories, &RegistryConfig::default())
    }

    /// Build every view, failing on the first error.
    ///
    /// Nothing is returned until all factories have run, so a failed
    /// registration never exposes part of a catalog.
    pub fn register_with_config<F, I>(
        provider: &dyn SchemaProvider,
        factories: I,
        config: &RegistryConfig,
    ) -> Result<Self>
    where
        F: ViewFactory,
        I: IntoIterator<Item = F>,
    {
        let mut views = HashMap::new();
        for factory in factories {
            let view = factory.build(provider)?;
            if config.require_view_header && view.header().is_none() {
                return Err(ViewError::InvalidViewName {
                    name: view.name,
                    message: "a header is required".into(),
                });
            }
            match views.entry(view.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(ViewError::DuplicateViewName { name: view.name });
                }
                Entry::Vacant(slot) => {
                    debug!(view = %view.name, elements = view.elements.len(), "registered view");
                    slot.insert(view);
                }
            }
        }

        let navigation = check_navigation(&views);
        for issue in &navigation {
            if let NavigationIssue::MissingTarget {
                view,
                element,
                target,
            } = issue
            {
                if config.strict_navigation {
                    return Err(ViewError::DanglingNavigation {
                        view: view.clone(),
                        element: element.clone(),
                        target: target.clone(),
                    });
                }
                warn!(%issue, "dangling navigation link");
            }
        }

        debug!(views = views.len(), "view registry built");
        Ok(Self { views, navigation })
    }

    /// Look up a view by exact name.
    pub fn get_view(&self, name: &str) -> Option<&ViewDefinition> {
        self.views.get(name)
    }

    /// All views, sorted by name. Each call returns a fresh vector.
    pub fn list_views(&self) -> Vec<&ViewDefinition> {
        let mut views: Vec<&ViewDefinition> = self.views.values().collect();
        views.sort_by(|a, b| a.name().cmp(b.name()));
        views
    }

    pub fn names(&self) -> Vec<&str> {
        self.list_views().into_iter().map(ViewDefinition::name).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The schema bound to `element` of `view`, for addressing data operations.
    pub fn data_definition_for(&self, view: &str, element: &str) -> Result<&Arc<DataDefinition>> {
        let definition = self.get_view(view).ok_or_else(|| ViewError::ViewNotFound {
            name: view.to_string(),
        })?;
        definition
            .element(element)
            .map(|e| e.data_definition())
            .ok_or_else(|| ViewError::ElementNotFound {
                view: view.to_string(),
                element: element.to_string(),
            })
    }

    /// Drill-down links that point nowhere or are never answered by a link back.
    pub fn navigation_issues(&self) -> &[NavigationIssue] {
        &self.navigation
    }
}

fn check_navigation(views: &HashMap<String, ViewDefinition>) -> Vec<NavigationIssue> {
    let mut names: Vec<&String> = views.keys().collect();
    names.sort();

    let mut issues = Vec::new();
    for name in names {
        let view = &views[name];
        for (element, target) in view.navigation_links() {
            let links_back = |target_view: &ViewDefinition| {
                target_view
                    .navigation_links()
                    .any(|(_, back)| back == name.as_str())
            };
            let issue = match views.get(target) {
                None => NavigationIssue::MissingTarget {
                    view: name.clone(),
                    element: element.to_string(),
                    target: target.to_string(),
                },
                Some(target_view) if !links_back(target_view) => NavigationIssue::NoBackLink {
                    view: name.clone(),
                    element: element.to_string(),
                    target: target.to_string(),
                },
                Some(_) => continue,
            };
            issues.push(issue);
        }
    }
    issues
}
