//! Builders for elements and views.
//!
//! Builders are the only way to assemble a `ViewDefinition`. Each setter that
//! can be wrong checks itself when called: parent fields must be relations of
//! the element's schema, columns must belong to the grid's schema, options must
//! be recognized. When an element is added to a view, its parent binding is
//! cross-checked against the elements already in that view.
//!
//! Everything a builder produces is frozen once the view is registered;
//! changing a registered view is a programming error, not a runtime case.

use std::sync::Arc;

use viewdefs_schema::{validate_qualified_name, DataDefinition, SchemaError};

use crate::column::ColumnDefinition;
use crate::element::{
    ElementBase, FormDefinition, GridDefinition, GridOptions, ParentBinding, ViewElementDefinition,
};
use crate::error::{Result, ViewError};
use crate::view::ViewDefinition;

/// Start a grid bound to `data_definition`.
pub fn grid(name: impl Into<String>, data_definition: Arc<DataDefinition>) -> GridBuilder {
    GridBuilder::new(name, data_definition)
}

/// Start a form bound to `data_definition`.
pub fn form(name: impl Into<String>, data_definition: Arc<DataDefinition>) -> FormBuilder {
    FormBuilder::new(name, data_definition)
}

/// Setters shared by grid and form builders.
pub trait ElementBuilder: Sized {
    fn base_mut(&mut self) -> &mut ElementBase;

    fn into_element(self) -> ViewElementDefinition;

    fn with_header(mut self, header: impl Into<String>) -> Self {
        self.base_mut().header = Some(header.into());
        self
    }

    /// Bind from a descriptor: `entityId` or `viewElement:<sibling>`.
    fn with_parent(mut self, descriptor: &str) -> Result<Self> {
        let base = self.base_mut();
        let binding = descriptor
            .parse::<ParentBinding>()
            .map_err(|message| ViewError::invalid_parent(&base.name, descriptor, message))?;
        base.parent = Some(binding);
        Ok(self)
    }

    /// Bind to the primary key of the current request.
    fn bound_to_request_entity(mut self) -> Self {
        self.base_mut().parent = Some(ParentBinding::RequestEntity);
        self
    }

    /// Bind to the selected record of a sibling element.
    fn bound_to_element(mut self, sibling: impl Into<String>) -> Self {
        self.base_mut().parent = Some(ParentBinding::SiblingElement(sibling.into()));
        self
    }

    /// Filter by a relation field of this element's schema.
    fn with_parent_field(mut self, field: &str) -> Result<Self> {
        let base = self.base_mut();
        if let Err(e) = base.data_definition.get_relation(field) {
            let parent = base
                .parent
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            return Err(ViewError::invalid_parent(&base.name, parent, e.to_string()));
        }
        base.parent_field = Some(field.to_string());
        Ok(self)
    }

    fn with_corresponding_view(mut self, view: impl Into<String>) -> Self {
        self.base_mut().corresponding_view_name = Some(view.into());
        self
    }
}

/// Builds a `GridDefinition`.
pub struct GridBuilder {
    grid: GridDefinition,
}

impl GridBuilder {
    pub fn new(name: impl Into<String>, data_definition: Arc<DataDefinition>) -> Self {
        Self {
            grid: GridDefinition {
                base: ElementBase::new(name, data_definition),
                columns: Vec::new(),
                options: GridOptions::default(),
                events: Default::default(),
            },
        }
    }

    /// Replace the columns. Every column must be rooted at this grid's schema.
    pub fn with_columns(
        mut self,
        columns: impl IntoIterator<Item = ColumnDefinition>,
    ) -> Result<Self> {
        self.grid.columns.clear();
        for column in columns {
            self = self.with_column(column)?;
        }
        Ok(self)
    }

    /// Append one column.
    ///
    /// An expression column only needs its root segment on this grid's schema;
    /// its fields were checked along the path when it was built.
    pub fn with_column(mut self, column: ColumnDefinition) -> Result<Self> {
        let schema = &self.grid.base.data_definition;
        let unknown = |field: &str| ViewError::UnknownField {
            column: column.name().to_string(),
            schema: schema.name().to_string(),
            field: field.to_string(),
        };
        match column.expression() {
            Some(path) => {
                if schema.find_field(path.root()).is_none() {
                    return Err(unknown(path.root()));
                }
            }
            None => {
                for field in column.fields() {
                    if schema.find_field(&field.name) != Some(field) {
                        return Err(unknown(&field.name));
                    }
                }
            }
        }
        self.grid.columns.push(column);
        Ok(self)
    }

    /// Set options from `(key, value)` pairs, e.g. `("paging", "true")`.
    pub fn with_options<I, K, V>(mut self, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in options {
            self.grid
                .options
                .set(&self.grid.base.name, key.as_ref(), value.as_ref())?;
        }
        Ok(self)
    }

    pub fn with_option(self, key: &str, value: &str) -> Result<Self> {
        self.with_options([(key, value)])
    }

    /// Replace event handlers.
    pub fn with_events<I, K, V>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.grid.events = events
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_event(mut self, event: impl Into<String>, handler: impl Into<String>) -> Self {
        self.grid.events.insert(event.into(), handler.into());
        self
    }

    pub fn build(self) -> GridDefinition {
        self.grid
    }
}

impl ElementBuilder for GridBuilder {
    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.grid.base
    }

    fn into_element(self) -> ViewElementDefinition {
        ViewElementDefinition::Grid(self.grid)
    }
}

/// Builds a `FormDefinition`.
pub struct FormBuilder {
    form: FormDefinition,
}

impl FormBuilder {
    pub fn new(name: impl Into<String>, data_definition: Arc<DataDefinition>) -> Self {
        Self {
            form: FormDefinition {
                base: ElementBase::new(name, data_definition),
            },
        }
    }

    pub fn build(self) -> FormDefinition {
        self.form
    }
}

impl ElementBuilder for FormBuilder {
    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.form.base
    }

    fn into_element(self) -> ViewElementDefinition {
        ViewElementDefinition::Form(self.form)
    }
}

/// Builds a `ViewDefinition` from elements in rendering order.
pub struct ViewBuilder {
    view: ViewDefinition,
}

impl ViewBuilder {
    /// Start a view. The name must be `<module>.<viewName>`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if let Err(e) = validate_qualified_name(&name) {
            let message = match e {
                SchemaError::InvalidName { message, .. } => message,
                other => other.to_string(),
            };
            return Err(ViewError::InvalidViewName { name, message });
        }
        Ok(Self {
            view: ViewDefinition {
                name,
                header: None,
                elements: Vec::new(),
            },
        })
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.view.header = Some(header.into());
        self
    }

    /// Append an element after checking its name and parent binding.
    ///
    /// A `viewElement:<sibling>` parent must name an element added earlier;
    /// when a parent field is set, its relation must target the sibling's schema.
    pub fn with_element(mut self, element: impl ElementBuilder) -> Result<Self> {
        let element = element.into_element();
        if self.view.element(element.name()).is_some() {
            return Err(ViewError::DuplicateElementName {
                view: self.view.name.clone(),
                element: element.name().to_string(),
            });
        }
        self.check_binding(&element)?;
        self.view.elements.push(element);
        Ok(self)
    }

    fn check_binding(&self, element: &ViewElementDefinition) -> Result<()> {
        let name = element.name();
        match (element.parent(), element.parent_field()) {
            (None, None) | (Some(ParentBinding::RequestEntity), _) => Ok(()),
            (None, Some(field)) => Err(ViewError::invalid_parent(
                name,
                "-",
                format!("parent field '{field}' is set without a parent"),
            )),
            (Some(ParentBinding::SiblingElement(sibling)), field) => {
                if sibling == name {
                    return Err(ViewError::invalid_parent(
                        name,
                        sibling,
                        "an element cannot bind to itself",
                    ));
                }
                let parent = self.view.element(sibling).ok_or_else(|| {
                    ViewError::invalid_parent(
                        name,
                        sibling,
                        format!("no earlier element named '{sibling}' in {}", self.view.name),
                    )
                })?;

                let Some(field) = field else {
                    return Ok(());
                };
                let target = element
                    .data_definition()
                    .get_relation(field)
                    .map_err(|e| ViewError::invalid_parent(name, sibling, e.to_string()))?;
                let parent_schema = parent.data_definition().name();
                if target != parent_schema {
                    return Err(ViewError::invalid_parent(
                        name,
                        sibling,
                        format!(
                            "relation '{field}' targets {target}, but '{sibling}' is bound to {parent_schema}"
                        ),
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn build(self) -> ViewDefinition {
        self.view
    }
}
