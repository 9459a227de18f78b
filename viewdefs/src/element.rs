//! View elements: grids and forms bound to a data definition.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use viewdefs_schema::DataDefinition;

use crate::column::ColumnDefinition;
use crate::error::{Result, ViewError};

const REQUEST_ENTITY: &str = "entityId";
const SIBLING_PREFIX: &str = "viewElement:";

/// Where an element takes its bound record from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentBinding {
    /// The primary key supplied with the current request (`entityId`).
    RequestEntity,
    /// The selected record of a sibling element (`viewElement:<name>`).
    SiblingElement(String),
}

impl ParentBinding {
    /// Name of the bound sibling, or `None` for the request entity.
    pub fn sibling(&self) -> Option<&str> {
        match self {
            ParentBinding::SiblingElement(name) => Some(name),
            ParentBinding::RequestEntity => None,
        }
    }
}

impl FromStr for ParentBinding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == REQUEST_ENTITY {
            return Ok(ParentBinding::RequestEntity);
        }
        match s.strip_prefix(SIBLING_PREFIX) {
            Some(name) if !name.is_empty() => Ok(ParentBinding::SiblingElement(name.to_string())),
            Some(_) => Err(format!("missing element name after '{SIBLING_PREFIX}'")),
            None => Err(format!(
                "expected '{REQUEST_ENTITY}' or '{SIBLING_PREFIX}<name>'"
            )),
        }
    }
}

impl fmt::Display for ParentBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentBinding::RequestEntity => f.write_str(REQUEST_ENTITY),
            ParentBinding::SiblingElement(name) => write!(f, "{SIBLING_PREFIX}{name}"),
        }
    }
}

impl Serialize for ParentBinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParentBinding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let descriptor = String::deserialize(deserializer)?;
        descriptor.parse().map_err(serde::de::Error::custom)
    }
}

/// Option keys a grid recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GridOption {
    Paging,
    Sortable,
    Filter,
    Multiselect,
    Height,
    CanDelete,
    CanNew,
}

impl GridOption {
    pub const ALL: [GridOption; 7] = [
        GridOption::Paging,
        GridOption::Sortable,
        GridOption::Filter,
        GridOption::Multiselect,
        GridOption::Height,
        GridOption::CanDelete,
        GridOption::CanNew,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GridOption::Paging => "paging",
            GridOption::Sortable => "sortable",
            GridOption::Filter => "filter",
            GridOption::Multiselect => "multiselect",
            GridOption::Height => "height",
            GridOption::CanDelete => "canDelete",
            GridOption::CanNew => "canNew",
        }
    }

    /// Boolean options take `true`/`false`; `height` takes a number.
    pub fn is_flag(self) -> bool {
        !matches!(self, GridOption::Height)
    }
}

impl FromStr for GridOption {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GridOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for GridOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid options, kept as the strings they were declared with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GridOptions(BTreeMap<GridOption, String>);

impl GridOptions {
    /// Set an option, checking its key and value. `element` names the grid in errors.
    pub fn set(&mut self, element: &str, key: &str, value: &str) -> Result<()> {
        let option: GridOption = key
            .parse()
            .map_err(|_| ViewError::invalid_option(element, key, "unknown grid option"))?;

        let valid = if option.is_flag() {
            matches!(value, "true" | "false")
        } else {
            value.parse::<u32>().is_ok()
        };
        if !valid {
            let expected = if option.is_flag() {
                "expected 'true' or 'false'"
            } else {
                "expected a non-negative integer"
            };
            return Err(ViewError::invalid_option(
                element,
                key,
                format!("{expected}, got '{value}'"),
            ));
        }

        self.0.insert(option, value.to_string());
        Ok(())
    }

    pub fn get(&self, option: GridOption) -> Option<&str> {
        self.0.get(&option).map(String::as_str)
    }

    /// A boolean option, if declared.
    pub fn flag(&self, option: GridOption) -> Option<bool> {
        self.get(option).map(|value| value == "true")
    }

    pub fn height(&self) -> Option<u32> {
        self.get(GridOption::Height).and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridOption, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn serialize_schema_name<S: Serializer>(
    def: &Arc<DataDefinition>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(def.name())
}

/// Attributes shared by every element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBase {
    pub(crate) name: String,
    #[serde(serialize_with = "serialize_schema_name")]
    pub(crate) data_definition: Arc<DataDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<ParentBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) parent_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) corresponding_view_name: Option<String>,
}

impl ElementBase {
    pub(crate) fn new(name: impl Into<String>, data_definition: Arc<DataDefinition>) -> Self {
        Self {
            name: name.into(),
            data_definition,
            header: None,
            parent: None,
            parent_field: None,
            corresponding_view_name: None,
        }
    }
}

/// A tabular list of records.
#[derive(Debug, Clone, Serialize)]
pub struct GridDefinition {
    #[serde(flatten)]
    pub(crate) base: ElementBase,
    pub(crate) columns: Vec<ColumnDefinition>,
    pub(crate) options: GridOptions,
    pub(crate) events: BTreeMap<String, String>,
}

impl GridDefinition {
    /// Columns in display order.
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Event name to handler reference; handlers are opaque here.
    pub fn events(&self) -> &BTreeMap<String, String> {
        &self.events
    }
}

/// A single-record editor.
#[derive(Debug, Clone, Serialize)]
pub struct FormDefinition {
    #[serde(flatten)]
    pub(crate) base: ElementBase,
}

/// An element of a view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewElementDefinition {
    Grid(GridDefinition),
    Form(FormDefinition),
}

impl ViewElementDefinition {
    fn base(&self) -> &ElementBase {
        match self {
            ViewElementDefinition::Grid(grid) => &grid.base,
            ViewElementDefinition::Form(form) => &form.base,
        }
    }

    /// Unique within the owning view.
    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn data_definition(&self) -> &Arc<DataDefinition> {
        &self.base().data_definition
    }

    pub fn header(&self) -> Option<&str> {
        self.base().header.as_deref()
    }

    pub fn parent(&self) -> Option<&ParentBinding> {
        self.base().parent.as_ref()
    }

    /// Relation field that must equal the parent-bound record.
    pub fn parent_field(&self) -> Option<&str> {
        self.base().parent_field.as_deref()
    }

    /// View opened when drilling down from this element.
    pub fn corresponding_view_name(&self) -> Option<&str> {
        self.base().corresponding_view_name.as_deref()
    }

    pub fn as_grid(&self) -> Option<&GridDefinition> {
        match self {
            ViewElementDefinition::Grid(grid) => Some(grid),
            ViewElementDefinition::Form(_) => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormDefinition> {
        match self {
            ViewElementDefinition::Form(form) => Some(form),
            ViewElementDefinition::Grid(_) => None,
        }
    }
}
