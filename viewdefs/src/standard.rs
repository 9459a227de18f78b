//! Stock schemas and views for products, users, orders and dictionaries.
//!
//! `standard_schemas()` returns the data definitions the stock views bind to.
//! They can seed an on-disk catalog via `standard_defaults()` and
//! `SchemaCatalog::open().with_defaults()`, or back an in-memory catalog via
//! `standard_catalog()`. `standard_views()` lists one factory per stock view.

use viewdefs_schema::{
    DataDefinition, FieldDef, FieldType, SchemaCatalog, SchemaDefaults, SchemaProvider,
    SelectOption,
};

use crate::builder::{form, grid, ElementBuilder, ViewBuilder};
use crate::column::ColumnResolver;
use crate::error::Result;
use crate::registry::ViewFactoryFn;
use crate::view::ViewDefinition;

fn select(values: &[&str]) -> FieldType {
    FieldType::Select {
        options: values
            .iter()
            .zip(0..)
            .map(|(value, order)| SelectOption {
                value: value.to_string(),
                label: None,
                order,
            })
            .collect(),
    }
}

/// Data definitions behind the stock views.
pub fn standard_schemas() -> Result<Vec<DataDefinition>> {
    Ok(vec![
        // Products
        DataDefinition::from_fields(
            "products.product",
            [
                FieldDef::text("number").required(),
                FieldDef::text("name").required(),
                FieldDef::new(
                    "typeOfMaterial",
                    select(&["product", "semiProduct", "component"]),
                ),
                FieldDef::text("ean").with_description("EAN barcode"),
            ],
        )?
        .with_description("Product master data"),
        DataDefinition::from_fields(
            "products.substitute",
            [
                FieldDef::text("number").required(),
                FieldDef::text("name"),
                FieldDef::new("priority", FieldType::Integer),
                FieldDef::relation("product", "products.product").required(),
            ],
        )?
        .with_description("Replacement set for a product"),
        DataDefinition::from_fields(
            "products.substituteComponent",
            [
                FieldDef::new("quantity", FieldType::Decimal),
                FieldDef::relation("product", "products.product").required(),
                FieldDef::relation("substitute", "products.substitute").required(),
            ],
        )?
        .with_description("Product taking part in a substitute"),
        // Users
        DataDefinition::from_fields(
            "users.group",
            [
                FieldDef::text("name").required(),
                FieldDef::new("role", select(&["ROLE_ADMIN", "ROLE_USER"])),
            ],
        )?,
        DataDefinition::from_fields(
            "users.user",
            [
                FieldDef::text("userName").required(),
                FieldDef::text("email"),
                FieldDef::text("firstName"),
                FieldDef::text("lastName"),
                FieldDef::relation("userGroup", "users.group").required(),
            ],
        )?,
        // Orders
        DataDefinition::from_fields(
            "orders.order",
            [
                FieldDef::text("number").required(),
                FieldDef::text("name"),
                FieldDef::new("state", select(&["new", "pending", "done"])),
            ],
        )?,
        // Dictionaries
        DataDefinition::from_fields("core.dictionary", [FieldDef::text("name").required()])?,
        DataDefinition::from_fields(
            "core.dictionaryItem",
            [
                FieldDef::text("name").required(),
                FieldDef::text("description"),
                FieldDef::relation("dictionary", "core.dictionary").required(),
            ],
        )?,
    ])
}

/// Stock schemas as catalog seed defaults.
pub fn standard_defaults() -> Result<SchemaDefaults> {
    Ok(standard_schemas()?
        .into_iter()
        .fold(SchemaDefaults::new(), SchemaDefaults::definition))
}

/// In-memory catalog of the stock schemas.
pub fn standard_catalog() -> Result<SchemaCatalog> {
    Ok(SchemaCatalog::from_definitions(standard_schemas()?)?)
}

/// One factory per stock view.
pub fn standard_views() -> Vec<ViewFactoryFn> {
    vec![
        product_grid_view,
        product_details_view,
        substitute_details_view,
        substitute_component_details_view,
        group_grid_view,
        group_details_view,
        user_grid_view,
        user_details_view,
        order_grid_view,
        order_details_view,
        dictionary_grid_view,
        dictionary_details_view,
        dictionary_item_details_view,
    ]
}

const LIST_OPTIONS: [(&str, &str); 5] = [
    ("paging", "true"),
    ("sortable", "true"),
    ("filter", "true"),
    ("multiselect", "true"),
    ("height", "450"),
];

const NESTED_OPTIONS: [(&str, &str); 5] = [
    ("paging", "false"),
    ("sortable", "false"),
    ("filter", "false"),
    ("multiselect", "false"),
    ("height", "150"),
];

pub fn product_grid_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let product = provider.get_schema("products.product")?;
    let columns = ColumnResolver::new(provider);

    let products = grid("products", product.clone())
        .with_corresponding_view("products.productDetailsView")
        .with_options(LIST_OPTIONS)?
        .with_columns([
            columns.field_column(&product, "number")?,
            columns.field_column(&product, "name")?,
            columns.field_column(&product, "typeOfMaterial")?,
            columns.field_column(&product, "ean")?,
        ])?;

    Ok(ViewBuilder::new("products.productGridView")?
        .with_header("Products:")
        .with_element(products)?
        .build())
}

pub fn product_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let product = provider.get_schema("products.product")?;
    let substitute = provider.get_schema("products.substitute")?;
    let component = provider.get_schema("products.substituteComponent")?;
    let columns = ColumnResolver::new(provider);

    let details = form("productDetailsForm", product)
        .bound_to_request_entity()
        .with_corresponding_view("products.productGridView");

    let substitutes = grid("substitutesGrid", substitute.clone())
        .with_parent("viewElement:productDetailsForm")?
        .with_parent_field("product")?
        .with_header("Substitutes:")
        .with_columns([
            columns.field_column(&substitute, "number")?,
            columns.field_column(&substitute, "name")?,
            columns.field_column(&substitute, "priority")?,
        ])?
        .with_options(NESTED_OPTIONS)?
        .with_corresponding_view("products.substituteDetailsView");

    let components = grid("substitutesComponentGrid", component.clone())
        .with_parent("viewElement:substitutesGrid")?
        .with_parent_field("substitute")?
        .with_header("Substitute products:")
        .with_columns([
            columns.make_column(
                &component,
                "number",
                &["number"],
                Some("fields['product'].fields['number']"),
            )?,
            columns.make_column(
                &component,
                "name",
                &["name"],
                Some("fields['product'].fields['name']"),
            )?,
            columns.field_column(&component, "quantity")?,
        ])?
        .with_options(NESTED_OPTIONS)?
        .with_corresponding_view("products.substituteComponentDetailsView");

    Ok(ViewBuilder::new("products.productDetailsView")?
        .with_header("Product:")
        .with_element(details)?
        .with_element(substitutes)?
        .with_element(components)?
        .build())
}

pub fn substitute_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let substitute = provider.get_schema("products.substitute")?;

    let details = form("substitutesDetailsForm", substitute)
        .bound_to_request_entity()
        .with_parent_field("product")?
        .with_corresponding_view("products.productDetailsView");

    Ok(ViewBuilder::new("products.substituteDetailsView")?
        .with_header("Substitute:")
        .with_element(details)?
        .build())
}

pub fn substitute_component_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let component = provider.get_schema("products.substituteComponent")?;

    let details = form("substitutesComponentDetailsForm", component)
        .bound_to_request_entity()
        .with_parent_field("substitute")?
        .with_corresponding_view("products.productDetailsView");

    Ok(ViewBuilder::new("products.substituteComponentDetailsView")?
        .with_header("Substitute product:")
        .with_element(details)?
        .build())
}

pub fn group_grid_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let group = provider.get_schema("users.group")?;
    let columns = ColumnResolver::new(provider);

    let groups = grid("groups", group.clone())
        .with_corresponding_view("users.groupDetailsView")
        .with_options(LIST_OPTIONS)?
        .with_option("filter", "false")?
        .with_columns([
            columns.field_column(&group, "name")?,
            columns.field_column(&group, "role")?,
        ])?;

    Ok(ViewBuilder::new("users.groupGridView")?
        .with_element(groups)?
        .build())
}

pub fn group_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let group = provider.get_schema("users.group")?;

    let details = form("groupDetailsForm", group)
        .bound_to_request_entity()
        .with_corresponding_view("users.groupGridView");

    Ok(ViewBuilder::new("users.groupDetailsView")?
        .with_element(details)?
        .build())
}

pub fn user_grid_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let user = provider.get_schema("users.user")?;
    let columns = ColumnResolver::new(provider);

    let users = grid("users", user.clone())
        .with_corresponding_view("users.userDetailsView")
        .with_options(LIST_OPTIONS)?
        .with_option("filter", "false")?
        .with_columns([
            columns.make_column(&user, "login", &["userName"], None)?,
            columns.field_column(&user, "email")?,
            columns.field_column(&user, "firstName")?,
            columns.field_column(&user, "lastName")?,
            columns.make_column(
                &user,
                "userGroup",
                &["userGroup"],
                Some("fields['userGroup'].fields['name']"),
            )?,
        ])?;

    Ok(ViewBuilder::new("users.userGridView")?
        .with_element(users)?
        .build())
}

pub fn user_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let user = provider.get_schema("users.user")?;

    let details = form("userDetailsForm", user)
        .bound_to_request_entity()
        .with_corresponding_view("users.userGridView");

    Ok(ViewBuilder::new("users.userDetailsView")?
        .with_element(details)?
        .build())
}

pub fn order_grid_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let order = provider.get_schema("orders.order")?;
    let columns = ColumnResolver::new(provider);

    let orders = grid("orders", order.clone())
        .with_corresponding_view("orders.orderDetailsView")
        .with_options(LIST_OPTIONS)?
        .with_columns([
            columns.field_column(&order, "number")?,
            columns.field_column(&order, "name")?,
            columns.field_column(&order, "state")?,
        ])?;

    Ok(ViewBuilder::new("orders.orderGridView")?
        .with_header("Orders:")
        .with_element(orders)?
        .build())
}

pub fn order_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let order = provider.get_schema("orders.order")?;

    let details = form("orderDetailsForm", order)
        .bound_to_request_entity()
        .with_corresponding_view("orders.orderGridView");

    Ok(ViewBuilder::new("orders.orderDetailsView")?
        .with_header("Order:")
        .with_element(details)?
        .build())
}

pub fn dictionary_grid_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let dictionary = provider.get_schema("core.dictionary")?;
    let columns = ColumnResolver::new(provider);

    let dictionaries = grid("dictionaries", dictionary.clone())
        .with_corresponding_view("core.dictionaryDetailsView")
        .with_options(LIST_OPTIONS)?
        .with_options([
            ("multiselect", "false"),
            ("canDelete", "false"),
            ("canNew", "false"),
        ])?
        .with_columns([columns.field_column(&dictionary, "name")?])?;

    Ok(ViewBuilder::new("core.dictionaryGridView")?
        .with_header("Dictionaries:")
        .with_element(dictionaries)?
        .build())
}

pub fn dictionary_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let item = provider.get_schema("core.dictionaryItem")?;
    let columns = ColumnResolver::new(provider);

    let items = grid("dictionaryItems", item.clone())
        .bound_to_request_entity()
        .with_parent_field("dictionary")?
        .with_corresponding_view("core.dictionaryItemDetailsView")
        .with_options([
            ("paging", "false"),
            ("sortable", "false"),
            ("filter", "false"),
            ("multiselect", "true"),
            ("height", "250"),
        ])?
        .with_columns([
            columns.field_column(&item, "name")?,
            columns.field_column(&item, "description")?,
        ])?;

    Ok(ViewBuilder::new("core.dictionaryDetailsView")?
        .with_header("Dictionary:")
        .with_element(items)?
        .build())
}

pub fn dictionary_item_details_view(provider: &dyn SchemaProvider) -> Result<ViewDefinition> {
    let item = provider.get_schema("core.dictionaryItem")?;

    let details = form("dictionaryItemDetailsForm", item)
        .bound_to_request_entity()
        .with_parent_field("dictionary")?
        .with_corresponding_view("core.dictionaryDetailsView");

    Ok(ViewBuilder::new("core.dictionaryItemDetailsView")?
        .with_header("Dictionary item:")
        .with_element(details)?
        .build())
}
