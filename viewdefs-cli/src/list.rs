//! viewdefs list - List registered views.

use comfy_table::{presets::UTF8_FULL, Table};
use viewdefs::{ViewDefinition, ViewElementDefinition, ViewRegistry};

/// Run the list command. Returns the exit code.
pub fn run_list(registry: &ViewRegistry, json: bool) -> i32 {
    if json {
        match list_json(registry) {
            Ok(out) => {
                println!("{out}");
                0
            }
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        }
    } else {
        if registry.is_empty() {
            println!("No views registered.");
            return 0;
        }
        println!("{}", list_table(registry));
        println!();
        println!("{} view(s) registered", registry.len());
        0
    }
}

/// All views as a pretty-printed JSON array, sorted by name.
pub fn list_json(registry: &ViewRegistry) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&registry.list_views())
}

/// Table with one row per view.
pub fn list_table(registry: &ViewRegistry) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Header", "Elements", "Opens"]);

    for view in registry.list_views() {
        table.add_row(vec![
            view.name().to_string(),
            view.header().unwrap_or("").to_string(),
            element_summary(view),
            targets(view),
        ]);
    }
    table
}

fn element_summary(view: &ViewDefinition) -> String {
    view.elements()
        .iter()
        .map(|e| {
            let kind = match e {
                ViewElementDefinition::Grid(_) => "grid",
                ViewElementDefinition::Form(_) => "form",
            };
            format!("{kind} {}", e.name())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn targets(view: &ViewDefinition) -> String {
    let mut targets: Vec<&str> = view.navigation_links().map(|(_, target)| target).collect();
    targets.dedup();
    targets.join("\n")
}
