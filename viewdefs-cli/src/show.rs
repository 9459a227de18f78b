//! viewdefs show - Print one view as JSON.

use viewdefs::ViewRegistry;

/// Run the show command. Exit code 1 when the view is not registered.
pub fn run_show(registry: &ViewRegistry, name: &str) -> i32 {
    let Some(view) = registry.get_view(name) else {
        eprintln!("Error: view not found: {name}");
        return 1;
    };
    match serde_json::to_string_pretty(view) {
        Ok(out) => {
            println!("{out}");
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewdefs::standard::{standard_catalog, standard_views};

    fn registry() -> ViewRegistry {
        ViewRegistry::register(&standard_catalog().unwrap(), standard_views()).unwrap()
    }

    #[test]
    fn test_show_known_view() {
        assert_eq!(run_show(&registry(), "orders.orderDetailsView"), 0);
    }

    #[test]
    fn test_show_unknown_view() {
        assert_eq!(run_show(&registry(), "orders.nothing"), 1);
    }
}
