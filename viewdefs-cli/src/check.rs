//! viewdefs check - Build the registry and report problems.

use viewdefs::{Result, ViewRegistry};

/// Report the outcome of building the registry.
///
/// Exit codes:
/// - 0: registry built (navigation issues are printed but informational)
/// - 1: registration failed
pub fn run_check(result: Result<ViewRegistry>) -> i32 {
    match result {
        Ok(registry) => {
            for issue in registry.navigation_issues() {
                println!("warning: {issue}");
            }
            println!(
                "{} view(s) registered, {} navigation issue(s)",
                registry.len(),
                registry.navigation_issues().len()
            );
            0
        }
        Err(e) => {
            let kind = if e.is_startup_fatal() {
                "fatal"
            } else {
                "error"
            };
            eprintln!("{kind}: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewdefs::standard::{standard_catalog, standard_views};
    use viewdefs::ViewError;

    #[test]
    fn test_check_stock_catalog() {
        let result = ViewRegistry::register(&standard_catalog().unwrap(), standard_views());
        assert_eq!(run_check(result), 0);
    }

    #[test]
    fn test_check_failure() {
        let result = Err(ViewError::DuplicateViewName {
            name: "orders.orderGridView".into(),
        });
        assert_eq!(run_check(result), 1);
    }
}
