//! viewdefs CLI - inspect a view definition catalog.
//!
//! Commands:
//! - `viewdefs list [--json]`: List registered views sorted by name
//! - `viewdefs show <view>`: Print one view as JSON
//! - `viewdefs check`: Build the registry and report navigation issues
//!
//! Global options: `--schemas DIR`, `--config FILE`, `--debug`
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;
use viewdefs::ViewRegistry;

use viewdefs_cli::{check, list, load_registry, show};
use viewdefs_cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("viewdefs=debug,viewdefs_schema=debug,viewdefs_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = dispatch_command(cli).await;
    std::process::exit(exit_code);
}

/// Build the registry and run the requested command.
async fn dispatch_command(cli: Cli) -> i32 {
    let result = load_registry(cli.schemas.as_deref(), cli.config.as_deref()).await;
    match cli.command {
        Commands::Check => check::run_check(result),
        Commands::List { json } => with_registry(result, |r| list::run_list(r, json)),
        Commands::Show { view } => with_registry(result, |r| show::run_show(r, &view)),
    }
}

/// Run `command` on a built registry, or report the build error.
fn with_registry(
    result: viewdefs::Result<ViewRegistry>,
    command: impl FnOnce(&ViewRegistry) -> i32,
) -> i32 {
    match result {
        Ok(registry) => command(&registry),
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_parsing_list() {
        let cli = Cli::parse_from(["viewdefs", "list"]);
        assert!(!cli.debug);
        assert!(cli.schemas.is_none());
        assert!(matches!(cli.command, Commands::List { json: false }));
    }

    #[test]
    fn test_cli_parsing_list_json() {
        let cli = Cli::parse_from(["viewdefs", "list", "--json"]);
        assert!(matches!(cli.command, Commands::List { json: true }));
    }

    #[test]
    fn test_cli_parsing_show() {
        let cli = Cli::parse_from(["viewdefs", "show", "products.productGridView"]);
        match cli.command {
            Commands::Show { view } => assert_eq!(view, "products.productGridView"),
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_options() {
        let cli = Cli::parse_from([
            "viewdefs",
            "--debug",
            "check",
            "--schemas",
            "/tmp/schemas",
            "--config",
            "viewdefs.yaml",
        ]);
        assert!(cli.debug);
        assert_eq!(cli.schemas.as_deref(), Some(Path::new("/tmp/schemas")));
        assert_eq!(cli.config.as_deref(), Some(Path::new("viewdefs.yaml")));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["viewdefs"]).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_show_missing_view() {
        let cli = Cli::parse_from(["viewdefs", "show", "orders.nothing"]);
        assert_eq!(dispatch_command(cli).await, 1);
    }

    #[test]
    fn test_with_registry_reports_errors() {
        let result = Err(viewdefs::ViewError::ViewNotFound {
            name: "orders.nothing".into(),
        });
        assert_eq!(with_registry(result, |_| 0), 1);
    }

    #[tokio::test]
    async fn test_dispatch_check() {
        let cli = Cli::parse_from(["viewdefs", "check"]);
        assert_eq!(dispatch_command(cli).await, 0);
    }
}
