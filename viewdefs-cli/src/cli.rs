//! CLI definition for the `viewdefs` command-line interface.
//!
//! Only depends on `clap` and `std`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// viewdefs - inspect a view definition catalog
///
/// Builds the view registry from a schema directory (or the stock schemas)
/// and lists, shows or checks the registered views.
#[derive(Parser, Debug)]
#[command(name = "viewdefs")]
#[command(version)]
#[command(about = "Inspect and check declarative view definitions")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Directory holding `entities/*.yaml` schema files (stock schemas if omitted)
    #[arg(long, global = true, value_name = "DIR")]
    pub schemas: Option<PathBuf>,

    /// Registry configuration file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered views sorted by name
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one view as JSON
    Show {
        /// Qualified view name, e.g. products.productGridView
        view: String,
    },
    /// Build the registry and report navigation issues
    Check,
}
