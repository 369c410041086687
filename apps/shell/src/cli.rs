//! Command-line interface of the `geonav` binary.

use clap::Parser;
use std::path::PathBuf;

/// Walks a region hierarchy and prints the breadcrumb trail.
#[derive(Debug, Parser)]
#[command(name = "geonav")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Region hierarchy navigator")]
pub(crate) struct Cli {
    /// Configuration file (TOML, JSON or YAML); `geonav.*` in the working directory otherwise
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Region service root, overrides `service.base_url`
    #[arg(long)]
    pub(crate) base_url: Option<String>,

    /// Hierarchy to navigate, overrides `navigation.default_hierarchy`
    #[arg(long)]
    pub(crate) hierarchy: Option<u64>,

    /// Region ids to drill into, from the root down
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub(crate) path: Vec<u64>,

    /// Click the crumb at this index after walking the path
    #[arg(long)]
    pub(crate) crumb: Option<usize>,

    /// Also list the children of the final selection
    #[arg(long)]
    pub(crate) children: bool,

    /// Also print the geometry of the final selection
    #[arg(long)]
    pub(crate) geometry: bool,

    /// List the available hierarchies and exit
    #[arg(long)]
    pub(crate) hierarchies: bool,
}
